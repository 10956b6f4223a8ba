//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

/// Configuration for the genetic algorithm.
///
/// Controls population size, operator rates, elitism, tournament pressure,
/// and reproducibility.
///
/// # Defaults
///
/// The defaults are the parameters the assignment solver runs with:
///
/// ```
/// use cohort_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 120);
/// assert_eq!(config.generations, 200);
/// assert_eq!(config.elitism, 6);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use cohort_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_generations(50)
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to evolve.
    pub generations: usize,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, a copy of the first parent is used.
    pub crossover_rate: f64,

    /// Probability of applying mutation to an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of top individuals copied unchanged into the next generation.
    pub elitism: usize,

    /// Tournament size for parent selection.
    ///
    /// Individuals are sampled without replacement; larger tournaments mean
    /// stronger selection pressure.
    pub tournament_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a seed from the operating system.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 120,
            generations: 200,
            crossover_rate: 1.0,
            mutation_rate: 0.28,
            elitism: 6,
            tournament_size: 3,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of elites preserved per generation.
    pub fn with_elitism(mut self, n: usize) -> Self {
        self.elitism = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.elitism >= self.population_size {
            return Err("elitism too high: elites fill entire population".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 120);
        assert_eq!(config.generations, 200);
        assert!((config.crossover_rate - 1.0).abs() < 1e-10);
        assert!((config.mutation_rate - 0.28).abs() < 1e-10);
        assert_eq!(config.elitism, 6);
        assert_eq!(config.tournament_size, 3);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_generations(50)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.05)
            .with_elitism(2)
            .with_tournament_size(5)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.generations, 50);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.elitism, 2);
        assert_eq!(config.tournament_size, 5);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elitism_too_high() {
        let config = GaConfig::default().with_population_size(6).with_elitism(6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());
    }
}
