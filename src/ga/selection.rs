//! Parent selection.
//!
//! Tournament selection is the only strategy the solver uses: it keeps
//! selection pressure moderate and is insensitive to the enormous fitness
//! range a penalty-method objective produces (hard-constraint terms dwarf
//! soft terms, which rules out fitness-proportionate schemes).

use rand::Rng;
use rand::seq::index;

use super::types::Individual;

/// Tournament selection: sample `k` distinct individuals, return the index
/// of the one with the lowest fitness.
///
/// Sampling is without replacement; ties are broken by first occurrence in
/// the sample. `k` is clamped to the population size.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<I: Individual, R: Rng + ?Sized>(
    population: &[I],
    k: usize,
    rng: &mut R,
) -> usize {
    assert!(!population.is_empty(), "cannot select from empty population");

    let amount = k.clamp(1, population.len());
    let sample = index::sample(rng, population.len(), amount);

    let mut best = sample.index(0);
    for i in 1..amount {
        let candidate = sample.index(i);
        if population[candidate].fitness() < population[best].fitness() {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[derive(Clone)]
    struct TestInd {
        fit: f64,
    }

    impl Individual for TestInd {
        fn fitness(&self) -> f64 {
            self.fit
        }
        fn set_fitness(&mut self, f: f64) {
            self.fit = f;
        }
    }

    fn make_population(fitnesses: &[f64]) -> Vec<TestInd> {
        fitnesses.iter().map(|&f| TestInd { fit: f }).collect()
    }

    #[test]
    fn test_full_tournament_always_picks_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = StdRng::seed_from_u64(42);

        // With k == population size the sample is the whole population,
        // so the global best must win every time.
        for _ in 0..100 {
            assert_eq!(tournament(&pop, 4, &mut rng), 2);
        }
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            counts[tournament(&pop, 3, &mut rng)] += 1;
        }
        // k=3 of 4 without replacement: the best individual wins whenever
        // sampled, i.e. with probability 3/4.
        assert!(
            counts[2] > 7_000,
            "expected best selected ~75% of the time, got {}/{n}",
            counts[2]
        );
    }

    #[test]
    fn test_tournament_size_1_is_uniform() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[tournament(&pop, 1, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 1_500, "expected uniform selection, got {counts:?}");
        }
    }

    #[test]
    fn test_oversized_tournament_clamped() {
        let pop = make_population(&[3.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(tournament(&pop, 10, &mut rng), 1);
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(tournament(&pop, 3, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = StdRng::seed_from_u64(42);
        tournament(&pop, 3, &mut rng);
    }
}
