//! Command-line front-end.
//!
//! Reads a problem from a JSON file (or stdin), solves it, and writes the
//! result as JSON, or, with `--local`, draws a progress bar and prints the
//! assignment grouped by group id. `--serve` starts the REST shell instead.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use cohort_ga::assignment::{SolveOptions, solve, solve_with_observer};
use cohort_ga::models::{ProblemInput, ProblemOutput};
use cohort_ga::server;

/// Assign students to groups using a genetic algorithm.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the input JSON file (`-` reads stdin)
    input_file: Option<String>,

    /// Path to the output JSON file (defaults to stdout)
    #[arg(long)]
    output: Option<String>,

    /// Show a progress bar and print grouped assignments instead of JSON
    #[arg(long)]
    local: bool,

    /// Number of GA runs; the best result wins
    #[arg(long, default_value_t = 5)]
    runs: usize,

    /// Start the REST API server
    #[arg(long)]
    serve: bool,

    /// Host for the server
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the server (defaults to $PORT, else 8000)
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.serve {
        let port = resolve_port(args.port)?;
        println!("Starting server on {}:{}", args.host, port);
        let runtime = tokio::runtime::Runtime::new()?;
        return Ok(runtime.block_on(server::serve(&args.host, port))?);
    }

    let Some(input_file) = &args.input_file else {
        Args::command().print_help()?;
        std::process::exit(1);
    };

    let raw = read_input(input_file)?;
    let input: ProblemInput =
        serde_json::from_str(&raw).context("failed to parse input JSON")?;
    input.validate().context("invalid problem input")?;

    let options = SolveOptions {
        runs: args.runs,
        seed: None,
    };

    if args.local {
        let output = solve_with_progress(&input, &options);
        print_grouped(&output);
    } else {
        let output = solve(&input, &options);
        let json = serde_json::to_string_pretty(&output)?;
        match &args.output {
            Some(path) => fs::write(path, json)
                .with_context(|| format!("failed to write output file {path:?}"))?,
            None => println!("{json}"),
        }
    }

    Ok(())
}

fn resolve_port(cli_port: Option<u16>) -> anyhow::Result<u16> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    match std::env::var("PORT") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid PORT value {value:?}")),
        Err(_) => Ok(8000),
    }
}

fn read_input(input_file: &str) -> anyhow::Result<String> {
    if input_file == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(input_file)
            .with_context(|| format!("failed to read input file {input_file:?}"))
    }
}

/// Runs the solver with one progress bar per GA run.
fn solve_with_progress(input: &ProblemInput, options: &SolveOptions) -> ProblemOutput {
    let style = ProgressStyle::with_template("{prefix} {bar:40} {pos}/{len} {msg}")
        .expect("static progress template")
        .progress_chars("=>-");

    let mut bar: Option<ProgressBar> = None;
    let mut current_run = usize::MAX;

    let output = solve_with_observer(input, options, |progress| {
        if progress.run != current_run {
            if let Some(done) = bar.take() {
                done.finish();
            }
            current_run = progress.run;
            let next = ProgressBar::new(progress.generations as u64)
                .with_style(style.clone());
            next.set_prefix(if progress.total_runs > 1 {
                format!("GA {}/{}", progress.run + 1, progress.total_runs)
            } else {
                "GA".to_string()
            });
            bar = Some(next);
        }
        if let Some(bar) = &bar {
            bar.set_position(progress.generation as u64);
            bar.set_message(format!("best {:.2}", progress.best_fitness));
        }
    });

    if let Some(bar) = bar {
        bar.finish();
    }
    output
}

/// `{group_id}: {sorted student ids}`, one line per group, ascending.
fn print_grouped(output: &ProblemOutput) {
    let mut grouped: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for assignment in &output.assignments {
        grouped
            .entry(assignment.group_id)
            .or_default()
            .push(assignment.student_id);
    }
    for (group_id, mut students) in grouped {
        students.sort_unstable();
        let students = students
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("{group_id}: {students}");
    }
}
