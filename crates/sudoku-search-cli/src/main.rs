//! Command-line front end: pick an algorithm, hand over a puzzle, print
//! the report.

use clap::Parser;
use std::process::ExitCode;
use sudoku_search::{Algorithm, Grid, Solver, SolverConfig};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sudoku-search", version, about = "Solve a Sudoku grid by state-space search")]
struct Cli {
    /// Algorithm selector: B (BFS), I (IDDFS), U (UCS), A (A*), G (greedy)
    #[arg(value_name = "ALGORITHM")]
    algorithm: char,

    /// Nine rows of nine digits each, 0 for an empty cell
    #[arg(value_name = "ROW", num_args = 9)]
    rows: Vec<String>,

    /// Seed for the synthetic edge costs drawn by uniform-cost search
    #[arg(long)]
    seed: Option<u64>,

    /// Depth cap for iterative deepening (default: one per cell)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let algorithm = Algorithm::try_from(cli.algorithm)?;
    let rows: Vec<&str> = cli.rows.iter().map(String::as_str).collect();
    let grid = Grid::parse(&rows)?;

    let mut config = SolverConfig::new(algorithm);
    config.seed = cli.seed;
    config.max_depth = cli.max_depth;

    debug!(%algorithm, seed = ?cli.seed, "starting search");
    let mut solver = Solver::with_config(grid, config);
    let report = solver.solve()?;
    info!(
        algorithm = %report.algorithm,
        solved = report.solved,
        expanded_states = report.expanded_states,
        elapsed_ms = report.elapsed.as_secs_f64() * 1_000.0,
        "search finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{grid}");
    match &report.solution {
        Some(solution) => {
            println!("{solution}");
            println!(
                "{} found a solution in {:.3} ms after expanding {} states",
                report.algorithm,
                report.elapsed.as_secs_f64() * 1_000.0,
                report.expanded_states
            );
        }
        // Exhaustion is a normal negative answer, not a failure.
        None => println!(
            "{} exhausted the search space after expanding {} states",
            report.algorithm, report.expanded_states
        ),
    }

    Ok(())
}
