use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, LevelFilter};

use rush_hour::search::DEFAULT_DEPTH_LIMIT;
use rush_hour::{
    map, puzzles, render, replay, Algorithm, Heuristic, PuzzleError, SearchConfig, SearchReport,
    SearchResult, Solver, State,
};

/// Solve Rush Hour puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Map file to solve
    #[arg(required_unless_present_any = ["builtin", "ls"], conflicts_with = "builtin")]
    map: Option<PathBuf>,

    /// Solve a built-in puzzle instead of a map file
    #[arg(short, long)]
    builtin: Option<String>,

    /// List the built-in puzzles
    #[arg(long, default_value_t = false)]
    ls: bool,

    /// Search algorithm
    #[arg(value_enum, short, long, default_value_t = Algorithm::Bfs)]
    algorithm: Algorithm,

    /// Estimate used by A*
    #[arg(value_enum, long, default_value_t = Heuristic::BlockingChain)]
    heuristic: Heuristic,

    /// Deepest DFS branch explored
    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    depth_limit: usize,

    /// Cancel the search after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Draw every board along the solution
    #[arg(short, long, default_value_t = false)]
    replay: bool,

    /// Print the search report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn load(args: &Args) -> Result<Option<State>, PuzzleError> {
    if let Some(name) = &args.builtin {
        return match puzzles::by_name(name) {
            Some(puzzle) => puzzle.state().map(Some),
            None => {
                eprintln!("Unknown puzzle {name}. Use --ls to list the built-in puzzles.");
                Ok(None)
            }
        };
    }
    match &args.map {
        Some(path) => map::load_map(path).map(Some),
        None => Ok(None),
    }
}

fn print_report(initial: &State, report: &SearchReport, draw: bool) -> Result<(), PuzzleError> {
    let seconds = report.elapsed.as_secs_f64();
    match &report.result {
        SearchResult::Solved {
            cost,
            nodes_expanded,
            path,
        } => {
            println!("Solved with {}", report.algorithm);
            println!("   Cost: {cost}");
            println!("   Steps: {}", path.len());
            println!("   Nodes expanded: {nodes_expanded}");
            println!("   Time: {seconds:.3} seconds");
            println!("   Peak frontier: {}", report.peak_frontier);

            if draw {
                let states = replay(initial, path)?;
                let mut out = io::stdout();
                for (i, (mv, state)) in path.iter().zip(&states[1..]).enumerate() {
                    println!("\nStep {}: {mv}", i + 1);
                    render::render_board(state, Some(mv), &mut out)?;
                }
            } else {
                for (i, mv) in path.iter().enumerate() {
                    println!("  {:2}. {mv}", i + 1);
                }
            }
        }
        SearchResult::NoSolution { nodes_expanded } => {
            println!("No solution with {}", report.algorithm);
            println!("   Nodes expanded: {nodes_expanded}");
            println!("   Time: {seconds:.3} seconds");
        }
        SearchResult::Canceled { nodes_expanded } => {
            println!(
                "{} canceled after {nodes_expanded} expansions ({seconds:.3} seconds)",
                report.algorithm
            );
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<ExitCode, PuzzleError> {
    if args.ls {
        for puzzle in puzzles::catalogue() {
            println!("{:12} {}", puzzle.name, puzzle.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(state) = load(&args)? else {
        return Ok(ExitCode::from(2));
    };
    info!(
        "Loaded {} vehicles, target {}",
        state.vehicles().len(),
        state.target().id()
    );
    if !args.json {
        println!("Initial board:\n{state}");
    }

    let solver = Solver::new(SearchConfig {
        depth_limit: args.depth_limit,
        heuristic: args.heuristic,
    });
    let worker = solver.spawn(state.clone(), args.algorithm);
    let report = match args.timeout {
        Some(seconds) => worker.wait_timeout(Duration::from_secs(seconds)),
        None => worker.wait(),
    };
    let Some(report) = report else {
        error!("The search worker stopped without reporting");
        return Ok(ExitCode::FAILURE);
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Cannot serialize the report: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        print_report(&state, &report, args.replay)?;
    }

    Ok(if report.result.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
