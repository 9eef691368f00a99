//! Placement solver CLI.
//!
//! Solves a small constraint-driven puzzle grid: a multiset of parts, each
//! under its own tri-state constraint (compressed, on the command line,
//! bugged), must be placed without overlap. Finds solutions lazily and can
//! save/inspect them on disk.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use navicust_solver::error::PuzzleError;
use navicust_solver::puzzles::{self, Puzzle, BUILTIN_NAMES};
use navicust_solver::{persistence, place_all, solve};

/// Solves a placement puzzle and reports or saves its solutions.
#[derive(Parser)]
#[command(name = "navicust-solver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and save solutions to disk.
    Solve(PuzzleArgs),
    /// Print the number of solutions saved by a previous `solve` run.
    Count {
        #[arg(long, default_value = "solutions.bin")]
        bin: PathBuf,
    },
    /// Re-verify one saved solution with `place_all` and print its grid.
    Verify {
        #[command(flatten)]
        puzzle: PuzzleSelector,
        #[arg(long, default_value = "solutions.bin")]
        bin: PathBuf,
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

#[derive(clap::Args)]
struct PuzzleArgs {
    #[command(flatten)]
    puzzle: PuzzleSelector,
    /// Stop after this many solutions (the search is otherwise unbounded).
    #[arg(long)]
    max_solutions: Option<usize>,
    #[arg(long, default_value = "solutions.bin")]
    bin: PathBuf,
    #[arg(long, default_value = "solutions.txt")]
    txt: PathBuf,
}

#[derive(clap::Args)]
struct PuzzleSelector {
    /// Name of a built-in example puzzle.
    #[arg(long, conflicts_with = "json")]
    builtin: Option<String>,
    /// Path to a JSON puzzle definition.
    #[arg(long, conflicts_with = "builtin")]
    json: Option<PathBuf>,
}

impl PuzzleSelector {
    fn resolve(&self) -> Result<Puzzle, PuzzleError> {
        match (&self.builtin, &self.json) {
            (Some(name), _) => puzzles::builtin(name),
            (None, Some(path)) => puzzles::load_puzzle(path),
            (None, None) => puzzles::builtin("command-line-pair"),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::Count { bin }) => run_count(&bin),
        Some(Command::Verify { puzzle, bin, index }) => run_verify(&puzzle, &bin, index),
        None => run_solve(&PuzzleArgs {
            puzzle: PuzzleSelector {
                builtin: None,
                json: None,
            },
            max_solutions: Some(50),
            bin: "solutions.bin".into(),
            txt: "solutions.txt".into(),
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        eprintln!(
            "available built-in puzzles: {}",
            BUILTIN_NAMES.join(", ")
        );
        std::process::exit(1);
    }
}

fn run_solve(args: &PuzzleArgs) -> Result<(), PuzzleError> {
    let puzzle = args.puzzle.resolve()?;
    log::info!(
        "solving {}x{} grid, {} requirements",
        puzzle.grid_settings.width,
        puzzle.grid_settings.height,
        puzzle.requirements.len()
    );

    let started = Instant::now();
    let iter = solve(
        &puzzle.parts,
        &puzzle.requirements,
        puzzle.grid_settings,
        &puzzle.spinnable_colors,
    );
    let solutions: Vec<_> = match args.max_solutions {
        Some(n) => iter.take(n).collect(),
        None => iter.collect(),
    };
    log::debug!("search finished in {:?}", started.elapsed());

    persistence::save(
        &solutions,
        &puzzle.grid_settings,
        &args.bin,
        &args.txt,
        &puzzle.parts,
        &puzzle.requirements,
    )?;

    log::info!("found {} solutions", solutions.len());
    println!("Found {} solutions", solutions.len());
    println!("Wrote {} and {}", args.txt.display(), args.bin.display());
    Ok(())
}

fn run_count(bin: &PathBuf) -> Result<(), PuzzleError> {
    println!("{} solutions", persistence::count(bin)?);
    Ok(())
}

fn run_verify(selector: &PuzzleSelector, bin: &PathBuf, index: usize) -> Result<(), PuzzleError> {
    let puzzle = selector.resolve()?;
    let solutions = persistence::load_all(bin, &puzzle.grid_settings, puzzle.requirements.len())?;
    let solution = solutions.get(index).ok_or_else(|| {
        PuzzleError::InvalidPuzzle(format!(
            "solution index {index} out of range (found {} solutions)",
            solutions.len()
        ))
    })?;

    match place_all(
        &puzzle.parts,
        &puzzle.requirements,
        solution,
        &puzzle.grid_settings,
    ) {
        Some(cells) => {
            println!(
                "{}",
                navicust_solver::grid::format_cells(&cells, puzzle.grid_settings.width)
            );
            Ok(())
        }
        None => Err(PuzzleError::InvalidPuzzle(
            "saved solution failed to re-place (overlap or out of bounds)".to_string(),
        )),
    }
}
