//! Error types for the ambient I/O and configuration layer.
//!
//! The solver core (modules `grid`, `candidates`, `admissibility`,
//! `solver`, `verifier`) has no recoverable error states: infeasible
//! puzzles simply yield an empty sequence, and `place_all` returns `None`
//! on a self-inconsistent solution. Errors only arise at the boundary —
//! reading a puzzle definition or a saved-solutions file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("failed to read puzzle file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid puzzle definition: {0}")]
    InvalidPuzzle(String),

    #[error("unknown built-in puzzle: {0}")]
    UnknownBuiltin(String),

    #[error("solutions file has an unrecognized or mismatched format")]
    CorruptSolutions,
}
