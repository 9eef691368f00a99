//! Placement solver for a small constraint-driven puzzle grid.
//!
//! Given a fixed grid geometry, a multiset of required parts with
//! per-instance constraints, and a few global options, [`solver::solve`]
//! produces a lazy, restartable sequence of solutions; [`verifier::place_all`]
//! materializes a full grid from one solution for display or validation.

pub mod admissibility;
pub mod candidates;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod puzzles;
pub mod solver;
pub mod verifier;

pub use pieces::{
    Constraint, GridSettings, Location, Part, Placement, Position, Requirement, Solution,
    TriState,
};
pub use solver::solve;
pub use verifier::place_all;
