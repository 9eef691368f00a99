//! Core data model: parts, constraints, requirements, and placements.
//!
//! Mirrors the puzzle's input vocabulary directly: a [`Part`] is an
//! immutable silhouette, a [`Requirement`] demands one instance of a part
//! under a tri-state [`Constraint`], and a [`Placement`] records where and
//! how a requirement's part instance ended up.

use crate::geometry::Mask;

/// A tri-state flag: permits either value when `Unspecified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unspecified,
}

impl TriState {
    #[inline]
    pub fn is_yes(self) -> bool {
        matches!(self, TriState::Yes)
    }

    #[inline]
    pub fn is_no(self) -> bool {
        matches!(self, TriState::No)
    }
}

/// An immutable input part: a silhouette with a color and a program/plus flag.
///
/// `is_solid` distinguishes "program" parts (must touch the command line)
/// from "plus" parts (must not).
#[derive(Clone, Debug)]
pub struct Part {
    pub is_solid: bool,
    pub color: usize,
    pub compressed_mask: Mask,
    pub uncompressed_mask: Mask,
}

/// The three independently-specifiable properties of a requirement.
#[derive(Clone, Copy, Debug, Default)]
pub struct Constraint {
    pub compressed: TriState,
    pub on_command_line: TriState,
    pub bugged: TriState,
}

/// A demand for one instance of `parts[part_index]` under `constraint`.
///
/// The position of a `Requirement` in the input list is its *request
/// index*, used as its identity throughout the search.
#[derive(Clone, Copy, Debug)]
pub struct Requirement {
    pub part_index: usize,
    pub constraint: Constraint,
}

/// Grid geometry and the two special-row/ring rules.
///
/// `command_line_row` is 1-based, matching the literal feasibility check in
/// the originating spec ("if `commandLineRow > height`, yield nothing").
#[derive(Clone, Copy, Debug)]
pub struct GridSettings {
    pub height: usize,
    pub width: usize,
    pub has_oob: bool,
    pub command_line_row: usize,
}

impl GridSettings {
    /// Zero-based row index of the command line, or `None` if it names a
    /// row past the bottom of the grid (handled as infeasible upstream).
    pub fn command_line_row_index(&self) -> Option<usize> {
        if self.command_line_row == 0 || self.command_line_row > self.height {
            None
        } else {
            Some(self.command_line_row - 1)
        }
    }

    /// True when `(x, y)` lies on the outermost ring of the grid.
    #[inline]
    pub fn is_ring_cell(&self, x: usize, y: usize) -> bool {
        self.has_oob && (x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1)
    }
}

/// The top-left offset of a mask over the grid. May be negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// A position plus a clockwise rotation count in `0..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Location {
    pub position: Position,
    pub rotation: u8,
}

/// The choice made for one requirement: where, how rotated, and which
/// footprint (compressed or uncompressed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Placement {
    pub loc: Location,
    pub compressed: bool,
}

/// One complete assignment, one placement per requirement, in the
/// original requirement order.
pub type Solution = Vec<Placement>;
