//! Puzzle definitions: JSON loading plus a handful of built-in examples.
//!
//! Loading a puzzle definition (parts, requirements, grid settings) is the
//! core solver's input boundary, not a UI concern — unlike game-data
//! loading or URL-hash state, which stay external collaborators.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::geometry::Mask;
use crate::pieces::{Constraint, GridSettings, Part, Requirement, TriState};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriStateDef {
    Yes,
    No,
    Unspecified,
}

impl From<TriStateDef> for TriState {
    fn from(value: TriStateDef) -> Self {
        match value {
            TriStateDef::Yes => TriState::Yes,
            TriStateDef::No => TriState::No,
            TriStateDef::Unspecified => TriState::Unspecified,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskDef {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<bool>,
}

impl MaskDef {
    fn into_mask(self) -> Result<Mask, PuzzleError> {
        if self.cells.len() != self.height * self.width {
            return Err(PuzzleError::InvalidPuzzle(format!(
                "mask cells length {} does not match {}x{}",
                self.cells.len(),
                self.height,
                self.width
            )));
        }
        Ok(Mask::from(self.cells, self.height, self.width))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartDef {
    pub is_solid: bool,
    pub color: usize,
    pub compressed_mask: MaskDef,
    pub uncompressed_mask: MaskDef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstraintDef {
    #[serde(default = "unspecified")]
    pub compressed: TriStateDef,
    #[serde(default = "unspecified")]
    pub on_command_line: TriStateDef,
    #[serde(default = "unspecified")]
    pub bugged: TriStateDef,
}

fn unspecified() -> TriStateDef {
    TriStateDef::Unspecified
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequirementDef {
    pub part_index: usize,
    #[serde(default)]
    pub constraint: ConstraintDef,
}

impl Default for ConstraintDef {
    fn default() -> Self {
        Self {
            compressed: TriStateDef::Unspecified,
            on_command_line: TriStateDef::Unspecified,
            bugged: TriStateDef::Unspecified,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSettingsDef {
    pub height: usize,
    pub width: usize,
    pub has_oob: bool,
    pub command_line_row: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleDef {
    pub parts: Vec<PartDef>,
    pub requirements: Vec<RequirementDef>,
    pub grid_settings: GridSettingsDef,
    #[serde(default)]
    pub spinnable_colors: Vec<bool>,
}

/// A puzzle definition resolved into the solver's runtime types.
pub struct Puzzle {
    pub parts: Vec<Part>,
    pub requirements: Vec<Requirement>,
    pub grid_settings: GridSettings,
    pub spinnable_colors: Vec<bool>,
}

impl PuzzleDef {
    /// Validates and converts into the solver's runtime types.
    pub fn resolve(self) -> Result<Puzzle, PuzzleError> {
        let mut parts = Vec::with_capacity(self.parts.len());
        for part in self.parts {
            parts.push(Part {
                is_solid: part.is_solid,
                color: part.color,
                compressed_mask: part.compressed_mask.into_mask()?,
                uncompressed_mask: part.uncompressed_mask.into_mask()?,
            });
        }

        let mut requirements = Vec::with_capacity(self.requirements.len());
        for req in self.requirements {
            if req.part_index >= parts.len() {
                return Err(PuzzleError::InvalidPuzzle(format!(
                    "requirement references part_index {} but only {} parts are defined",
                    req.part_index,
                    parts.len()
                )));
            }
            requirements.push(Requirement {
                part_index: req.part_index,
                constraint: Constraint {
                    compressed: req.constraint.compressed.into(),
                    on_command_line: req.constraint.on_command_line.into(),
                    bugged: req.constraint.bugged.into(),
                },
            });
        }

        Ok(Puzzle {
            parts,
            requirements,
            grid_settings: GridSettings {
                height: self.grid_settings.height,
                width: self.grid_settings.width,
                has_oob: self.grid_settings.has_oob,
                command_line_row: self.grid_settings.command_line_row,
            },
            spinnable_colors: self.spinnable_colors,
        })
    }
}

/// Loads and validates a puzzle definition from a JSON file.
pub fn load_puzzle(path: &Path) -> Result<Puzzle, PuzzleError> {
    let text = fs::read_to_string(path)?;
    let def: PuzzleDef = serde_json::from_str(&text)?;
    def.resolve()
}

/// Names of the built-in example puzzles, for `--help` text and the CLI.
pub const BUILTIN_NAMES: &[&str] = &["command-line-pair", "plus-not-bugged", "spinnable-l"];

/// Resolves a built-in puzzle by name.
pub fn builtin(name: &str) -> Result<Puzzle, PuzzleError> {
    let def = match name {
        "command-line-pair" => command_line_pair(),
        "plus-not-bugged" => plus_not_bugged(),
        "spinnable-l" => spinnable_l(),
        other => return Err(PuzzleError::UnknownBuiltin(other.to_string())),
    };
    def.resolve()
}

fn mask(cells: &[u8], height: usize, width: usize) -> MaskDef {
    MaskDef {
        height,
        width,
        cells: cells.iter().map(|&c| c != 0).collect(),
    }
}

/// A 7x7 OOB grid with a command-line row, and two solid 2x3 parts both
/// required to touch it (mirrors the spec's S1 end-to-end scenario).
fn command_line_pair() -> PuzzleDef {
    let m = mask(&[1, 0, 1, 1, 1, 0], 2, 3);
    PuzzleDef {
        parts: vec![PartDef {
            is_solid: true,
            color: 0,
            compressed_mask: m.clone(),
            uncompressed_mask: m,
        }],
        requirements: vec![
            RequirementDef {
                part_index: 0,
                constraint: ConstraintDef {
                    on_command_line: TriStateDef::Yes,
                    ..Default::default()
                },
            },
            RequirementDef {
                part_index: 0,
                constraint: ConstraintDef {
                    on_command_line: TriStateDef::Yes,
                    ..Default::default()
                },
            },
        ],
        grid_settings: GridSettingsDef {
            height: 7,
            width: 7,
            has_oob: true,
            command_line_row: 3,
        },
        spinnable_colors: vec![false],
    }
}

/// A single plus-shaped part constrained `bugged = no` on a 7x7 OOB grid
/// (mirrors the spec's S4 scenario).
fn plus_not_bugged() -> PuzzleDef {
    let m = mask(&[0, 1, 0, 1, 1, 1, 0, 1, 0], 3, 3);
    PuzzleDef {
        parts: vec![PartDef {
            is_solid: false,
            color: 0,
            compressed_mask: m.clone(),
            uncompressed_mask: m,
        }],
        requirements: vec![RequirementDef {
            part_index: 0,
            constraint: ConstraintDef {
                bugged: TriStateDef::No,
                ..Default::default()
            },
        }],
        grid_settings: GridSettingsDef {
            height: 7,
            width: 7,
            has_oob: true,
            command_line_row: 3,
        },
        spinnable_colors: vec![false],
    }
}

/// A spinnable asymmetric L-tromino on a 7x7 grid with no OOB ring (mirrors
/// the spec's S5 scenario).
fn spinnable_l() -> PuzzleDef {
    let m = mask(&[1, 0, 1, 1], 2, 2);
    PuzzleDef {
        parts: vec![PartDef {
            is_solid: true,
            color: 0,
            compressed_mask: m.clone(),
            uncompressed_mask: m,
        }],
        requirements: vec![RequirementDef {
            part_index: 0,
            constraint: ConstraintDef::default(),
        }],
        grid_settings: GridSettingsDef {
            height: 7,
            width: 7,
            has_oob: false,
            command_line_row: 1,
        },
        spinnable_colors: vec![true],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_resolve() {
        for &name in BUILTIN_NAMES {
            builtin(name).unwrap_or_else(|e| panic!("builtin {name} failed to resolve: {e}"));
        }
    }

    #[test]
    fn unknown_builtin_is_an_error() {
        assert!(builtin("does-not-exist").is_err());
    }

    #[test]
    fn out_of_range_part_index_is_rejected() {
        let def = PuzzleDef {
            parts: vec![],
            requirements: vec![RequirementDef {
                part_index: 0,
                constraint: ConstraintDef::default(),
            }],
            grid_settings: GridSettingsDef {
                height: 3,
                width: 3,
                has_oob: false,
                command_line_row: 1,
            },
            spinnable_colors: vec![],
        };
        assert!(def.resolve().is_err());
    }

    #[test]
    fn mismatched_mask_cell_count_is_rejected() {
        let bad = MaskDef {
            height: 2,
            width: 2,
            cells: vec![true, false, true],
        };
        assert!(bad.into_mask().is_err());
    }
}
