//! Backtracking search driver (§4.F).
//!
//! Implemented as an explicit stack machine rather than plain recursion, so
//! it can be exposed as a lazy [`Iterator`]: each `next()` call resumes the
//! search from where the last solution left off and suspends again as soon
//! as the next one is found. This mirrors converting a recursive
//! depth-first search into an iterative one with an explicit frame stack.

use rustc_hash::FxHashSet;

use crate::admissibility::global_admissible;
use crate::candidates::{generate_candidates, Candidate};
use crate::grid::Grid;
use crate::pieces::{GridSettings, Part, Placement, Requirement, Solution};

/// One level of the search stack: the grid state *before* this depth's
/// choice, the placements chosen so far (tagged by original requirement
/// index), and which candidate to try next.
struct Frame {
    grid: Grid,
    chosen: Vec<(usize, Placement)>,
    cand_idx: usize,
}

/// A lazy, restartable producer of solutions.
///
/// Holds everything needed to resume the search: the precomputed,
/// size-sorted candidate lists, the dedup fingerprint set, and the explicit
/// frame stack. Dropping it releases all search state; there is no other
/// way to cancel.
pub struct Solve<'a> {
    parts: &'a [Part],
    requirements: &'a [Requirement],
    settings: GridSettings,
    order: Vec<usize>,
    candidates: Vec<Vec<Candidate>>,
    visited: FxHashSet<Vec<u8>>,
    stack: Vec<Frame>,
    exhausted: bool,
    yielded_empty: bool,
}

/// Cheap infeasibility checks that let the search short-circuit without
/// building any candidate tables (§4.F "Pre-checks").
fn is_infeasible(parts: &[Part], requirements: &[Requirement], settings: &GridSettings) -> bool {
    if settings.command_line_row == 0 || settings.command_line_row > settings.height {
        return true;
    }

    let required_on_line = requirements
        .iter()
        .filter(|r| r.constraint.on_command_line.is_yes())
        .count();
    if required_on_line > settings.width {
        return true;
    }

    let corner_cells = if settings.has_oob { 4 } else { 0 };
    let capacity = settings.width * settings.height;
    if capacity < corner_cells {
        return true;
    }
    let capacity = capacity - corner_cells;

    let occupied: usize = requirements
        .iter()
        .map(|r| {
            let part = &parts[r.part_index];
            if r.constraint.compressed.is_no() {
                part.uncompressed_mask.count()
            } else {
                part.compressed_mask.count()
            }
        })
        .sum();

    occupied > capacity
}

impl<'a> Solve<'a> {
    pub fn new(
        parts: &'a [Part],
        requirements: &'a [Requirement],
        settings: GridSettings,
        spinnable_colors: &[bool],
    ) -> Self {
        if is_infeasible(parts, requirements, &settings) {
            return Self {
                parts,
                requirements,
                settings,
                order: Vec::new(),
                candidates: Vec::new(),
                visited: FxHashSet::default(),
                stack: Vec::new(),
                exhausted: true,
                yielded_empty: true,
            };
        }

        let mut per_req: Vec<(usize, Vec<Candidate>)> = requirements
            .iter()
            .enumerate()
            .map(|(idx, req)| {
                let part = &parts[req.part_index];
                let cands = generate_candidates(part, req, spinnable_colors, &settings);
                log::debug!("requirement {idx} (part {}): {} candidates", req.part_index, cands.len());
                (idx, cands)
            })
            .collect();

        // placement order: fewest candidates first, ties by original index
        per_req.sort_by_key(|(idx, cands)| (cands.len(), *idx));
        log::debug!(
            "placement order (original index, ascending candidate count): {:?}",
            per_req.iter().map(|(idx, cands)| (*idx, cands.len())).collect::<Vec<_>>()
        );

        let order: Vec<usize> = per_req.iter().map(|(idx, _)| *idx).collect();
        let candidates: Vec<Vec<Candidate>> = per_req.into_iter().map(|(_, c)| c).collect();

        let stack = if order.is_empty() {
            Vec::new()
        } else {
            vec![Frame {
                grid: Grid::new(&settings),
                chosen: Vec::new(),
                cand_idx: 0,
            }]
        };

        Self {
            parts,
            requirements,
            settings,
            order,
            candidates,
            visited: FxHashSet::default(),
            stack,
            exhausted: false,
            yielded_empty: false,
        }
    }

    fn assemble(&self, chosen: &[(usize, Placement)]) -> Solution {
        let mut solution: Vec<Option<Placement>> = vec![None; self.requirements.len()];
        for (idx, placement) in chosen {
            solution[*idx] = Some(*placement);
        }
        solution
            .into_iter()
            .map(|p| p.expect("every requirement receives a placement at a search leaf"))
            .collect()
    }
}

impl<'a> Iterator for Solve<'a> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.exhausted {
            return None;
        }

        // the zero-requirement puzzle has exactly one (empty) solution
        if self.order.is_empty() {
            self.exhausted = true;
            if self.yielded_empty {
                return None;
            }
            self.yielded_empty = true;
            return Some(Vec::new());
        }

        loop {
            let depth = match self.stack.len().checked_sub(1) {
                Some(d) => d,
                None => {
                    self.exhausted = true;
                    return None;
                }
            };
            let cands = &self.candidates[depth];

            let cand_idx = self.stack[depth].cand_idx;
            if cand_idx >= cands.len() {
                self.stack.pop();
                if self.stack.is_empty() {
                    self.exhausted = true;
                    return None;
                }
                continue;
            }
            self.stack[depth].cand_idx += 1;

            let req_orig_idx = self.order[depth];
            let candidate = &cands[cand_idx];
            let mut new_grid = self.stack[depth].grid.clone();
            if !new_grid.place(
                &candidate.mask,
                candidate.placement.loc.position,
                req_orig_idx as i32,
            ) {
                continue;
            }

            let fingerprint = new_grid.fingerprint(|req_idx| self.requirements[req_idx].part_index);
            if !self.visited.insert(fingerprint) {
                continue;
            }

            let mut new_chosen = self.stack[depth].chosen.clone();
            new_chosen.push((req_orig_idx, candidate.placement));

            if depth + 1 == self.order.len() {
                if global_admissible(&new_grid, self.requirements, self.parts, &self.settings) {
                    return Some(self.assemble(&new_chosen));
                }
                continue;
            }

            self.stack.push(Frame {
                grid: new_grid,
                chosen: new_chosen,
                cand_idx: 0,
            });
        }
    }
}

/// Entry point: `solve(parts, requirements, grid_settings, spinnable_colors)`
/// from §6, as a lazy, restartable iterator of solutions.
pub fn solve<'a>(
    parts: &'a [Part],
    requirements: &'a [Requirement],
    settings: GridSettings,
    spinnable_colors: &[bool],
) -> Solve<'a> {
    Solve::new(parts, requirements, settings, spinnable_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mask;
    use crate::pieces::{Constraint, TriState};
    use crate::verifier::place_all;

    fn solid_2x3_part(color: usize) -> Part {
        // [T,F,T,T,T,F] row-major over 2 rows x 3 cols (matches S1 in the
        // originating end-to-end scenario)
        let mask = Mask::from(vec![true, false, true, true, true, false], 2, 3);
        Part {
            is_solid: true,
            color,
            compressed_mask: mask.clone(),
            uncompressed_mask: mask,
        }
    }

    #[test]
    fn s1_two_command_line_parts_on_7x7_oob_grid() {
        let parts = vec![solid_2x3_part(0)];
        let settings = GridSettings {
            height: 7,
            width: 7,
            has_oob: true,
            command_line_row: 3,
        };
        let requirements = vec![
            Requirement {
                part_index: 0,
                constraint: Constraint {
                    on_command_line: TriState::Yes,
                    ..Default::default()
                },
            },
            Requirement {
                part_index: 0,
                constraint: Constraint {
                    on_command_line: TriState::Yes,
                    ..Default::default()
                },
            },
        ];

        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[false])
            .take(5)
            .collect();
        assert!(!solutions.is_empty());

        for solution in &solutions {
            let grid =
                place_all(&parts, &requirements, solution, &settings).expect("valid solution");
            let cmd_row = settings.command_line_row_index().unwrap();
            for req_idx in 0..requirements.len() {
                let cells_on_line = grid
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| v == Some(req_idx))
                    .any(|(cell, _)| cell / settings.width == cmd_row);
                assert!(cells_on_line, "requirement {req_idx} must touch the command line");
            }
        }
    }

    #[test]
    fn out_of_range_command_line_row_yields_nothing() {
        let parts = vec![solid_2x3_part(0)];
        let settings = GridSettings {
            height: 3,
            width: 3,
            has_oob: false,
            command_line_row: 4,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint::default(),
        }];
        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[false]).collect();
        assert!(solutions.is_empty());
    }

    #[test]
    fn zero_command_line_row_hits_the_infeasibility_pre_check() {
        let parts = vec![solid_2x3_part(0)];
        let settings = GridSettings {
            height: 3,
            width: 3,
            has_oob: false,
            command_line_row: 0,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint::default(),
        }];
        assert!(is_infeasible(&parts, &requirements, &settings));
        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[false]).collect();
        assert!(solutions.is_empty());
    }

    #[test]
    fn too_many_command_line_requirements_yields_nothing() {
        let parts = vec![Part {
            is_solid: true,
            color: 0,
            compressed_mask: Mask::from(vec![true], 1, 1),
            uncompressed_mask: Mask::from(vec![true], 1, 1),
        }];
        let settings = GridSettings {
            height: 2,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let requirements = vec![
            Requirement {
                part_index: 0,
                constraint: Constraint {
                    on_command_line: TriState::Yes,
                    ..Default::default()
                },
            };
            3
        ];
        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[false]).collect();
        assert!(solutions.is_empty());
    }

    #[test]
    fn zero_requirements_yields_one_empty_solution() {
        let parts: Vec<Part> = Vec::new();
        let requirements: Vec<Requirement> = Vec::new();
        let settings = GridSettings {
            height: 2,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[]).collect();
        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].is_empty());
    }

    #[test]
    fn repeated_runs_produce_identical_sequences() {
        let parts = vec![solid_2x3_part(0)];
        let settings = GridSettings {
            height: 7,
            width: 7,
            has_oob: true,
            command_line_row: 3,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint {
                on_command_line: TriState::Yes,
                ..Default::default()
            },
        }];

        let first: Vec<_> = solve(&parts, &requirements, settings, &[false])
            .take(10)
            .collect();
        let second: Vec<_> = solve(&parts, &requirements, settings, &[false])
            .take(10)
            .collect();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn spinnable_l_emits_no_duplicate_solutions() {
        use crate::puzzles::builtin;
        use std::collections::HashSet;

        let puzzle = builtin("spinnable-l").unwrap();
        let solutions: Vec<_> = solve(
            &puzzle.parts,
            &puzzle.requirements,
            puzzle.grid_settings,
            &puzzle.spinnable_colors,
        )
        .collect();
        assert!(!solutions.is_empty());

        let mut seen = HashSet::new();
        for solution in &solutions {
            let grid = place_all(
                &puzzle.parts,
                &puzzle.requirements,
                solution,
                &puzzle.grid_settings,
            )
            .expect("valid solution");
            assert!(
                seen.insert(grid),
                "two distinct rotations of the asymmetric spinnable part produced the same grid"
            );
        }
        assert_eq!(seen.len(), solutions.len());
    }

    #[test]
    fn plus_part_with_bugged_no_never_lands_on_line_or_ring() {
        let mask = Mask::from(
            vec![false, true, false, true, true, true, false, true, false],
            3,
            3,
        );
        let parts = vec![Part {
            is_solid: false,
            color: 0,
            compressed_mask: mask.clone(),
            uncompressed_mask: mask,
        }];
        let settings = GridSettings {
            height: 7,
            width: 7,
            has_oob: true,
            command_line_row: 3,
        };
        let requirements = vec![Requirement {
            part_index: 0,
            constraint: Constraint {
                bugged: TriState::No,
                ..Default::default()
            },
        }];

        let solutions: Vec<_> = solve(&parts, &requirements, settings, &[false])
            .take(20)
            .collect();
        assert!(!solutions.is_empty());
        for solution in &solutions {
            let grid = place_all(&parts, &requirements, solution, &settings).unwrap();
            let cmd_row = settings.command_line_row_index().unwrap();
            for (cell, &v) in grid.iter().enumerate() {
                if v != Some(0) {
                    continue;
                }
                let (x, y) = (cell % settings.width, cell / settings.width);
                assert_ne!(y, cmd_row);
                assert!(!settings.is_ring_cell(x, y));
            }
        }
    }
}
