//! Local and global admissibility predicates.
//!
//! Local admissibility (§4.D) is cheap and evaluated once per placed piece
//! during search, to prune branches as early as possible. Global
//! admissibility (§4.E) can only be decided once every piece has landed,
//! since same-color adjacency depends on the whole grid.

use crate::grid::Grid;
use crate::pieces::{GridSettings, Part, Requirement, TriState};

/// Per-requirement facts scanned off the grid, shared by both admissibility
/// passes.
struct ReqFacts {
    any_interior: bool,
    in_ring: bool,
    on_command_line: bool,
}

fn scan(grid: &Grid, req_idx: i32, settings: &GridSettings) -> ReqFacts {
    let mut any_interior = false;
    let mut in_ring = false;
    let mut on_command_line = false;
    let command_row = settings.command_line_row_index();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y) != req_idx {
                continue;
            }
            if settings.is_ring_cell(x, y) {
                in_ring = true;
            } else {
                any_interior = true;
            }
            if command_row == Some(y) {
                on_command_line = true;
            }
        }
    }

    ReqFacts {
        any_interior,
        in_ring,
        on_command_line,
    }
}

/// Local admissibility (§4.D), checked right after a single piece is
/// successfully stamped onto the grid.
///
/// A true "not bugged" verdict cannot be reached here: same-color adjacency
/// is unknown until every piece has landed (see [`global_admissible`]).
pub fn local_admissible(
    grid: &Grid,
    req_idx: i32,
    part: &Part,
    requirement: &Requirement,
    settings: &GridSettings,
) -> bool {
    let facts = scan(grid, req_idx, settings);

    if settings.has_oob && !facts.any_interior {
        return false;
    }

    if requirement.constraint.on_command_line.is_yes() && !facts.on_command_line {
        return false;
    }

    let out_of_bounds = settings.has_oob && facts.in_ring;
    let bugged_pre = out_of_bounds || (part.is_solid != facts.on_command_line);
    if requirement.constraint.bugged.is_no() && bugged_pre {
        return false;
    }

    true
}

/// Global admissibility (§4.E), evaluated once at the leaf of the search
/// over the complete grid.
pub fn global_admissible(
    grid: &Grid,
    requirements: &[Requirement],
    parts: &[Part],
    settings: &GridSettings,
) -> bool {
    for (req_idx, requirement) in requirements.iter().enumerate() {
        let part = &parts[requirement.part_index];
        let facts = scan(grid, req_idx as i32, settings);

        if requirement.constraint.on_command_line.is_yes() && !facts.on_command_line {
            return false;
        }
        if requirement.constraint.on_command_line.is_no() && facts.on_command_line {
            return false;
        }

        let out_of_bounds = settings.has_oob && facts.in_ring;
        let touching_same_color = touches_same_color(grid, req_idx as i32, part, requirements, parts);
        let bugged_final = out_of_bounds || (part.is_solid != facts.on_command_line) || touching_same_color;

        match requirement.constraint.bugged {
            TriState::Yes if !bugged_final => return false,
            TriState::No if bugged_final => return false,
            _ => {}
        }
    }
    true
}

/// True if any 4-neighbor of a cell owned by `req_idx` belongs to a
/// different requirement whose part shares `req_idx`'s color.
fn touches_same_color(
    grid: &Grid,
    req_idx: i32,
    part: &Part,
    requirements: &[Requirement],
    parts: &[Part],
) -> bool {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y) != req_idx {
                continue;
            }
            let neighbors = [
                (x as i32 - 1, y as i32),
                (x as i32 + 1, y as i32),
                (x as i32, y as i32 - 1),
                (x as i32, y as i32 + 1),
            ];
            for (nx, ny) in neighbors {
                if nx < 0 || ny < 0 || nx >= width || ny >= height {
                    continue;
                }
                let neighbor_val = grid.get(nx as usize, ny as usize);
                if neighbor_val < 0 || neighbor_val == req_idx {
                    continue;
                }
                let neighbor_part = &parts[requirements[neighbor_val as usize].part_index];
                if neighbor_part.color == part.color {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mask;
    use crate::pieces::{Constraint, Position};

    fn solid_part(color: usize) -> Part {
        Part {
            is_solid: true,
            color,
            compressed_mask: Mask::from(vec![true], 1, 1),
            uncompressed_mask: Mask::from(vec![true], 1, 1),
        }
    }

    fn settings() -> GridSettings {
        GridSettings {
            height: 3,
            width: 3,
            has_oob: true,
            command_line_row: 2,
        }
    }

    #[test]
    fn local_rejects_entirely_ring_placement_when_oob() {
        let mut grid = Grid::new(&settings());
        let part = solid_part(0);
        grid.place(&part.uncompressed_mask, Position { x: 0, y: 1 }, 0);
        let req = Requirement {
            part_index: 0,
            constraint: Constraint::default(),
        };
        assert!(!local_admissible(&grid, 0, &part, &req, &settings()));
    }

    #[test]
    fn global_rejects_same_color_adjacency() {
        let settings = GridSettings {
            height: 1,
            width: 2,
            has_oob: false,
            command_line_row: 1,
        };
        let mut grid = Grid::new(&settings);
        let parts = vec![solid_part(5), solid_part(5)];
        let requirements = vec![
            Requirement {
                part_index: 0,
                constraint: Constraint {
                    bugged: TriState::No,
                    ..Default::default()
                },
            },
            Requirement {
                part_index: 1,
                constraint: Constraint::default(),
            },
        ];
        grid.place(&parts[0].uncompressed_mask, Position { x: 0, y: 0 }, 0);
        grid.place(&parts[1].uncompressed_mask, Position { x: 1, y: 0 }, 1);
        assert!(!global_admissible(&grid, &requirements, &parts, &settings));
    }
}
