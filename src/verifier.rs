//! Verifier (`place_all`, §4.G): materializes a full grid from a solution.
//!
//! Selects compressed vs. uncompressed per `placement.compressed` — the
//! originating implementation referenced the compressed mask in both
//! branches here; this port fixes that per the spec's explicit correction.

use crate::grid::Grid;
use crate::pieces::{GridSettings, Part, Placement, Requirement};

/// Re-stamps every placement onto a fresh grid and returns the per-cell
/// ownership map (`None` for empty cells), or `None` for the whole grid if
/// any placement overlaps or falls out of bounds.
pub fn place_all(
    parts: &[Part],
    requirements: &[Requirement],
    placements: &[Placement],
    settings: &GridSettings,
) -> Option<Vec<Option<usize>>> {
    let mut grid = Grid::new(settings);

    for (req_idx, placement) in placements.iter().enumerate() {
        let part = &parts[requirements[req_idx].part_index];
        let base_mask = if placement.compressed {
            &part.compressed_mask
        } else {
            &part.uncompressed_mask
        };
        let mask = base_mask.rotate(placement.loc.rotation);
        if !grid.place(&mask, placement.loc.position, req_idx as i32) {
            return None;
        }
    }

    Some(
        grid.cells()
            .iter()
            .map(|&v| if v >= 0 { Some(v as usize) } else { None })
            .collect(),
    )
}
