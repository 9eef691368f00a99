//! Candidate generation: per-part, per-requirement enumeration of placements
//! that satisfy local admissibility.
//!
//! Precomputed once per requirement, before search begins, mirroring a
//! placement table built once up front rather than re-derived on every
//! recursive step.

use rustc_hash::FxHashSet;

use crate::admissibility::local_admissible;
use crate::geometry::Mask;
use crate::grid::Grid;
use crate::pieces::{GridSettings, Location, Part, Placement, Position, Requirement};

/// One fully-qualified placement option: where/how it lands, plus the
/// already-rotated mask, so search never re-rotates during the hot loop.
#[derive(Clone)]
pub struct Candidate {
    pub placement: Placement,
    pub mask: Mask,
}

/// The selected (mask, compressed-flag) variants to enumerate, in emission
/// order: compressed before uncompressed.
fn mask_variants(part: &Part, requirement: &Requirement) -> Vec<(Mask, bool)> {
    use crate::pieces::TriState::*;

    match requirement.constraint.compressed {
        Yes => vec![(part.compressed_mask.copy(), true)],
        No => vec![(part.uncompressed_mask.copy(), false)],
        Unspecified => {
            if part.compressed_mask.equal(&part.uncompressed_mask) {
                vec![(part.compressed_mask.copy(), true)]
            } else {
                vec![
                    (part.compressed_mask.copy(), true),
                    (part.uncompressed_mask.copy(), false),
                ]
            }
        }
    }
}

/// Enumerates all candidate placements for one requirement, in the
/// deterministic order the search relies on: compression variant, then
/// rotation ascending, then row-major position.
pub fn generate_candidates(
    part: &Part,
    requirement: &Requirement,
    spinnable_colors: &[bool],
    settings: &GridSettings,
) -> Vec<Candidate> {
    let spinnable = spinnable_colors.get(part.color).copied().unwrap_or(false);
    let mut candidates = Vec::new();

    for (base_mask, compressed) in mask_variants(part, requirement) {
        let max_rotation = if spinnable { 4 } else { 1 };
        let mut seen_shapes: FxHashSet<Vec<u8>> = FxHashSet::default();

        for rotation in 0..max_rotation {
            let rotated = base_mask.rotate(rotation);
            let shape_key = rotated.trim().fingerprint();
            if !seen_shapes.insert(shape_key) {
                continue;
            }

            // Lower bound: the mask may hang off the top/left edge until its
            // last row/column would leave the grid. Upper bound: the grid's
            // own extent, since the mask's top-left can sit anywhere up to
            // the grid's last row/column (further cells of the mask, if any,
            // simply fail the in-bounds check inside `Grid::place`).
            let (mh, mw) = (rotated.height() as i32, rotated.width() as i32);
            let (gh, gw) = (settings.height as i32, settings.width as i32);
            for y in -(mh - 1)..gh {
                for x in -(mw - 1)..gw {
                    let pos = Position { x, y };
                    let mut scratch = Grid::new(settings);
                    if !scratch.place(&rotated, pos, 0) {
                        continue;
                    }
                    if !local_admissible(&scratch, 0, part, requirement, settings) {
                        continue;
                    }
                    candidates.push(Candidate {
                        placement: Placement {
                            loc: Location {
                                position: pos,
                                rotation,
                            },
                            compressed,
                        },
                        mask: rotated.copy(),
                    });
                }
            }
        }
    }

    candidates
}
