//! Runtime grid: fixed-size cell array holding a request index or a sentinel.
//!
//! Cloned at each recursion step of the search (see `solver.rs`); the clone
//! is cheap relative to the candidate-generation and admissibility work it
//! guards.

use crate::geometry::Mask;
use crate::pieces::{GridSettings, Position};

/// Sentinel for an unassigned cell.
pub const EMPTY: i32 = -1;
/// Sentinel for a cell that can never be assigned (corners, when `has_oob`).
pub const FORBIDDEN: i32 = -2;

/// The cell array backing a partial or complete placement.
#[derive(Clone, Debug)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Builds an empty grid; if `settings.has_oob`, the four corners start
    /// `FORBIDDEN`.
    pub fn new(settings: &GridSettings) -> Self {
        let mut cells = vec![EMPTY; settings.height * settings.width];
        if settings.has_oob && settings.height > 0 && settings.width > 0 {
            let (h, w) = (settings.height, settings.width);
            cells[0] = FORBIDDEN;
            cells[w - 1] = FORBIDDEN;
            cells[(h - 1) * w] = FORBIDDEN;
            cells[(h - 1) * w + w - 1] = FORBIDDEN;
        }
        Self {
            height: settings.height,
            width: settings.width,
            cells,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Reads the cell at `(x, y)`, asserting it is in-bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.cells[self.index(x, y)]
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Stamps `mask` onto the grid with `mask[0,0]` aligned to `pos`.
    ///
    /// All-or-nothing: fails without mutating if any true mask cell would
    /// fall outside the grid, or would overlap a non-`EMPTY` cell. On
    /// success every true mask cell is set to `req_idx`.
    pub fn place(&mut self, mask: &Mask, pos: Position, req_idx: i32) -> bool {
        let mut targets = Vec::with_capacity(mask.count());

        for row in 0..mask.height() {
            for col in 0..mask.width() {
                if !mask.get(row, col) {
                    continue;
                }
                let gx = pos.x + col as i32;
                let gy = pos.y + row as i32;
                if gx < 0 || gy < 0 || gx as usize >= self.width || gy as usize >= self.height {
                    return false;
                }
                let (gx, gy) = (gx as usize, gy as usize);
                if self.get(gx, gy) != EMPTY {
                    return false;
                }
                targets.push(self.index(gx, gy));
            }
        }

        for idx in targets {
            self.cells[idx] = req_idx;
        }
        true
    }

    /// Maps each cell `v >= 0` to `part_index_of(v)`, leaving both sentinels
    /// as a single out-of-band byte. Used to deduplicate equivalent partial
    /// grids during search (two grids whose part-identity projection matches
    /// are equivalent branches).
    pub fn fingerprint(&self, part_index_of: impl Fn(usize) -> usize) -> Vec<u8> {
        self.cells
            .iter()
            .map(|&v| {
                if v >= 0 {
                    part_index_of(v as usize) as u8
                } else {
                    0xFF
                }
            })
            .collect()
    }
}

/// Formats a completed or partial grid as a human-readable string, one row
/// per line, `.` for empty, `#` for forbidden, else the request index in
/// base36 (wrapping past `z`).
pub fn format_grid(grid: &Grid) -> String {
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let c = match grid.get(x, y) {
                EMPTY => '.',
                FORBIDDEN => '#',
                v => char::from_digit((v as u32) % 36, 36).unwrap_or('?'),
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Formats a `place_all` ownership map (row-major, `None` for empty) the
/// same way as [`format_grid`], without needing a live `Grid`.
pub fn format_cells(cells: &[Option<usize>], width: usize) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        let c = match cell {
            None => '.',
            Some(v) => char::from_digit((*v as u32) % 36, 36).unwrap_or('?'),
        };
        out.push(c);
    }
    out.push('\n');
    out
}
