//! 2D bitmap primitives used to represent part silhouettes.
//!
//! A [`Mask`] is a small `height x width` boolean grid, row-major. Parts
//! carry two masks (compressed / uncompressed); the search rotates and trims
//! them but never mutates a part's stored mask in place.

/// A row-major boolean bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Wraps a flat row-major buffer. Panics if `data.len() != nrows * ncols`.
    pub fn from(data: Vec<bool>, nrows: usize, ncols: usize) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "mask data length does not match nrows * ncols"
        );
        Self {
            height: nrows,
            width: ncols,
            cells: data,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    /// Number of true cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Extracts a `nrows x ncols` window starting at `(top, left)`.
    pub fn subarray(&self, top: usize, left: usize, nrows: usize, ncols: usize) -> Self {
        let mut cells = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                cells.push(self.get(top + r, left + c));
            }
        }
        Self {
            height: nrows,
            width: ncols,
            cells,
        }
    }

    /// Returns row `i` as a slice (rows are contiguous in row-major storage).
    pub fn row(&self, i: usize) -> &[bool] {
        &self.cells[i * self.width..(i + 1) * self.width]
    }

    /// Returns column `j`.
    pub fn col(&self, j: usize) -> Vec<bool> {
        (0..self.height).map(|r| self.get(r, j)).collect()
    }

    /// Rotates 90 degrees clockwise: transpose then reverse each row.
    pub fn rot90(&self) -> Self {
        let new_height = self.width;
        let new_width = self.height;
        let mut cells = vec![false; new_height * new_width];
        for r in 0..self.height {
            for c in 0..self.width {
                // transpose (r, c) -> (c, r), then reverse rows of the transposed
                // shape, i.e. write into row c, column (new_width - 1 - r).
                let dest = c * new_width + (new_width - 1 - r);
                cells[dest] = self.get(r, c);
            }
        }
        Self {
            height: new_height,
            width: new_width,
            cells,
        }
    }

    /// Applies `rot90` `times` times (mod 4), used to realize rotations 0..3.
    pub fn rotate(&self, times: u8) -> Self {
        let mut mask = self.copy();
        for _ in 0..(times % 4) {
            mask = mask.rot90();
        }
        mask
    }

    /// Returns the smallest subarray whose border rows/columns each contain
    /// at least one true cell. Used only to canonicalize rotations for
    /// deduplication, never to change a part's actual footprint.
    pub fn trim(&self) -> Self {
        let mut min_r = self.height;
        let mut max_r = 0usize;
        let mut min_c = self.width;
        let mut max_c = 0usize;
        let mut any = false;

        for r in 0..self.height {
            for c in 0..self.width {
                if self.get(r, c) {
                    any = true;
                    min_r = min_r.min(r);
                    max_r = max_r.max(r);
                    min_c = min_c.min(c);
                    max_c = max_c.max(c);
                }
            }
        }

        if !any {
            return Self {
                height: 0,
                width: 0,
                cells: Vec::new(),
            };
        }

        self.subarray(min_r, min_c, max_r - min_r + 1, max_c - min_c + 1)
    }

    /// Elementwise equality of same-shape bitmaps (different shapes are unequal).
    pub fn equal(&self, other: &Mask) -> bool {
        self.height == other.height && self.width == other.width && self.cells == other.cells
    }

    /// Canonical byte serialization, used to fingerprint a trimmed shape for
    /// rotation-deduplication during candidate generation.
    pub fn fingerprint(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 + self.cells.len());
        bytes.push(self.height as u8);
        bytes.push(self.width as u8);
        bytes.extend(self.cells.iter().map(|&c| c as u8));
        bytes
    }
}
