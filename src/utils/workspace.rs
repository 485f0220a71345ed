//! # Workspace Pattern for DP Buffers
//!
//! Pre-allocated matrices for the all-paths recurrence. An engine keeps one
//! [`ScoreWorkspace`] for its whole lifetime and only grows it, so scoring
//! millions of reads of similar length allocates a handful of times.
//!
//! ## Logical size vs capacity
//! A [`BandMatrix`] records the dimensions of the current read separately
//! from the dimensions it has storage for. Indexing is checked against the
//! logical size, so cells left over from a previous, larger read are never
//! visible.

use std::ops::{Index, IndexMut};

/// Row-major `f64` matrix that grows but never shrinks.
#[derive(Clone, Debug, Default)]
pub struct BandMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    max_rows: usize,
    max_cols: usize,
}

impl BandMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut m = Self::default();
        m.resize(rows, cols);
        m
    }

    /// Set the logical size. Returns `true` when storage had to grow.
    ///
    /// Row stride follows the capacity, so growing the column count
    /// reallocates even if the total cell count would fit.
    pub fn resize(&mut self, rows: usize, cols: usize) -> bool {
        let grew = rows > self.max_rows || cols > self.max_cols;
        if grew {
            self.max_rows = self.max_rows.max(rows);
            self.max_cols = self.max_cols.max(cols);
            self.data = vec![0.0; self.max_rows * self.max_cols];
        }
        self.rows = rows;
        self.cols = cols;
        grew
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)` of allocated storage.
    pub fn capacity(&self) -> (usize, usize) {
        (self.max_rows, self.max_cols)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) outside {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.max_cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.max_cols + col])
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = self.offset(row, 0);
        let cols = self.cols;
        &mut self.data[start..start + cols]
    }

    /// Fill the logical region.
    pub fn fill(&mut self, value: f64) {
        for r in 0..self.rows {
            self.row_mut(r).fill(value);
        }
    }
}

impl Index<(usize, usize)> for BandMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for BandMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        let i = self.offset(row, col);
        &mut self.data[i]
    }
}

/// All buffers owned by one scoring engine.
#[derive(Clone, Debug, Default)]
pub struct ScoreWorkspace {
    pub matches: BandMatrix,
    pub inserts: BandMatrix,
    pub deletes: BandMatrix,
    /// Cumulative final-row possibilities, one per band offset.
    pub end_scores: Vec<f64>,
    /// Template offset of band column 0 for each row.
    pub row_offsets: Vec<isize>,
    /// Absolute template coordinate of band column 0 for each row, as
    /// reported by the environment.
    pub row_positions: Vec<isize>,
}

impl ScoreWorkspace {
    /// Size every buffer for `rows` x `width`. Returns `true` if any storage
    /// grew.
    pub fn resize(&mut self, rows: usize, width: usize) -> bool {
        let mut grew = self.matches.resize(rows, width);
        grew |= self.inserts.resize(rows, width);
        grew |= self.deletes.resize(rows, width);
        self.end_scores.clear();
        self.end_scores.resize(width, 0.0);
        self.row_offsets.clear();
        self.row_offsets.resize(rows, 0);
        self.row_positions.clear();
        self.row_positions.resize(rows, 0);
        grew
    }

    pub fn rows(&self) -> usize {
        self.matches.rows()
    }

    pub fn width(&self) -> usize {
        self.matches.cols()
    }
}
