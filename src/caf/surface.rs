use crate::error::{CafError, Result};

use super::peak::{Peak, locate_peak, row_peak};

/// Cross ambiguity surface: correlation magnitude over (frequency bin, lag)
///
/// Stored row-major. Row `k` belongs to offset `k` of the sweep it was built
/// from; column `c` is correlation index `c` in `[0, 2N)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmbiguitySurface {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl AmbiguitySurface {
    /// Zero-filled surface of the given shape
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from a table of equal-length rows
    pub fn from_rows(table: Vec<Vec<f64>>) -> Result<Self> {
        let cols = table.first().map_or(0, Vec::len);
        let mut surface = Self::zeros(table.len(), cols);
        for (index, row) in table.iter().enumerate() {
            surface.set_row(index, row)?;
        }
        Ok(surface)
    }

    /// Place `row` at `index`, whatever order rows are produced in
    pub fn set_row(&mut self, index: usize, row: &[f64]) -> Result<()> {
        if row.len() != self.cols {
            return Err(CafError::OutputLength {
                expected: self.cols,
                actual: row.len(),
            });
        }
        if index >= self.rows {
            return Err(CafError::RowIndex {
                index,
                rows: self.rows,
            });
        }
        let start = index * self.cols;
        self.data[start..start + self.cols].copy_from_slice(row);
        Ok(())
    }

    /// Number of frequency bins
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of lag bins, `2N`
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Row-major view of every magnitude
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Global maximum, see [`locate_peak`]
    pub fn peak(&self) -> Peak {
        locate_peak(self)
    }

    /// Argmax of every row, in row order
    pub fn row_peaks(&self) -> Vec<Peak> {
        (0..self.rows).map(|r| row_peak(self.row(r), r)).collect()
    }
}
