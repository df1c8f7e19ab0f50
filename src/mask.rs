// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The finished result of an evaluation: one boolean per cell, in
//! row-major order.  Only the evaluator builds these, and only after
//! every cell has been written.

use std::slice::Chunks;

/// Stability of every cell of a grid, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabilityMask {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl StabilityMask {
    pub(crate) fn from_cells(rows: usize, columns: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), rows * columns);
        StabilityMask {
            rows,
            columns,
            cells,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a mask built from a valid grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stability of a cell by row and column.
    pub fn get(&self, row: usize, column: usize) -> Option<bool> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(self.cells[row * self.columns + column])
    }

    /// Stability of a cell by flattened index.
    pub fn is_stable_at(&self, index: usize) -> Option<bool> {
        self.cells.get(index).cloned()
    }

    /// How many cells are stable.
    pub fn stable_count(&self) -> usize {
        self.cells.iter().filter(|&&stable| stable).count()
    }

    /// The cells, row by row.
    pub fn iter_rows(&self) -> Chunks<'_, bool> {
        self.cells.chunks(self.columns)
    }

    /// The flat row-major cells.
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Hands over the flat row-major cells.
    pub fn into_vec(self) -> Vec<bool> {
        self.cells
    }
}
