// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Grid struct, which describes a relationship between a
//! rectangle of sample cells with an origin at 0,0 and a rectangle on
//! the complex plane with an arbitrary pair of corners defining its
//! leftlower and rightupper extremes.  Cells on the edges of the grid
//! land exactly on the edges of the complex rectangle.

use num::Complex;

use crate::errors::EvaluationError;

/// Describes the columns and rows of a grid of cells that is assumed
/// to start at 0,0.  For that reason, the lower-left-hand corner is
/// not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// The sampled window.  Built once, then only read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    /// Columns and rows, in that order.
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Distance between neighbouring cells along the real and imaginary
    // axes.  Zero along an axis with a single cell.
    steps: (f64, f64),
}

fn step(low: f64, high: f64, cells: usize) -> f64 {
    if cells > 1 {
        (high - low) / ((cells - 1) as f64)
    } else {
        0.0
    }
}

impl Grid {
    /// Takes the number of rows and columns to sample, and the two
    /// corners of the window on the complex plane.  Row 0 lies on the
    /// lower edge of the window, column 0 on its left edge.
    pub fn new(
        rows: usize,
        columns: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Grid, EvaluationError> {
        if rows == 0 || columns == 0 {
            return Err(EvaluationError::InvalidGrid(format!(
                "a {}x{} grid has no cells",
                rows, columns
            )));
        }

        if rows.checked_mul(columns).is_none() {
            return Err(EvaluationError::AllocationFailure { rows, columns });
        }

        let corners = [leftlower.re, leftlower.im, rightupper.re, rightupper.im];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(EvaluationError::InvalidGrid(
                "the window bounds must be finite".to_string(),
            ));
        }

        if rightupper.re < leftlower.re {
            return Err(EvaluationError::InvalidGrid(
                "the left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }

        if rightupper.im < leftlower.im {
            return Err(EvaluationError::InvalidGrid(
                "the left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(Grid {
            integral_plane: IntegralPlane(columns, rows),
            complex_plane: ComplexPlane(leftlower, rightupper),
            steps: (
                step(leftlower.re, rightupper.re, columns),
                step(leftlower.im, rightupper.im, rows),
            ),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.integral_plane.1
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.integral_plane.0
    }

    /// The total number of cells in the grid.  Used to calculate
    /// memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// A grid can't be built without cells, but clippy likes the pair.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The flattened, row-major index of a cell.
    pub fn index_of(&self, row: usize, column: usize) -> usize {
        row * self.columns() + column
    }

    /// Inverse of `index_of`.
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        (index / self.columns(), index % self.columns())
    }

    /// Maps a cell to its point on the complex plane.  Asking for a
    /// cell outside the grid is a bug in the caller; see
    /// `checked_coordinate_at` for the guarded form.
    pub fn coordinate_at(&self, row: usize, column: usize) -> Complex<f64> {
        debug_assert!(row < self.rows() && column < self.columns());
        Complex::new(
            self.complex_plane.0.re + (column as f64) * self.steps.0,
            self.complex_plane.0.im + (row as f64) * self.steps.1,
        )
    }

    /// Like `coordinate_at`, but reports cells outside the grid
    /// instead of extrapolating past the window.
    pub fn checked_coordinate_at(
        &self,
        row: usize,
        column: usize,
    ) -> Result<Complex<f64>, EvaluationError> {
        if row >= self.rows() || column >= self.columns() {
            return Err(EvaluationError::OutOfRange {
                row,
                column,
                rows: self.rows(),
                columns: self.columns(),
            });
        }
        Ok(self.coordinate_at(row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_fails_on_bad_shape() {
        let grid = Grid::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(grid.is_err());
        let grid = Grid::new(4, 4, Complex::new(1.0, -1.0), Complex::new(-1.0, 1.0));
        assert!(grid.is_err());
    }

    #[test]
    fn grid_passes_on_good_shape() {
        let grid = Grid::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        assert!(grid.is_ok());
    }

    #[test]
    fn grid_fails_without_cells() {
        let lower = Complex::new(-1.0, -1.0);
        let upper = Complex::new(1.0, 1.0);
        assert!(Grid::new(0, 4, lower, upper).is_err());
        assert!(Grid::new(4, 0, lower, upper).is_err());
    }

    #[test]
    fn grid_fails_when_cells_cannot_be_counted() {
        let lower = Complex::new(-1.0, -1.0);
        let upper = Complex::new(1.0, 1.0);
        assert_eq!(
            Grid::new(std::usize::MAX, 2, lower, upper),
            Err(EvaluationError::AllocationFailure {
                rows: std::usize::MAX,
                columns: 2
            })
        );
        let widest = Grid::new(1, std::usize::MAX, lower, upper).unwrap();
        assert_eq!(widest.len(), std::usize::MAX);
    }

    #[test]
    fn grid_fails_on_non_finite_bounds() {
        let grid = Grid::new(
            4,
            4,
            Complex::new(std::f64::NEG_INFINITY, -1.0),
            Complex::new(1.0, 1.0),
        );
        assert!(grid.is_err());
        let grid = Grid::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, std::f64::NAN));
        assert!(grid.is_err());
    }

    #[test]
    fn coordinates_hit_both_edges_of_the_window() {
        let grid = Grid::new(5, 5, Complex::new(0.0, 0.0), Complex::new(4.0, 4.0)).unwrap();
        assert_eq!(grid.coordinate_at(0, 0), Complex::new(0.0, 0.0));
        assert_eq!(grid.coordinate_at(2, 2), Complex::new(2.0, 2.0));
        assert_eq!(grid.coordinate_at(4, 4), Complex::new(4.0, 4.0));
        assert_eq!(grid.coordinate_at(1, 3), Complex::new(3.0, 1.0));
    }

    #[test]
    fn coordinates_on_mixed_planes() {
        let grid = Grid::new(3, 5, Complex::new(-2.0, -1.0), Complex::new(2.0, 1.0)).unwrap();
        assert_eq!(grid.coordinate_at(1, 2), Complex::new(0.0, 0.0));
        assert_eq!(grid.coordinate_at(0, 0), Complex::new(-2.0, -1.0));
        assert_eq!(grid.coordinate_at(2, 4), Complex::new(2.0, 1.0));
    }

    #[test]
    fn single_row_sits_on_the_lower_edge() {
        let grid = Grid::new(1, 3, Complex::new(-2.0, 0.0), Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(grid.coordinate_at(0, 0), Complex::new(-2.0, 0.0));
        assert_eq!(grid.coordinate_at(0, 1), Complex::new(-1.0, 0.0));
        assert_eq!(grid.coordinate_at(0, 2), Complex::new(0.0, 0.0));
    }

    #[test]
    fn coordinates_are_repeatable() {
        let grid = Grid::new(63, 100, Complex::new(-2.0, -1.5), Complex::new(0.5, 1.5)).unwrap();
        for &(row, column) in &[(0, 0), (17, 42), (62, 99)] {
            let first = grid.coordinate_at(row, column);
            let second = grid.coordinate_at(row, column);
            assert_eq!(first.re.to_bits(), second.re.to_bits());
            assert_eq!(first.im.to_bits(), second.im.to_bits());
        }
    }

    #[test]
    fn index_round_trips_through_cells() {
        let grid = Grid::new(3, 7, Complex::new(0.0, 0.0), Complex::new(1.0, 1.0)).unwrap();
        assert_eq!(grid.len(), 21);
        assert_eq!(grid.index_of(2, 6), 20);
        assert_eq!(grid.cell_of(20), (2, 6));
        assert_eq!(grid.cell_of(7), (1, 0));
    }

    #[test]
    fn checked_coordinates_refuse_cells_outside_the_grid() {
        let grid = Grid::new(2, 3, Complex::new(0.0, 0.0), Complex::new(1.0, 1.0)).unwrap();
        assert!(grid.checked_coordinate_at(1, 2).is_ok());
        assert_eq!(
            grid.checked_coordinate_at(2, 0),
            Err(EvaluationError::OutOfRange {
                row: 2,
                column: 0,
                rows: 2,
                columns: 3
            })
        );
        assert!(grid.checked_coordinate_at(0, 3).is_err());
    }
}
