// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs a run can turn, and what they are when nobody turns
//! them.

use num::Complex;

use crate::errors::EvaluationError;
use crate::evaluator::ParallelEvaluator;
use crate::planes::Grid;
use crate::stability::{EscapePolicy, DEFAULT_ITERATIONS};

/// Default number of rows in the chart.
pub const DEFAULT_ROWS: usize = 63;
/// Default number of columns in the chart.
pub const DEFAULT_COLUMNS: usize = 100;

/// Everything needed to produce one mask.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Rows to sample.
    pub rows: usize,
    /// Columns to sample.
    pub columns: usize,
    /// Left edge of the window.
    pub real_min: f64,
    /// Right edge of the window.
    pub real_max: f64,
    /// Lower edge of the window.
    pub imag_min: f64,
    /// Upper edge of the window.
    pub imag_max: f64,
    /// Iteration budget per point.
    pub iterations: usize,
    /// Size of the worker pool.
    pub workers: usize,
    /// Consecutive cells per task.
    pub cells_per_task: usize,
    /// Which stability kernel to run.
    pub escape_policy: EscapePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            real_min: -2.0,
            real_max: 0.5,
            imag_min: -1.5,
            imag_max: 1.5,
            iterations: DEFAULT_ITERATIONS,
            workers: num_cpus::get(),
            cells_per_task: 1,
            escape_policy: EscapePolicy::FixedBudget,
        }
    }
}

impl Config {
    /// The sampled window, checked.
    pub fn grid(&self) -> Result<Grid, EvaluationError> {
        Grid::new(
            self.rows,
            self.columns,
            Complex::new(self.real_min, self.imag_min),
            Complex::new(self.real_max, self.imag_max),
        )
    }

    /// An evaluator set up the way this configuration asks.
    pub fn evaluator(&self) -> ParallelEvaluator {
        ParallelEvaluator::new(self.workers)
            .cells_per_task(self.cells_per_task)
            .escape_policy(self.escape_policy)
    }
}
