// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop an evaluation.  None of these are
//! transient: the work is pure and deterministic, so trying again
//! with the same inputs fails the same way.

use failure::Fail;

/// The failures a grid can produce, from construction through the
/// end of an `evaluate` call.
#[derive(Debug, Fail, PartialEq)]
pub enum EvaluationError {
    /// The result buffer could not be reserved, or its size does not
    /// fit in memory at all.
    #[fail(display = "could not allocate a result buffer for {}x{} cells", rows, columns)]
    AllocationFailure {
        /// Rows requested.
        rows: usize,
        /// Columns requested.
        columns: usize,
    },

    /// The worker pool could not be brought up, or a worker could not
    /// be handed its work.
    #[fail(display = "could not schedule work: {}", reason)]
    SchedulingFailure {
        /// What went wrong.
        reason: String,
    },

    /// A unit of work died before writing its slots.
    #[fail(display = "a unit of work failed: {}", reason)]
    TaskFailure {
        /// What went wrong.
        reason: String,
    },

    /// A cell was requested outside the grid.
    #[fail(
        display = "cell ({}, {}) lies outside the {}x{} grid",
        row, column, rows, columns
    )]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
        /// Rows in the grid.
        rows: usize,
        /// Columns in the grid.
        columns: usize,
    },

    /// The grid description itself is unusable.
    #[fail(display = "invalid grid: {}", _0)]
    InvalidGrid(String),
}
