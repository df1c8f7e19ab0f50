#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot stability mask
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the orbit of zero under `z = z * z + c` stays bounded.
//! This crate samples a rectangular window of the plane on a regular
//! grid, decides for every sample whether its orbit is still within
//! the circle of radius 2 after a fixed number of iterations, and
//! draws the answer as a chart of dots and spaces.
//!
//! Every sample is independent of every other, so the interesting
//! part is the `ParallelEvaluator`: it cuts the result buffer into
//! disjoint runs of cells, lets a short-lived pool of worker threads
//! fill them in, and only hands the buffer back once every cell has
//! been written.

extern crate crossbeam;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod chart;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod mask;
pub mod planes;
pub mod stability;

pub use config::Config;
pub use errors::EvaluationError;
pub use evaluator::ParallelEvaluator;
pub use mask::StabilityMask;
pub use planes::Grid;
pub use stability::{is_stable, EscapePolicy};
