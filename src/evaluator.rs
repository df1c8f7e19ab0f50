// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel evaluator.  Every cell of a grid is independent of
//! every other, so the result buffer is cut into disjoint runs of
//! cells with `chunks_mut`, the runs are put in a shared queue, and a
//! pool of scoped worker threads pulls runs off the queue until it is
//! empty.  Each run is a task: it owns its slots outright, so the
//! only lock in the whole affair is the one deciding which task a
//! worker gets next.  The pool lives exactly as long as one call to
//! `evaluate`.

use std::any::Any;
use std::fmt;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use itertools::iproduct;
use log::{debug, trace};

use crate::errors::EvaluationError;
use crate::mask::StabilityMask;
use crate::planes::Grid;
use crate::stability::EscapePolicy;

type TaskQueue<'a, T> = Arc<Mutex<Enumerate<ChunksMut<'a, T>>>>;

/// Where a single evaluation has got to.  Only ever visible in the
/// debug log; callers just see a blocking call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Dispatching,
    AwaitingCompletion,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Dispatching => "dispatching",
            Phase::AwaitingCompletion => "awaiting completion",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!("evaluation {} -> {}", phase, next);
    *phase = next;
}

/// Raises the abort flag if the worker holding it unwinds, so the
/// rest of the pool stops taking new work.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl<'a> Drop for AbortOnPanic<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Reserves room for every cell of a rows x columns grid, or says why
/// it can't.
fn allocate<T>(rows: usize, columns: usize) -> Result<Vec<T>, EvaluationError> {
    let failure = EvaluationError::AllocationFailure { rows, columns };
    let len = match rows.checked_mul(columns) {
        Some(len) => len,
        None => return Err(failure),
    };
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| failure)?;
    Ok(buffer)
}

/// Fans a grid out over a pool of worker threads and collects one
/// answer per cell.  Once set, this object should not be mutable.
#[derive(Copy, Clone, Debug)]
pub struct ParallelEvaluator {
    workers: usize,
    cells_per_task: usize,
    policy: EscapePolicy,
}

impl Default for ParallelEvaluator {
    fn default() -> Self {
        ParallelEvaluator::new(num_cpus::get())
    }
}

impl ParallelEvaluator {
    /// A pool of `workers` threads, one cell per task, running the
    /// full iteration budget for every point.
    pub fn new(workers: usize) -> Self {
        ParallelEvaluator {
            workers,
            cells_per_task: 1,
            policy: EscapePolicy::FixedBudget,
        }
    }

    /// One worker per CPU.
    pub fn with_defaults() -> Self {
        ParallelEvaluator::default()
    }

    /// How many consecutive cells make up one task.
    pub fn cells_per_task(mut self, cells: usize) -> Self {
        self.cells_per_task = cells;
        self
    }

    /// Which stability kernel to run.
    pub fn escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configured size of the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Decides the stability of every cell of `grid`, in parallel.
    /// Blocks until every cell is written, then hands the whole mask
    /// over.  Nothing is handed over if any part of the work fails.
    pub fn evaluate(&self, grid: &Grid, iterations: usize) -> Result<StabilityMask, EvaluationError> {
        let policy = self.policy;
        let cells = self.map_cells(grid.rows(), grid.columns(), |row, column| {
            policy.is_stable(grid.coordinate_at(row, column), iterations)
        })?;
        Ok(StabilityMask::from_cells(grid.rows(), grid.columns(), cells))
    }

    /// The single-threaded version of `evaluate`.  Same answers,
    /// always; useful as a reference and for tiny grids.
    pub fn evaluate_serial(
        &self,
        grid: &Grid,
        iterations: usize,
    ) -> Result<StabilityMask, EvaluationError> {
        let mut cells = allocate(grid.rows(), grid.columns())?;
        for (row, column) in iproduct!(0..grid.rows(), 0..grid.columns()) {
            cells.push(self.policy.is_stable(grid.coordinate_at(row, column), iterations));
        }
        Ok(StabilityMask::from_cells(grid.rows(), grid.columns(), cells))
    }

    /// The engine behind `evaluate`: fills a row-major buffer of
    /// `rows * columns` slots with `cell(row, column)`, each slot
    /// computed exactly once by exactly one worker.
    pub fn map_cells<T, F>(
        &self,
        rows: usize,
        columns: usize,
        cell: F,
    ) -> Result<Vec<T>, EvaluationError>
    where
        T: Clone + Default + Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        let mut phase = Phase::Idle;
        enter(&mut phase, Phase::Dispatching);
        let result = self.dispatch(rows, columns, &cell, &mut phase);
        match result {
            Ok(_) => enter(&mut phase, Phase::Done),
            Err(ref err) => {
                debug!("evaluation of {}x{} cells failed: {}", rows, columns, err);
                enter(&mut phase, Phase::Failed);
            }
        }
        result
    }

    fn dispatch<T, F>(
        &self,
        rows: usize,
        columns: usize,
        cell: &F,
        phase: &mut Phase,
    ) -> Result<Vec<T>, EvaluationError>
    where
        T: Clone + Default + Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        if self.workers == 0 {
            return Err(EvaluationError::SchedulingFailure {
                reason: "the pool needs at least one worker".to_string(),
            });
        }
        if self.cells_per_task == 0 {
            return Err(EvaluationError::SchedulingFailure {
                reason: "a task needs at least one cell".to_string(),
            });
        }

        let mut buffer = allocate(rows, columns)?;
        let len = rows * columns;
        buffer.resize(len, T::default());

        // A task never needs to be bigger than the whole buffer.
        let chunk = self.cells_per_task.min(len.max(1));
        let tasks = len / chunk + if len % chunk == 0 { 0 } else { 1 };
        let workers = self.workers.min(tasks).max(1);
        debug!(
            "{} cells in {} tasks across {} workers",
            len, tasks, workers
        );

        let aborted = AtomicBool::new(false);
        let outcome = {
            let queue: TaskQueue<T> = Arc::new(Mutex::new(buffer.chunks_mut(chunk).enumerate()));
            let aborted = &aborted;
            crossbeam::scope(|spawner| -> Result<usize, EvaluationError> {
                let mut handles = Vec::with_capacity(workers);
                for id in 0..workers {
                    let queue = queue.clone();
                    let handle = spawner
                        .builder()
                        .name(format!("mandel-worker-{}", id))
                        .spawn(move |_| {
                            let _guard = AbortOnPanic(aborted);
                            let mut completed = 0;
                            while !aborted.load(Ordering::SeqCst) {
                                // A poisoned queue means another worker died; stop.
                                let task = match queue.lock() {
                                    Ok(mut queue) => queue.next(),
                                    Err(_) => None,
                                };
                                match task {
                                    Some((task, slots)) => {
                                        let base = task * chunk;
                                        for (offset, slot) in slots.iter_mut().enumerate() {
                                            let index = base + offset;
                                            *slot = cell(index / columns, index % columns);
                                        }
                                        completed += 1;
                                    }
                                    None => {
                                        break;
                                    }
                                }
                            }
                            trace!("worker {} ran {} tasks", id, completed);
                            completed
                        });
                    match handle {
                        Ok(handle) => handles.push(handle),
                        Err(err) => {
                            aborted.store(true, Ordering::SeqCst);
                            return Err(EvaluationError::SchedulingFailure {
                                reason: format!("could not start worker {}: {}", id, err),
                            });
                        }
                    }
                }

                enter(phase, Phase::AwaitingCompletion);
                let mut completed = 0;
                let mut failure = None;
                for handle in handles {
                    match handle.join() {
                        Ok(ran) => completed += ran,
                        Err(payload) => {
                            if failure.is_none() {
                                failure = Some(describe_panic(&*payload));
                            }
                        }
                    }
                }
                match failure {
                    Some(reason) => Err(EvaluationError::TaskFailure { reason }),
                    None => Ok(completed),
                }
            })
        };

        match outcome {
            Ok(Ok(completed)) if completed == tasks => Ok(buffer),
            Ok(Ok(completed)) => Err(EvaluationError::TaskFailure {
                reason: format!("only {} of {} tasks completed", completed, tasks),
            }),
            Ok(Err(err)) => Err(err),
            Err(payload) => Err(EvaluationError::TaskFailure {
                reason: describe_panic(&*payload),
            }),
        }
    }
}
