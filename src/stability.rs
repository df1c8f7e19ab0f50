// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The stability test.  A point `c` is stable when the orbit of zero
//! under `z = z * z + c` is still inside the circle of radius 2 once
//! the iteration budget is spent.

use num::Complex;

/// The iteration budget used when nobody asks for another.
pub const DEFAULT_ITERATIONS: usize = 2000;

const ESCAPE_RADIUS: f64 = 2.0;

/// Infinite and NaN magnitudes both fail this comparison, so an orbit
/// that overflowed is never mistaken for a bounded one.
#[inline]
fn within_escape_radius(z: Complex<f64>) -> bool {
    z.norm() <= ESCAPE_RADIUS
}

/// Runs the full budget, every time.  There is deliberately no early
/// exit here: every point costs the same, whatever its fate.
pub fn is_stable(c: Complex<f64>, iterations: usize) -> bool {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for _ in 0..iterations {
        z = z * z + c;
    }
    within_escape_radius(z)
}

/// Stops as soon as the orbit leaves the circle of radius 2.  Once
/// out, an orbit from zero never comes back, so the answer matches
/// `is_stable` while divergent points get much cheaper.
pub fn is_stable_early_exit(c: Complex<f64>, iterations: usize) -> bool {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    for _ in 0..iterations {
        z = z * z + c;
        if !within_escape_radius(z) {
            return false;
        }
    }
    true
}

/// Which of the two kernels an evaluation runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EscapePolicy {
    /// Always spend the whole budget.
    FixedBudget,
    /// Give up on a point once it escapes.
    EarlyExit,
}

impl Default for EscapePolicy {
    fn default() -> Self {
        EscapePolicy::FixedBudget
    }
}

impl EscapePolicy {
    /// Test one point under this policy.
    #[inline]
    pub fn is_stable(self, c: Complex<f64>, iterations: usize) -> bool {
        match self {
            EscapePolicy::FixedBudget => is_stable(c, iterations),
            EscapePolicy::EarlyExit => is_stable_early_exit(c, iterations),
        }
    }
}
