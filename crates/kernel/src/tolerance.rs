//! Numeric tolerance policy shared by every predicate in the kernel.
//!
//! The active policy is stored per thread. Callers that need a temporary
//! override save the value returned by [`set`] and restore it afterwards;
//! nothing restores it automatically.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the tolerance threshold relates to the magnitudes being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToleranceMode {
    /// `|a - b| <= epsilon`.
    #[default]
    Absolute,
    /// `|a - b| <= epsilon * scale`, where `scale` is the larger
    /// characteristic magnitude of the operands.
    Relative,
}

/// Tolerance threshold and mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Threshold, always `>= 0`.
    pub epsilon: f64,
    pub mode: ToleranceMode,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            mode: ToleranceMode::Absolute,
        }
    }
}

impl Tolerance {
    /// Build a tolerance. A negative (or NaN) epsilon is clamped to zero.
    pub fn new(epsilon: f64, mode: ToleranceMode) -> Self {
        Self {
            epsilon: sanitize(epsilon),
            mode,
        }
    }

    pub fn absolute(epsilon: f64) -> Self {
        Self::new(epsilon, ToleranceMode::Absolute)
    }

    pub fn relative(epsilon: f64) -> Self {
        Self::new(epsilon, ToleranceMode::Relative)
    }

    pub fn is_relative(&self) -> bool {
        self.mode == ToleranceMode::Relative
    }

    /// The largest difference still considered zero at the given scale.
    ///
    /// In relative mode a non-finite or zero scale falls back to 1 so that
    /// comparisons against the origin or an unbounded shape stay meaningful.
    pub fn threshold(&self, scale: f64) -> f64 {
        match self.mode {
            ToleranceMode::Absolute => self.epsilon,
            ToleranceMode::Relative => {
                let s = scale.abs();
                if s.is_finite() && s > 0.0 {
                    self.epsilon * s
                } else {
                    self.epsilon
                }
            }
        }
    }

    pub fn almost_equal(&self, a: f64, b: f64, scale: f64) -> bool {
        (a - b).abs() <= self.threshold(scale)
    }

    pub fn is_zero(&self, x: f64, scale: f64) -> bool {
        x.abs() <= self.threshold(scale)
    }

    /// Dimensionless check (sines, cosines, matrix entries): scale 1 in both modes.
    pub fn is_angle_zero(&self, x: f64) -> bool {
        x.abs() <= self.epsilon
    }
}

fn sanitize(epsilon: f64) -> f64 {
    if epsilon >= 0.0 {
        epsilon
    } else {
        warn!(epsilon, "negative tolerance clamped to zero");
        0.0
    }
}

thread_local! {
    static CURRENT: Cell<Tolerance> = Cell::new(Tolerance::default());
}

/// The tolerance active on this thread.
pub fn current() -> Tolerance {
    CURRENT.with(|c| c.get())
}

/// Replace the active tolerance, returning the previous one.
pub fn set(tolerance: Tolerance) -> Tolerance {
    let tolerance = Tolerance::new(tolerance.epsilon, tolerance.mode);
    CURRENT.with(|c| c.replace(tolerance))
}

/// Change only the threshold. Negative values are clamped to zero.
pub fn set_epsilon(epsilon: f64) {
    let mode = current().mode;
    set(Tolerance::new(epsilon, mode));
}

pub fn set_mode(mode: ToleranceMode) {
    let epsilon = current().epsilon;
    set(Tolerance { epsilon, mode });
}

/// Convenience for `current().almost_equal(a, b, scale)`.
pub fn almost_equal(a: f64, b: f64, scale: f64) -> bool {
    current().almost_equal(a, b, scale)
}

/// Convenience for `current().is_zero(x, scale)`.
pub fn is_zero(x: f64, scale: f64) -> bool {
    current().is_zero(x, scale)
}

/// Convenience for `current().threshold(scale)`.
pub fn threshold(scale: f64) -> f64 {
    current().threshold(scale)
}
