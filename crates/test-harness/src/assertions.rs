//! Rich assertion helpers with diagnostic output.
//!
//! Every failure carries the context string, expected vs actual, and the
//! active tolerance policy.

use geom_kernel::prelude::*;
use geom_kernel::{Intersection, Point3d, tolerance};

use crate::helpers::{HarnessError, fmt_point};
use crate::oracle::OracleVerdict;

fn policy() -> String {
    let t = tolerance::current();
    format!("{:?} eps={}", t.mode, t.epsilon)
}

/// Assert that `shape` classifies `point` as `expected`.
pub fn assert_location<S: Locate>(
    shape: &S,
    point: &Point3d,
    expected: Location,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = shape.locate(point);
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] {} expected {:?}, got {:?} ({})",
                ctx,
                fmt_point(point),
                expected,
                actual,
                policy(),
            ),
        })
    }
}

/// Assert the distance between two shapes within `tol`.
pub fn assert_distance<A: DistanceTo<B>, B>(
    a: &A,
    b: &B,
    expected: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = a.distance_to(b);
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] distance: expected {:.9}, got {:.9} (tol={})",
                ctx, expected, actual, tol,
            ),
        })
    }
}

/// Assert that two points coincide within `tol`.
pub fn assert_point_near(
    actual: &Point3d,
    expected: &Point3d,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let gap = actual.distance_to(expected);
    if gap <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] point: expected {}, got {} (gap {:.3e}, tol={})",
                ctx,
                fmt_point(expected),
                fmt_point(actual),
                gap,
                tol,
            ),
        })
    }
}

/// Assert the variant of an intersection result.
pub fn assert_intersection_kind(
    result: &Intersection,
    expected: &str,
    ctx: &str,
) -> Result<(), HarnessError> {
    if result.kind() == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] intersection: expected {}, got {} ({:?})",
                ctx,
                expected,
                result.kind(),
                result,
            ),
        })
    }
}

/// Turn a failed verdict into an error.
pub fn assert_verdict(verdict: &OracleVerdict) -> Result<(), HarnessError> {
    if verdict.passed {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: verdict.oracle_name.clone(),
            detail: verdict.detail.clone(),
        })
    }
}

/// Assert that every verdict passed, reporting all failures together.
pub fn assert_all_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "{} of {} oracles failed:\n  {}",
                failures.len(),
                verdicts.len(),
                failures.join("\n  ")
            ),
        })
    }
}
