//! Verification harness for the geometry kernel.
//!
//! Provides reusable fixtures, oracles and assertions that check the
//! kernel's guarantees and report every failure with diagnostics.
//!
//! # Key Components
//!
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`helpers`]: Error type, shape fixtures, tolerance scoping
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
