// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! EllKit error handling module.

use thiserror::Error;

/// Error type for the EllKit crates.
///
/// Cut outcomes (`Success`, `NoSoln`, `NoEffect`) are *not* errors: they are
/// in-band statuses returned by the update kernel. This enum covers caller
/// mistakes detected at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EllKitError {
    /// Shape vector and center vector have different lengths.
    #[error("shape vector and center vector have unequal lengths")]
    DimensionMismatch,

    /// Interval with upper bound below lower bound.
    #[error("interval upper bound is below its lower bound")]
    EmptyInterval,
}
