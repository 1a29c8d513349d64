// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for cut representation and cut outcomes.
//!
//! A cut is the closed half-space $\\{x : g^\top (x - x_c) + \beta \leq 0\\}$
//! separating a query point from the feasible region, or a slab between two
//! parallel half-spaces when $\beta$ is a pair.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS, AND TRAITS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Outcome of applying a cut to a search space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutStatus {
    /// The cut reduced the search space; the update was applied.
    Success,
    /// The cut proves the current search space contains no feasible point.
    NoSoln,
    /// The cut is too shallow to tighten the current search space.
    NoEffect,
}

/// Offset of a cut: a single hyperplane, or a pair bracketing a slab.
///
/// `Single(0.0)` denotes a central cut. A `Parallel(b0, b1)` pair requires
/// `b0 <= b1`; a violated ordering yields [`CutStatus::NoSoln`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CutChoice {
    /// Single deep cut with offset $\beta$.
    Single(f64),
    /// Parallel (two-sided) cut with offsets $(\beta_0, \beta_1)$.
    Parallel(f64, f64),
}

/// A cut: gradient paired with its offset(s).
///
/// The gradient is not required to be unit-norm; the update kernel handles
/// scaling. `Array` is the gradient type of the search space
/// (`nalgebra::DVector<f64>` for the dense ellipsoids, `f64` for intervals).
pub type Cut<Array> = (Array, CutChoice);

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
