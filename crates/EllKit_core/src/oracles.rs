// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the capability traits consumed by the driver loops.
//!
//! Oracles assess a trial point and either certify feasibility or return a
//! separating cut; search spaces shrink in response to cuts. The drivers are
//! generic over these traits and never inspect problem semantics.

use crate::cut::{Cut, CutStatus};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS, AND TRAITS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Separation oracle for feasibility problems.
pub trait OracleFeas<Array> {
    /// Assess `xc`: `None` certifies feasibility, otherwise a separating cut.
    fn assess_feas(&mut self, xc: &Array) -> Option<Cut<Array>>;
}

/// Feasibility oracle parameterized by a scalar, for binary search.
pub trait OracleFeas2<Array>: OracleFeas<Array> {
    /// Set the oracle's parameter before the next feasibility probe.
    fn update(&mut self, gamma: f64);
}

/// Separation oracle for optimization problems.
pub trait OracleOptim<Array> {
    /// Assess `xc` against the best-so-far value `gamma`.
    ///
    /// Returns a cut and, when a strictly better incumbent was found at
    /// `xc`, the improved objective value.
    fn assess_optim(&mut self, xc: &Array, gamma: f64) -> (Cut<Array>, Option<f64>);
}

/// Separation oracle for discrete feasibility problems.
pub trait OracleFeasQ<Array> {
    /// Assess `xc`, rounding to a lattice candidate internally.
    ///
    /// Returns `(cut, x_q, more_alt)`: no cut certifies that the rounded
    /// candidate `x_q` is feasible; `more_alt` reports whether further
    /// alternative cuts exist at the same center. The driver sets `retry`
    /// to request one of them.
    fn assess_feas_q(
        &mut self,
        xc: &Array,
        retry: bool,
    ) -> (Option<Cut<Array>>, Option<Array>, bool);
}

/// Separation oracle for discrete optimization problems.
pub trait OracleOptimQ<Array> {
    /// Assess `xc` against `gamma`, rounding to a lattice candidate.
    ///
    /// Returns `(cut, x_q, gamma1, more_alt)`; `gamma1` carries the improved
    /// objective value when the rounded candidate `x_q` beats `gamma`.
    fn assess_optim_q(
        &mut self,
        xc: &Array,
        gamma: f64,
        retry: bool,
    ) -> (Cut<Array>, Array, Option<f64>, bool);
}

/// Monotone predicate for binary search over a scalar parameter.
pub trait OracleBS<T> {
    /// Whether the problem parameterized by `gamma` is feasible.
    fn assess_bs(&mut self, gamma: T) -> bool;
}

/// A search region that shrinks under deep and central cuts.
pub trait SearchSpace {
    /// Point type of the search space.
    type ArrayType: Clone;

    /// The current center of the search space.
    fn xc(&self) -> Self::ArrayType;

    /// The volume proxy $\tau^2$ computed by the last update; the drivers
    /// use it as the convergence gauge.
    fn tsq(&self) -> f64;

    /// Shrink by a deep cut.
    fn update_dc(&mut self, cut: &Cut<Self::ArrayType>) -> CutStatus;

    /// Shrink by a central cut (the cut passes through the center).
    fn update_cc(&mut self, cut: &Cut<Self::ArrayType>) -> CutStatus;
}

/// A search region that shrinks under discrete (shadow) cuts.
pub trait SearchSpaceQ {
    /// Point type of the search space.
    type ArrayType: Clone;

    /// The current center of the search space.
    fn xc(&self) -> Self::ArrayType;

    /// The volume proxy $\tau^2$ computed by the last update.
    fn tsq(&self) -> f64;

    /// Shrink by a discrete cut; returns [`CutStatus::NoEffect`] when the
    /// cut is too shallow to reliably tighten an integer lattice.
    fn update_q(&mut self, cut: &Cut<Self::ArrayType>) -> CutStatus;
}

/// A search space whose center can be overwritten, for binary search.
pub trait SearchSpace2: SearchSpace {
    /// Overwrite the center.
    fn set_xc(&mut self, xc: Self::ArrayType);
}
