// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the one-dimensional interval search space.
//!
//! An ellipsoid in one dimension is an interval; a cut either bisects it
//! (central cut) or clips it at the cut's boundary point (deep cut). Only
//! single cuts apply: a parallel pair degrades to its first hyperplane, the
//! same degradation the kernel dispatchers use when parallel cuts are off.

use EllKit_core::{Cut, CutChoice, CutStatus, SearchSpace, SearchSpace2, SearchSpaceQ};
use EllKit_error::EllKitError;

/// Interval search space $[x_c - r, x_c + r]$.
#[derive(Clone, Copy, Debug)]
pub struct Ell1D {
    rd: f64,
    xc: f64,
    tsq: f64,
}

impl Ell1D {
    /// Create the interval `[lower, upper]`.
    ///
    /// # Errors
    /// - `EllKitError::EmptyInterval` if `upper < lower`.
    pub fn new(interval: (f64, f64)) -> Result<Self, EllKitError> {
        let (lower, upper) = interval;
        if upper < lower {
            return Err(EllKitError::EmptyInterval);
        }
        let rd = (upper - lower) / 2.0;

        Ok(Self {
            rd,
            xc: lower + rd,
            tsq: 0.0,
        })
    }

    /// The current center.
    #[must_use]
    pub fn xc(&self) -> f64 {
        self.xc
    }

    /// Overwrite the center.
    pub fn set_xc(&mut self, xc: f64) {
        self.xc = xc;
    }

    /// The volume proxy $\tau^2 = (r \cdot g)^2$ computed by the last update.
    #[must_use]
    pub fn tsq(&self) -> f64 {
        self.tsq
    }

    // Single-cut update of the interval by grad' * (x - xc) + beta <= 0.
    fn update_single(&mut self, grad: f64, beta: f64) -> CutStatus {
        debug_assert!(grad != 0.0, "cut gradient must be nonzero");
        let tau = (self.rd * grad).abs();
        self.tsq = tau * tau;

        if beta == 0.0 {
            self.rd /= 2.0;
            self.xc += if grad > 0.0 { -self.rd } else { self.rd };
            return CutStatus::Success;
        }
        if beta > tau {
            return CutStatus::NoSoln;
        }
        if beta < -tau {
            return CutStatus::NoEffect;
        }

        // one endpoint is the cut's boundary, the other the far side
        let bound = self.xc - beta / grad;
        let (lower, upper) = if grad > 0.0 {
            (self.xc - self.rd, bound)
        } else {
            (bound, self.xc + self.rd)
        };
        self.rd = (upper - lower) / 2.0;
        self.xc = lower + self.rd;
        CutStatus::Success
    }

    fn first_offset(cut: &Cut<f64>) -> f64 {
        match cut.1 {
            CutChoice::Single(b) => b,
            CutChoice::Parallel(b0, _) => b0,
        }
    }
}

impl SearchSpace for Ell1D {
    type ArrayType = f64;

    fn xc(&self) -> f64 {
        self.xc()
    }

    fn tsq(&self) -> f64 {
        self.tsq()
    }

    fn update_dc(&mut self, cut: &Cut<f64>) -> CutStatus {
        self.update_single(cut.0, Self::first_offset(cut))
    }

    fn update_cc(&mut self, cut: &Cut<f64>) -> CutStatus {
        self.update_single(cut.0, 0.0)
    }
}

impl SearchSpaceQ for Ell1D {
    type ArrayType = f64;

    fn xc(&self) -> f64 {
        self.xc()
    }

    fn tsq(&self) -> f64 {
        self.tsq()
    }

    fn update_q(&mut self, cut: &Cut<f64>) -> CutStatus {
        self.update_single(cut.0, Self::first_offset(cut))
    }
}

impl SearchSpace2 for Ell1D {
    fn set_xc(&mut self, xc: f64) {
        self.set_xc(xc);
    }
}
