// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the LDLᵀ-factored ellipsoidal search space.
//!
//! Mathematically equivalent to [`crate::Ell`], but the shape matrix is held
//! as an implicit $M = L D L^\top$ factorization updated in place, which
//! preserves positive-definiteness under the rank-one downdate in
//! finite-precision arithmetic. Preferred for large or ill-conditioned
//! problems.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use nalgebra::{DMatrix, DVector};

use crate::ell_calc::EllCalc;
use crate::CutStrategy;
use EllKit_core::{Cut, CutStatus, SearchSpace, SearchSpace2, SearchSpaceQ};
use EllKit_error::EllKitError;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS, AND TRAITS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Ellipsoidal search space holding $M = L D L^\top$ implicitly.
///
/// Storage layout of the in-memory matrix: the strict lower triangle holds
/// the sub-diagonal entries of $L$, the diagonal holds the reciprocals of
/// $D$'s entries, and the strict upper triangle is scratch for the
/// $L^{-1} g$ back-substitution.
#[derive(Clone, Debug)]
pub struct EllStable {
    /// Fold $\kappa$ into the factorization after every update instead of
    /// accumulating it lazily.
    pub no_defer_trick: bool,

    mq: DMatrix<f64>,
    xc: DVector<f64>,
    kappa: f64,
    tsq: f64,
    n: usize,
    helper: EllCalc,
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPLEMENTATIONS, FUNCTIONS, AND MACROS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

impl EllStable {
    /// Create a ball of squared radius `kappa` centered at `xc`
    /// (identity factorization).
    #[must_use]
    pub fn new(kappa: f64, xc: DVector<f64>) -> Self {
        let ndim = xc.len();

        Self {
            no_defer_trick: false,
            mq: DMatrix::identity(ndim, ndim),
            xc,
            kappa,
            tsq: 0.0,
            n: ndim,
            helper: EllCalc::new(ndim),
        }
    }

    /// Create an axis-aligned ellipsoid with shape diagonal `shape` centered
    /// at `xc` ($\kappa = 1$).
    ///
    /// With $L = I$ the diagonal stores $D^{-1}$, so the reciprocals of
    /// `shape` are what lands in storage.
    ///
    /// # Errors
    /// - `EllKitError::DimensionMismatch` if `shape.len() != xc.len()`.
    pub fn new_with_shape(shape: DVector<f64>, xc: DVector<f64>) -> Result<Self, EllKitError> {
        if shape.len() != xc.len() {
            return Err(EllKitError::DimensionMismatch);
        }
        let ndim = xc.len();
        let mut mq = DMatrix::identity(ndim, ndim);
        for i in 0..ndim {
            mq[(i, i)] = 1.0 / shape[i];
        }

        Ok(Self {
            no_defer_trick: false,
            mq,
            xc,
            kappa: 1.0,
            tsq: 0.0,
            n: ndim,
            helper: EllCalc::new(ndim),
        })
    }

    /// The current center.
    #[must_use]
    pub fn xc(&self) -> DVector<f64> {
        self.xc.clone()
    }

    /// Overwrite the center.
    pub fn set_xc(&mut self, xc: DVector<f64>) {
        self.xc = xc;
    }

    /// The volume proxy $\tau^2$ computed by the last update.
    #[must_use]
    pub fn tsq(&self) -> f64 {
        self.tsq
    }

    /// Enable or disable parallel-cut handling in the update kernel.
    pub fn set_use_parallel_cut(&mut self, flag: bool) {
        self.helper.use_parallel_cut = flag;
    }

    // Reference: Gill, Murray, and Wright, "Practical Optimization", p43.
    pub(crate) fn update_core(
        &mut self,
        cut: &Cut<DVector<f64>>,
        strategy: CutStrategy,
    ) -> CutStatus {
        let (grad, beta) = cut;
        let n = self.n;

        // forward solve inv(L)*g: (n-1)*n/2 multiplications
        let mut inv_lg = grad.clone();
        for j in 0..n - 1 {
            for i in j + 1..n {
                // scratch upper entry, kept for the rank-one update
                self.mq[(j, i)] = self.mq[(i, j)] * inv_lg[j];
                inv_lg[i] -= self.mq[(j, i)];
            }
        }

        // scale inv(D)*inv(L)*g: n multiplications
        let mut inv_d_inv_lg = inv_lg.clone();
        for i in 0..n {
            inv_d_inv_lg[i] *= self.mq[(i, i)];
        }

        let omega: f64 = (0..n).map(|i| inv_lg[i] * inv_d_inv_lg[i]).sum();
        debug_assert!(omega > 0.0, "cut gradient must be nonzero");
        self.tsq = self.kappa * omega;

        let (status, rho, sigma, delta) = match strategy {
            CutStrategy::Deep => self.helper.calc_single_or_ll(beta, self.tsq),
            CutStrategy::Central => self.helper.calc_single_or_ll_cc(beta, self.tsq),
            CutStrategy::Discrete => self.helper.calc_single_or_ll_q(beta, self.tsq),
        };

        if status != CutStatus::Success {
            return status;
        }

        // back solve g_t = inv(L')*inv(D)*inv(L)*g: (n-1)*n/2 multiplications
        let mut g_t = inv_d_inv_lg.clone();
        for i in (1..n).rev() {
            for j in i..n {
                g_t[i - 1] -= self.mq[(j, i - 1)] * g_t[j];
            }
        }

        self.xc.axpy(-(rho / omega), &g_t, 1.0);

        // rank-one downdate of the factorization: 3*n + (n-1)*n/2
        let mu = sigma / (1.0 - sigma);
        let mut oldt = omega / mu;
        let mut v = grad.clone();
        for j in 0..n {
            let p = v[j];
            let temp = inv_d_inv_lg[j];
            let newt = oldt + p * temp;
            let beta2 = temp / newt;
            self.mq[(j, j)] *= oldt / newt; // update inv(D)
            for k in j + 1..n {
                v[k] -= self.mq[(j, k)];
                self.mq[(k, j)] += beta2 * v[k];
            }
            oldt = newt;
        }

        self.kappa *= delta;

        if self.no_defer_trick {
            // fold kappa into D, i.e. divide the stored reciprocals
            for i in 0..n {
                self.mq[(i, i)] /= self.kappa;
            }
            self.kappa = 1.0;
        }
        status
    }
}

impl SearchSpace for EllStable {
    type ArrayType = DVector<f64>;

    fn xc(&self) -> DVector<f64> {
        self.xc()
    }

    fn tsq(&self) -> f64 {
        self.tsq()
    }

    fn update_dc(&mut self, cut: &Cut<DVector<f64>>) -> CutStatus {
        self.update_core(cut, CutStrategy::Deep)
    }

    fn update_cc(&mut self, cut: &Cut<DVector<f64>>) -> CutStatus {
        self.update_core(cut, CutStrategy::Central)
    }
}

impl SearchSpaceQ for EllStable {
    type ArrayType = DVector<f64>;

    fn xc(&self) -> DVector<f64> {
        self.xc()
    }

    fn tsq(&self) -> f64 {
        self.tsq()
    }

    fn update_q(&mut self, cut: &Cut<DVector<f64>>) -> CutStatus {
        self.update_core(cut, CutStrategy::Discrete)
    }
}

impl SearchSpace2 for EllStable {
    fn set_xc(&mut self, xc: DVector<f64>) {
        self.set_xc(xc);
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
