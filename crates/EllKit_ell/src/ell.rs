// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the standard ellipsoidal search space.

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

/// Ellipsoidal search space $\\{x : (x - x_c)^\top (\kappa M)^{-1} (x - x_c) \leq 1\\}$
/// with an explicit symmetric positive-definite shape matrix $M$.
///
/// The scale $\kappa$ accumulates the volume multipliers and is folded into
/// $M$ only when `no_defer_trick` is set.
#[derive(Clone, Debug)]
pub struct Ell {
    /// Fold $\kappa$ into the shape matrix after every update instead of
    /// accumulating it lazily.
    pub no_defer_trick: bool,

    mq: DMatrix<f64>,
    xc: DVector<f64>,
    kappa: f64,
    tsq: f64,
    helper: EllCalc,
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPLEMENTATIONS, FUNCTIONS, AND MACROS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

impl Ell {
    /// Create a ball of squared radius `kappa` centered at `xc`
    /// (identity shape matrix).
    #[must_use]
    pub fn new(kappa: f64, xc: DVector<f64>) -> Self {
        let ndim = xc.len();

        Self {
            no_defer_trick: false,
            mq: DMatrix::identity(ndim, ndim),
            xc,
            kappa,
            tsq: 0.0,
            helper: EllCalc::new(ndim),
        }
    }

    /// Create an axis-aligned ellipsoid with shape diagonal `shape` centered
    /// at `xc` ($\kappa = 1$).
    ///
    /// # Errors
    /// - `EllKitError::DimensionMismatch` if `shape.len() != xc.len()`.
    pub fn new_with_shape(shape: DVector<f64>, xc: DVector<f64>) -> Result<Self, EllKitError> {
        if shape.len() != xc.len() {
            return Err(EllKitError::DimensionMismatch);
        }
        let ndim = xc.len();

        Ok(Self {
            no_defer_trick: false,
            mq: DMatrix::from_diagonal(&shape),
            xc,
            kappa: 1.0,
            tsq: 0.0,
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

    /// The volume proxy $\tau^2 = \kappa \cdot g^\top M g$ computed by the
    /// last update.
    #[must_use]
    pub fn tsq(&self) -> f64 {
        self.tsq
    }

    /// Enable or disable parallel-cut handling in the update kernel.
    pub fn set_use_parallel_cut(&mut self, flag: bool) {
        self.helper.use_parallel_cut = flag;
    }

    pub(crate) fn update_core(
        &mut self,
        cut: &Cut<DVector<f64>>,
        strategy: CutStrategy,
    ) -> CutStatus {
        let (grad, beta) = cut;
        let grad_t = &self.mq * grad; // n^2 multiplications
        let omega = grad.dot(&grad_t); // n multiplications
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

        self.xc.axpy(-(rho / omega), &grad_t, 1.0);
        // symmetric rank-one downdate: both vectors are grad_t
        self.mq.ger(-(sigma / omega), &grad_t, &grad_t, 1.0);
        self.kappa *= delta;

        if self.no_defer_trick {
            self.mq *= self.kappa;
            self.kappa = 1.0;
        }
        status
    }
}

impl SearchSpace for Ell {
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

impl SearchSpaceQ for Ell {
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

impl SearchSpace2 for Ell {
    fn set_xc(&mut self, xc: DVector<f64>) {
        self.set_xc(xc);
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_ell {
    use super::*;
    use EllKit_core::CutChoice;
    use EllKit_utils::{assert_approx_equal, ELLKIT_EPSILON};

    #[test]
    fn test_construction() {
        let ell = Ell::new(10.0, DVector::from_vec(vec![0.0, 0.0]));
        assert_eq!(ell.xc().len(), 2);
        assert_eq!(ell.tsq(), 0.0);

        let ok = Ell::new_with_shape(
            DVector::from_vec(vec![1.0, 4.0]),
            DVector::from_vec(vec![0.0, 0.0]),
        );
        assert!(ok.is_ok());

        let bad = Ell::new_with_shape(
            DVector::from_vec(vec![1.0, 4.0, 9.0]),
            DVector::from_vec(vec![0.0, 0.0]),
        );
        assert_eq!(bad.unwrap_err(), EllKitError::DimensionMismatch);
    }

    #[test]
    fn test_update_dc() {
        let mut ell = Ell::new(1.0, DVector::from_vec(vec![0.0; 4]));
        let cut = (DVector::from_vec(vec![1.0; 4]), CutChoice::Single(1.0));

        let status = ell.update_dc(&cut);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(ell.tsq(), 4.0, ELLKIT_EPSILON);

        // center moved against the gradient
        let xc = ell.xc();
        assert!(xc[0] < 0.0);
        assert_approx_equal!(xc[0], xc[1], ELLKIT_EPSILON);
    }

    #[test]
    fn test_update_dc_no_soln() {
        let mut ell = Ell::new(1.0, DVector::from_vec(vec![0.0, 0.0]));
        let xc_before = ell.xc();
        // beta exceeds the ellipsoid radius along g
        let cut = (DVector::from_vec(vec![1.0, 0.0]), CutChoice::Single(5.0));

        let status = ell.update_dc(&cut);
        assert_eq!(status, CutStatus::NoSoln);
        assert_eq!(ell.xc(), xc_before);
    }

    #[test]
    fn test_update_q_no_effect() {
        let mut ell = Ell::new(1.0, DVector::from_vec(vec![0.0, 0.0]));
        let xc_before = ell.xc();
        // shadow cut far on the other side of the center
        let cut = (DVector::from_vec(vec![1.0, 0.0]), CutChoice::Single(-5.0));

        let status = ell.update_q(&cut);
        assert_eq!(status, CutStatus::NoEffect);
        assert_eq!(ell.xc(), xc_before);
    }

    // After a successful cut, the same probe direction reads a smaller tsq.
    #[test]
    fn test_monotone_shrink() {
        let mut ell = Ell::new(10.0, DVector::from_vec(vec![0.0, 0.0]));
        let cut = (DVector::from_vec(vec![1.0, 1.0]), CutChoice::Single(0.5));

        assert_eq!(ell.update_dc(&cut), CutStatus::Success);
        let tsq_first = ell.tsq();
        assert_eq!(ell.update_dc(&cut), CutStatus::Success);
        assert!(ell.tsq() < tsq_first);
    }

    // The logical ellipsoid (xc, kappa * M) is identical with the defer
    // trick on or off.
    #[test]
    fn test_defer_trick_invariance() {
        let cuts = [
            (DVector::from_vec(vec![1.0, 0.5]), CutChoice::Single(0.3)),
            (DVector::from_vec(vec![-0.5, 1.0]), CutChoice::Single(0.0)),
            (
                DVector::from_vec(vec![0.2, -1.0]),
                CutChoice::Parallel(0.1, 0.4),
            ),
        ];

        let mut deferred = Ell::new(10.0, DVector::from_vec(vec![0.0, 0.0]));
        let mut eager = Ell::new(10.0, DVector::from_vec(vec![0.0, 0.0]));
        eager.no_defer_trick = true;

        for cut in &cuts {
            assert_eq!(deferred.update_dc(cut), CutStatus::Success);
            assert_eq!(eager.update_dc(cut), CutStatus::Success);
        }

        let scaled = &deferred.mq * deferred.kappa;
        for i in 0..2 {
            assert_approx_equal!(deferred.xc()[i], eager.xc()[i], 1e-12);
            for j in 0..2 {
                assert_approx_equal!(scaled[(i, j)], eager.mq[(i, j)], 1e-10);
            }
        }
    }

    // The rank-one downdate keeps the shape matrix symmetric.
    #[test]
    fn test_shape_matrix_symmetry() {
        let mut ell = Ell::new(10.0, DVector::from_vec(vec![0.0, 0.0, 0.0]));
        let cuts = [
            (DVector::from_vec(vec![1.0, 2.0, -0.5]), CutChoice::Single(0.2)),
            (DVector::from_vec(vec![-1.0, 0.3, 0.8]), CutChoice::Single(0.0)),
        ];

        for cut in &cuts {
            assert_eq!(ell.update_dc(cut), CutStatus::Success);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_approx_equal!(ell.mq[(i, j)], ell.mq[(j, i)], 1e-14);
            }
        }
    }
}
