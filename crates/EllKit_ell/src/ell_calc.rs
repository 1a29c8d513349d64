// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the ellipsoid update kernel.
//!
//! [`EllCalc`] translates a cut offset $\beta$ and the volume proxy
//! $\tau^2 = \kappa \cdot g^\top M g$ into the three update coefficients
//!
//! - $\varrho$ — center shift,
//! - $\sigma$ — rank-one weight on the shape matrix,
//! - $\delta$ — volume multiplier,
//!
//! or a terminal [`CutStatus`], independent of the vector dimension beyond
//! a handful of pre-computed constants.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use EllKit_core::{CutChoice, CutStatus};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS, AND TRAITS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Update coefficients returned by every kernel method:
/// `(status, rho, sigma, delta)`. Non-`Success` statuses carry zeros.
pub type CalcReturn = (CutStatus, f64, f64, f64);

/// Pure scalar kernel of the ellipsoid method for dimension $n$.
///
/// Supports single deep cuts, central cuts, and parallel (two-sided) cuts,
/// each in a continuous and a discrete flavor. The discrete (`_q`) variants
/// return [`CutStatus::NoEffect`] instead of applying a vanishing update
/// when a cut is too shallow to reliably tighten an integer lattice.
#[derive(Clone, Debug)]
pub struct EllCalc {
    /// Whether parallel cuts are handled; when `false`, every parallel
    /// dispatcher path degrades to the corresponding single-cut path.
    pub use_parallel_cut: bool,

    n_f: f64,
    half_n: f64,
    cst0: f64,
    cst1: f64,
    cst2: f64,
    cst3: f64,
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPLEMENTATIONS, FUNCTIONS, AND MACROS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

const NO_SOLN: CalcReturn = (CutStatus::NoSoln, 0.0, 0.0, 0.0);
const NO_EFFECT: CalcReturn = (CutStatus::NoEffect, 0.0, 0.0, 0.0);

impl EllCalc {
    /// Pre-compute the dimension constants for an $n$-dimensional space.
    #[must_use]
    pub fn new(n: usize) -> Self {
        let n_f = n as f64;
        let cst0 = 1.0 / (n_f + 1.0);

        Self {
            use_parallel_cut: true,
            n_f,
            half_n: n_f / 2.0,
            cst0,
            cst1: n_f * n_f / (n_f * n_f - 1.0),
            cst2: 2.0 * cst0,
            cst3: n_f * cst0,
        }
    }

    /// Single deep cut or parallel cut, dispatched on the offset shape.
    #[must_use]
    pub fn calc_single_or_ll(&self, beta: &CutChoice, tsq: f64) -> CalcReturn {
        match *beta {
            CutChoice::Single(b) => self.calc_dc(b, tsq),
            CutChoice::Parallel(b0, _) if !self.use_parallel_cut => self.calc_dc(b0, tsq),
            CutChoice::Parallel(b0, b1) => self.calc_ll(b0, b1, tsq),
        }
    }

    /// Single central cut or parallel cut, dispatched on the offset shape.
    #[must_use]
    pub fn calc_single_or_ll_cc(&self, beta: &CutChoice, tsq: f64) -> CalcReturn {
        match *beta {
            CutChoice::Parallel(_, b1) if self.use_parallel_cut => self.calc_ll_cc(b1, tsq),
            _ => self.calc_cc(tsq),
        }
    }

    /// Single deep cut or parallel cut, discrete flavor.
    #[must_use]
    pub fn calc_single_or_ll_q(&self, beta: &CutChoice, tsq: f64) -> CalcReturn {
        match *beta {
            CutChoice::Single(b) => self.calc_dc_q(b, tsq),
            CutChoice::Parallel(b0, _) if !self.use_parallel_cut => self.calc_dc_q(b0, tsq),
            CutChoice::Parallel(b0, b1) => self.calc_ll_q(b0, b1, tsq),
        }
    }

    //
    //             ⎛                      ╱     ╱    ⎞
    //            -τ                0    β0    β1    +τ
    //             ⎝                    ╱     ╱      ⎠
    //
    /// Parallel deep cut $(\beta_0, \beta_1)$.
    #[must_use]
    pub fn calc_ll(&self, b0: f64, b1: f64, tsq: f64) -> CalcReturn {
        if b1 < b0 {
            return NO_SOLN;
        }
        let b1sq = b1 * b1;
        if b1 > 0.0 && tsq < b1sq {
            // outer hyperplane outside the ellipsoid; only the inner one bites
            return self.calc_dc(b0, tsq);
        }
        self.calc_ll_core(b0, b1, b1sq, b0 * b1, tsq)
    }

    //                  2    2
    //            ζ  = τ  - β
    //             0         0
    //
    //                  2    2
    //            ζ  = τ  - β
    //             1         1
    //                       __________________________
    //                      ╱                         2
    //                     ╱           ⎛    ⎛ 2    2⎞⎞
    //                    ╱            ⎜n ⋅ ⎜β  - β ⎟⎟
    //                   ╱             ⎜    ⎝ 1    0⎠⎟
    //            ξ =   ╱    ζ  ⋅ ζ  + ⎜─────────────⎟
    //                ╲╱      0    1   ⎝      2      ⎠
    //
    //                            ⎛ 2              ⎞
    //                        2 ⋅ ⎜τ  + β  ⋅ β  - ξ⎟
    //                  n         ⎝      0    1    ⎠
    //            σ = ───── + ──────────────────────
    //                n + 1                       2
    //                         (n + 1) ⋅ ⎛β  + β ⎞
    //                                   ⎝ 0    1⎠
    //
    //                σ ⋅ ⎛β  + β ⎞
    //                    ⎝ 0    1⎠
    //            ϱ = ─────────────
    //                      2
    //
    //                     ⎛ζ  + ζ     ⎞
    //                 2   ⎜ 0    1   ξ⎟
    //                n  ⋅ ⎜─────── + ─⎟
    //                     ⎝   2      n⎠
    //            δ = ──────────────────
    //                   ⎛ 2    ⎞    2
    //                   ⎝n  - 1⎠ ⋅ τ
    //
    fn calc_ll_core(&self, b0: f64, b1: f64, b1sq: f64, b0b1: f64, tsq: f64) -> CalcReturn {
        let b0sq = b0 * b0;
        let t0 = tsq - b0sq;
        let t1 = tsq - b1sq;
        let xi = (t0 * t1 + (self.half_n * (b1sq - b0sq)).powi(2)).sqrt();
        let bsumsq = b0sq + 2.0 * b0b1 + b1sq;
        let sigma = self.cst3 + self.cst2 * (tsq + b0b1 - xi) / bsumsq;
        let rho = sigma * (b0 + b1) / 2.0;
        let delta = self.cst1 * ((t0 + t1) / 2.0 + xi / self.n_f) / tsq;
        (CutStatus::Success, rho, sigma, delta)
    }

    //                        __________________________
    //                       ╱                         2
    //                      ╱                  ⎛     2⎞
    //                     ╱                   ⎜n ⋅ β ⎟
    //                    ╱   ⎛ 2    2⎞    2   ⎜     1⎟
    //             ξ =   ╱    ⎜τ  - β ⎟ ⋅ τ  + ⎜──────⎟
    //                 ╲╱     ⎝      1⎠        ⎝   2  ⎠
    //
    //                             ⎛ 2    ⎞
    //                   n     2 ⋅ ⎝τ  - ξ⎠
    //             σ = ───── + ────────────
    //                 n + 1              2
    //                         (n + 1) ⋅ β
    //                                    1
    //
    //                 σ ⋅ β
    //                      1
    //             ϱ = ──────
    //                    2
    //
    //                      ⎛      2    ⎞
    //                      ⎜     β     ⎟
    //                  2   ⎜ 2    1   ξ⎟
    //                 n  ⋅ ⎜τ  - ── + ─⎟
    //                      ⎝      2   n⎠
    //             δ = ──────────────────
    //                    ⎛ 2    ⎞    2
    //                    ⎝n  - 1⎠ ⋅ τ
    //
    /// Parallel central cut $(0, \beta_1)$.
    #[must_use]
    pub fn calc_ll_cc(&self, b1: f64, tsq: f64) -> CalcReturn {
        if b1 < 0.0 {
            return NO_SOLN;
        }
        let b1sq = b1 * b1;
        if tsq < b1sq || !self.use_parallel_cut {
            return self.calc_cc(tsq);
        }
        let a1sq = b1sq / tsq;
        let xi = (1.0 - a1sq + (self.half_n * a1sq).powi(2)).sqrt();
        let sigma = self.cst3 + self.cst2 * (1.0 - xi) / a1sq;
        let rho = sigma * b1 / 2.0;
        let delta = self.cst1 * (1.0 - a1sq / 2.0 + xi / self.n_f);
        (CutStatus::Success, rho, sigma, delta)
    }

    //             γ = τ + n ⋅ β
    //
    //                   γ
    //             ϱ = ─────
    //                 n + 1
    //
    //                 2 ⋅ ϱ
    //             σ = ─────
    //                 τ + β
    //
    //                  2   ⎛ 2    2⎞
    //                 n  ⋅ ⎝τ  - β ⎠
    //             δ = ──────────────
    //                  ⎛ 2    ⎞    2
    //                  ⎝n  - 1⎠ ⋅ τ
    //
    /// Single deep cut with offset $\beta \geq 0$.
    #[must_use]
    pub fn calc_dc(&self, beta: f64, tsq: f64) -> CalcReturn {
        debug_assert!(beta >= 0.0);
        let bsq = beta * beta;
        if tsq < bsq {
            return NO_SOLN;
        }
        let tau = tsq.sqrt();
        self.calc_dc_core(beta, tau, tau + self.n_f * beta)
    }

    fn calc_dc_core(&self, beta: f64, tau: f64, gamma: f64) -> CalcReturn {
        let rho = self.cst0 * gamma;
        let sigma = self.cst2 * gamma / (tau + beta);
        let delta = self.cst1 * (1.0 - (beta / tau).powi(2));
        (CutStatus::Success, rho, sigma, delta)
    }

    //                  2
    //            σ = ─────
    //                n + 1
    //
    //                  τ
    //            ϱ = ─────
    //                n + 1
    //
    //                   2
    //                  n
    //            δ = ──────
    //                 2
    //                n  - 1
    //
    /// Central cut ($\beta = 0$).
    #[must_use]
    pub fn calc_cc(&self, tsq: f64) -> CalcReturn {
        (CutStatus::Success, self.cst0 * tsq.sqrt(), self.cst2, self.cst1)
    }

    /// Parallel deep cut, discrete flavor.
    ///
    /// Additionally reports [`CutStatus::NoEffect`] when
    /// $n \cdot \beta_0 \beta_1 < -\tau^2$, i.e. the slab straddles the
    /// center too widely to tighten a lattice.
    #[must_use]
    pub fn calc_ll_q(&self, b0: f64, b1: f64, tsq: f64) -> CalcReturn {
        if b1 < b0 {
            return NO_SOLN;
        }
        let b1sq = b1 * b1;
        if b1 > 0.0 && tsq < b1sq {
            return self.calc_dc_q(b0, tsq);
        }
        let b0b1 = b0 * b1;
        if self.n_f * b0b1 < -tsq {
            return NO_EFFECT;
        }
        // TODO: reject b0 + b1 == 0 here before calc_ll_core divides by it
        self.calc_ll_core(b0, b1, b1sq, b0b1, tsq)
    }

    /// Single deep cut, discrete flavor.
    ///
    /// Accepts negative offsets (shadow cuts): $\tau < \beta$ is
    /// [`CutStatus::NoSoln`], while $\gamma = \tau + n \beta \leq 0$ is
    /// [`CutStatus::NoEffect`].
    #[must_use]
    pub fn calc_dc_q(&self, beta: f64, tsq: f64) -> CalcReturn {
        let tau = tsq.sqrt();
        if tau < beta {
            return NO_SOLN;
        }
        let gamma = tau + self.n_f * beta;
        if gamma <= 0.0 {
            return NO_EFFECT;
        }
        self.calc_dc_core(beta, tau, gamma)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_ell_calc {
    use super::*;
    use EllKit_utils::{assert_approx_equal, ELLKIT_EPSILON};

    #[test]
    fn test_constants() {
        let calc = EllCalc::new(4);
        assert!(calc.use_parallel_cut);
        assert_eq!(calc.n_f, 4.0);
        assert_eq!(calc.half_n, 2.0);
        assert_eq!(calc.cst0, 0.2);
        assert_approx_equal!(calc.cst1, 16.0 / 15.0, ELLKIT_EPSILON);
        assert_eq!(calc.cst2, 0.4);
        assert_eq!(calc.cst3, 0.8);
    }

    #[test]
    fn test_deep_cut() {
        let calc = EllCalc::new(3);

        let (status, rho, sigma, delta) = calc.calc_dc(1.0, 4.0);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(rho, 1.25, ELLKIT_EPSILON);
        assert_approx_equal!(sigma, 0.833_333_333_333_333_4, ELLKIT_EPSILON);
        assert_approx_equal!(delta, 0.84375, ELLKIT_EPSILON);

        // beyond the ellipsoid: no solution
        let (status, rho, sigma, delta) = calc.calc_dc(1.5, 2.0);
        assert_eq!(status, CutStatus::NoSoln);
        assert_eq!((rho, sigma, delta), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_central_cut() {
        let calc = EllCalc::new(3);

        let (status, rho, sigma, delta) = calc.calc_cc(4.0);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(rho, 0.5, ELLKIT_EPSILON);
        assert_approx_equal!(sigma, 0.5, ELLKIT_EPSILON);
        assert_approx_equal!(delta, 1.125, ELLKIT_EPSILON);
    }

    // The central cut is the beta -> 0 limit of the deep cut.
    #[test]
    fn test_deep_cut_central_limit() {
        let calc = EllCalc::new(3);

        let (status, rho, sigma, delta) = calc.calc_dc(0.0, 4.0);
        let (status_cc, rho_cc, sigma_cc, delta_cc) = calc.calc_cc(4.0);
        assert_eq!(status, status_cc);
        assert_approx_equal!(rho, rho_cc, ELLKIT_EPSILON);
        assert_approx_equal!(sigma, sigma_cc, ELLKIT_EPSILON);
        assert_approx_equal!(delta, delta_cc, ELLKIT_EPSILON);
    }

    #[test]
    fn test_parallel_central_cut() {
        let calc = EllCalc::new(4);

        let (status, rho, sigma, delta) = calc.calc_ll_cc(0.11, 0.01);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(rho, 0.02, ELLKIT_EPSILON);
        assert_approx_equal!(sigma, 0.4, ELLKIT_EPSILON);
        assert_approx_equal!(delta, 1.066_666_666_666_666_7, ELLKIT_EPSILON);

        let (status, _, _, _) = calc.calc_ll_cc(-1.0, 0.01);
        assert_eq!(status, CutStatus::NoSoln);
    }

    // A zero-width slab flattens the ellipsoid along g (sigma = 1); at the
    // beta = tau boundary it coincides with the single deep cut.
    #[test]
    fn test_parallel_cut_degenerate_pair() {
        let calc = EllCalc::new(3);

        let (status, _, sigma, _) = calc.calc_ll(1.0, 1.0, 4.0);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(sigma, 1.0, 1e-12);

        let (status, rho, sigma, delta) = calc.calc_ll(2.0, 2.0, 4.0);
        let (status_dc, rho_dc, sigma_dc, delta_dc) = calc.calc_dc(2.0, 4.0);
        assert_eq!(status, status_dc);
        assert_approx_equal!(rho, rho_dc, 1e-12);
        assert_approx_equal!(sigma, sigma_dc, 1e-12);
        assert_approx_equal!(delta, delta_dc, 1e-12);
    }

    #[test]
    fn test_parallel_cut_ordering() {
        let calc = EllCalc::new(3);
        let (status, _, _, _) = calc.calc_ll(1.0, 0.5, 4.0);
        assert_eq!(status, CutStatus::NoSoln);
    }

    // Outer hyperplane outside the ellipsoid falls back to the single cut.
    #[test]
    fn test_parallel_cut_outer_fallback() {
        let calc = EllCalc::new(3);

        let (status, rho, sigma, delta) = calc.calc_ll(1.0, 3.0, 4.0);
        let (status_dc, rho_dc, sigma_dc, delta_dc) = calc.calc_dc(1.0, 4.0);
        assert_eq!(status, status_dc);
        assert_eq!((rho, sigma, delta), (rho_dc, sigma_dc, delta_dc));
    }

    #[test]
    fn test_deep_cut_q() {
        let calc = EllCalc::new(3);

        let (status, rho, sigma, delta) = calc.calc_dc_q(0.0, 4.0);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(rho, 0.5, ELLKIT_EPSILON);
        assert_approx_equal!(sigma, 0.5, ELLKIT_EPSILON);
        assert_approx_equal!(delta, 1.125, ELLKIT_EPSILON);

        let (status, _, _, _) = calc.calc_dc_q(1.5, 2.0);
        assert_eq!(status, CutStatus::NoSoln);

        // shadow cut too deep on the far side: no effect
        let (status, _, _, _) = calc.calc_dc_q(-1.5, 4.0);
        assert_eq!(status, CutStatus::NoEffect);
    }

    // Where both succeed, the discrete deep cut equals the continuous one.
    #[test]
    fn test_deep_cut_q_matches_continuous() {
        let calc = EllCalc::new(3);
        let (status, rho, sigma, delta) = calc.calc_dc_q(1.0, 4.0);
        let (status_dc, rho_dc, sigma_dc, delta_dc) = calc.calc_dc(1.0, 4.0);
        assert_eq!(status, status_dc);
        assert_eq!((rho, sigma, delta), (rho_dc, sigma_dc, delta_dc));
    }

    #[test]
    fn test_parallel_cut_q() {
        let calc = EllCalc::new(4);

        let (status, _, _, _) = calc.calc_ll_q(0.07, 0.03, 0.01);
        assert_eq!(status, CutStatus::NoSoln);

        let (status, rho, sigma, delta) = calc.calc_ll_q(0.0, 0.05, 0.01);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(sigma, 0.8, 1e-12);
        assert_approx_equal!(rho, 0.02, 1e-12);
        assert_approx_equal!(delta, 1.2, 1e-12);

        let (status, rho, sigma, delta) = calc.calc_ll_q(0.05, 0.11, 0.01);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(sigma, 0.8, 1e-12);
        assert_approx_equal!(rho, 0.06, 1e-12);
        assert_approx_equal!(delta, 0.8, 1e-12);

        let (status, rho, sigma, delta) = calc.calc_ll_q(0.01, 0.04, 0.01);
        assert_eq!(status, CutStatus::Success);
        assert_approx_equal!(sigma, 0.928, 1e-12);
        assert_approx_equal!(rho, 0.0232, 1e-12);
        assert_approx_equal!(delta, 1.232, 1e-12);

        // slab straddling the center too widely: no effect
        let (status, _, _, _) = calc.calc_ll_q(-0.5, 0.5, 0.25);
        assert_eq!(status, CutStatus::NoEffect);
    }

    #[test]
    fn test_dispatchers() {
        let calc = EllCalc::new(3);

        let single = calc.calc_single_or_ll(&CutChoice::Single(1.0), 4.0);
        assert_eq!(single, calc.calc_dc(1.0, 4.0));

        let pair = calc.calc_single_or_ll(&CutChoice::Parallel(0.5, 1.0), 4.0);
        assert_eq!(pair, calc.calc_ll(0.5, 1.0, 4.0));

        let central = calc.calc_single_or_ll_cc(&CutChoice::Single(1.0), 4.0);
        assert_eq!(central, calc.calc_cc(4.0));

        let pair_cc = calc.calc_single_or_ll_cc(&CutChoice::Parallel(0.0, 1.0), 4.0);
        assert_eq!(pair_cc, calc.calc_ll_cc(1.0, 4.0));

        let discrete = calc.calc_single_or_ll_q(&CutChoice::Parallel(0.5, 1.0), 4.0);
        assert_eq!(discrete, calc.calc_ll_q(0.5, 1.0, 4.0));
    }

    // Disabling parallel cuts must route every pair to the single-cut path.
    #[test]
    fn test_parallel_cut_disabled() {
        let mut calc = EllCalc::new(3);
        calc.use_parallel_cut = false;

        let pair = calc.calc_single_or_ll(&CutChoice::Parallel(0.5, 1.0), 4.0);
        assert_eq!(pair, calc.calc_dc(0.5, 4.0));

        let pair_cc = calc.calc_single_or_ll_cc(&CutChoice::Parallel(0.0, 1.0), 4.0);
        assert_eq!(pair_cc, calc.calc_cc(4.0));

        let pair_q = calc.calc_single_or_ll_q(&CutChoice::Parallel(0.5, 1.0), 4.0);
        assert_eq!(pair_q, calc.calc_dc_q(0.5, 4.0));

        // calc_ll_cc itself also honors the flag
        assert_eq!(calc.calc_ll_cc(1.0, 4.0), calc.calc_cc(4.0));
    }

    // delta < n^2/(n^2 - 1) for any strictly deep cut: the ellipsoid shrinks.
    #[test]
    fn test_volume_multiplier_bound() {
        let calc = EllCalc::new(3);
        for beta in [0.1, 0.5, 1.0, 1.5] {
            let (status, _, _, delta) = calc.calc_dc(beta, 4.0);
            assert_eq!(status, CutStatus::Success);
            assert!(delta > 0.0);
            assert!(delta < 9.0 / 8.0);
        }
    }
}
