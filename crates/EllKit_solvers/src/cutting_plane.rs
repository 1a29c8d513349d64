// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// EllKit: A Rust library for ellipsoid-method convex optimization.
// Copyright (C) 2024-2026 https://github.com/ellkit
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Module for the cutting-plane driver loops.
//!
//! ```text
//!  ┌────────────┐    ┌───────────┐┌──────────┐
//!  │CuttingPlane│    │SearchSpace││OracleFeas│
//!  └─────┬──────┘    └─────┬─────┘└────┬─────┘
//!        │                 │           │
//!        │   request xc    │           │
//!        │────────────────>│           │
//!        │                 │           │
//!        │    return xc    │           │
//!        │<────────────────│           │
//!        │                 │           │
//!        │       assess_feas(xc)       │
//!        │────────────────────────────>│
//!        │                 │           │
//!        │         return cut          │
//!        │<────────────────────────────│
//!        │                 │           │
//!        │update by the cut│           │
//!        │────────────────>│           │
//!  ┌─────┴──────┐    ┌─────┴─────┐┌────┴─────┐
//!  │CuttingPlane│    │SearchSpace││OracleFeas│
//!  └────────────┘    └───────────┘└──────────┘
//! ```
//!
//! All failures are in-band: the drivers collapse exhaustion (volume proxy
//! below tolerance), local infeasibility (a [`CutStatus::NoSoln`] cut), and
//! the iteration budget into `None` plus the iteration count.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use log::{debug, trace};
use num::{FromPrimitive, ToPrimitive};

use EllKit_core::{
    CutStatus, Options, OracleBS, OracleFeas, OracleFeas2, OracleFeasQ, OracleOptim, OracleOptimQ,
    SearchSpace, SearchSpace2, SearchSpaceQ,
};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS, AND TRAITS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Scalar types [`bsearch`] can probe: the interval endpoints must
/// round-trip through `f64`. Integer intervals keep their type, so a binary
/// search over integers returns an integer.
pub trait BsearchNumeric: Copy + PartialOrd + ToPrimitive + FromPrimitive {}

impl<T> BsearchNumeric for T where T: Copy + PartialOrd + ToPrimitive + FromPrimitive {}

/// Adaptor turning a parameterized feasibility oracle into the monotone
/// predicate consumed by [`bsearch`].
///
/// Each probe runs [`cutting_plane_feas`] on a deep copy of the search
/// space, so a failed probe never perturbs the outer state; a feasible
/// probe writes the found point back through
/// [`SearchSpace2::set_xc`].
pub struct BSearchAdaptor<Omega, Space>
where
    Space: SearchSpace2 + Clone,
    Omega: OracleFeas2<Space::ArrayType>,
{
    omega: Omega,
    space: Space,
    options: Options,
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPLEMENTATIONS, FUNCTIONS, AND MACROS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Find a point in a convex set described by a separation oracle.
///
/// The oracle either certifies that the current center is feasible or
/// returns a cut separating it from the feasible region; the search space
/// shrinks by that cut until a feasible center appears, the space is
/// exhausted, or the budget runs out.
///
/// Returns the feasible point (or `None`) and the number of iterations
/// performed.
pub fn cutting_plane_feas<Omega, Space>(
    omega: &mut Omega,
    space: &mut Space,
    options: &Options,
) -> (Option<Space::ArrayType>, usize)
where
    Space: SearchSpace,
    Omega: OracleFeas<Space::ArrayType>,
{
    for niter in 0..options.max_iters {
        let cut = match omega.assess_feas(&space.xc()) {
            Some(cut) => cut,
            None => {
                debug!("feasible point found after {} iterations", niter);
                return (Some(space.xc()), niter);
            }
        };
        let status = space.update_dc(&cut);
        trace!("feas iteration {}: {:?}, tsq = {:e}", niter, status, space.tsq());
        if status != CutStatus::Success || space.tsq() < options.tolerance {
            debug!("no feasible point: {:?} after {} iterations", status, niter);
            return (None, niter);
        }
    }
    (None, options.max_iters)
}

/// Solve a convex optimization problem described by a separation oracle.
///
/// `gamma` is the initial best-so-far value. When the oracle reports a
/// strictly better incumbent, the new cut passes through the current center
/// and a central-cut update applies; otherwise a deep cut applies.
///
/// Returns the best point found (or `None`), the final best-so-far value,
/// and the number of iterations performed. The value is meaningful even
/// when the loop terminates on budget.
pub fn cutting_plane_optim<Omega, Space>(
    omega: &mut Omega,
    space: &mut Space,
    mut gamma: f64,
    options: &Options,
) -> (Option<Space::ArrayType>, f64, usize)
where
    Space: SearchSpace,
    Omega: OracleOptim<Space::ArrayType>,
{
    let mut x_best = None;
    for niter in 0..options.max_iters {
        let (cut, gamma1) = omega.assess_optim(&space.xc(), gamma);
        let status = if let Some(better) = gamma1 {
            // better incumbent: the cut passes through the center
            gamma = better;
            x_best = Some(space.xc());
            space.update_cc(&cut)
        } else {
            space.update_dc(&cut)
        };
        trace!(
            "optim iteration {}: {:?}, gamma = {}, tsq = {:e}",
            niter,
            status,
            gamma,
            space.tsq()
        );
        if status != CutStatus::Success || space.tsq() < options.tolerance {
            debug!("optim terminated: {:?} after {} iterations", status, niter);
            return (x_best, gamma, niter);
        }
    }
    (x_best, gamma, options.max_iters)
}

/// Find a lattice point in a convex set described by a discrete separation
/// oracle.
///
/// The oracle rounds the center to a lattice candidate internally; when an
/// update reports [`CutStatus::NoEffect`] and the oracle has alternative
/// cuts at the same center (`more_alt`), the driver loops with
/// `retry = true` without advancing.
pub fn cutting_plane_feas_q<Omega, Space>(
    omega: &mut Omega,
    space_q: &mut Space,
    options: &Options,
) -> (Option<Space::ArrayType>, usize)
where
    Space: SearchSpaceQ,
    Omega: OracleFeasQ<Space::ArrayType>,
{
    let mut retry = false;
    for niter in 0..options.max_iters {
        let (cut, x_q, more_alt) = omega.assess_feas_q(&space_q.xc(), retry);
        let cut = match cut {
            Some(cut) => cut,
            None => {
                debug!("feasible lattice point found after {} iterations", niter);
                return (x_q, niter);
            }
        };
        match space_q.update_q(&cut) {
            CutStatus::Success => retry = false,
            CutStatus::NoSoln => return (None, niter),
            CutStatus::NoEffect => {
                if !more_alt {
                    // no more alternative cut
                    return (None, niter);
                }
                retry = true;
            }
        }
        if space_q.tsq() < options.tolerance {
            return (None, niter);
        }
    }
    (None, options.max_iters)
}

/// Solve a convex discrete optimization problem described by a separation
/// oracle.
///
/// Unlike [`cutting_plane_optim`], every cut goes through the discrete
/// update, improvement or not; the best point reported is the oracle's
/// rounded candidate.
pub fn cutting_plane_optim_q<Omega, Space>(
    omega: &mut Omega,
    space_q: &mut Space,
    mut gamma: f64,
    options: &Options,
) -> (Option<Space::ArrayType>, f64, usize)
where
    Space: SearchSpaceQ,
    Omega: OracleOptimQ<Space::ArrayType>,
{
    let mut x_best = None;
    let mut retry = false;
    for niter in 0..options.max_iters {
        let (cut, x_q, gamma1, more_alt) = omega.assess_optim_q(&space_q.xc(), gamma, retry);
        if let Some(better) = gamma1 {
            gamma = better;
            x_best = Some(x_q);
        }
        match space_q.update_q(&cut) {
            CutStatus::Success => retry = false,
            CutStatus::NoSoln => return (x_best, gamma, niter),
            CutStatus::NoEffect => {
                if !more_alt {
                    return (x_best, gamma, niter);
                }
                retry = true;
            }
        }
        if space_q.tsq() < options.tolerance {
            return (x_best, gamma, niter);
        }
    }
    (x_best, gamma, options.max_iters)
}

/// Classical binary search on a monotone predicate over `[lower, upper]`.
///
/// The midpoint is computed in `f64` and converted back to the interval's
/// scalar type before querying the oracle, so integer intervals are probed
/// at integer points. Terminates when the half-width drops below
/// `options.tolerance`.
pub fn bsearch<T, Omega>(omega: &mut Omega, intrvl: (T, T), options: &Options) -> (T, usize)
where
    T: BsearchNumeric,
    Omega: OracleBS<T>,
{
    // assume the predicate is monotone over the interval
    let (mut lower, mut upper) = intrvl;
    for niter in 0..options.max_iters {
        let lower_f = lower.to_f64().expect("interval endpoint must be finite");
        let upper_f = upper.to_f64().expect("interval endpoint must be finite");
        let tau = (upper_f - lower_f) / 2.0;
        if tau < options.tolerance {
            return (upper, niter);
        }
        let gamma = T::from_f64(lower_f + tau).expect("midpoint must fit the interval type");
        trace!("bsearch iteration {}: half-width = {:e}", niter, tau);
        if omega.assess_bs(gamma) {
            upper = gamma; // feasible sol'n obtained
        } else {
            lower = gamma;
        }
    }
    (upper, options.max_iters)
}

impl<Omega, Space> BSearchAdaptor<Omega, Space>
where
    Space: SearchSpace2 + Clone,
    Omega: OracleFeas2<Space::ArrayType>,
{
    /// Create an adaptor around a parameterized oracle and the search space
    /// holding the best point found so far.
    pub fn new(omega: Omega, space: Space, options: Options) -> Self {
        Self {
            omega,
            space,
            options,
        }
    }

    /// The best point found by the feasible probes so far.
    pub fn x_best(&self) -> Space::ArrayType {
        self.space.xc()
    }
}

impl<Omega, Space> OracleBS<f64> for BSearchAdaptor<Omega, Space>
where
    Space: SearchSpace2 + Clone,
    Omega: OracleFeas2<Space::ArrayType>,
{
    fn assess_bs(&mut self, gamma: f64) -> bool {
        // probe on a deep copy; a failed probe must not perturb the outer state
        let mut space = self.space.clone();
        self.omega.update(gamma);
        let (x_feas, _) = cutting_plane_feas(&mut self.omega, &mut space, &self.options);
        if let Some(x_feas) = x_feas {
            self.space.set_xc(x_feas);
            return true;
        }
        false
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
