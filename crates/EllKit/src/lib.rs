//! EllKit: A Rust library for ellipsoid-method convex optimization.
//!
//! Copyright (C) 2024-2026 <https://github.com/ellkit>
//!
//! Dual licensed under Apache 2.0 and MIT.
//!
//! See:
//! - [LICENSE-APACHE.md](https://github.com/ellkit/EllKit/blob/main/LICENSE-APACHE.md)
//! - [LICENSE-MIT.md](https://github.com/ellkit/EllKit/blob/main/LICENSE-MIT.md)
//!
//! EllKit solves convex feasibility and convex/quasi-convex optimization
//! problems, over continuous or integer variables, via the ellipsoid method
//! with cutting planes. Client code supplies a *separation oracle*; the
//! driver loops shuttle trial points and cuts between the oracle and an
//! ellipsoidal search space until a verdict is reached.
//!
//! # Installation
//!
//! In your Rust project's root directory, simply run:
//!
//! ```bash
//! cargo add EllKit
//! ```
//!
//! This will add the latest version to your project.
//!
//! If you require a specific version, add the following to your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! EllKit = "*"
//! ```
//!
//! replacing `"*"` with the version number you require, such as `"0.1.0"`.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// GLOBAL SETTINGS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

// Strictly enforce documentation.
#![forbid(missing_docs)]
//
// When writing mathematical equations in documentation, Clippy suggests to
// put backticks inside the LaTeX block. This suppresses that behavior.
#![allow(clippy::doc_markdown)]
//
// Allow snake case.
// This is because much of this library is based on mathematics, so I
// want to adhere to the standard mathematical notation.
#![allow(non_snake_case)]
//
// Strictly enforce SAFETY comments.
// There is no unsafe code currently, but for anyone to add any, it must be
// documented with a SAFETY comment.
#![forbid(clippy::undocumented_unsafe_blocks)]

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// ELLKIT MODULES
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The EllKit prelude.
pub mod prelude {
    pub use EllKit_core::*;
    pub use EllKit_ell::*;
    pub use EllKit_error::*;
    pub use EllKit_solvers::*;
    pub use EllKit_utils::*;
}

/// The `core` module: cuts, statuses, options, and capability traits.
pub mod core {
    pub use EllKit_core::*;
}

/// The `ell` module: ellipsoidal search spaces and the update kernel.
pub mod ell {
    pub use EllKit_ell::*;
}

/// The `error` module.
pub mod error {
    pub use EllKit_error::*;
}

/// The `solvers` module: cutting-plane drivers and binary search.
pub mod solvers {
    pub use EllKit_solvers::*;
}

/// The `utils` module.
#[macro_use]
pub mod utils {
    pub use EllKit_utils::*;
}
