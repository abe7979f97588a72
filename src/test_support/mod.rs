//! Test utilities for opencv-ci unit tests.
//!
//! Provides fixtures that lay out fake install trees on disk the way the
//! CMake install step would.
//!
//! # Example
//!
//! ```rust,ignore
//! use opencv_ci::test_support::InstallTreeFixture;
//!
//! let fixture = InstallTreeFixture::new(&root, "4.9.0", &hash, &platform)
//!     .with_versioned_headers()
//!     .with_lib("lib", "libopencv_core.a");
//! fixture.create();
//! ```

pub mod fixtures;

pub use fixtures::*;
