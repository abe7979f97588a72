//! opencv-ci - prebuilt OpenCV for CI pipelines
//!
//! This crate computes deterministic cache keys for OpenCV build
//! configurations, drives the CMake build into a key-scoped install root,
//! and rediscovers include paths, library names and linker flags from an
//! installed tree.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for opencv-ci unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides fixtures for fake install trees.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildConfig, CacheKey, CiError, Linkage, Platform};

pub use builder::{InstallLayout, LinkPlan};
pub use util::context::GlobalContext;
