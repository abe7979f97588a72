//! High-level operations, one per CLI subcommand.
//!
//! Each operation returns the `key=value` pairs it produces; writing them
//! out is left to the caller.

pub mod compute_key;
pub mod export;
pub mod opencv_build;
pub mod read_config;

pub use compute_key::compute_key;
pub use export::{export_env, export_rustflags, RustflagsSource};
pub use opencv_build::{build, BuildOptions};
pub use read_config::read_config;
