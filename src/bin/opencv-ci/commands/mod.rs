//! Command implementations

pub mod build;
pub mod compute_key;
pub mod export_env;
pub mod export_rustflags;
pub mod read_config;
