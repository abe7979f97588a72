//! Core data types: platform identity, build configuration and cache keys.

pub mod cache_key;
pub mod config;
pub mod errors;
pub mod platform;

pub use cache_key::CacheKey;
pub use config::{BuildConfig, Linkage};
pub use errors::CiError;
pub use platform::{Arch, Os, Platform};
