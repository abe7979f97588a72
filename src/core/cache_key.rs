//! Cache key computation.
//!
//! The modules hash depends only on the canonical module set and the
//! linkage mode, so the same selection hashes identically on every
//! platform and release. The full cache key adds namespace, platform and
//! version on top of it.

use std::fmt;

use crate::core::config::BuildConfig;
use crate::core::platform::Platform;
use crate::util::hash::sha256_str;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "opencv";

/// Separates the module list from the linkage flag in the hashed string.
const LINKAGE_SEPARATOR: char = '|';

/// Identifies one build configuration on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Lowercase hex SHA-256 of the module set and linkage mode.
    pub modules_hash: String,
    /// `{namespace}-{os}-{arch}-{version}-{modules_hash}`
    pub cache_key: String,
}

impl CacheKey {
    /// Compute the key for `config` on `platform`.
    pub fn compute(config: &BuildConfig, platform: &Platform) -> Self {
        let modules_hash = modules_hash(config);
        let namespace = config.namespace().unwrap_or(DEFAULT_NAMESPACE);
        let cache_key = format!(
            "{}-{}-{}-{}-{}",
            namespace,
            platform.os.key_name(),
            platform.arch.as_str().to_lowercase(),
            config.version(),
            modules_hash
        );

        tracing::debug!("Computed cache key {}", cache_key);

        CacheKey {
            modules_hash,
            cache_key,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key)
    }
}

/// Hash of the canonical module list plus the upper-cased linkage flag.
pub fn modules_hash(config: &BuildConfig) -> String {
    let canonical = format!(
        "{}{}{}",
        config.build_list(),
        LINKAGE_SEPARATOR,
        config.linkage().as_flag().to_uppercase()
    );
    sha256_str(&canonical)
}
