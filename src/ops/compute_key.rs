//! Implementation of `opencv-ci compute-key`.

use crate::core::cache_key::CacheKey;
use crate::core::config::BuildConfig;
use crate::core::platform::Platform;
use crate::util::Outputs;

/// Compute `modules_hash` and `cache_key` for a configuration.
pub fn compute_key(config: &BuildConfig, platform: &Platform) -> Outputs {
    let key = CacheKey::compute(config, platform);
    tracing::info!("Cache key: {}", key);

    vec![
        ("modules_hash", key.modules_hash),
        ("cache_key", key.cache_key),
    ]
}
