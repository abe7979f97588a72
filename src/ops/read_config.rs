//! Implementation of `opencv-ci read-config`.

use std::path::Path;

use anyhow::Result;

use crate::core::config::BuildConfig;
use crate::util::Outputs;

/// Load the declarative config and echo its normalized fields.
pub fn read_config(path: &Path) -> Result<Outputs> {
    let config = BuildConfig::load(path)?;

    Ok(vec![
        ("opencv_version", config.version().to_string()),
        ("build_list", config.build_list()),
        ("shared", config.linkage().as_flag().to_string()),
    ])
}
