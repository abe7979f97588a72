//! Upstream OpenCV source acquisition.
//!
//! Release tarballs are fetched from GitHub and unpacked once into a source
//! root shared across builds (`~/src` by default).

mod tarball;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::util::fs::ensure_dir;

pub use tarball::extract_tarball;

/// Tarball URL for an upstream release tag.
pub fn release_url(version: &str) -> String {
    format!(
        "https://github.com/opencv/opencv/archive/refs/tags/{}.tar.gz",
        version
    )
}

/// Default directory holding extracted sources.
pub fn default_source_root() -> Result<PathBuf> {
    let dirs = BaseDirs::new().context("failed to determine home directory")?;
    Ok(dirs.home_dir().join("src"))
}

/// Directory an extracted release lives in.
pub fn source_dir(src_root: &Path, version: &str) -> PathBuf {
    src_root.join(format!("opencv-{}", version))
}

/// Return the source tree for `version`, downloading it when missing.
pub fn ensure_source(src_root: &Path, version: &str) -> Result<PathBuf> {
    let dir = source_dir(src_root, version);
    if dir.is_dir() {
        tracing::debug!("Using existing sources at {}", dir.display());
        return Ok(dir);
    }

    ensure_dir(src_root)?;
    let url = release_url(version);
    tracing::info!("Fetching OpenCV {} from {}", version, url);

    let bytes = tarball::download(&url)?;
    extract_tarball(&bytes, src_root)
        .with_context(|| format!("failed to extract tarball from {}", url))?;

    if !dir.is_dir() {
        anyhow::bail!(
            "tarball from {} did not contain opencv-{}/",
            url,
            version
        );
    }

    tracing::info!("Extracted sources to {}", dir.display());
    Ok(dir)
}
