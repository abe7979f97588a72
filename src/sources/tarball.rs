//! Tarball download and extraction.

use std::io::Cursor;
use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

use crate::util::hash::sha256_bytes;

/// Download a tarball into memory.
pub(super) fn download(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("failed to download tarball from {}", url))?;

    if !response.status().is_success() {
        bail!(
            "failed to download tarball from {}: HTTP {}",
            url,
            response.status()
        );
    }

    let bytes = response
        .bytes()
        .with_context(|| "failed to read tarball response body")?;

    tracing::debug!("Downloaded {} bytes (sha256 {})", bytes.len(), sha256_bytes(&bytes));
    Ok(bytes.to_vec())
}

/// Extract a gzipped tarball into `dest`.
///
/// Entries with absolute paths or `..` components are rejected.
pub fn extract_tarball(data: &[u8], dest: &Path) -> Result<()> {
    let mut archive = Archive::new(GzDecoder::new(Cursor::new(data)));

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    for entry in archive.entries().context("failed to read tarball entries")? {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry.path().context("failed to get entry path")?.into_owned();

        let escapes = entry_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }

        let output_path = dest.join(&entry_path);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        entry
            .unpack(&output_path)
            .with_context(|| format!("failed to extract {}", entry_path.display()))?;
    }

    Ok(())
}
