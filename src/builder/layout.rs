//! Install layout discovery.
//!
//! The CMake install step lays out headers and libraries differently per
//! toolset: MSVC builds nest libraries under `x64/vc<N>/{lib,staticlib}`,
//! MinGW under `x64/mingw/lib`, and single-config Unix builds use plain
//! `lib`. Headers land in `include/opencv4` on Unix and directly in
//! `include` on Windows. The resolver probes these shapes in a fixed
//! priority order under the key-scoped prefix.

use std::path::{Path, PathBuf};

use crate::core::errors::CiError;
use crate::core::platform::{Os, Platform};

/// Versioned include subdirectory used by Unix installs.
pub const INCLUDE_SUBDIR: &str = "opencv4";

/// Header whose presence confirms an include root.
const HEADER_MARKER: [&str; 3] = ["opencv2", "core", "version.hpp"];

/// MSVC toolset folders, newest first.
const MSVC_TOOLSETS: [&str; 3] = ["vc17", "vc16", "vc15"];

/// A discovered on-disk install shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// `<install_root>/<version>/<modules_hash>/<Os>/<arch>`
    pub prefix: PathBuf,
    pub include_path: PathBuf,
    pub lib_path: PathBuf,
}

impl InstallLayout {
    /// Resolve the layout of one installed configuration.
    ///
    /// Fails only when the prefix itself does not exist. When no library
    /// candidate exists the highest-priority one is returned anyway, so the
    /// linker later reports a concrete missing path.
    pub fn resolve(
        install_root: &Path,
        version: &str,
        modules_hash: &str,
        platform: &Platform,
    ) -> Result<Self, CiError> {
        let prefix = install_prefix(install_root, version, modules_hash, platform);
        if !prefix.is_dir() {
            return Err(CiError::LayoutNotFound { prefix });
        }
        Ok(InstallLayout::from_prefix(prefix, platform.os))
    }

    /// Probe an existing prefix.
    pub fn from_prefix(prefix: PathBuf, os: Os) -> Self {
        let include_path = resolve_include_path(&prefix);
        let lib_path = first_existing(&lib_candidates(&prefix, os));

        tracing::debug!(
            "Resolved layout: include={} lib={}",
            include_path.display(),
            lib_path.display()
        );

        InstallLayout {
            prefix,
            include_path,
            lib_path,
        }
    }
}

/// Key-scoped install prefix for one configuration.
pub fn install_prefix(
    install_root: &Path,
    version: &str,
    modules_hash: &str,
    platform: &Platform,
) -> PathBuf {
    install_root
        .join(version)
        .join(modules_hash)
        .join(platform.os.as_str())
        .join(platform.arch.as_str())
}

/// `include/opencv4` when it holds the marker header, else `include`.
pub fn resolve_include_path(prefix: &Path) -> PathBuf {
    let include_root = prefix.join("include");
    let versioned = include_root.join(INCLUDE_SUBDIR);

    let marker = HEADER_MARKER
        .iter()
        .fold(versioned.clone(), |path, part| path.join(part));

    if marker.is_file() {
        versioned
    } else {
        include_root
    }
}

/// Library directory candidates in descending priority.
pub fn lib_candidates(prefix: &Path, os: Os) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    match os {
        Os::Windows => {
            let x64 = prefix.join("x64");
            for toolset in MSVC_TOOLSETS {
                candidates.push(x64.join(toolset).join("lib"));
                candidates.push(x64.join(toolset).join("staticlib"));
            }
        }
        Os::Darwin | Os::Linux => {}
    }

    candidates.push(prefix.join("lib"));
    candidates.push(prefix.join("staticlib"));
    candidates.push(prefix.join("x64").join("mingw").join("lib"));
    candidates
}

/// First candidate that is a directory, or the first candidate.
pub fn first_existing(candidates: &[PathBuf]) -> PathBuf {
    if let Some(found) = candidates.iter().find(|p| p.is_dir()) {
        return found.clone();
    }

    let fallback = candidates.first().cloned().unwrap_or_default();
    tracing::warn!(
        "No library directory found, assuming {}",
        fallback.display()
    );
    fallback
}
