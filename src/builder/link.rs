//! Link plan generation.
//!
//! Downstream Rust builds link OpenCV statically by passing every installed
//! archive to the linker directly. Archives are discovered by walking the
//! library directory; platform rules then drop conflicting archives and add
//! the system frameworks OpenCV needs on macOS.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::libnames::extract_lib_names;
use crate::core::platform::{Os, Platform};
use crate::util::fs::find_files_with_extension;
use crate::util::process::{find_executable, ProcessBuilder};

/// Nested directory holding bundled third-party archives, preferred when present.
const THIRDPARTY_SUBDIR: [&str; 2] = ["opencv4", "3rdparty"];

/// Archives named `lib*protobuf*` are skipped on Linux.
const LIB_PREFIX: &str = "lib";
const BUNDLED_PROTOBUF_MARKER: &str = "protobuf";

/// System frameworks required on macOS.
const DARWIN_FRAMEWORKS: [&str; 3] = ["OpenCL", "Accelerate", "AppKit"];

/// Optional Homebrew library linked when available.
const AVIF_DYLIB: [&str; 2] = ["lib", "libavif.dylib"];

/// Everything a downstream build needs to link the installed libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
    pub library_names: Vec<String>,
    pub link_paths: Vec<PathBuf>,
    pub link_args: Vec<String>,
}

impl LinkPlan {
    /// Start a plan rooted at one library directory.
    pub fn new(lib_path: impl Into<PathBuf>) -> Self {
        LinkPlan {
            library_names: Vec::new(),
            link_paths: vec![lib_path.into()],
            link_args: Vec::new(),
        }
    }

    /// Add the library names for `modules`.
    pub fn with_library_names(mut self, modules: &BTreeSet<String>, platform: &Platform) -> Self {
        for lib_path in &self.link_paths {
            self.library_names
                .extend(extract_lib_names(modules, lib_path, platform));
        }
        self
    }

    /// Add linker arguments, querying Homebrew for optional libraries on macOS.
    pub fn with_link_args(self, platform: &Platform) -> Self {
        self.with_link_args_from(platform, brew_prefix)
    }

    /// Add linker arguments with a custom package-prefix query.
    pub fn with_link_args_from<F>(mut self, platform: &Platform, package_prefix: F) -> Self
    where
        F: Fn() -> Result<PathBuf>,
    {
        for lib_path in &self.link_paths {
            self.link_args
                .extend(generate_link_args(lib_path, platform, &package_prefix));
        }
        self
    }

    /// Comma-joined library names.
    pub fn link_libs(&self) -> String {
        self.library_names.join(",")
    }

    /// Comma-joined link paths.
    pub fn link_paths_joined(&self) -> String {
        self.link_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Render as a `RUSTFLAGS` value: one `-C link-arg=` per argument.
    pub fn rustflags(&self) -> String {
        self.link_args
            .iter()
            .map(|arg| format!("-C link-arg={}", arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered linker arguments for the archives under `lib_path`.
///
/// Discovered archives come first, then platform frameworks, then the
/// optional package-manager library.
pub fn generate_link_args<F>(lib_path: &Path, platform: &Platform, package_prefix: F) -> Vec<String>
where
    F: Fn() -> Result<PathBuf>,
{
    let search_dir = archive_search_dir(lib_path);
    tracing::debug!("Searching {} for static archives", search_dir.display());

    let ext = platform.os.static_lib_extension();
    let mut args: Vec<String> = find_files_with_extension(&search_dir, ext)
        .into_iter()
        .filter(|path| !is_excluded(path, platform.os))
        .map(|path| path.display().to_string())
        .collect();

    match platform.os {
        Os::Darwin => {
            for framework in DARWIN_FRAMEWORKS {
                args.push("-framework".to_string());
                args.push(framework.to_string());
            }

            // Best effort: a missing or failing brew only omits libavif.
            if let Ok(prefix) = package_prefix() {
                let avif = AVIF_DYLIB.iter().fold(prefix, |p, part| p.join(part));
                if avif.is_file() {
                    args.push(avif.display().to_string());
                }
            }
        }
        Os::Windows | Os::Linux => {}
    }

    args
}

/// `<lib>/opencv4/3rdparty` when it exists, else `lib_path` itself.
pub fn archive_search_dir(lib_path: &Path) -> PathBuf {
    let thirdparty = THIRDPARTY_SUBDIR
        .iter()
        .fold(lib_path.to_path_buf(), |p, part| p.join(part));
    if thirdparty.is_dir() {
        thirdparty
    } else {
        lib_path.to_path_buf()
    }
}

fn is_excluded(path: &Path, os: Os) -> bool {
    match os {
        Os::Linux => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| {
                name.starts_with(LIB_PREFIX) && name.contains(BUNDLED_PROTOBUF_MARKER)
            }),
        Os::Windows | Os::Darwin => false,
    }
}

/// Ask Homebrew for its install prefix.
pub fn brew_prefix() -> Result<PathBuf> {
    let Some(brew) = find_executable("brew") else {
        bail!("brew not found in PATH");
    };

    let output = ProcessBuilder::new(brew).arg("--prefix").exec()?;
    if !output.status.success() {
        bail!("`brew --prefix` failed with exit code {:?}", output.status.code());
    }

    let prefix = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if prefix.is_empty() {
        bail!("`brew --prefix` printed nothing");
    }
    Ok(PathBuf::from(prefix))
}
