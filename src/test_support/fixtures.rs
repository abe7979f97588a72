//! Install tree fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::layout::install_prefix;
use crate::core::platform::Platform;

/// Fixture for one installed configuration.
#[derive(Debug, Clone)]
pub struct InstallTreeFixture {
    prefix: PathBuf,
    versioned_headers: bool,
    libs: Vec<(PathBuf, String)>,
}

impl InstallTreeFixture {
    /// Fixture rooted at the key-scoped prefix under `install_root`.
    pub fn new(install_root: &Path, version: &str, modules_hash: &str, platform: &Platform) -> Self {
        InstallTreeFixture {
            prefix: install_prefix(install_root, version, modules_hash, platform),
            versioned_headers: false,
            libs: Vec::new(),
        }
    }

    /// Install headers under `include/opencv4` with the version marker.
    pub fn with_versioned_headers(mut self) -> Self {
        self.versioned_headers = true;
        self
    }

    /// Add an empty library file at `<prefix>/<subdir>/<file>`.
    pub fn with_lib(mut self, subdir: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        self.libs.push((subdir.into(), file.into()));
        self
    }

    pub fn prefix(&self) -> PathBuf {
        self.prefix.clone()
    }

    /// Write the tree to disk.
    pub fn create(&self) {
        fs::create_dir_all(self.prefix.join("include")).unwrap();

        if self.versioned_headers {
            let core = self.prefix.join("include/opencv4/opencv2/core");
            fs::create_dir_all(&core).unwrap();
            fs::write(core.join("version.hpp"), "#define CV_VERSION_MAJOR 4\n").unwrap();
        }

        for (subdir, file) in &self.libs {
            let dir = self.prefix.join(subdir);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file), "!<arch>\n").unwrap();
        }
    }
}
