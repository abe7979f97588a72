//! Global context for opencv-ci operations.
//!
//! Environment-derived settings (workspace root, runner OS) are resolved
//! once at the program boundary and carried here, so no operation reads
//! process-wide state on its own.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::platform::Platform;

/// Directory under the workspace holding every installed configuration.
pub const INSTALL_DIR_NAME: &str = ".opencv";

/// Directory under the workspace holding CMake configure trees.
pub const BUILD_DIR_NAME: &str = "build_cross";

/// Resolved invocation context.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    workspace: PathBuf,
    platform: Platform,
}

impl GlobalContext {
    /// Resolve the context.
    ///
    /// `workspace` falls back to the current directory; `runner_os` overrides
    /// the host OS when set.
    pub fn new(workspace: Option<PathBuf>, runner_os: Option<&str>) -> Result<Self> {
        let workspace = resolve_workspace(workspace)?;
        let platform = Platform::detect(runner_os)?;

        tracing::debug!(
            "Workspace {} on {}",
            workspace.display(),
            platform
        );

        Ok(GlobalContext {
            workspace,
            platform,
        })
    }

    /// Create a context with an explicit platform.
    pub fn with_platform(workspace: impl Into<PathBuf>, platform: Platform) -> Self {
        GlobalContext {
            workspace: workspace.into(),
            platform,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Root of all key-scoped install trees: `<workspace>/.opencv`.
    pub fn install_root(&self) -> PathBuf {
        self.workspace.join(INSTALL_DIR_NAME)
    }

    /// CMake configure scratch directory for this platform.
    pub fn build_dir(&self) -> PathBuf {
        self.workspace
            .join(BUILD_DIR_NAME)
            .join("out")
            .join(self.platform.os.as_str())
            .join(self.platform.arch.as_str())
    }

    /// Resolve a possibly relative path against the workspace.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

/// The explicit workspace, or the current directory when unset or empty.
pub fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(ws) if !ws.as_os_str().is_empty() => Ok(ws),
        _ => std::env::current_dir().context("failed to get current directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, Os};

    #[test]
    fn test_paths() {
        let ctx = GlobalContext::with_platform(
            "/ws",
            Platform::new(Os::Linux, Arch::X86_64),
        );
        assert_eq!(ctx.install_root(), PathBuf::from("/ws/.opencv"));
        assert_eq!(
            ctx.build_dir(),
            PathBuf::from("/ws/build_cross/out/Linux/x86_64")
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let ctx = GlobalContext::with_platform(
            "/ws",
            Platform::new(Os::Linux, Arch::X86_64),
        );
        assert_eq!(
            ctx.resolve_path(Path::new(".github/opencv-config.json")),
            PathBuf::from("/ws/.github/opencv-config.json")
        );
    }

    #[test]
    fn test_workspace_defaults_to_cwd() {
        let ctx = GlobalContext::new(None, Some("Linux")).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(ctx.install_root(), cwd.join(INSTALL_DIR_NAME));
        assert_eq!(resolve_workspace(Some(PathBuf::new())).unwrap(), cwd);
        assert_eq!(ctx.platform().os, Os::Linux);
    }

    #[test]
    fn test_unsupported_runner_os() {
        let err = GlobalContext::new(Some(PathBuf::from("/ws")), Some("Haiku")).unwrap_err();
        assert!(err.to_string().contains("unsupported platform"));
    }
}
