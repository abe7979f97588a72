//! Implementation of `opencv-ci build`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::cmake::{BuildType, CMakeBuilder};
use crate::builder::layout::install_prefix;
use crate::core::cache_key::modules_hash;
use crate::core::config::{validate_modules_hash, BuildConfig};
use crate::sources::{default_source_root, ensure_source};
use crate::util::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Existing OpenCV source tree; skips downloading.
    pub source_dir: Option<PathBuf>,

    /// CMake build type
    pub build_type: BuildType,

    /// Print commands without running them
    pub dry_run: bool,
}

/// Build and install `config` under the key-scoped prefix for `hash`.
pub fn build(
    ctx: &GlobalContext,
    config: &BuildConfig,
    hash: &str,
    opts: &BuildOptions,
) -> Result<()> {
    let hash = validate_modules_hash(hash)?;
    let expected = modules_hash(config);
    if expected != hash {
        tracing::warn!(
            "modules hash {} does not match build list [{}] (expected {})",
            hash,
            config.build_list(),
            expected
        );
    }

    let source_dir = match &opts.source_dir {
        Some(dir) => ctx.resolve_path(dir),
        None => ensure_source(&default_source_root()?, config.version())?,
    };

    let prefix = install_prefix(&ctx.install_root(), config.version(), hash, ctx.platform());

    CMakeBuilder::new(
        config,
        ctx.platform(),
        source_dir,
        ctx.build_dir(),
        prefix,
    )
    .build_type(opts.build_type)
    .dry_run(opts.dry_run)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Linkage;
    use crate::core::errors::CiError;
    use crate::core::platform::{Arch, Os, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_build() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("opencv-4.9.0");
        std::fs::create_dir_all(src.join("modules/core")).unwrap();

        let ctx = GlobalContext::with_platform(tmp.path(), Platform::new(Os::Linux, Arch::X86_64));
        let config = BuildConfig::from_build_list("4.9.0", "core", Linkage::Static).unwrap();
        let opts = BuildOptions {
            source_dir: Some(src),
            dry_run: true,
            ..Default::default()
        };

        build(&ctx, &config, &modules_hash(&config), &opts).unwrap();
        assert!(!ctx.install_root().exists());
    }

    #[test]
    fn test_rejects_path_like_modules_hash() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("opencv-4.9.0");
        std::fs::create_dir_all(src.join("modules/core")).unwrap();

        let ctx = GlobalContext::with_platform(tmp.path(), Platform::new(Os::Linux, Arch::X86_64));
        let config = BuildConfig::from_build_list("4.9.0", "core", Linkage::Static).unwrap();
        let opts = BuildOptions {
            source_dir: Some(src),
            dry_run: true,
            ..Default::default()
        };

        let err = build(&ctx, &config, "../../../escaped", &opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CiError>(),
            Some(CiError::ConfigParse { .. })
        ));
    }
}
