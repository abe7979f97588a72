//! Implementation of `opencv-ci export-env` and `opencv-ci export-rustflags`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::builder::layout::InstallLayout;
use crate::builder::link::LinkPlan;
use crate::core::config::{validate_modules_hash, validate_version};
use crate::util::{GlobalContext, Outputs};

/// Where `export-rustflags` finds the libraries to link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustflagsSource {
    /// An explicit library directory.
    LinkPaths(PathBuf),
    /// The installed configuration for a version and modules hash.
    Installed {
        version: String,
        modules_hash: String,
    },
}

fn resolve_layout(ctx: &GlobalContext, version: &str, hash: &str) -> Result<InstallLayout> {
    let version = validate_version(version)?;
    let hash = validate_modules_hash(hash)?;
    Ok(InstallLayout::resolve(
        &ctx.install_root(),
        version,
        hash,
        ctx.platform(),
    )?)
}

/// Export include path, library path and library names of an install.
pub fn export_env(
    ctx: &GlobalContext,
    version: &str,
    hash: &str,
    modules: &BTreeSet<String>,
) -> Result<Outputs> {
    let layout = resolve_layout(ctx, version, hash)?;
    let plan = LinkPlan::new(&layout.lib_path).with_library_names(modules, ctx.platform());

    Ok(vec![
        ("opencv_link_libs", plan.link_libs()),
        ("opencv_link_paths", plan.link_paths_joined()),
        (
            "opencv_include_paths",
            layout.include_path.display().to_string(),
        ),
    ])
}

/// Export the `RUSTFLAGS` needed to link every installed static archive.
pub fn export_rustflags(ctx: &GlobalContext, source: &RustflagsSource) -> Result<Outputs> {
    let lib_path = match source {
        RustflagsSource::LinkPaths(path) => ctx.resolve_path(path),
        RustflagsSource::Installed {
            version,
            modules_hash,
        } => resolve_layout(ctx, version, modules_hash)?.lib_path,
    };

    let plan = LinkPlan::new(&lib_path).with_link_args(ctx.platform());
    if plan.link_args.is_empty() {
        tracing::warn!("No static archives found under {}", lib_path.display());
    } else {
        tracing::info!("Linking {} argument(s) from {}", plan.link_args.len(), lib_path.display());
    }

    Ok(vec![("rustflags", plan.rustflags())])
}
