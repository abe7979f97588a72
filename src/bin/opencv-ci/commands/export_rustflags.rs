//! `opencv-ci export-rustflags` command

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::cli::ExportRustflagsArgs;
use opencv_ci::ops::{self, RustflagsSource};
use opencv_ci::util::{GlobalContext, OutputSink};

pub fn execute(args: ExportRustflagsArgs, runner_os: Option<&str>) -> Result<()> {
    let ctx = GlobalContext::new(args.workspace.workspace, runner_os)?;

    let link_paths = args
        .link_paths
        .map(|path| PathBuf::from(path.to_string_lossy().trim()))
        .filter(|path| !path.as_os_str().is_empty());

    let source = match link_paths {
        Some(path) => RustflagsSource::LinkPaths(path),
        _ => RustflagsSource::Installed {
            version: args
                .opencv_version
                .ok_or_else(|| anyhow!("--opencv-version is required without --link-paths"))?,
            modules_hash: args
                .modules_hash
                .map(|h| h.trim().to_string())
                .ok_or_else(|| anyhow!("--modules-hash is required without --link-paths"))?,
        },
    };

    let outputs = ops::export_rustflags(&ctx, &source)?;
    OutputSink::new(args.output.github_output).write(&outputs)
}
