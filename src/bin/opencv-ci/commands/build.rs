//! `opencv-ci build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use opencv_ci::ops::{self, BuildOptions};
use opencv_ci::util::GlobalContext;
use opencv_ci::BuildConfig;

pub fn execute(args: BuildArgs, runner_os: Option<&str>) -> Result<()> {
    // Validate before touching the filesystem
    let config = BuildConfig::from_build_list(&args.opencv_version, &args.build_list, args.shared)?;
    let ctx = GlobalContext::new(args.workspace.workspace, runner_os)?;

    let opts = BuildOptions {
        source_dir: args.source_dir,
        build_type: args.build_type,
        dry_run: args.dry_run,
    };

    ops::build(&ctx, &config, args.modules_hash.trim(), &opts)
}
