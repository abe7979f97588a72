//! `opencv-ci export-env` command

use anyhow::Result;

use crate::cli::ExportEnvArgs;
use opencv_ci::core::config::parse_build_list;
use opencv_ci::ops;
use opencv_ci::util::{GlobalContext, OutputSink};

pub fn execute(args: ExportEnvArgs, runner_os: Option<&str>) -> Result<()> {
    let modules = parse_build_list(&args.build_list)?;
    let ctx = GlobalContext::new(args.workspace.workspace, runner_os)?;

    let outputs = ops::export_env(
        &ctx,
        &args.opencv_version,
        args.modules_hash.trim(),
        &modules,
    )?;
    OutputSink::new(args.output.github_output).write(&outputs)
}
