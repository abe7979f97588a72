//! `opencv-ci read-config` command

use anyhow::Result;

use crate::cli::ReadConfigArgs;
use opencv_ci::ops;
use opencv_ci::util::context::resolve_workspace;
use opencv_ci::util::OutputSink;

pub fn execute(args: ReadConfigArgs) -> Result<()> {
    let path = resolve_workspace(args.workspace.workspace)?.join(&args.config);

    let outputs = ops::read_config(&path)?;
    OutputSink::new(args.output.github_output).write(&outputs)
}
