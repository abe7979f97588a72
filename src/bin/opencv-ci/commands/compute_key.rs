//! `opencv-ci compute-key` command

use anyhow::Result;

use crate::cli::ComputeKeyArgs;
use opencv_ci::ops;
use opencv_ci::util::OutputSink;
use opencv_ci::{BuildConfig, Platform};

pub fn execute(args: ComputeKeyArgs, runner_os: Option<&str>) -> Result<()> {
    let platform = Platform::detect(runner_os)?;
    let config = BuildConfig::from_build_list(&args.opencv_version, &args.build_list, args.shared)?
        .with_namespace(args.cache_namespace.as_deref());

    let outputs = ops::compute_key(&config, &platform);
    OutputSink::new(args.output.github_output).write(&outputs)
}
