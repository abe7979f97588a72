//! opencv-ci CLI - prebuilt OpenCV for CI pipelines

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use opencv_ci::util::diagnostic;
use opencv_ci::CiError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<CiError>() {
            Some(err) => {
                diagnostic::emit(&err.to_diagnostic(), color);
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Logs go to stderr; stdout carries key=value results
    let filter = if cli.verbose {
        EnvFilter::new("opencv_ci=debug")
    } else {
        EnvFilter::new("opencv_ci=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(color)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let runner_os = cli.runner_os.as_deref();

    match cli.command {
        Commands::ReadConfig(args) => commands::read_config::execute(args),
        Commands::ComputeKey(args) => commands::compute_key::execute(args, runner_os),
        Commands::Build(args) => commands::build::execute(args, runner_os),
        Commands::ExportEnv(args) => commands::export_env::execute(args, runner_os),
        Commands::ExportRustflags(args) => commands::export_rustflags::execute(args, runner_os),
    }
}
