//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use opencv_ci::builder::BuildType;
use opencv_ci::core::config::DEFAULT_CONFIG_PATH;
use opencv_ci::Linkage;

/// opencv-ci - cache keys, builds and link flags for prebuilt OpenCV
#[derive(Parser)]
#[command(name = "opencv-ci")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Operating system to target instead of the host (Linux, macOS, Windows)
    #[arg(long, global = true, env = "RUNNER_OS")]
    pub runner_os: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the declarative OpenCV build config
    ReadConfig(ReadConfigArgs),

    /// Compute the modules hash and cache key
    ComputeKey(ComputeKeyArgs),

    /// Build and install OpenCV into the key-scoped prefix
    Build(BuildArgs),

    /// Export include path, library path and library names
    ExportEnv(ExportEnvArgs),

    /// Export RUSTFLAGS linking every installed static archive
    ExportRustflags(ExportRustflagsArgs),
}

/// Where `key=value` results go.
#[derive(Args)]
pub struct OutputArgs {
    /// File to append results to (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,
}

/// Workspace root holding `.opencv/`.
#[derive(Args)]
pub struct WorkspaceArgs {
    /// Workspace root (defaults to the current directory)
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReadConfigArgs {
    /// Path to the config file, relative to the workspace
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ComputeKeyArgs {
    /// Cache key namespace (defaults to "opencv")
    #[arg(long)]
    pub cache_namespace: Option<String>,

    /// Comma-separated OpenCV modules
    #[arg(long)]
    pub build_list: String,

    /// OpenCV release tag
    #[arg(long)]
    pub opencv_version: String,

    /// Build shared libraries (ON/OFF)
    #[arg(long, default_value = "OFF")]
    pub shared: Linkage,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct BuildArgs {
    /// OpenCV release tag
    #[arg(long)]
    pub opencv_version: String,

    /// Comma-separated OpenCV modules
    #[arg(long)]
    pub build_list: String,

    /// Modules hash from `compute-key`
    #[arg(long)]
    pub modules_hash: String,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Build shared libraries (ON/OFF)
    #[arg(long, default_value = "OFF")]
    pub shared: Linkage,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long, default_value = "Release")]
    pub build_type: BuildType,

    /// Use an existing OpenCV source tree instead of downloading one
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Print the CMake commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ExportEnvArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// OpenCV release tag
    #[arg(long)]
    pub opencv_version: String,

    /// Modules hash from `compute-key`
    #[arg(long)]
    pub modules_hash: String,

    /// Comma-separated OpenCV modules
    #[arg(long)]
    pub build_list: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ExportRustflagsArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// OpenCV release tag
    #[arg(long, required_unless_present = "link_paths")]
    pub opencv_version: Option<String>,

    /// Modules hash from `compute-key`
    #[arg(long, required_unless_present = "link_paths")]
    pub modules_hash: Option<String>,

    /// Library directory to scan instead of the installed layout
    #[arg(long)]
    pub link_paths: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}
