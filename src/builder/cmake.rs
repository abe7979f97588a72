//! CMake driver for OpenCV builds.
//!
//! Runs configure, build and install once, synchronously, into a key-scoped
//! install prefix. The configure tree is wiped first so a rerun after an
//! interrupted build starts from scratch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::core::config::BuildConfig;
use crate::core::errors::CiError;
use crate::core::platform::{Os, Platform};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::process::{find_cmake, find_ninja, ProcessBuilder};

/// Header search variables that leak host headers into the build.
const SANITIZED_ENV: [&str; 3] = ["CPATH", "C_INCLUDE_PATH", "CPLUS_INCLUDE_PATH"];

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Debug" => Ok(BuildType::Debug),
            "Release" => Ok(BuildType::Release),
            "RelWithDebInfo" => Ok(BuildType::RelWithDebInfo),
            "MinSizeRel" => Ok(BuildType::MinSizeRel),
            other => bail!("unknown build type `{}`", other),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake build of one configuration.
pub struct CMakeBuilder<'a> {
    config: &'a BuildConfig,
    platform: &'a Platform,
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_prefix: PathBuf,
    build_type: BuildType,
    dry_run: bool,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a new CMake builder.
    pub fn new(
        config: &'a BuildConfig,
        platform: &'a Platform,
        source_dir: PathBuf,
        build_dir: PathBuf,
        install_prefix: PathBuf,
    ) -> Self {
        CMakeBuilder {
            config,
            platform,
            source_dir,
            build_dir,
            install_prefix,
            build_type: BuildType::default(),
            dry_run: false,
        }
    }

    /// Set the build type.
    pub fn build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Log commands without running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Configure, build and install.
    pub fn build(&self) -> Result<()> {
        let cmake = match find_cmake() {
            Some(cmake) => cmake,
            None if self.dry_run => PathBuf::from("cmake"),
            None => bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build OpenCV.\n\
                 Install CMake and ensure it's in your PATH."
            ),
        };

        tracing::info!("OS: {}", self.platform.os);
        tracing::info!("Arch: {}", self.platform.arch);
        tracing::info!("Modules: {}", self.modules().join(","));

        if !self.dry_run {
            remove_dir_all_if_exists(&self.build_dir)?;
        }

        self.run(self.configure_command(&cmake))?;
        self.run(self.compile_command(&cmake))?;
        self.run(self.install_command(&cmake))?;

        tracing::info!("Installed into {}", self.install_prefix.display());
        Ok(())
    }

    /// Requested modules that exist in the source tree.
    ///
    /// Falls back to the full request when none can be found, leaving CMake
    /// to report unknown modules.
    pub fn modules(&self) -> Vec<String> {
        let modules_dir = self.source_dir.join("modules");
        let present: Vec<String> = self
            .config
            .modules()
            .iter()
            .filter(|m| modules_dir.join(m).is_dir())
            .cloned()
            .collect();

        if present.is_empty() {
            self.config.modules().iter().cloned().collect()
        } else {
            present
        }
    }

    fn generator_args(&self) -> Vec<String> {
        match self.platform.os {
            Os::Windows => vec!["-G".into(), "Visual Studio 17 2022".into()],
            Os::Darwin | Os::Linux => {
                if find_ninja().is_some() {
                    vec!["-G".into(), "Ninja".into()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Cache variables passed at configure time.
    pub fn cache_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type),
            format!("-DCMAKE_INSTALL_PREFIX={}", self.install_prefix.display()),
            format!("-DBUILD_LIST={}", self.modules().join(",")),
            "-DBUILD_TESTS=OFF".into(),
            "-DBUILD_PERF_TESTS=OFF".into(),
            "-DBUILD_EXAMPLES=OFF".into(),
            format!("-DBUILD_SHARED_LIBS={}", self.config.linkage().as_flag()),
            "-DCMAKE_POSITION_INDEPENDENT_CODE=ON".into(),
            "-DCMAKE_CXX_STANDARD=17".into(),
            "-DCMAKE_CXX_STANDARD_REQUIRED=ON".into(),
            "-DCMAKE_C_STANDARD=11".into(),
            "-DCMAKE_C_STANDARD_REQUIRED=ON".into(),
            "-DCMAKE_INCLUDE_DIRECTORIES_PROJECT_BEFORE=ON".into(),
            "-DOPENCV_FORCE_3RDPARTY_BUILD=ON".into(),
            "-DWITH_PROTOBUF=OFF".into(),
            "-DBUILD_PROTOBUF=OFF".into(),
            "-DOPENCV_DNN_USE_PROTOBUF=OFF".into(),
        ];

        match self.platform.os {
            Os::Darwin => {
                args.push(format!("-DCMAKE_OSX_ARCHITECTURES={}", self.platform.arch));
            }
            Os::Windows => {
                args.extend(["-A", "x64", "-T", "v143"].map(String::from));
            }
            Os::Linux => {}
        }

        args
    }

    fn command(&self, cmake: &Path) -> ProcessBuilder {
        SANITIZED_ENV
            .iter()
            .fold(ProcessBuilder::new(cmake), |cmd, key| cmd.env_remove(key))
    }

    fn configure_command(&self, cmake: &Path) -> ProcessBuilder {
        self.command(cmake)
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .args(self.generator_args())
            .args(self.cache_args())
    }

    fn compile_command(&self, cmake: &Path) -> ProcessBuilder {
        let jobs = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        self.command(cmake)
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--config")
            .arg(self.build_type.as_str())
            .arg("--parallel")
            .arg(jobs.to_string())
    }

    fn install_command(&self, cmake: &Path) -> ProcessBuilder {
        self.command(cmake).arg("--install").arg(&self.build_dir)
    }

    fn run(&self, cmd: ProcessBuilder) -> Result<()> {
        tracing::info!("$ {}", cmd.display_command());
        if self.dry_run {
            return Ok(());
        }

        let status = cmd.status()?;
        if !status.success() {
            return Err(CiError::BuildFailed {
                command: cmd.display_command(),
                status: status.code(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Linkage;
    use crate::core::platform::Arch;
    use tempfile::TempDir;

    fn config() -> BuildConfig {
        BuildConfig::from_build_list("4.9.0", "imgproc,core,dnn", Linkage::Static).unwrap()
    }

    #[test]
    fn test_modules_filtered_by_source_tree() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("modules/core")).unwrap();
        std::fs::create_dir_all(tmp.path().join("modules/imgproc")).unwrap();

        let config = config();
        let platform = Platform::new(Os::Linux, Arch::X86_64);
        let builder = CMakeBuilder::new(
            &config,
            &platform,
            tmp.path().to_path_buf(),
            tmp.path().join("out"),
            tmp.path().join("install"),
        );
        assert_eq!(builder.modules(), vec!["core", "imgproc"]);
    }

    #[test]
    fn test_modules_fall_back_to_request() {
        let tmp = TempDir::new().unwrap();
        let config = config();
        let platform = Platform::new(Os::Linux, Arch::X86_64);
        let builder = CMakeBuilder::new(
            &config,
            &platform,
            tmp.path().to_path_buf(),
            tmp.path().join("out"),
            tmp.path().join("install"),
        );
        assert_eq!(builder.modules(), vec!["core", "dnn", "imgproc"]);
    }

    #[test]
    fn test_cache_args() {
        let config = BuildConfig::from_build_list("4.9.0", "core", Linkage::Shared).unwrap();
        let platform = Platform::new(Os::Darwin, Arch::Arm64);
        let builder = CMakeBuilder::new(
            &config,
            &platform,
            PathBuf::from("/src"),
            PathBuf::from("/out"),
            PathBuf::from("/install"),
        )
        .build_type(BuildType::MinSizeRel);

        let args = builder.cache_args();
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=MinSizeRel".to_string()));
        assert!(args.contains(&"-DBUILD_SHARED_LIBS=ON".to_string()));
        assert!(args.contains(&"-DBUILD_LIST=core".to_string()));
        assert!(args.contains(&"-DWITH_PROTOBUF=OFF".to_string()));
        assert_eq!(args.last().unwrap(), "-DCMAKE_OSX_ARCHITECTURES=arm64");
    }

    #[test]
    fn test_windows_toolset_args() {
        let config = config();
        let platform = Platform::new(Os::Windows, Arch::X86_64);
        let builder = CMakeBuilder::new(
            &config,
            &platform,
            PathBuf::from("/src"),
            PathBuf::from("/out"),
            PathBuf::from("/install"),
        );

        let args = builder.cache_args();
        assert_eq!(&args[args.len() - 4..], ["-A", "x64", "-T", "v143"]);
        assert_eq!(
            builder.generator_args(),
            vec!["-G".to_string(), "Visual Studio 17 2022".to_string()]
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("out");
        std::fs::create_dir_all(build_dir.join("CMakeFiles")).unwrap();

        let config = config();
        let platform = Platform::new(Os::Linux, Arch::X86_64);
        CMakeBuilder::new(
            &config,
            &platform,
            tmp.path().join("src"),
            build_dir.clone(),
            tmp.path().join("install"),
        )
        .dry_run(true)
        .build()
        .unwrap();

        assert!(build_dir.join("CMakeFiles").exists());
        assert!(!tmp.path().join("install").exists());
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("RelWithDebInfo".parse::<BuildType>().unwrap(), BuildType::RelWithDebInfo);
        assert!("release".parse::<BuildType>().is_err());
    }
}
