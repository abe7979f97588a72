//! Host platform identity.
//!
//! Operating system and CPU architecture are normalized into a closed
//! vocabulary once per invocation. Everything downstream (cache keys,
//! install prefixes, library naming, link flags) matches on these values
//! instead of comparing raw strings.

use std::fmt;

use crate::core::errors::CiError;

/// Recognized operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Darwin,
    Linux,
}

impl Os {
    /// Parse an OS name.
    ///
    /// Accepts the canonical names, Rust's `std::env::consts::OS` values and
    /// the CI runner spelling (`macOS`), case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, CiError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(Os::Windows),
            "darwin" | "macos" => Ok(Os::Darwin),
            "linux" => Ok(Os::Linux),
            _ => Err(CiError::UnsupportedPlatform {
                os: raw.to_string(),
            }),
        }
    }

    /// Canonical capitalized name, used for install directories.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Darwin => "Darwin",
            Os::Linux => "Linux",
        }
    }

    /// Lower-cased name, used inside cache keys.
    pub fn key_name(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Darwin => "darwin",
            Os::Linux => "linux",
        }
    }

    /// File extension of static (or import) libraries, without the dot.
    pub fn static_lib_extension(&self) -> &'static str {
        match self {
            Os::Windows => "lib",
            Os::Darwin | Os::Linux => "a",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture. Unknown values pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Arm64,
    Other(String),
}

impl Arch {
    /// Normalize a raw machine string.
    pub fn normalize(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Arch::X86_64,
            "arm64" | "aarch64" => Arch::Arm64,
            _ => Arch::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::Other(raw) => raw,
        }
    }

    /// Architecture of the running binary.
    pub fn host() -> Self {
        Arch::normalize(std::env::consts::ARCH)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The platform a build is keyed and laid out for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Platform { os, arch }
    }

    /// Detect the host platform.
    ///
    /// `os_override` carries the CI runner's OS name when one is set; it takes
    /// precedence over the compiled-in host OS.
    pub fn detect(os_override: Option<&str>) -> Result<Self, CiError> {
        let os = Os::parse(os_override.unwrap_or(std::env::consts::OS))?;
        Ok(Platform::new(os, Arch::host()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
