//! Error taxonomy for key computation, builds and layout resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal errors surfaced to the process boundary.
#[derive(Debug, Error)]
pub enum CiError {
    #[error("unsupported platform `{os}`")]
    UnsupportedPlatform { os: String },

    #[error("build failed: `{command}` exited with {}", display_status(*status))]
    BuildFailed {
        command: String,
        status: Option<i32>,
    },

    #[error("no install layout found at {}", prefix.display())]
    LayoutNotFound { prefix: PathBuf },

    #[error("invalid configuration{}: {message}", display_path(path.as_ref()))]
    ConfigParse {
        path: Option<PathBuf>,
        message: String,
    },
}

fn display_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

impl CiError {
    /// Shorthand for a configuration error without a file location.
    pub fn config(message: impl Into<String>) -> Self {
        CiError::ConfigParse {
            path: None,
            message: message.into(),
        }
    }

    /// Exit status the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            CiError::BuildFailed {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CiError::UnsupportedPlatform { os } => {
                Diagnostic::error(format!("unsupported operating system `{}`", os))
                    .with_context("supported systems: Windows, Darwin (macOS), Linux")
                    .with_suggestion(suggestions::UNSUPPORTED_PLATFORM)
            }
            CiError::BuildFailed { command, status } => {
                Diagnostic::error(format!("OpenCV build failed ({})", display_status(*status)))
                    .with_context(format!("command: {}", command))
                    .with_suggestion(suggestions::BUILD_FAILED)
            }
            CiError::LayoutNotFound { prefix } => {
                Diagnostic::error("no installed OpenCV found for this configuration")
                    .with_location(prefix)
                    .with_suggestion(suggestions::LAYOUT_NOT_FOUND)
            }
            CiError::ConfigParse { path, message } => {
                let mut diag = Diagnostic::error(format!("invalid configuration: {}", message));
                if let Some(path) = path {
                    diag = diag.with_location(path);
                }
                diag.with_suggestion(suggestions::CONFIG_FORMAT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_failed_exit_code() {
        let err = CiError::BuildFailed {
            command: "cmake --build out".to_string(),
            status: Some(2),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("exit code 2"));

        let killed = CiError::BuildFailed {
            command: "cmake --build out".to_string(),
            status: None,
        };
        assert_eq!(killed.exit_code(), 1);
    }

    #[test]
    fn test_config_error_diagnostic() {
        let err = CiError::ConfigParse {
            path: Some(PathBuf::from("opencv-config.json")),
            message: "`version` is empty".to_string(),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: invalid configuration: `version` is empty"));
        assert!(output.contains("--> opencv-config.json"));
        assert!(output.contains("help: consider:"));
    }
}
