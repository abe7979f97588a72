//! `key=value` output for CI step outputs.
//!
//! Results are appended to a step-output file when one is configured
//! (GitHub Actions' `$GITHUB_OUTPUT`), otherwise printed to stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ordered `key=value` pairs emitted by one command.
pub type Outputs = Vec<(&'static str, String)>;

/// Where command outputs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append to a file.
    File(PathBuf),
    /// Print to standard output.
    Stdout,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if !path.as_os_str().is_empty() => OutputSink::File(path),
            _ => OutputSink::Stdout,
        }
    }

    /// Write every pair as one `key=value` line.
    pub fn write(&self, outputs: &Outputs) -> Result<()> {
        match self {
            OutputSink::File(path) => append_to_file(path, outputs),
            OutputSink::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                write_pairs(&mut handle, outputs).context("failed to write to stdout")
            }
        }
    }
}

fn append_to_file(path: &Path, outputs: &Outputs) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file: {}", path.display()))?;

    write_pairs(&mut file, outputs)
        .with_context(|| format!("failed to write output file: {}", path.display()))?;

    tracing::debug!("Wrote {} output(s) to {}", outputs.len(), path.display());
    Ok(())
}

fn write_pairs(w: &mut impl Write, outputs: &Outputs) -> io::Result<()> {
    for (key, value) in outputs {
        writeln!(w, "{}={}", key, value)?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_path_means_stdout() {
        assert_eq!(OutputSink::new(None), OutputSink::Stdout);
        assert_eq!(OutputSink::new(Some(PathBuf::new())), OutputSink::Stdout);
    }

    #[test]
    fn test_appends_to_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("github_output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let sink = OutputSink::new(Some(path.clone()));
        sink.write(&vec![
            ("modules_hash", "abc".to_string()),
            ("cache_key", "opencv-linux-x86_64-4.9.0-abc".to_string()),
        ])
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "existing=1\nmodules_hash=abc\ncache_key=opencv-linux-x86_64-4.9.0-abc\n"
        );
    }

    #[test]
    fn test_write_pairs_format() {
        let mut buf = Vec::new();
        write_pairs(&mut buf, &vec![("rustflags", String::new())]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "rustflags=\n");
    }
}
