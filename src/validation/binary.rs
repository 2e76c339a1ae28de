//! Validity probes for externally supplied transcoder binaries.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::error::ValidationError;

/// Transcoder binaries that can be overridden by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    Ffmpeg,
    Ffprobe,
}

impl BinaryKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::Ffprobe => "ffprobe",
        }
    }
}

impl fmt::Display for BinaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks that a path points at the expected executable.
#[cfg_attr(test, mockall::automock)]
pub trait BinaryProbe: Send + Sync {
    /// Returns a human-readable reason when the binary is unusable.
    fn probe(&self, kind: BinaryKind, path: &Path) -> Result<(), String>;
}

/// Runs `<path> -version` and checks the banner names the expected tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessProbe;

impl BinaryProbe for ProcessProbe {
    fn probe(&self, kind: BinaryKind, path: &Path) -> Result<(), String> {
        if !path.is_file() {
            return Err("file does not exist".to_string());
        }

        let output = Command::new(path)
            .args(["-hide_banner", "-version"])
            .output()
            .map_err(|e| format!("failed to run: {}", e))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let expected = format!("{} version", kind.name());
        if stdout.starts_with(&expected) {
            Ok(())
        } else {
            Err(format!("not an {} binary", kind.name()))
        }
    }
}

/// Validates an override path; an empty path clears the override and is always valid.
pub fn validate_binary(
    probe: &dyn BinaryProbe,
    kind: BinaryKind,
    path: &str,
) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Ok(());
    }

    probe
        .probe(kind, Path::new(path))
        .map_err(|message| ValidationError::InvalidExecutable {
            binary: kind.name(),
            path: path.into(),
            message,
        })
}
