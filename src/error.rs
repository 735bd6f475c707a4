//! Typed errors for installer and subprocess operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Closed set of failure kinds callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    ProcessFailed,
    HealthMismatch,
    InstallFailed,
    TimedOut,
    Cancelled,
    Io,
}

/// Error returned by the process runner and the installer
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The program (or the configured binary) does not exist
    #[error("Command failed with error: {program} not found")]
    NotFound { program: String },

    /// The program exists but could not be executed
    #[error("Command failed with error: permission denied executing {program}")]
    PermissionDenied { program: String },

    /// The process ran and exited unsuccessfully
    #[error("Command failed with error: {program} exited with {}{}", fmt_code(.code), fmt_output(.output))]
    ProcessFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// The health check ran but did not return the sentinel
    #[error("health check mismatch: expected {expected:?}, got {actual:?}")]
    HealthMismatch { expected: String, actual: String },

    /// Installation finished but the CLI is still not healthy
    #[error("installation of {} did not produce a healthy CLI", .path.display())]
    InstallFailed {
        path: PathBuf,
        #[source]
        source: Box<InstallerError>,
    },

    #[error("Command failed with error: {program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("Command failed with error: {program} was cancelled")]
    Cancelled { program: String },

    #[error("Command failed with error: {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[allow(clippy::ref_option)]
fn fmt_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

fn fmt_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl InstallerError {
    /// Map a spawn error onto the closed taxonomy
    pub fn from_spawn(program: &str, err: io::Error) -> Self {
        let program = program.to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { program },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { program },
            _ => Self::Io {
                program,
                source: err,
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::ProcessFailed { .. } => ErrorKind::ProcessFailed,
            Self::HealthMismatch { .. } => ErrorKind::HealthMismatch,
            Self::InstallFailed { .. } => ErrorKind::InstallFailed,
            Self::TimedOut { .. } => ErrorKind::TimedOut,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}
