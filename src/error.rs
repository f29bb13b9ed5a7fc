//! Error types.
//!
//! These never cross the exported C surface; there every failure collapses to
//! [`DEVICE_NOT_CONNECTED`](crate::driver::DEVICE_NOT_CONNECTED), a no-op, or
//! `false`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One failed attempt to load a candidate driver library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadAttempt {
    /// Library name as passed to the OS loader.
    pub library: String,
    /// OS error code reported for the attempt.
    pub code: u32,
}

impl fmt::Display for LoadAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: 0x{:08x}", self.library, self.code)
    }
}

/// Why the driver binding ended up `Failed`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("no gamepad driver libraries are configured")]
    NoCandidates,

    #[error(
        "failed to load a gamepad driver library [{}]; has XInput been installed?",
        join_attempts(.attempts)
    )]
    Exhausted { attempts: Vec<LoadAttempt> },
}

impl LoadError {
    /// OS error codes in candidate order.
    pub fn codes(&self) -> Vec<u32> {
        match self {
            LoadError::NoCandidates => Vec::new(),
            LoadError::Exhausted { attempts } => attempts.iter().map(|a| a.code).collect(),
        }
    }
}

fn join_attempts(attempts: &[LoadAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure to read a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
