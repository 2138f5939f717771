//! Error types for reporting and traversal

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to produce one report line.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no user name for uid {uid}")]
    UnknownUser { uid: u32 },

    #[error("no group name for gid {gid}")]
    UnknownGroup { gid: u32 },

    #[error("identity lookup failed: {source}")]
    Lookup {
        #[source]
        source: io::Error,
    },

    #[error("modification time {secs} is out of range")]
    InvalidTimestamp { secs: i64 },

    #[error("error writing output: {0}")]
    Output(#[source] io::Error),
}

/// Fatal traversal failure. Recoverable conditions never surface as a `WalkError`.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot stat '{}': {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory {} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path under '{}' would be {len} bytes, limit is {max}", parent.display())]
    PathTooLong {
        parent: PathBuf,
        len: usize,
        max: usize,
    },

    #[error("cannot report '{}': {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: ReportError,
    },

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

impl WalkError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stat { path, .. }
            | Self::NotFound { path }
            | Self::ReadDir { path, .. }
            | Self::Report { path, .. } => Some(path),
            Self::PathTooLong { parent, .. } => Some(parent),
            Self::Output(_) => None,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
