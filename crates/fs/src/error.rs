use std::{io, path::PathBuf};

/// Error type returned by sinks; anything boxable works.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// The requested root could not be canonicalized.
    #[error("failed to resolve {}: {source}", .path.display())]
    Resolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// An include or exclude pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// An enrichment hook failed for `path` (relative to the root).
    #[error("failed to load metadata for {path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("walk cancelled")]
    Cancelled,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The caller's sink refused the record at `path`.
    #[error("sink failed at {path}: {source}")]
    Sink {
        path: String,
        #[source]
        source: BoxError,
    },
}

pub type Result<T> = std::result::Result<T, WalkError>;

impl WalkError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WalkError::Cancelled)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WalkError::Io {
            path: path.into(),
            source,
        }
    }
}

/// An entry that existed at listing time but is gone by the time we touch it.
#[inline]
pub(crate) fn is_vanished(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}
