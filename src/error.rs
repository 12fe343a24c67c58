use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can make a publish or a rebuild fail.
///
/// Nothing in the crate recovers from these locally, they travel up with `?`
/// until the binary turns them into a non-zero exit.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid post metadata in `{path}`: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Error rendering `{path}`: {reason}")]
    Render { path: PathBuf, reason: String },

    #[error("Cannot calculate destination: {reason}")]
    Destination { reason: String },

    #[error("Error parsing template {name}: {reason}")]
    Template { name: String, reason: String },

    #[error("Error writing RSS feed: {0}")]
    Feed(#[from] quick_xml::Error),

    #[error("{0}")]
    Args(String),
}

impl PublishError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        PublishError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn metadata(path: &Path, reason: impl Into<String>) -> Self {
        PublishError::Metadata {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PublishError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
