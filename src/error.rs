//! Error type shared by every pipeline operation.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures raised while resolving publishes or driving a host scene.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to list or read a directory or file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to write a file or create a directory.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse a JSON document.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The shader assignment file expected next to the scene does not exist.
    #[error("no shader assignment file found at {0}")]
    MissingShaderFile(PathBuf),
    /// A version cache directory holds more than one entry.
    #[error("expected exactly one cache in {path}, found {count}")]
    AmbiguousCache {
        /// Directory that was scanned.
        path: PathBuf,
        /// Number of entries found.
        count: usize,
    },
    /// The scene file does not live inside the expected work-area layout.
    #[error(
        "scene directory {0} does not follow the \
         <drive>/shows/<project>/assets/<type>/<asset>/<area>/<step> layout"
    )]
    InvalidScenePath(String),
    /// Export was requested with an empty selection.
    #[error("nothing selected, please select groups")]
    NothingSelected,
    /// A namespaced object name could not be split into asset name and instance.
    #[error("cannot derive asset name and instance from {0}")]
    InvalidNamespace(String),
    /// A transform has no shape node to carry attributes.
    #[error("transform {0} has no shape")]
    MissingShape(String),
    /// A named node does not exist under its parent.
    #[error("node {0} not found")]
    NodeNotFound(String),
    /// The latest version folder has the largest representable number.
    #[error("version {0} has no successor")]
    VersionOverflow(String),
    /// Set-dress points are not numbered `0..count` without gaps or repeats.
    #[error("{count} set-dress point(s) must be numbered 0..{count} without gaps or repeats")]
    InvalidPointNumbers {
        /// Number of points in the list.
        count: usize,
    },
    /// A child with the requested name already exists.
    #[error("node {0} already exists")]
    NodeExists(String),
}
