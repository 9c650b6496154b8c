use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a skills index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The discovery root exists but could not be listed.
    #[error("cannot read skills root {}: {source}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SKILL.md frontmatter could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, IndexError>`.
pub type Result<T> = std::result::Result<T, IndexError>;
