use thiserror::Error;

/// Unified error type for release planning operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Repository client error: {0}")]
    Client(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error(
        "Release tag '{tag}' points at {sha}, which is not among the {searched} fetched commits"
    )]
    BoundaryNotFound {
        tag: String,
        sha: String,
        searched: usize,
    },

    #[error("Cannot update '{path}': {reason}")]
    Splice { path: String, reason: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-pr
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a client (transport/auth) error
    pub fn client(msg: impl Into<String>) -> Self {
        ReleaseError::Client(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a decode error with context
    pub fn decode(msg: impl Into<String>) -> Self {
        ReleaseError::Decode(msg.into())
    }

    /// Create a splice error for a file path
    pub fn splice(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::Splice {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
