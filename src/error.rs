//! Error types for draftpress

use thiserror::Error;

/// Errors produced by draftpress operations
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from the GitHub API
    #[error("GitHub API error ({status}): {message}")]
    GitHubApi {
        /// HTTP status code
        status: u16,
        /// Message returned by the API (or the raw body)
        message: String,
    },

    /// Transport failure talking to GitHub or the clone service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error from the octocrab client
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Authentication problem (missing or rejected token)
    #[error("authentication error: {0}")]
    Auth(String),

    /// A draft branch was requested but the default branch SHA is unknown
    #[error("cannot create a draft branch: no commit SHA known for default branch '{0}'")]
    MissingDefaultSha(String),

    /// Merge attempted without a cached pull request number
    #[error("no pull request is open for the current draft")]
    NoPullRequest,

    /// No open pull request exists for a draft branch
    #[error("no open pull request found for branch '{0}'")]
    PullRequestNotFound(String),

    /// Attempt to delete the default branch
    #[error("refusing to delete the default branch '{0}'")]
    DeleteDefaultBranch(String),

    /// Operation not valid in the current publish state
    #[error("invalid publish state: {0}")]
    InvalidState(String),

    /// No draft branch exists for a path
    #[error("no draft in progress for '{0}'")]
    DraftNotFound(String),

    /// Clone request is missing required identifiers
    #[error("invalid clone request: {0}")]
    InvalidCloneRequest(String),

    /// Clone service rejected the request
    #[error("clone service error ({status}): {message}")]
    CloneService {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Unknown asset category name
    #[error("unknown asset category '{0}' (expected 'images' or 'documents')")]
    UnknownAssetCategory(String),

    /// Invalid repository reference or other malformed input
    #[error("parse error: {0}")]
    Parse(String),

    /// YAML serialization or parsing failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization or parsing failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding failure
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object store failure
    #[error("object store error: {0}")]
    Store(String),
}

/// Result type alias for draftpress operations
pub type Result<T> = std::result::Result<T, Error>;
