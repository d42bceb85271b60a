//! Core types for draftpress

use serde::{Deserialize, Serialize};

/// A GitHub repository and the branch writes currently target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Working branch
    pub branch: String,
}

/// Repository identity used to construct a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host for GitHub Enterprise (None for github.com)
    pub host: Option<String>,
}

/// A file as loaded from (or about to be written to) the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the repository root
    pub path: String,
    /// Decoded file content
    pub content: Vec<u8>,
    /// Blob SHA of the stored version, None for files not yet created
    pub sha: Option<String>,
}

impl Document {
    /// A document that does not exist in the repository yet
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            sha: None,
        }
    }

    /// Content as UTF-8 text, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// File payload returned by the contents API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Path relative to the repository root
    pub path: String,
    /// Blob SHA
    pub sha: String,
    /// Decoded bytes
    pub content: Vec<u8>,
}

/// One entry of a directory listing from the contents API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File name
    pub name: String,
    /// Path relative to the repository root
    pub path: String,
    /// Blob SHA
    pub sha: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Entry type ("file", "dir", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw download URL, if GitHub offers one
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Request body for a contents write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Path relative to the repository root
    pub path: String,
    /// Commit message
    pub message: String,
    /// Base64-encoded file content
    pub content: String,
    /// Branch receiving the commit
    pub branch: String,
    /// Parent blob SHA, required for updates and omitted for creates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// A branch and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name
    pub name: String,
    /// Commit SHA at the branch tip
    pub sha: String,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Summary of a repository returned by the repos API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// `owner/name`
    pub full_name: String,
    /// Default branch of the repository
    pub default_branch: String,
    /// Web URL
    pub html_url: String,
}

/// Where a new repository is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// The authenticated user's account
    User,
    /// An organization
    Org(String),
}
