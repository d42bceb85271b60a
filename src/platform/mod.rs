//! GitHub content services
//!
//! [`ContentService`] is the seam between the editor model and the GitHub
//! REST API. The site loader, publish workflow and cloner only talk to the
//! trait, so tests can swap in a recording mock.

mod detection;
mod factory;
mod github;
mod route;

pub use detection::parse_repo_info;
pub use factory::create_content_service;
pub use github::GitHubService;
pub use route::ApiPath;

use crate::error::Result;
use crate::types::{
    Branch, CommitRecord, ContentEntry, FileContent, Namespace, PullRequest, RepoConfig, RepoInfo,
};
use async_trait::async_trait;

/// Repository operations needed by the editor
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Fetch a file on a branch, None when it does not exist
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<FileContent>>;

    /// List a directory on a branch, empty when it does not exist
    async fn list_directory(&self, path: &str, branch: &str) -> Result<Vec<ContentEntry>>;

    /// Create or update a file, returning the new blob SHA
    async fn put_file(&self, record: &CommitRecord) -> Result<String>;

    /// List all branches with their tip commits
    async fn list_branches(&self) -> Result<Vec<Branch>>;

    /// Create `refs/heads/<name>` pointing at `sha`
    async fn create_branch(&self, name: &str, sha: &str) -> Result<()>;

    /// Delete `refs/heads/<name>`
    async fn delete_branch(&self, name: &str) -> Result<()>;

    /// Open a pull request
    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest>;

    /// Find the open pull request for a head branch
    async fn find_open_pr(&self, head: &str) -> Result<Option<PullRequest>>;

    /// Merge a pull request with a commit message
    async fn merge_pr(&self, number: u64, message: &str) -> Result<()>;

    /// Fetch any repository's summary (used to verify read access)
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo>;

    /// Create a repository under a user or organization
    async fn create_repo(&self, namespace: &Namespace, name: &str) -> Result<RepoInfo>;

    /// The repository this service is bound to
    fn config(&self) -> &RepoConfig;
}
