//! Draft branch tracking

use crate::encoding::draft_path;
use crate::error::Result;
use crate::platform::ContentService;
use crate::types::Branch;

/// A draft in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Draft branch name
    pub branch: String,
    /// File the draft edits
    pub path: String,
}

/// Snapshot of the repository's branches
#[derive(Debug, Clone, Default)]
pub struct BranchIndex {
    branches: Vec<Branch>,
    default_branch: String,
}

impl BranchIndex {
    /// Index a branch listing
    pub fn from_branches(branches: Vec<Branch>, default_branch: impl Into<String>) -> Self {
        Self {
            branches,
            default_branch: default_branch.into(),
        }
    }

    /// Drafts in progress, in listing order
    pub fn drafts(&self) -> Vec<Draft> {
        self.branches
            .iter()
            .filter_map(|b| {
                draft_path(&b.name).map(|path| Draft {
                    branch: b.name.clone(),
                    path,
                })
            })
            .collect()
    }

    /// Draft for a file, if one exists
    pub fn draft_for(&self, path: &str) -> Option<Draft> {
        self.drafts().into_iter().find(|d| d.path == path)
    }

    /// Commit SHA of the default branch
    ///
    /// None when the default branch is missing from the listing, which
    /// means no draft branch can be created.
    pub fn default_sha(&self) -> Option<&str> {
        self.branches
            .iter()
            .find(|b| b.name == self.default_branch)
            .map(|b| b.sha.as_str())
    }

    /// Record a branch created after the listing
    pub fn insert(&mut self, branch: Branch) {
        self.remove(&branch.name);
        self.branches.push(branch);
    }

    /// Forget a deleted branch
    pub fn remove(&mut self, name: &str) {
        self.branches.retain(|b| b.name != name);
    }
}

/// List branches and index them
pub async fn fetch_branches(
    service: &dyn ContentService,
    default_branch: &str,
) -> Result<BranchIndex> {
    let branches = service.list_branches().await?;
    Ok(BranchIndex::from_branches(branches, default_branch))
}
