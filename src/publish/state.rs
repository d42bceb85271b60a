//! Publish state machine
//!
//! `Editing → Drafting → Merging → CleaningUp → Editing`. Transitions take
//! `&self` and return the next state; the caller stores it only once the
//! matching API call has succeeded.

use crate::error::{Error, Result};

/// Where an edit stands in the publish flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishState {
    /// Writes go to the default branch
    #[default]
    Editing,
    /// Writes go to a draft branch
    Drafting {
        /// Draft branch name
        branch: String,
        /// Pull request number once opened or found
        pr_number: Option<u64>,
    },
    /// Merge requested for the draft's pull request
    Merging {
        /// Draft branch name
        branch: String,
        /// Pull request being merged
        pr_number: u64,
    },
    /// Merged, draft branch not yet deleted
    CleaningUp {
        /// Draft branch name
        branch: String,
    },
}

impl PublishState {
    /// Branch writes currently target
    pub fn working_branch<'a>(&'a self, default_branch: &'a str) -> &'a str {
        self.draft_branch().unwrap_or(default_branch)
    }

    /// Draft branch name, None while editing
    pub fn draft_branch(&self) -> Option<&str> {
        match self {
            Self::Editing => None,
            Self::Drafting { branch, .. }
            | Self::Merging { branch, .. }
            | Self::CleaningUp { branch } => Some(branch),
        }
    }

    /// Cached pull request number
    pub const fn pr_number(&self) -> Option<u64> {
        match self {
            Self::Drafting { pr_number, .. } => *pr_number,
            Self::Merging { pr_number, .. } => Some(*pr_number),
            Self::Editing | Self::CleaningUp { .. } => None,
        }
    }

    /// Short state name for messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Drafting { .. } => "drafting",
            Self::Merging { .. } => "merging",
            Self::CleaningUp { .. } => "cleaning up",
        }
    }

    /// A draft branch now exists and receives writes
    pub fn enter_draft(&self, branch: String) -> Result<Self> {
        match self {
            Self::Editing => Ok(Self::Drafting {
                branch,
                pr_number: None,
            }),
            other => Err(other.rejected("start a draft")),
        }
    }

    /// Record the draft's pull request
    pub fn with_pull_request(&self, number: u64) -> Result<Self> {
        match self {
            Self::Drafting { branch, .. } => Ok(Self::Drafting {
                branch: branch.clone(),
                pr_number: Some(number),
            }),
            other => Err(other.rejected("attach a pull request")),
        }
    }

    /// Begin merging; requires a cached pull request number
    pub fn begin_merge(&self) -> Result<Self> {
        match self {
            Self::Drafting {
                branch,
                pr_number: Some(number),
            }
            | Self::Merging {
                branch,
                pr_number: number,
            } => Ok(Self::Merging {
                branch: branch.clone(),
                pr_number: *number,
            }),
            Self::Drafting {
                pr_number: None, ..
            } => Err(Error::NoPullRequest),
            other => Err(other.rejected("merge")),
        }
    }

    /// Merge done; the pull request number is dropped
    pub fn merged(&self) -> Result<Self> {
        match self {
            Self::Merging { branch, .. } => Ok(Self::CleaningUp {
                branch: branch.clone(),
            }),
            other => Err(other.rejected("finish a merge")),
        }
    }

    /// Draft branch deleted; back on the default branch
    pub fn branch_deleted(&self, default_branch: &str) -> Result<Self> {
        match self {
            Self::Editing => Err(Error::DeleteDefaultBranch(default_branch.to_string())),
            _ => Ok(Self::Editing),
        }
    }

    fn rejected(&self, action: &str) -> Error {
        Error::InvalidState(format!("cannot {action} while {}", self.name()))
    }
}
