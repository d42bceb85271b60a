//! Event sink for interface-agnostic notifications
//!
//! The site model reports loads, commits and publish stages through a
//! [`SiteEvents`] implementation handed to it at construction. A CLI can
//! print them; a UI can forward them over a channel with [`ChannelEvents`].

use crate::types::PullRequest;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Publish chain stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the draft branch
    CreatingBranch,
    /// Writing file content
    Committing,
    /// Opening the pull request
    OpeningPr,
    /// Appending the navigation entry
    UpdatingNav,
    /// Looking up the draft's pull request
    FindingPr,
    /// Merging the pull request
    Merging,
    /// Deleting the draft branch
    DeletingBranch,
    /// Chain finished
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CreatingBranch => "Creating draft branch",
            Self::Committing => "Committing",
            Self::OpeningPr => "Opening pull request",
            Self::UpdatingNav => "Updating navigation",
            Self::FindingPr => "Finding pull request",
            Self::Merging => "Merging",
            Self::DeletingBranch => "Deleting draft branch",
            Self::Complete => "Done",
        };
        f.write_str(label)
    }
}

/// Notification emitted by the site model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// All config files fetched
    ConfigFetched,
    /// Config fetch failed
    ConfigFailed(String),
    /// Branch list fetched, with the number of drafts found
    DraftsFetched(usize),
    /// Branch list fetch failed
    DraftsFailed(String),
    /// Upload directory listed, with the number of assets
    AssetsFetched(usize),
    /// Upload directory listing failed
    AssetsFailed(String),
    /// A document commit succeeded
    CommitSucceeded {
        /// Committed path
        path: String,
        /// New blob SHA
        sha: String,
    },
    /// A commit failed
    CommitFailed {
        /// Target path
        path: String,
        /// Error text
        message: String,
    },
    /// An asset upload succeeded
    UploadSucceeded {
        /// Uploaded path
        path: String,
    },
}

impl SiteEvent {
    /// Name of the event on the bus
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConfigFetched => "github:fetchConfig:success",
            Self::ConfigFailed(_) => "github:fetchConfig:error",
            Self::DraftsFetched(_) => "github:fetchDrafts:success",
            Self::DraftsFailed(_) => "github:fetchDrafts:error",
            Self::AssetsFetched(_) => "github:fetchAssets:success",
            Self::AssetsFailed(_) => "github:fetchAssets:error",
            Self::CommitSucceeded { .. } => "github:commit:success",
            Self::CommitFailed { .. } => "github:commit:error",
            Self::UploadSucceeded { .. } => "upload:success",
        }
    }
}

/// Event sink trait
#[async_trait]
pub trait SiteEvents: Send + Sync {
    /// Called for every site event
    async fn on_event(&self, event: &SiteEvent);

    /// Called when a publish stage starts
    async fn on_stage(&self, stage: Stage);

    /// Called when a pull request is opened or found
    async fn on_pull_request(&self, pr: &PullRequest);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op sink for tests or when notifications aren't needed
pub struct NoopEvents;

#[async_trait]
impl SiteEvents for NoopEvents {
    async fn on_event(&self, _event: &SiteEvent) {}
    async fn on_stage(&self, _stage: Stage) {}
    async fn on_pull_request(&self, _pr: &PullRequest) {}
    async fn on_message(&self, _message: &str) {}
}

/// Everything a [`ChannelEvents`] sink forwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A site event
    Event(SiteEvent),
    /// A publish stage
    Stage(Stage),
    /// A pull request
    PullRequest(PullRequest),
    /// A status message
    Message(String),
}

/// Sink that forwards notifications over an unbounded channel
///
/// Sends to a closed channel are dropped.
pub struct ChannelEvents {
    tx: UnboundedSender<Notification>,
}

impl ChannelEvents {
    /// Wrap a channel sender
    pub const fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl SiteEvents for ChannelEvents {
    async fn on_event(&self, event: &SiteEvent) {
        let _ = self.tx.send(Notification::Event(event.clone()));
    }

    async fn on_stage(&self, stage: Stage) {
        let _ = self.tx.send(Notification::Stage(stage));
    }

    async fn on_pull_request(&self, pr: &PullRequest) {
        let _ = self.tx.send(Notification::PullRequest(pr.clone()));
    }

    async fn on_message(&self, message: &str) {
        let _ = self.tx.send(Notification::Message(message.to_string()));
    }
}
