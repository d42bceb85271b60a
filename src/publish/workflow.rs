//! Publish stages and their composition

use crate::encoding::{draft_branch_name, encode_content};
use crate::error::{Error, Result};
use crate::publish::{PublishState, SiteEvent, Stage};
use crate::site::{ConfigFile, NavEntry, Site, append_entry};
use crate::types::{Branch, CommitRecord, Document, FileContent, PullRequest};
use tracing::{info, warn};

/// Where a save writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Commit straight to the working branch
    #[default]
    Direct,
    /// From the default branch: open a draft branch and pull request first
    Draft,
}

/// Options for [`Site::save`] and [`Site::publish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Commit message
    pub message: String,
    /// The document is a new page and gets a navigation entry
    pub new_file: bool,
    /// Where the save writes
    pub mode: SaveMode,
}

impl SaveOptions {
    /// Direct save of an existing file
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            new_file: false,
            mode: SaveMode::Direct,
        }
    }

    /// Save through a draft branch
    #[must_use]
    pub const fn draft(mut self) -> Self {
        self.mode = SaveMode::Draft;
        self
    }

    /// Mark the document as a new page
    #[must_use]
    pub const fn new_page(mut self) -> Self {
        self.new_file = true;
        self
    }
}

impl Site<'_> {
    /// Create the draft branch for a path at the default branch's commit
    ///
    /// Fails without a request when the default branch SHA is unknown.
    pub async fn create_draft_branch(&mut self, path: &str) -> Result<String> {
        let sha = self
            .branches
            .default_sha()
            .ok_or_else(|| Error::MissingDefaultSha(self.settings.default_branch.clone()))?
            .to_string();

        let branch = draft_branch_name(path);
        let next = self.state.enter_draft(branch.clone())?;

        self.events.on_stage(Stage::CreatingBranch).await;
        self.service.create_branch(&branch, &sha).await?;

        self.branches.insert(Branch {
            name: branch.clone(),
            sha,
        });
        self.state = next;
        info!("Created draft branch {branch} for {path}");
        self.events
            .on_message(&format!("Created draft branch for {path}"))
            .await;

        Ok(branch)
    }

    /// Write a document to the working branch
    ///
    /// Paths under the upload root count as uploads: the asset list is
    /// refreshed and an upload event replaces the commit event. The
    /// document's SHA is replaced with the new blob SHA.
    pub async fn commit(&mut self, doc: &mut Document, message: &str) -> Result<String> {
        let record = CommitRecord {
            path: doc.path.clone(),
            message: message.to_string(),
            content: encode_content(&doc.content),
            branch: self.working_branch().to_string(),
            sha: doc.sha.clone(),
        };

        self.events.on_stage(Stage::Committing).await;
        let sha = match self.service.put_file(&record).await {
            Ok(sha) => sha,
            Err(e) => {
                self.events
                    .on_event(&SiteEvent::CommitFailed {
                        path: doc.path.clone(),
                        message: e.to_string(),
                    })
                    .await;
                return Err(e);
            }
        };
        doc.sha = Some(sha.clone());

        if self.settings.is_upload(&doc.path) {
            if let Err(e) = self.refresh_assets().await {
                warn!("Asset list refresh after uploading {} failed: {e}", doc.path);
            }
            self.events
                .on_event(&SiteEvent::UploadSucceeded {
                    path: doc.path.clone(),
                })
                .await;
        } else {
            self.events
                .on_event(&SiteEvent::CommitSucceeded {
                    path: doc.path.clone(),
                    sha: sha.clone(),
                })
                .await;
        }

        Ok(sha)
    }

    /// Upload a file into the upload root, replacing an asset of the same name
    pub async fn upload(&mut self, file_name: &str, content: Vec<u8>) -> Result<Document> {
        let path = format!(
            "{}/{}",
            self.settings.upload_root,
            file_name.trim_start_matches('/')
        );
        let sha = self
            .assets
            .entries()
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.sha.clone());

        let mut doc = Document { path, content, sha };
        self.commit(&mut doc, &format!("Upload {file_name}")).await?;
        Ok(doc)
    }

    /// Open a pull request from the draft branch into the default branch
    pub async fn create_pr(&mut self, path: &str) -> Result<PullRequest> {
        let branch = self.drafting_branch("open a pull request")?;

        self.events.on_stage(Stage::OpeningPr).await;
        let title = format!("Update {path}");
        let pr = self
            .service
            .create_pr(&branch, &self.settings.default_branch, &title)
            .await?;

        self.state = self.state.with_pull_request(pr.number)?;
        self.events.on_pull_request(&pr).await;
        Ok(pr)
    }

    /// Append a navigation entry for a new page, on the default branch
    ///
    /// The navigation file's SHA is fetched again here rather than taken
    /// from the config loaded at startup.
    pub async fn update_nav(&mut self, content: &str, path: &str) -> Result<()> {
        let nav_path = self.settings.nav_path.clone();
        let default_branch = self.settings.default_branch.clone();

        self.events.on_stage(Stage::UpdatingNav).await;
        let (raw, sha) = self
            .service
            .get_file(&nav_path, &default_branch)
            .await?
            .map_or_else(
                || (String::new(), None),
                |f| (String::from_utf8_lossy(&f.content).into_owned(), Some(f.sha)),
            );

        let entry = NavEntry::for_page(content, path);
        let updated = append_entry(&raw, &entry)?;

        let record = CommitRecord {
            path: nav_path.clone(),
            message: format!("Add {} to navigation", entry.text),
            content: encode_content(updated.as_bytes()),
            branch: default_branch,
            sha,
        };

        match self.service.put_file(&record).await {
            Ok(new_sha) => {
                self.config.insert(
                    nav_path.clone(),
                    ConfigFile::from_fetch(Some(FileContent {
                        path: nav_path.clone(),
                        sha: new_sha.clone(),
                        content: updated.into_bytes(),
                    })),
                );
                self.events
                    .on_event(&SiteEvent::CommitSucceeded {
                        path: nav_path,
                        sha: new_sha,
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                self.events
                    .on_event(&SiteEvent::CommitFailed {
                        path: nav_path,
                        message: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Save a document
    ///
    /// - editing, direct: one commit to the default branch
    /// - editing, draft: draft branch → commit → pull request → navigation
    ///   entry (new pages only)
    /// - drafting: commit to the draft branch → navigation entry (new pages
    ///   only)
    pub async fn save(&mut self, doc: &mut Document, options: &SaveOptions) -> Result<()> {
        let path = doc.path.clone();
        match (&self.state, options.mode) {
            (PublishState::Editing, SaveMode::Direct) => {
                self.commit(doc, &options.message).await?;
            }
            (PublishState::Editing, SaveMode::Draft) => {
                self.create_draft_branch(&path).await?;
                self.commit(doc, &options.message).await?;
                self.create_pr(&path).await?;
                if options.new_file {
                    self.update_nav(&doc.text(), &path).await?;
                }
            }
            (PublishState::Drafting { .. }, _) => {
                self.commit(doc, &options.message).await?;
                if options.new_file {
                    self.update_nav(&doc.text(), &path).await?;
                }
            }
            (other, _) => {
                return Err(Error::InvalidState(format!(
                    "cannot save while {}",
                    other.name()
                )));
            }
        }

        Ok(())
    }

    /// Find the open pull request for the draft branch
    pub async fn get_pr(&mut self) -> Result<PullRequest> {
        let branch = self.drafting_branch("look up a pull request")?;

        self.events.on_stage(Stage::FindingPr).await;
        let pr = self
            .service
            .find_open_pr(&branch)
            .await?
            .ok_or_else(|| Error::PullRequestNotFound(branch.clone()))?;

        self.state = self.state.with_pull_request(pr.number)?;
        self.events.on_pull_request(&pr).await;
        Ok(pr)
    }

    /// Merge the cached pull request
    pub async fn merge_pr(&mut self) -> Result<u64> {
        let number = self.state.pr_number().ok_or(Error::NoPullRequest)?;
        self.state = self.state.begin_merge()?;

        self.events.on_stage(Stage::Merging).await;
        self.service
            .merge_pr(number, &self.settings.merge_message)
            .await?;

        self.state = self.state.merged()?;
        info!("Merged pull request #{number}");
        self.events
            .on_message(&format!("Merged pull request #{number}"))
            .await;
        Ok(number)
    }

    /// Delete the draft branch and return to the default branch
    ///
    /// Refuses without a request while on the default branch.
    pub async fn delete_branch(&mut self) -> Result<()> {
        let next = self.state.branch_deleted(&self.settings.default_branch)?;
        let branch = self
            .state
            .draft_branch()
            .map(ToString::to_string)
            .ok_or_else(|| Error::InvalidState("no draft branch to delete".to_string()))?;

        self.events.on_stage(Stage::DeletingBranch).await;
        self.service.delete_branch(&branch).await?;

        self.branches.remove(&branch);
        self.state = next;
        info!("Deleted draft branch {branch}");
        self.events
            .on_message(&format!("Deleted draft branch {branch}"))
            .await;
        Ok(())
    }

    /// Save through a draft, then merge it and delete the branch
    pub async fn publish(&mut self, doc: &mut Document, options: &SaveOptions) -> Result<()> {
        let options = SaveOptions {
            mode: SaveMode::Draft,
            ..options.clone()
        };
        self.save(doc, &options).await?;
        self.finish_draft().await
    }

    /// Run the remaining publish stages for the current draft
    ///
    /// Picks up where an earlier chain stopped: a draft still needs its pull
    /// request looked up, a failed merge is retried, a merged draft only
    /// needs its branch deleted.
    pub async fn finish_draft(&mut self) -> Result<()> {
        match &self.state {
            PublishState::Editing => {
                return Err(Error::InvalidState("no draft in progress to publish".to_string()));
            }
            PublishState::Drafting { .. } => {
                self.get_pr().await?;
                self.merge_pr().await?;
            }
            PublishState::Merging { .. } => {
                self.merge_pr().await?;
            }
            PublishState::CleaningUp { .. } => {}
        }

        self.delete_branch().await?;
        self.events.on_stage(Stage::Complete).await;
        Ok(())
    }

    /// Switch to an existing draft branch for a path
    pub fn resume_draft(&mut self, path: &str) -> Result<()> {
        let draft = self
            .branches
            .draft_for(path)
            .ok_or_else(|| Error::DraftNotFound(path.to_string()))?;
        self.state = self.state.enter_draft(draft.branch)?;
        Ok(())
    }

    fn drafting_branch(&self, action: &str) -> Result<String> {
        match &self.state {
            PublishState::Drafting { branch, .. } => Ok(branch.clone()),
            other => Err(Error::InvalidState(format!(
                "cannot {action} while {}",
                other.name()
            ))),
        }
    }
}
