//! The editor's model of one site repository
//!
//! [`Site::load`] fetches the config files, then the branch list, then the
//! upload directory. The publish operations live in [`crate::publish`].

mod assets;
mod config;
mod drafts;
mod nav;

pub use assets::{AssetCategory, AssetList, fetch_assets};
pub use config::{ConfigCache, ConfigFile, load_config};
pub use drafts::{BranchIndex, Draft, fetch_branches};
pub use nav::{NavEntry, append_entry, derive_title};

use crate::error::Result;
use crate::platform::ContentService;
use crate::publish::{PublishState, SiteEvent, SiteEvents};
use crate::settings::Settings;
use crate::types::{ContentEntry, Document, RepoRef};
use tracing::{info, warn};

/// A loaded site and its publish state
pub struct Site<'a> {
    pub(crate) service: &'a dyn ContentService,
    pub(crate) events: &'a dyn SiteEvents,
    pub(crate) settings: Settings,
    pub(crate) config: ConfigCache,
    pub(crate) branches: BranchIndex,
    pub(crate) assets: AssetList,
    pub(crate) state: PublishState,
}

impl<'a> Site<'a> {
    /// Load config, drafts and assets
    ///
    /// Drafts and assets are only fetched once every config file has been
    /// fetched. Each step reports its own success or error event.
    pub async fn load(
        service: &'a dyn ContentService,
        events: &'a dyn SiteEvents,
        settings: Settings,
    ) -> Result<Self> {
        let config = match load_config(
            service,
            &settings.config_path,
            &settings.config_files(),
            &settings.default_branch,
        )
        .await
        {
            Ok(config) => {
                events.on_event(&SiteEvent::ConfigFetched).await;
                config
            }
            Err(e) => {
                events.on_event(&SiteEvent::ConfigFailed(e.to_string())).await;
                return Err(e);
            }
        };

        let mut site = Self {
            service,
            events,
            settings,
            config,
            branches: BranchIndex::default(),
            assets: AssetList::default(),
            state: PublishState::Editing,
        };

        site.refresh_drafts().await?;
        site.refresh_assets().await?;

        let repo = service.config();
        info!(
            "Loaded {}/{}: {} draft(s), {} asset(s)",
            repo.owner,
            repo.repo,
            site.drafts().len(),
            site.assets.len()
        );

        Ok(site)
    }

    /// Repository and working branch
    pub fn repo(&self) -> RepoRef {
        let config = self.service.config();
        RepoRef {
            owner: config.owner.clone(),
            name: config.repo.clone(),
            branch: self.working_branch().to_string(),
        }
    }

    /// Branch writes currently target
    pub fn working_branch(&self) -> &str {
        self.state.working_branch(&self.settings.default_branch)
    }

    /// Current publish state
    pub const fn state(&self) -> &PublishState {
        &self.state
    }

    /// Settings the site was loaded with
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loaded config files
    pub const fn config(&self) -> &ConfigCache {
        &self.config
    }

    /// Drafts in progress
    pub fn drafts(&self) -> Vec<Draft> {
        self.branches.drafts()
    }

    /// Commit SHA of the default branch, if known
    pub fn default_sha(&self) -> Option<&str> {
        self.branches.default_sha()
    }

    /// Uploaded assets
    pub const fn assets(&self) -> &AssetList {
        &self.assets
    }

    /// Uploaded assets in a category
    pub fn filter_assets(&self, category: AssetCategory) -> Vec<&ContentEntry> {
        self.assets.filter(category)
    }

    /// Re-list branches
    pub async fn refresh_drafts(&mut self) -> Result<()> {
        match fetch_branches(self.service, &self.settings.default_branch).await {
            Ok(branches) => {
                if branches.default_sha().is_none() {
                    warn!(
                        "Default branch '{}' not found; drafts cannot be created",
                        self.settings.default_branch
                    );
                }
                self.branches = branches;
                self.events
                    .on_event(&SiteEvent::DraftsFetched(self.branches.drafts().len()))
                    .await;
                Ok(())
            }
            Err(e) => {
                self.events
                    .on_event(&SiteEvent::DraftsFailed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Re-list the upload root on the working branch
    pub async fn refresh_assets(&mut self) -> Result<()> {
        let branch = self.working_branch().to_string();
        match fetch_assets(self.service, &self.settings.upload_root, &branch).await {
            Ok(assets) => {
                self.assets = assets;
                self.events
                    .on_event(&SiteEvent::AssetsFetched(self.assets.len()))
                    .await;
                Ok(())
            }
            Err(e) => {
                self.events
                    .on_event(&SiteEvent::AssetsFailed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Load a document from the working branch
    ///
    /// A path that does not exist yet yields an empty new document.
    pub async fn open_document(&self, path: &str) -> Result<Document> {
        let file = self.service.get_file(path, self.working_branch()).await?;
        Ok(file.map_or_else(
            || Document::new(path, Vec::new()),
            |f| Document {
                path: path.to_string(),
                content: f.content,
                sha: Some(f.sha),
            },
        ))
    }
}
