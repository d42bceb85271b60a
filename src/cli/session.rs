//! Repository connection shared by the site commands

use draftpress::error::{Error, Result};
use draftpress::platform::{ContentService, create_content_service, parse_repo_info};
use draftpress::publish::SiteEvents;
use draftpress::settings::Settings;
use draftpress::site::Site;

/// A resolved repository and the service talking to it
pub struct Session {
    service: Box<dyn ContentService>,
    settings: Settings,
}

impl Session {
    /// Resolve `repo` (owner/name or URL) and authenticate
    pub async fn connect(repo: Option<&str>, settings: Settings) -> Result<Self> {
        let spec = repo.ok_or_else(|| {
            Error::Parse(
                "no repository given; pass --repo owner/name or set DRAFTPRESS_REPO".to_string(),
            )
        })?;
        let config = parse_repo_info(spec)?;
        let service = create_content_service(&config, &settings).await?;
        Ok(Self { service, settings })
    }

    /// The content service
    pub fn service(&self) -> &dyn ContentService {
        self.service.as_ref()
    }

    /// Load the site, reporting through `events`
    pub async fn load<'a>(&'a self, events: &'a dyn SiteEvents) -> Result<Site<'a>> {
        Site::load(self.service.as_ref(), events, self.settings.clone()).await
    }
}
