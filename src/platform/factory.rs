//! Content service factory
//!
//! Resolves a token and builds the GitHub service for a repository.

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{ContentService, GitHubService};
use crate::settings::Settings;
use crate::types::RepoConfig;

/// Create a content service from configuration
pub async fn create_content_service(
    config: &RepoConfig,
    settings: &Settings,
) -> Result<Box<dyn ContentService>> {
    let auth = get_github_auth().await?;
    Ok(Box::new(GitHubService::new(auth.token, config.clone(), settings.legacy_query_token)))
}
