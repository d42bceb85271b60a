//! Clone command - create a new site repository from a template

use crate::cli::style::{Stream, Stylize, check, hyperlink_url};
use anstream::println;
use draftpress::auth::get_github_auth;
use draftpress::clone::{CloneRequest, HttpCloneService, RepoCloner};
use draftpress::error::{Error, Result};
use draftpress::platform::{GitHubService, parse_repo_info};
use draftpress::settings::Settings;

/// Run the clone command; `source` is `owner/repo` or a repository URL
pub async fn run_clone(
    settings: &Settings,
    source: &str,
    destination: &str,
    org: Option<String>,
    branch: Option<String>,
    engine: Option<String>,
) -> Result<()> {
    let config = parse_repo_info(source)
        .map_err(|e| Error::InvalidCloneRequest(format!("source '{source}': {e}")))?;

    let request = CloneRequest {
        source_owner: config.owner.clone(),
        source_repo: config.repo.clone(),
        destination_org: org,
        destination_repo: destination.to_string(),
        destination_branch: branch,
        engine,
    };
    request.validate()?;

    let auth = get_github_auth().await?;
    let github = GitHubService::new(auth.token.clone(), config, settings.legacy_query_token);
    let clone_service = HttpCloneService::new(&settings.clone_service_url, Some(auth.token));

    println!(
        "Cloning {} into {}...",
        source.accent(),
        destination.accent()
    );
    let cloner = RepoCloner::new(&github, &clone_service, &settings.default_branch);
    let repo = cloner.clone_repo(&request).await?;

    println!("{} Created {}", check(), repo.full_name.emphasis());
    println!("  {}", hyperlink_url(Stream::Stdout, &repo.html_url));
    Ok(())
}
