//! Repository cloning
//!
//! Three ordered steps, any of which stops the chain: check the source is
//! readable, create the destination repository, then hand the copy itself
//! to the clone service.

use crate::error::{Error, Result};
use crate::platform::ContentService;
use crate::settings::DEFAULT_ENGINE;
use crate::types::{Namespace, RepoInfo};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to clone where
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneRequest {
    /// Owner of the template repository
    pub source_owner: String,
    /// Template repository name
    pub source_repo: String,
    /// Organization for the new repository; the user's account when None
    pub destination_org: Option<String>,
    /// Name of the new repository
    pub destination_repo: String,
    /// Branch to create; the default branch when None
    pub destination_branch: Option<String>,
    /// Build engine; `jekyll` when None
    pub engine: Option<String>,
}

impl CloneRequest {
    /// Check every required identifier is present
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("source owner", &self.source_owner),
            ("source repository", &self.source_repo),
            ("destination repository", &self.destination_repo),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidCloneRequest(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Namespace the destination is created in
    pub fn namespace(&self) -> Namespace {
        self.destination_org
            .as_ref()
            .filter(|org| !org.trim().is_empty())
            .map_or(Namespace::User, |org| Namespace::Org(org.clone()))
    }
}

/// Body of a clone service request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneJob {
    /// Template owner
    pub source_owner: String,
    /// Template repository
    pub source_repo: String,
    /// Destination organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_org: Option<String>,
    /// Destination repository
    pub destination_repo: String,
    /// Destination branch
    pub destination_branch: String,
    /// Build engine
    pub engine: String,
}

/// External service that copies repository content
#[async_trait]
pub trait CloneService: Send + Sync {
    /// Submit a clone job
    async fn submit(&self, job: &CloneJob) -> Result<()>;
}

/// Clone service over HTTP (`POST /v0/site/clone`)
pub struct HttpCloneService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCloneService {
    /// Create a client for a clone service base URL
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl CloneService for HttpCloneService {
    async fn submit(&self, job: &CloneJob) -> Result<()> {
        let url = format!("{}/v0/site/clone", self.base_url);

        let mut request = self.client.post(&url).json(job);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::CloneService {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

/// Runs the clone steps against GitHub and a clone service
pub struct RepoCloner<'a> {
    github: &'a dyn ContentService,
    clone_service: &'a dyn CloneService,
    default_branch: String,
}

impl<'a> RepoCloner<'a> {
    /// Create a cloner; `default_branch` fills in a missing destination branch
    pub fn new(
        github: &'a dyn ContentService,
        clone_service: &'a dyn CloneService,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            github,
            clone_service,
            default_branch: default_branch.into(),
        }
    }

    /// Verify the source repository is readable
    pub async fn check_source(&self, request: &CloneRequest) -> Result<RepoInfo> {
        request.validate()?;
        self.github
            .get_repo(&request.source_owner, &request.source_repo)
            .await
    }

    /// Create the destination repository
    pub async fn create_destination(&self, request: &CloneRequest) -> Result<RepoInfo> {
        request.validate()?;
        self.github
            .create_repo(&request.namespace(), &request.destination_repo)
            .await
    }

    /// Clone job for a request, with defaults filled in
    pub fn job(&self, request: &CloneRequest) -> CloneJob {
        CloneJob {
            source_owner: request.source_owner.clone(),
            source_repo: request.source_repo.clone(),
            destination_org: match request.namespace() {
                Namespace::Org(org) => Some(org),
                Namespace::User => None,
            },
            destination_repo: request.destination_repo.clone(),
            destination_branch: request
                .destination_branch
                .clone()
                .unwrap_or_else(|| self.default_branch.clone()),
            engine: request
                .engine
                .clone()
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        }
    }

    /// Ask the clone service to copy the content
    pub async fn request_clone(&self, request: &CloneRequest) -> Result<CloneJob> {
        request.validate()?;
        let job = self.job(request);
        self.clone_service.submit(&job).await?;
        Ok(job)
    }

    /// Run all three steps in order
    pub async fn clone_repo(&self, request: &CloneRequest) -> Result<RepoInfo> {
        request.validate()?;

        let source = self.check_source(request).await?;
        info!("Source {} is readable", source.full_name);

        let destination = self.create_destination(request).await?;
        info!("Created {}", destination.full_name);

        self.request_clone(request).await?;
        info!(
            "Clone of {} into {} requested",
            source.full_name, destination.full_name
        );

        Ok(destination)
    }
}
