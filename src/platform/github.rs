//! GitHub content service implementation

use crate::encoding::decode_content;
use crate::error::{Error, Result};
use crate::platform::{ApiPath, ContentService};
use crate::types::{
    Branch, CommitRecord, ContentEntry, FileContent, Namespace, PullRequest, RepoConfig, RepoInfo,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Branches requested per page
const BRANCHES_PER_PAGE: usize = 100;

/// GitHub service using reqwest
pub struct GitHubService {
    client: Client,
    token: String,
    api_base: String,
    legacy_query_token: bool,
    config: RepoConfig,
}

#[derive(Deserialize)]
struct ContentsFile {
    path: String,
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

#[derive(Deserialize)]
struct BranchResponse {
    name: String,
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
    #[serde(default)]
    title: String,
    head: PullRef,
    base: PullRef,
}

#[derive(Deserialize)]
struct PullRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    #[serde(default)]
    default_branch: String,
    html_url: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    ref_field: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct CreatePullPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Serialize)]
struct MergePayload<'a> {
    commit_message: &'a str,
}

#[derive(Serialize)]
struct CreateRepoPayload<'a> {
    name: &'a str,
}

impl From<PullResponse> for PullRequest {
    fn from(pr: PullResponse) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url,
            base_ref: pr.base.ref_field,
            head_ref: pr.head.ref_field,
            title: pr.title,
        }
    }
}

impl From<RepoResponse> for RepoInfo {
    fn from(repo: RepoResponse) -> Self {
        Self {
            full_name: repo.full_name,
            default_branch: repo.default_branch,
            html_url: repo.html_url,
        }
    }
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// A custom host in `config` selects the GitHub Enterprise API at
    /// `https://{host}/api/v3`.
    pub fn new(token: String, config: RepoConfig, legacy_query_token: bool) -> Self {
        let api_base = config.host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            api_base,
            legacy_query_token,
            config,
        }
    }

    /// Point the service at a different API base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL for an API path on the bound repository
    pub fn url(&self, path: &ApiPath<'_>) -> String {
        format!(
            "{}/{}",
            self.api_base,
            path.render(&self.config.owner, &self.config.repo)
        )
    }

    fn request(&self, method: Method, path: &ApiPath<'_>) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");

        let mut builder = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "draftpress");

        if self.legacy_query_token {
            builder = builder.query(&[("access_token", self.token.as_str())]);
        }

        builder
    }
}

/// Turn a non-2xx response into [`Error::GitHubApi`]
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(Error::GitHubApi {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContentService for GitHubService {
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<FileContent>> {
        let response = self
            .request(Method::GET, &ApiPath::Contents(path))
            .query(&[("ref", branch)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let file: ContentsFile = check(response).await?.json().await?;
        Ok(Some(FileContent {
            content: decode_content(&file.content)?,
            path: file.path,
            sha: file.sha,
        }))
    }

    async fn list_directory(&self, path: &str, branch: &str) -> Result<Vec<ContentEntry>> {
        let response = self
            .request(Method::GET, &ApiPath::Contents(path))
            .query(&[("ref", branch)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        Ok(check(response).await?.json().await?)
    }

    async fn put_file(&self, record: &CommitRecord) -> Result<String> {
        let response = self
            .request(Method::PUT, &ApiPath::Contents(&record.path))
            .json(record)
            .send()
            .await?;

        let put: PutResponse = check(response).await?.json().await?;
        Ok(put.content.sha)
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        let per_page = BRANCHES_PER_PAGE.to_string();
        let mut branches = Vec::new();
        let mut page = 1usize;

        loop {
            let page_param = page.to_string();
            let response = self
                .request(Method::GET, &ApiPath::Repo("branches"))
                .query(&[("per_page", per_page.as_str()), ("page", page_param.as_str())])
                .send()
                .await?;

            let batch: Vec<BranchResponse> = check(response).await?.json().await?;
            let done = batch.len() < BRANCHES_PER_PAGE;
            branches.extend(batch.into_iter().map(|b| Branch {
                name: b.name,
                sha: b.commit.sha,
            }));

            if done {
                return Ok(branches);
            }
            page += 1;
        }
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        let payload = CreateRefPayload {
            ref_field: format!("refs/heads/{name}"),
            sha,
        };

        let response = self
            .request(Method::POST, &ApiPath::Repo("git/refs"))
            .json(&payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        let method = format!("git/refs/heads/{name}");
        let response = self
            .request(Method::DELETE, &ApiPath::Repo(&method))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        let payload = CreatePullPayload { title, head, base };

        let response = self
            .request(Method::POST, &ApiPath::Repo("pulls"))
            .json(&payload)
            .send()
            .await?;

        let pr: PullResponse = check(response).await?.json().await?;
        Ok(pr.into())
    }

    async fn find_open_pr(&self, head: &str) -> Result<Option<PullRequest>> {
        let head = format!("{}:{head}", self.config.owner);

        let response = self
            .request(Method::GET, &ApiPath::Repo("pulls"))
            .query(&[("head", head.as_str()), ("state", "open")])
            .send()
            .await?;

        let prs: Vec<PullResponse> = check(response).await?.json().await?;
        Ok(prs.into_iter().next().map(Into::into))
    }

    async fn merge_pr(&self, number: u64, message: &str) -> Result<()> {
        let method = format!("pulls/{number}/merge");
        let payload = MergePayload {
            commit_message: message,
        };

        let response = self
            .request(Method::PUT, &ApiPath::Repo(&method))
            .json(&payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let route = format!("repos/{owner}");
        let response = self
            .request(
                Method::GET,
                &ApiPath::Route {
                    route: &route,
                    method: repo,
                },
            )
            .send()
            .await?;

        let repo: RepoResponse = check(response).await?.json().await?;
        Ok(repo.into())
    }

    async fn create_repo(&self, namespace: &Namespace, name: &str) -> Result<RepoInfo> {
        let route = match namespace {
            Namespace::User => "user".to_string(),
            Namespace::Org(org) => format!("orgs/{org}"),
        };

        let response = self
            .request(
                Method::POST,
                &ApiPath::Route {
                    route: &route,
                    method: "repos",
                },
            )
            .json(&CreateRepoPayload { name })
            .send()
            .await?;

        let repo: RepoResponse = check(response).await?.json().await?;
        Ok(repo.into())
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}
