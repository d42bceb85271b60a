//! GitHub token resolution

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication
///
/// The token is expected to exist already. Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. gh CLI (`gh auth token`)
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = env::var(var).ok().filter(|t| !t.trim().is_empty()) {
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = get_gh_cli_token().await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No GitHub token found. Set GITHUB_TOKEN or run `gh auth login`".to_string(),
    ))
}

async fn get_gh_cli_token() -> Option<String> {
    let mut command = Command::new("gh");
    command.args(["auth", "token"]);
    if let Ok(host) = env::var("GH_HOST") {
        command.args(["--hostname", &host]);
    }

    let output = command.output().await.ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Check a token against the API, returning the authenticated login
pub async fn test_github_auth(config: &GitHubAuthConfig, host: Option<&str>) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder().personal_token(config.token.clone());

    if let Some(h) = host {
        let base_url = format!("https://{h}/api/v3");
        builder = builder.base_uri(&base_url)?;
    }

    let octocrab = builder.build()?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;

    Ok(user.login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    #[allow(unsafe_code)]
    async fn test_env_token_wins() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            env::set_var("GITHUB_TOKEN", "  abc123\n");
        }
        let auth = get_github_auth().await;
        unsafe {
            env::remove_var("GITHUB_TOKEN");
        }

        let auth = auth.unwrap();
        assert_eq!(auth.token, "abc123");
        assert_eq!(auth.source, AuthSource::EnvVar);
    }
}
