//! Repository reference parsing

use crate::error::{Error, Result};
use crate::types::RepoConfig;
use regex::Regex;
use std::env;
use std::sync::OnceLock;

fn ssh_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^git@([^:]+):(.+?)(?:\.git)?/?$").expect("valid regex"))
}

fn https_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://([^/]+)/(.+?)(?:\.git)?/?$").expect("valid regex"))
}

/// Parse a repository reference into owner, repo and host
///
/// Accepts `owner/repo`, `https://host/owner/repo(.git)` and
/// `git@host:owner/repo.git`. A bare `owner/repo` uses `GH_HOST` when set.
pub fn parse_repo_info(spec: &str) -> Result<RepoConfig> {
    let spec = spec.trim();

    let (host, path) = if let Some(caps) = ssh_pattern()
        .captures(spec)
        .or_else(|| https_pattern().captures(spec))
    {
        (Some(caps[1].to_string()), caps[2].to_string())
    } else {
        (env::var("GH_HOST").ok(), spec.to_string())
    };

    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let [owner, repo] = parts.as_slice() else {
        return Err(Error::Parse(format!(
            "invalid repository '{spec}': expected owner/repo"
        )));
    };

    Ok(RepoConfig {
        owner: (*owner).to_string(),
        repo: (*repo).to_string(),
        host: host.filter(|h| h != "github.com"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_https() {
        let config = parse_repo_info("https://github.com/18f/federalist.git").unwrap();
        assert_eq!(config.owner, "18f");
        assert_eq!(config.repo, "federalist");
        assert!(config.host.is_none());
    }

    #[test]
    fn test_parse_github_ssh() {
        let config = parse_repo_info("git@github.com:18f/federalist.git").unwrap();
        assert_eq!(config.owner, "18f");
        assert_eq!(config.repo, "federalist");
    }

    #[test]
    fn test_parse_enterprise_host() {
        let config = parse_repo_info("https://github.example.com/team/site").unwrap();
        assert_eq!(config.host.as_deref(), Some("github.example.com"));
        assert_eq!(config.repo, "site");
    }

    #[test]
    fn test_parse_rejects_nested_path() {
        assert!(parse_repo_info("https://github.com/a/b/c").is_err());
        assert!(parse_repo_info("just-a-name").is_err());
    }
}
