//! REST API path construction

/// A path relative to the API base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiPath<'a> {
    /// The bound repository itself: `repos/{owner}/{repo}`
    Root,
    /// A file or directory: `repos/{owner}/{repo}/contents/{path}`
    Contents(&'a str),
    /// A repository sub-resource: `repos/{owner}/{repo}/{method}`
    Repo(&'a str),
    /// A top-level route: `{route}/{method}`
    Route {
        /// Leading segment(s), e.g. `user` or `orgs/18f`
        route: &'a str,
        /// Trailing resource, e.g. `repos`
        method: &'a str,
    },
}

impl ApiPath<'_> {
    /// Render the path for a repository
    pub fn render(&self, owner: &str, repo: &str) -> String {
        match self {
            Self::Root => format!("repos/{owner}/{repo}"),
            Self::Contents(path) => {
                format!("repos/{owner}/{repo}/contents/{}", encode_path(path))
            }
            Self::Repo(method) => format!("repos/{owner}/{repo}/{method}"),
            Self::Route { route, method } => format!("{route}/{method}"),
        }
    }
}

/// Percent-encode each segment of a repository path, keeping separators
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
