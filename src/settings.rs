//! Site settings
//!
//! Well-known paths and fixed strings used by the editor, with environment
//! overrides. Values not found in the environment fall back to
//! [`Settings::default`].

use std::env;

/// Default location of uploaded assets
pub const DEFAULT_UPLOAD_ROOT: &str = "assets/uploads";

/// Default clone service endpoint
pub const DEFAULT_CLONE_SERVICE_URL: &str = "https://federalist-builder.18f.gov";

/// Default build engine passed to the clone service
pub const DEFAULT_ENGINE: &str = "jekyll";

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Branch edits are merged into
    pub default_branch: String,
    /// Site configuration file
    pub config_path: String,
    /// Navigation data file
    pub nav_path: String,
    /// Directory holding uploaded assets
    pub upload_root: String,
    /// Message used when merging a draft pull request
    pub merge_message: String,
    /// Base URL of the clone service
    pub clone_service_url: String,
    /// Also send the token as an `access_token` query parameter
    pub legacy_query_token: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            config_path: "_config.yml".to_string(),
            nav_path: "_data/navbar.yml".to_string(),
            upload_root: DEFAULT_UPLOAD_ROOT.to_string(),
            merge_message: "Merged draft via draftpress".to_string(),
            clone_service_url: DEFAULT_CLONE_SERVICE_URL.to_string(),
            legacy_query_token: false,
        }
    }
}

impl Settings {
    /// Settings with environment overrides applied
    ///
    /// Reads `DRAFTPRESS_DEFAULT_BRANCH`, `DRAFTPRESS_UPLOAD_ROOT`,
    /// `DRAFTPRESS_CLONE_URL` and `DRAFTPRESS_LEGACY_QUERY_TOKEN`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(branch) = env::var("DRAFTPRESS_DEFAULT_BRANCH") {
            settings.default_branch = branch;
        }
        if let Ok(root) = env::var("DRAFTPRESS_UPLOAD_ROOT") {
            settings.upload_root = root.trim_matches('/').to_string();
        }
        if let Ok(url) = env::var("DRAFTPRESS_CLONE_URL") {
            settings.clone_service_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(flag) = env::var("DRAFTPRESS_LEGACY_QUERY_TOKEN") {
            settings.legacy_query_token = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        settings
    }

    /// Config files fetched when a site is loaded
    pub fn config_files(&self) -> Vec<String> {
        vec![self.config_path.clone(), self.nav_path.clone()]
    }

    /// Whether a path lies under the upload root
    pub fn is_upload(&self, path: &str) -> bool {
        path.strip_prefix(self.upload_root.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}
