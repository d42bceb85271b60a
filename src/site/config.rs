//! Site configuration loading
//!
//! Config files are fetched concurrently and joined; each one lands in the
//! cache as absent, malformed or parsed.

use crate::error::Result;
use crate::platform::ContentService;
use crate::types::FileContent;
use futures::future::join_all;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// State of one config file after loading
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFile {
    /// The file does not exist on the branch
    Absent,
    /// The file exists but is not valid YAML
    Malformed {
        /// Decoded file text
        raw: String,
        /// Blob SHA
        sha: String,
        /// Parser message
        reason: String,
    },
    /// The file exists and parsed
    Parsed {
        /// Parsed document
        yaml: Value,
        /// Decoded file text
        raw: String,
        /// Blob SHA
        sha: String,
    },
}

impl ConfigFile {
    /// Whether the file exists
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Parsed document, if any
    pub const fn yaml(&self) -> Option<&Value> {
        match self {
            Self::Parsed { yaml, .. } => Some(yaml),
            _ => None,
        }
    }

    /// Decoded text, if present
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Malformed { raw, .. } | Self::Parsed { raw, .. } => Some(raw),
        }
    }

    /// Blob SHA, if present
    pub fn sha(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Malformed { sha, .. } | Self::Parsed { sha, .. } => Some(sha),
        }
    }

    /// Classify a fetched file
    pub fn from_fetch(file: Option<FileContent>) -> Self {
        let Some(file) = file else {
            return Self::Absent;
        };

        let raw = String::from_utf8_lossy(&file.content).into_owned();
        match serde_yaml::from_str::<Value>(&raw) {
            Ok(yaml) => Self::Parsed {
                yaml,
                raw,
                sha: file.sha,
            },
            Err(e) => {
                warn!("{} is not valid YAML: {e}", file.path);
                Self::Malformed {
                    raw,
                    sha: file.sha,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Config files by path
#[derive(Debug, Clone, Default)]
pub struct ConfigCache {
    files: BTreeMap<String, ConfigFile>,
    site_config_path: String,
}

impl ConfigCache {
    /// Build a cache from already-classified files
    pub fn new(site_config_path: impl Into<String>, files: BTreeMap<String, ConfigFile>) -> Self {
        Self {
            files,
            site_config_path: site_config_path.into(),
        }
    }

    /// Entry for a path; unknown paths read as absent
    pub fn get(&self, path: &str) -> &ConfigFile {
        const ABSENT: &ConfigFile = &ConfigFile::Absent;
        self.files.get(path).unwrap_or(ABSENT)
    }

    /// Replace an entry after writing it
    pub fn insert(&mut self, path: impl Into<String>, file: ConfigFile) {
        self.files.insert(path.into(), file);
    }

    /// All entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigFile)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn default_entries(&self) -> impl Iterator<Item = &Value> {
        self.get(&self.site_config_path)
            .yaml()
            .and_then(|yaml| yaml.get("defaults"))
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
    }

    /// Front-matter defaults scoped to the repository root
    ///
    /// The `values` of the `defaults` entry whose `scope.path` is `""`,
    /// or an empty mapping when there is none.
    pub fn defaults(&self) -> Value {
        self.default_entries()
            .find(|entry| {
                entry
                    .get("scope")
                    .and_then(|scope| scope.get("path"))
                    .and_then(Value::as_str)
                    == Some("")
            })
            .and_then(|entry| entry.get("values"))
            .cloned()
            .unwrap_or_else(|| Value::Mapping(Mapping::new()))
    }

    /// Root defaults rendered as a front-matter block
    pub fn default_front_matter(&self) -> Result<String> {
        let defaults = self.defaults();
        let body = match &defaults {
            Value::Mapping(m) if m.is_empty() => String::new(),
            other => serde_yaml::to_string(other)?,
        };
        Ok(format!("---\n{body}---\n"))
    }

    /// Layout names declared across all `defaults` entries, first seen first
    pub fn layouts(&self) -> Vec<String> {
        let mut layouts: Vec<String> = Vec::new();
        for layout in self
            .default_entries()
            .filter_map(|entry| entry.get("values")?.get("layout")?.as_str())
        {
            if !layouts.iter().any(|l| l == layout) {
                layouts.push(layout.to_string());
            }
        }
        layouts
    }
}

/// Fetch and classify config files, all at once
///
/// Fails if any fetch fails at the transport level; YAML problems only
/// mark the file malformed.
pub async fn load_config(
    service: &dyn ContentService,
    site_config_path: &str,
    paths: &[String],
    branch: &str,
) -> Result<ConfigCache> {
    let fetches = paths.iter().map(|path| service.get_file(path, branch));
    let results = join_all(fetches).await;

    let mut files = BTreeMap::new();
    for (path, result) in paths.iter().zip(results) {
        let file = ConfigFile::from_fetch(result?);
        debug!("config {path}: present={}", file.is_present());
        files.insert(path.clone(), file);
    }

    Ok(ConfigCache::new(site_config_path, files))
}
