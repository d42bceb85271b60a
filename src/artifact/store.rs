//! Object storage for built sites

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding per-object metadata inside a [`DirectoryStore`]
pub const META_DIR: &str = ".draftpress-meta";

/// Headers stored alongside an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// `Content-Type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `Content-Encoding`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    /// `Cache-Control`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    /// Set by the store on upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// A bucket of keyed objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, replacing any existing one
    async fn put(&self, key: &str, body: Vec<u8>, meta: &ObjectMeta) -> Result<()>;

    /// Keys starting with `prefix`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Remove an object; missing keys are not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Metadata of an object, if it exists
    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>>;
}

/// Filesystem-backed store: objects are files under a root directory,
/// metadata is a JSON sidecar under [`META_DIR`]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(checked_key(key)?))
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf> {
        let key = checked_key(key)?;
        Ok(self.root.join(META_DIR).join(format!("{key}.json")))
    }
}

/// Reject keys that would escape the store root
fn checked_key(key: &str) -> Result<&str> {
    let valid = !key.is_empty()
        && !key.starts_with(META_DIR)
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(key)
    } else {
        Err(Error::Store(format!("invalid object key '{key}'")))
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn list_keys(root: &Path, prefix: &str) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut keys = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != META_DIR);
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if key.starts_with(prefix) {
            keys.push(key);
        }
    }

    keys.sort();
    Ok(keys)
}

#[async_trait]
impl ObjectStore for DirectoryStore {
    async fn put(&self, key: &str, body: Vec<u8>, meta: &ObjectMeta) -> Result<()> {
        let meta = ObjectMeta {
            last_modified: Some(Utc::now()),
            ..meta.clone()
        };
        write_file(&self.object_path(key)?, &body).await?;
        write_file(&self.meta_path(key)?, &serde_json::to_vec_pretty(&meta)?).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let root = self.root.clone();
        let prefix = prefix.to_string();
        tokio::task::spawn_blocking(move || list_keys(&root, &prefix))
            .await
            .map_err(|e| Error::Store(e.to_string()))?
    }

    async fn delete(&self, key: &str) -> Result<()> {
        remove_if_present(&self.object_path(key)?).await?;
        remove_if_present(&self.meta_path(key)?).await
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>> {
        if !tokio::fs::try_exists(self.object_path(key)?).await? {
            return Ok(None);
        }
        match tokio::fs::read(self.meta_path(key)?).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Some(ObjectMeta::default())),
            Err(e) => Err(e.into()),
        }
    }
}
