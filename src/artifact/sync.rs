//! Mirror a built site directory into an object store

use super::gzip::{is_gzipped, should_compress};
use super::store::{ObjectMeta, ObjectStore};
use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// `Cache-Control` set on every uploaded object
pub const CACHE_CONTROL: &str = "max-age=60";

/// Keys written and removed by a sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Keys uploaded
    pub uploaded: Vec<String>,
    /// Remote keys deleted because they no longer exist locally
    pub deleted: Vec<String>,
}

fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}/")
    }
}

fn local_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((relative, entry.path().to_path_buf()));
    }
    Ok(files)
}

/// Metadata for a local file about to be uploaded
pub fn object_meta(path: &Path, body: &[u8]) -> ObjectMeta {
    ObjectMeta {
        content_type: Some(
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        ),
        content_encoding: (should_compress(path) && is_gzipped(body)).then(|| "gzip".to_string()),
        cache_control: Some(CACHE_CONTROL.to_string()),
        last_modified: None,
    }
}

/// Upload every file under `dir` to `prefix/<relative path>`, then delete
/// keys under the prefix with no local counterpart
pub async fn sync_site(dir: &Path, store: &dyn ObjectStore, prefix: &str) -> Result<SyncReport> {
    let prefix = normalize_prefix(prefix);
    let mut report = SyncReport::default();

    for (relative, path) in local_files(dir)? {
        let body = tokio::fs::read(&path).await?;
        let meta = object_meta(&path, &body);
        let key = format!("{prefix}{relative}");
        debug!(
            "Uploading {key} ({})",
            meta.content_encoding.as_deref().unwrap_or("identity")
        );
        store.put(&key, body, &meta).await?;
        report.uploaded.push(key);
    }

    let local: HashSet<&str> = report.uploaded.iter().map(String::as_str).collect();
    let stale: Vec<String> = store
        .list(&prefix)
        .await?
        .into_iter()
        .filter(|key| !local.contains(key.as_str()))
        .collect();

    for key in stale {
        store.delete(&key).await?;
        report.deleted.push(key);
    }

    info!(
        "Synced {}: {} uploaded, {} deleted",
        dir.display(),
        report.uploaded.len(),
        report.deleted.len()
    );
    Ok(report)
}
