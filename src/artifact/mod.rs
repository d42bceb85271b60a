//! Built-site publishing
//!
//! A site built from the repository is compressed in place and mirrored
//! into an [`ObjectStore`] under a key prefix.

mod gzip;
mod store;
mod sync;

pub use gzip::{COMPRESSED_EXTENSIONS, compress_site, gzip, is_gzipped, should_compress};
pub use store::{DirectoryStore, META_DIR, ObjectMeta, ObjectStore};
pub use sync::{CACHE_CONTROL, SyncReport, object_meta, sync_site};

use crate::error::Result;
use std::path::Path;

/// Compress then sync a built site
pub async fn publish_site(dir: &Path, store: &dyn ObjectStore, prefix: &str) -> Result<SyncReport> {
    let compressed = compress_site(dir)?;
    tracing::debug!("{} newly compressed file(s)", compressed.len());
    sync_site(dir, store, prefix).await
}
