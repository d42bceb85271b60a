//! Deploy command - compress a built site and mirror it into a bucket directory

use crate::cli::style::{Stylize, check, plural};
use anstream::println;
use draftpress::artifact::{DirectoryStore, publish_site};
use draftpress::error::{Error, Result};
use std::path::Path;

/// Run the deploy command
pub async fn run_deploy(site_dir: &Path, bucket: &Path, prefix: &str) -> Result<()> {
    if !site_dir.is_dir() {
        return Err(Error::Parse(format!(
            "{} is not a directory",
            site_dir.display()
        )));
    }

    let store = DirectoryStore::new(bucket);
    let report = publish_site(site_dir, &store, prefix).await?;

    println!(
        "{} Uploaded {} file{} to {}",
        check(),
        report.uploaded.len().accent(),
        plural(report.uploaded.len()),
        bucket.join(prefix.trim_matches('/')).display()
    );
    if !report.deleted.is_empty() {
        println!(
            "  removed {} stale object{}",
            report.deleted.len().accent(),
            plural(report.deleted.len())
        );
        for key in &report.deleted {
            println!("    {}", key.muted());
        }
    }
    Ok(())
}
