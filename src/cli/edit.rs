//! Document commands - show, save, publish, finish, upload and list assets

use crate::cli::progress::CliEvents;
use crate::cli::session::Session;
use crate::cli::style::{Stylize, bullet, plural};
use anstream::{print, println};
use dialoguer::Confirm;
use draftpress::error::{Error, Result};
use draftpress::publish::SaveOptions;
use draftpress::site::{AssetCategory, Site};
use std::path::Path;
use tracing::debug;

/// Flags shared by save and publish
pub struct EditArgs<'a> {
    /// Repository path of the document
    pub path: &'a str,
    /// Local file holding the new content
    pub file: &'a Path,
    /// Commit message; derived from the path when None
    pub message: Option<&'a str>,
    /// The document is a new page
    pub new_page: bool,
}

impl EditArgs<'_> {
    fn options(&self) -> SaveOptions {
        let message = self
            .message
            .map_or_else(|| format!("Update {}", self.path), ToString::to_string);
        let options = SaveOptions::new(message);
        if self.new_page {
            options.new_page()
        } else {
            options
        }
    }
}

/// Switch to an existing draft for `path`, if there is one
fn resume_if_drafted(site: &mut Site<'_>, path: &str) -> Result<bool> {
    match site.resume_draft(path) {
        Ok(()) => {
            debug!("Resumed draft branch {}", site.working_branch());
            Ok(true)
        }
        Err(Error::DraftNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Ask before merging, unless `yes`
fn confirm_merge(path: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(format!("Merge the draft of {path} into the default branch?"))
        .default(false)
        .interact()
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Print a document from the working branch (or its draft)
pub async fn run_show(session: &Session, path: &str, verbose: bool) -> Result<()> {
    let events = CliEvents::new(verbose);
    let mut site = session.load(&events).await?;
    resume_if_drafted(&mut site, path)?;

    let doc = site.open_document(path).await?;
    if doc.sha.is_none() {
        return Err(Error::Parse(format!(
            "{path} does not exist on {}",
            site.working_branch()
        )));
    }
    print!("{}", doc.text());
    Ok(())
}

/// Save a document; `draft` routes a save on the default branch through a
/// draft branch and pull request
pub async fn run_save(
    session: &Session,
    args: &EditArgs<'_>,
    draft: bool,
    verbose: bool,
) -> Result<()> {
    let content = tokio::fs::read(args.file).await?;
    let events = CliEvents::new(verbose);
    let mut site = session.load(&events).await?;

    let resumed = resume_if_drafted(&mut site, args.path)?;
    let mut doc = site.open_document(args.path).await?;
    doc.content = content;

    let options = if draft && !resumed {
        args.options().draft()
    } else {
        args.options()
    };
    site.save(&mut doc, &options).await?;

    println!(
        "Saved {} to {}",
        args.path.accent(),
        site.working_branch().accent()
    );
    Ok(())
}

/// Save through a draft, then merge and clean up after confirmation
pub async fn run_publish(
    session: &Session,
    args: &EditArgs<'_>,
    yes: bool,
    verbose: bool,
) -> Result<()> {
    let content = tokio::fs::read(args.file).await?;
    let events = CliEvents::new(verbose);
    let mut site = session.load(&events).await?;

    resume_if_drafted(&mut site, args.path)?;
    let mut doc = site.open_document(args.path).await?;
    doc.content = content;
    site.save(&mut doc, &args.options().draft()).await?;

    if !confirm_merge(args.path, yes)? {
        println!("Draft left open on {}", site.working_branch().accent());
        return Ok(());
    }
    site.finish_draft().await
}

/// Merge and clean up an existing draft
pub async fn run_finish(session: &Session, path: &str, yes: bool, verbose: bool) -> Result<()> {
    let events = CliEvents::new(verbose);
    let mut site = session.load(&events).await?;
    site.resume_draft(path)?;

    if !confirm_merge(path, yes)? {
        return Ok(());
    }
    site.finish_draft().await
}

/// Upload a local file into the upload root
pub async fn run_upload(
    session: &Session,
    file: &Path,
    name: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let file_name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Parse(format!("cannot name upload for {}", file.display())))?
            .to_string(),
    };
    let content = tokio::fs::read(file).await?;

    let events = CliEvents::new(verbose);
    let mut site = session.load(&events).await?;
    let doc = site.upload(&file_name, content).await?;

    println!("{}", doc.path);
    Ok(())
}

/// List uploaded assets, optionally filtered by category
pub async fn run_assets(session: &Session, kind: Option<&str>, verbose: bool) -> Result<()> {
    let category = kind.map(str::parse::<AssetCategory>).transpose()?;
    let events = CliEvents::new(verbose);
    let site = session.load(&events).await?;

    let entries = match category {
        Some(category) => site.filter_assets(category),
        None => site.assets().entries().iter().collect(),
    };

    for entry in &entries {
        println!("{} {} {}", bullet(), entry.path, format!("{} B", entry.size).muted());
    }
    println!(
        "{} asset{}",
        entries.len().accent(),
        plural(entries.len())
    );
    Ok(())
}
