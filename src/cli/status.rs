//! Default status command - summarize a site's config, drafts and assets

use crate::cli::progress::CliEvents;
use crate::cli::session::Session;
use crate::cli::style::{Stylize, bullet, config_badge, plural, short_sha};
use anstream::println;
use draftpress::error::Result;

/// Run the status command (default when no subcommand given)
pub async fn run_status(session: &Session, verbose: bool) -> Result<()> {
    let events = CliEvents::new(verbose);
    let site = session.load(&events).await?;
    let repo = site.repo();

    println!(
        "{} {}/{} {}",
        "Site".emphasis(),
        repo.owner.accent(),
        repo.name.accent(),
        format!("({})", repo.branch).muted()
    );
    match site.default_sha() {
        Some(sha) => println!("  at {}", short_sha(sha).muted()),
        None => println!(
            "  {}",
            "default branch not found; drafts cannot be created".warn()
        ),
    }
    println!();

    println!("{}", "Config".emphasis());
    for (path, file) in site.config().iter() {
        println!("  {} {}", path, config_badge(file));
    }
    let layouts = site.config().layouts();
    if !layouts.is_empty() {
        println!("  layouts: {}", layouts.join(", ").accent());
    }
    println!();

    let drafts = site.drafts();
    println!(
        "{} {}",
        "Drafts".emphasis(),
        format!("({})", drafts.len()).muted()
    );
    if drafts.is_empty() {
        println!("  {}", "none".muted());
    }
    for draft in &drafts {
        println!(
            "  {} {} {}",
            bullet(),
            draft.path.accent(),
            draft.branch.muted()
        );
    }
    println!();

    let assets = site.assets();
    println!(
        "{} asset{} in {}",
        assets.len().accent(),
        plural(assets.len()),
        site.settings().upload_root
    );

    if !drafts.is_empty() {
        println!();
        println!(
            "To publish a draft: {}",
            "draftpress finish <path>".accent()
        );
    }

    Ok(())
}
