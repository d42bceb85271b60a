//! Auth command - test and explain GitHub authentication

use crate::cli::style::{Stylize, check};
use anstream::println;
use draftpress::auth::{AuthSource, get_github_auth, test_github_auth};
use draftpress::error::Result;
use std::env;

/// What `draftpress auth` does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Validate the token against the API
    Test,
    /// Print setup instructions
    Setup,
}

/// Run the auth test command
pub async fn run_auth_test() -> Result<()> {
    println!("Testing GitHub authentication...");
    let config = get_github_auth().await?;
    let host = env::var("GH_HOST").ok().filter(|h| h != "github.com");
    let username = test_github_auth(&config, host.as_deref()).await?;

    let source = match config.source {
        AuthSource::Cli => "gh CLI",
        AuthSource::EnvVar => "environment",
    };
    println!("{} Authenticated as {}", check(), username.accent());
    println!("  token source: {}", source.muted());
    if let Some(host) = host {
        println!("  host: {}", host.muted());
    }
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "GitHub Authentication Setup".emphasis());
    println!();
    println!("Option 1: GitHub CLI (recommended)");
    println!("  Install: https://cli.github.com/");
    println!("  Run: {}", "gh auth login".accent());
    println!();
    println!("Option 2: Environment variable");
    println!("  Set GITHUB_TOKEN or GH_TOKEN (needs the repo scope)");
    println!();
    println!("For GitHub Enterprise:");
    println!("  Set GH_HOST to your instance hostname");
}

/// Dispatch an auth action
pub async fn run_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Test => run_auth_test().await,
        AuthAction::Setup => {
            run_auth_setup();
            Ok(())
        }
    }
}
