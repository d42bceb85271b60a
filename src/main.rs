//! draftpress - draft, review and publish site content stored in GitHub
//!
//! CLI binary for editing a Jekyll-style site repository through drafts
//! and pull requests.

use anyhow::Result;
use clap::{Parser, Subcommand};
use draftpress::settings::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "draftpress")]
#[command(about = "Draft, review and publish site content stored in GitHub")]
#[command(version)]
struct Cli {
    /// Site repository (owner/name or URL)
    #[arg(short, long, global = true, env = "DRAFTPRESS_REPO")]
    repo: Option<String>,

    /// Branch drafts are merged into (default: main)
    #[arg(long, global = true)]
    default_branch: Option<String>,

    /// Show load events and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show config, drafts and assets (default)
    Status,

    /// Print a document from the default branch or its draft
    Show {
        /// Repository path of the document
        path: String,
    },

    /// Commit a local file to a document path
    Save {
        /// Repository path of the document
        path: String,

        /// Local file with the new content
        #[arg(short, long)]
        file: PathBuf,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Save through a draft branch and pull request
        #[arg(long)]
        draft: bool,

        /// The document is a new page (adds a navigation entry)
        #[arg(long)]
        new_page: bool,
    },

    /// Save through a draft, then merge and delete the draft branch
    Publish {
        /// Repository path of the document
        path: String,

        /// Local file with the new content
        #[arg(short, long)]
        file: PathBuf,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// The document is a new page (adds a navigation entry)
        #[arg(long)]
        new_page: bool,

        /// Merge without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Merge an existing draft and delete its branch
    Finish {
        /// Repository path of the drafted document
        path: String,

        /// Merge without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a file into the asset directory
    Upload {
        /// Local file to upload
        file: PathBuf,

        /// Name in the asset directory (default: the local file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List uploaded assets
    Assets {
        /// Only list `images` or `documents`
        #[arg(long)]
        kind: Option<String>,
    },

    /// Create a new site repository from a template
    Clone {
        /// Template repository (owner/name)
        source: String,

        /// Name of the new repository
        destination: String,

        /// Create under this organization instead of your account
        #[arg(long)]
        org: Option<String>,

        /// Branch to create (default: the default branch)
        #[arg(long)]
        branch: Option<String>,

        /// Build engine (default: jekyll)
        #[arg(long)]
        engine: Option<String>,
    },

    /// Compress a built site and sync it into a bucket directory
    Deploy {
        /// Built site directory
        site_dir: PathBuf,

        /// Bucket directory
        #[arg(long)]
        bucket: PathBuf,

        /// Key prefix inside the bucket
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "draftpress=debug" } else { "draftpress=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::from_env();
    if let Some(branch) = cli.default_branch {
        settings.default_branch = branch;
    }
    let repo = cli.repo.as_deref();
    let verbose = cli.verbose;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            let session = cli::Session::connect(repo, settings).await?;
            cli::run_status(&session, verbose).await?;
        }
        Commands::Show { path } => {
            let session = cli::Session::connect(repo, settings).await?;
            cli::run_show(&session, &path, verbose).await?;
        }
        Commands::Save {
            path,
            file,
            message,
            draft,
            new_page,
        } => {
            let session = cli::Session::connect(repo, settings).await?;
            let args = cli::EditArgs {
                path: &path,
                file: &file,
                message: message.as_deref(),
                new_page,
            };
            cli::run_save(&session, &args, draft, verbose).await?;
        }
        Commands::Publish {
            path,
            file,
            message,
            new_page,
            yes,
        } => {
            let session = cli::Session::connect(repo, settings).await?;
            let args = cli::EditArgs {
                path: &path,
                file: &file,
                message: message.as_deref(),
                new_page,
            };
            cli::run_publish(&session, &args, yes, verbose).await?;
        }
        Commands::Finish { path, yes } => {
            let session = cli::Session::connect(repo, settings).await?;
            cli::run_finish(&session, &path, yes, verbose).await?;
        }
        Commands::Upload { file, name } => {
            let session = cli::Session::connect(repo, settings).await?;
            cli::run_upload(&session, &file, name.as_deref(), verbose).await?;
        }
        Commands::Assets { kind } => {
            let session = cli::Session::connect(repo, settings).await?;
            cli::run_assets(&session, kind.as_deref(), verbose).await?;
        }
        Commands::Clone {
            source,
            destination,
            org,
            branch,
            engine,
        } => {
            cli::run_clone(&settings, &source, &destination, org, branch, engine).await?;
        }
        Commands::Deploy {
            site_dir,
            bucket,
            prefix,
        } => {
            cli::run_deploy(&site_dir, &bucket, &prefix).await?;
        }
        Commands::Auth { action } => {
            let action = match action {
                AuthCommand::Test => cli::AuthAction::Test,
                AuthCommand::Setup => cli::AuthAction::Setup,
            };
            cli::run_auth(action).await?;
        }
    }

    Ok(())
}
