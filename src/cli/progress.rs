//! Terminal event sink with a spinner for publish stages

use crate::cli::style::{
    Stream, Stylize, check, cross, hyperlink_url, pr_label, short_sha, spinner_style,
};
use anstream::{eprintln, println};
use async_trait::async_trait;
use draftpress::publish::{SiteEvent, SiteEvents, Stage};
use draftpress::types::PullRequest;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

/// Prints site events; stages run under a spinner
///
/// Load events are only shown in verbose mode.
pub struct CliEvents {
    verbose: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliEvents {
    /// Sink that reports commits and stages only
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            spinner: Mutex::new(None),
        }
    }

    /// Print a line without tearing the spinner
    fn line(&self, text: &str) {
        match self.spinner.lock().ok().and_then(|s| s.as_ref().cloned()) {
            Some(pb) => pb.println(text),
            None => println!("{text}"),
        }
    }

    fn stop_spinner(&self) {
        let taken = self.spinner.lock().ok().and_then(|mut s| s.take());
        if let Some(pb) = taken {
            pb.finish_and_clear();
        }
    }
}

impl Drop for CliEvents {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

#[async_trait]
impl SiteEvents for CliEvents {
    async fn on_event(&self, event: &SiteEvent) {
        match event {
            SiteEvent::CommitSucceeded { path, sha } => {
                self.line(&format!(
                    "  {} Committed {} {}",
                    check(),
                    path.accent(),
                    short_sha(sha).muted()
                ));
            }
            SiteEvent::UploadSucceeded { path } => {
                self.line(&format!("  {} Uploaded {}", check(), path.accent()));
            }
            SiteEvent::CommitFailed { path, message } => {
                self.stop_spinner();
                eprintln!(
                    "  {} Commit to {} failed: {}",
                    cross(),
                    path.accent().for_stderr(),
                    message.error()
                );
            }
            SiteEvent::ConfigFailed(message)
            | SiteEvent::DraftsFailed(message)
            | SiteEvent::AssetsFailed(message) => {
                eprintln!("{}: {}", event.name().warn(), message);
            }
            SiteEvent::ConfigFetched
            | SiteEvent::DraftsFetched(_)
            | SiteEvent::AssetsFetched(_) => {
                if self.verbose {
                    self.line(&event.name().muted().to_string());
                }
            }
        }
    }

    async fn on_stage(&self, stage: Stage) {
        if stage == Stage::Complete {
            self.stop_spinner();
            println!("{} {}", check(), stage.to_string().success());
            return;
        }

        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };
        let pb = spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });
        pb.set_message(format!("{stage}..."));
    }

    async fn on_pull_request(&self, pr: &PullRequest) {
        self.line(&format!(
            "  {} Pull request {} ({} → {})",
            check(),
            pr_label(pr.number),
            pr.head_ref.muted(),
            pr.base_ref.muted()
        ));
        self.line(&format!("    {}", hyperlink_url(Stream::Stdout, &pr.html_url)));
    }

    async fn on_message(&self, message: &str) {
        self.line(message);
    }
}
