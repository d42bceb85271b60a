//! Test data factories for draftpress types

#![allow(dead_code)]

use super::mock_service::MockContentService;
use draftpress::encoding::draft_branch_name;
use draftpress::types::{ContentEntry, PullRequest};

/// Commit SHA of `main` in [`seeded_site`]
pub const MAIN_SHA: &str = "main0000";

pub const SITE_CONFIG: &str = "\
title: Test Site
defaults:
  - scope:
      path: \"\"
    values:
      layout: page
  - scope:
      path: posts
    values:
      layout: post
";

pub const NAVBAR: &str = "\
- text: Home
  href: /
  show_in_menu: true
  show_in_footer: false
";

pub const ABOUT_PAGE: &str = "---\nlayout: page\ntitle: About\n---\n\nWe make sites.\n";

/// A repository with `main`, config, navigation, one page and two uploads
pub fn seeded_site() -> MockContentService {
    let service = MockContentService::new();
    service.add_branch("main", MAIN_SHA);
    service.add_file("main", "_config.yml", SITE_CONFIG);
    service.add_file("main", "_data/navbar.yml", NAVBAR);
    service.add_file("main", "pages/about.md", ABOUT_PAGE);
    service.add_file("main", "assets/uploads/logo.png", "png");
    service.add_file("main", "assets/uploads/report.pdf", "pdf");
    service
}

/// [`seeded_site`] with an existing draft of `path`
pub fn seeded_site_with_draft(path: &str) -> MockContentService {
    let service = seeded_site();
    service.fork_branch(&draft_branch_name(path), "main");
    service
}

/// A pull request with default values
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/site/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("Update {head}"),
    }
}

/// A file entry from a directory listing
pub fn make_entry(path: &str) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        sha: format!("{path}-sha"),
        size: 3,
        kind: "file".to_string(),
        download_url: None,
    }
}
