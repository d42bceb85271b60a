//! draftpress - draft, review and publish site content stored in GitHub
//!
//! The library models a content editor's view of a GitHub repository
//! holding a Jekyll-style site: it loads the site configuration, tracks
//! draft branches, commits documents and uploads, and runs the
//! draft → pull request → merge → cleanup publish chain.

pub mod artifact;
pub mod auth;
pub mod clone;
pub mod encoding;
pub mod error;
pub mod platform;
pub mod publish;
pub mod settings;
pub mod site;
pub mod types;
