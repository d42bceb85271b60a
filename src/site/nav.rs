//! Navigation file updates
//!
//! New pages get an entry appended to the navigation data file. Entries
//! are added hidden from both menu and footer.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::path::Path;
use std::sync::OnceLock;

/// One navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    /// Link text
    pub text: String,
    /// Link target
    pub href: String,
    /// Show in the header menu
    pub show_in_menu: bool,
    /// Show in the footer
    pub show_in_footer: bool,
}

impl NavEntry {
    /// Hidden entry for a newly created page
    pub fn for_page(content: &str, path: &str) -> Self {
        Self {
            text: derive_title(content, path),
            href: format!("/{}/", page_slug(path)),
            show_in_menu: false,
            show_in_footer: false,
        }
    }
}

fn title_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^title:[ \t]*(.*?)[ \t]*$").expect("valid regex"))
}

/// Front-matter block of a document, or the whole text without one
fn front_matter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    rest.find("\n---").map_or(rest, |end| &rest[..end])
}

/// The page's second path segment without extension (or the only segment)
fn page_slug(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let segment = segments.get(1).or_else(|| segments.first()).copied().unwrap_or(path);
    Path::new(segment)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(segment)
        .to_string()
}

/// Title for a page: the first `title:` line, or the page slug
pub fn derive_title(content: &str, path: &str) -> String {
    title_pattern()
        .captures(front_matter(content))
        .map(|caps| {
            caps[1]
                .trim_matches(|c: char| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| page_slug(path))
}

/// Append an entry to navigation YAML
///
/// An empty file starts a new list; anything other than a list is rejected.
pub fn append_entry(raw: &str, entry: &NavEntry) -> Result<String> {
    let mut doc: Value = if raw.trim().is_empty() {
        Value::Sequence(Vec::new())
    } else {
        serde_yaml::from_str(raw)?
    };

    if doc.is_null() {
        doc = Value::Sequence(Vec::new());
    }

    let Value::Sequence(entries) = &mut doc else {
        return Err(Error::Parse("navigation file must be a YAML list".to_string()));
    };
    entries.push(serde_yaml::to_value(entry)?);

    Ok(serde_yaml::to_string(&doc)?)
}
