//! Base64 helpers for the contents API and draft branch names

use crate::error::Result;
use base64::{Engine, engine::general_purpose::{STANDARD as BASE64, URL_SAFE as BASE64_URL}};

/// Prefix shared by every draft branch
pub const DRAFT_PREFIX: &str = "_draft-";

/// Encode file content for a contents API write
pub fn encode_content(content: &[u8]) -> String {
    BASE64.encode(content)
}

/// Decode content returned by the contents API
///
/// GitHub wraps base64 payloads at 60 columns, so whitespace is stripped first.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(BASE64.decode(compact)?)
}

/// Draft branch name for a file path
///
/// Uses the URL-safe alphabet: `/` in a ref component could produce `//`,
/// which git rejects.
pub fn draft_branch_name(path: &str) -> String {
    format!("{DRAFT_PREFIX}{}", BASE64_URL.encode(path))
}

/// Recover the file path a draft branch stands for
///
/// Accepts both alphabets so drafts created by older tools still resolve.
/// Returns None for non-draft names and undecodable suffixes.
pub fn draft_path(branch: &str) -> Option<String> {
    let suffix = branch.strip_prefix(DRAFT_PREFIX)?;
    let bytes = BASE64_URL
        .decode(suffix)
        .or_else(|_| BASE64.decode(suffix))
        .ok()?;
    String::from_utf8(bytes).ok()
}
