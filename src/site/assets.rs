//! Uploaded asset listing and classification

use crate::error::{Error, Result};
use crate::platform::ContentService;
use crate::types::ContentEntry;
use std::path::Path;
use std::str::FromStr;

/// Asset filter category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    /// jpg, jpeg, png, gif
    Images,
    /// doc, docx, pdf
    Documents,
}

impl AssetCategory {
    /// File extensions in this category (lowercase)
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Images => &["jpg", "jpeg", "png", "gif"],
            Self::Documents => &["doc", "docx", "pdf"],
        }
    }

    /// Whether a file name belongs to this category
    pub fn matches(self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

impl FromStr for AssetCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "images" => Ok(Self::Images),
            "document" | "documents" => Ok(Self::Documents),
            _ => Err(Error::UnknownAssetCategory(s.to_string())),
        }
    }
}

/// Files under the upload root, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetList {
    entries: Vec<ContentEntry>,
}

impl AssetList {
    /// Keep only the file entries of a directory listing
    pub fn from_listing(listing: Vec<ContentEntry>) -> Self {
        Self {
            entries: listing.into_iter().filter(|e| e.kind == "file").collect(),
        }
    }

    /// All assets
    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assets in a category
    pub fn filter(&self, category: AssetCategory) -> Vec<&ContentEntry> {
        self.entries
            .iter()
            .filter(|e| category.matches(&e.name))
            .collect()
    }
}

/// List the upload root on a branch
pub async fn fetch_assets(
    service: &dyn ContentService,
    upload_root: &str,
    branch: &str,
) -> Result<AssetList> {
    let listing = service.list_directory(upload_root, branch).await?;
    Ok(AssetList::from_listing(listing))
}
