//! In-place gzip of text assets in a built site

use crate::error::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extensions compressed before upload
pub const COMPRESSED_EXTENSIONS: &[&str] = &["html", "css", "js", "json", "xml", "svg", "txt"];

/// Whether bytes start with the gzip header
pub fn is_gzipped(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Whether a file's extension is one we compress
pub fn should_compress(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            COMPRESSED_EXTENSIONS
                .iter()
                .any(|c| c.eq_ignore_ascii_case(ext))
        })
}

/// Gzip a buffer
pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Compress every text asset under `dir` in place
///
/// Files that already carry a gzip header are left alone, so running this
/// twice is harmless. Returns the paths (relative to `dir`) compressed by
/// this call.
pub fn compress_site(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut compressed = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !should_compress(path) {
            continue;
        }

        let bytes = fs::read(path)?;
        if is_gzipped(&bytes) {
            debug!("{} is already compressed", path.display());
            continue;
        }

        fs::write(path, gzip(&bytes)?)?;
        compressed.push(path.strip_prefix(dir).unwrap_or(path).to_path_buf());
    }

    info!("Compressed {} file(s) in {}", compressed.len(), dir.display());
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn gunzip(bytes: &[u8]) -> String {
        let mut out = String::new();
        GzDecoder::new(bytes).read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_should_compress() {
        assert!(should_compress(Path::new("index.html")));
        assert!(should_compress(Path::new("assets/MAIN.CSS")));
        assert!(!should_compress(Path::new("logo.png")));
        assert!(!should_compress(Path::new("README")));
    }

    #[test]
    fn test_compress_site_in_place() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        fs::write(dir.path().join("css/site.css"), "body {}").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();

        let compressed = compress_site(dir.path()).unwrap();
        assert_eq!(
            compressed,
            vec![PathBuf::from("css/site.css"), PathBuf::from("index.html")]
        );

        let html = fs::read(dir.path().join("index.html")).unwrap();
        assert!(is_gzipped(&html));
        assert_eq!(gunzip(&html), "<h1>Hi</h1>");
        assert_eq!(
            fs::read(dir.path().join("logo.png")).unwrap(),
            [0x89, b'P', b'N', b'G']
        );
    }

    #[test]
    fn test_compress_site_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("feed.xml"), "<rss/>").unwrap();

        assert_eq!(compress_site(dir.path()).unwrap().len(), 1);
        assert!(compress_site(dir.path()).unwrap().is_empty());
        assert_eq!(gunzip(&fs::read(dir.path().join("feed.xml")).unwrap()), "<rss/>");
    }
}
