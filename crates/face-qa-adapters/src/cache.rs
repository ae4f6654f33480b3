//! Filesystem cache of raw face-detection responses.
//!
//! Entries are keyed by image identity and never expire; removing stale
//! entries is left to the caller. face-qa itself only reads the cache through
//! [`CachedResponseProvider`](crate::CachedResponseProvider). Responses are
//! captured elsewhere and stored with [`ResponseCache::put`], so the writer
//! and the reader agree on entry paths for either [`CacheKey`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use face_qa_core::ImageInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// How a cached response is matched to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKey {
    /// The image's file name.
    #[default]
    FileName,
    /// SHA-256 of the image bytes, hex encoded.
    ContentHash,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FileName => "file_name",
            Self::ContentHash => "content_hash",
        })
    }
}

impl FromStr for CacheKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file_name" => Ok(Self::FileName),
            "content_hash" => Ok(Self::ContentHash),
            other => Err(format!(
                "unknown cache key `{other}` (expected file_name or content_hash)"
            )),
        }
    }
}

/// Provider responses stored as `<key>.json` files.
///
/// Without a directory, entries sit next to the image they describe.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
    key: CacheKey,
}

impl ResponseCache {
    /// Creates a cache rooted at `dir`, or beside each image when `None`.
    #[must_use]
    pub const fn new(dir: Option<PathBuf>, key: CacheKey) -> Self {
        Self { dir, key }
    }

    /// Returns the cache key kind.
    #[must_use]
    pub const fn key(&self) -> CacheKey {
        self.key
    }

    /// Returns the identity string for an image.
    #[must_use]
    pub fn key_for(&self, image: &ImageInfo) -> String {
        match self.key {
            CacheKey::FileName => Path::new(&image.path)
                .file_name()
                .map_or_else(|| image.path.clone(), |n| n.to_string_lossy().into_owned()),
            CacheKey::ContentHash => format!("{:x}", Sha256::digest(&image.bytes)),
        }
    }

    /// Returns where the entry for an image lives.
    #[must_use]
    pub fn entry_path(&self, image: &ImageInfo) -> PathBuf {
        let file = format!("{}.json", self.key_for(image));
        match &self.dir {
            Some(dir) => dir.join(file),
            None => Path::new(&image.path)
                .parent()
                .map_or_else(|| PathBuf::from(&file), |p| p.join(&file)),
        }
    }

    /// Returns whether an entry exists for the image.
    #[must_use]
    pub fn contains(&self, image: &ImageInfo) -> bool {
        self.entry_path(image).is_file()
    }

    /// Reads the raw response for an image, if cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be read.
    pub fn get(&self, image: &ImageInfo) -> Result<Option<String>> {
        let path = self.entry_path(image);
        if !self.contains(image) {
            debug!(path = %path.display(), "Cache miss");
            return Ok(None);
        }
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cached response: {}", path.display()))?;
        debug!(path = %path.display(), "Cache hit");
        Ok(Some(body))
    }

    /// Stores a raw response for an image, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn put(&self, image: &ImageInfo, body: &str) -> Result<PathBuf> {
        let path = self.entry_path(image);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write cached response: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use face_qa_test_support::ImageMetaBuilder;

    fn image(path: &str, bytes: &[u8]) -> ImageInfo {
        ImageInfo::new(path, bytes.to_vec(), ImageMetaBuilder::new().build())
    }

    #[test]
    fn test_default_location_is_beside_image() {
        let cache = ResponseCache::default();
        let path = cache.entry_path(&image("/photos/alice.jpg", b""));
        assert_eq!(path, PathBuf::from("/photos/alice.jpg.json"));
    }

    #[test]
    fn test_responses_dir_uses_file_name() {
        let cache = ResponseCache::new(Some(PathBuf::from("/data")), CacheKey::FileName);
        let path = cache.entry_path(&image("/photos/alice.jpg", b""));
        assert_eq!(path, PathBuf::from("/data/alice.jpg.json"));
    }

    #[test]
    fn test_content_hash_key() {
        let cache = ResponseCache::new(Some(PathBuf::from("/data")), CacheKey::ContentHash);
        let key = cache.key_for(&image("a.jpg", b"abc"));
        assert_eq!(
            key,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        // Same bytes under another name share an entry
        assert_eq!(cache.key_for(&image("b.jpg", b"abc")), key);
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(Some(dir.path().join("responses")), CacheKey::FileName);
        let img = image("/photos/bob.png", b"");

        assert!(!cache.contains(&img));
        assert!(cache.get(&img).unwrap().is_none());

        cache.put(&img, r#"{"FaceDetails":[]}"#).unwrap();
        assert!(cache.contains(&img));
        assert_eq!(cache.get(&img).unwrap().unwrap(), r#"{"FaceDetails":[]}"#);
    }

    #[test]
    fn test_cache_key_parse() {
        assert_eq!("content_hash".parse::<CacheKey>(), Ok(CacheKey::ContentHash));
        assert!("sha1".parse::<CacheKey>().is_err());
        assert_eq!(CacheKey::FileName.to_string(), "file_name");
    }
}
