//! Shared helpers for CLI integration tests.

#![allow(dead_code, deprecated, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use assert_cmd::Command;
use face_qa_adapters::ResponseCache;
use face_qa_core::{FaceAttributes, ImageInfo};
use face_qa_test_support::{provider_response_json, FaceAttributesBuilder, SyntheticImageBuilder};
use tempfile::TempDir;

/// PNG bytes of a 600x600 noise image: large enough in pixels and bytes.
pub fn photo_bytes() -> &'static [u8] {
    static BYTES: OnceLock<Vec<u8>> = OnceLock::new();
    BYTES.get_or_init(|| SyntheticImageBuilder::noise_rgb(600, 600).bytes)
}

pub fn compliant() -> FaceAttributes {
    FaceAttributesBuilder::compliant().build()
}

/// A temporary project directory with an isolated XDG config home.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("xdg")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a photo and its cached response beside it.
    pub fn photo(&self, name: &str, faces: &[FaceAttributes]) -> PathBuf {
        self.photo_cached_in(name, faces, &ResponseCache::default())
    }

    /// Writes a photo and stores its response in `cache`.
    pub fn photo_cached_in(
        &self,
        name: &str,
        faces: &[FaceAttributes],
        cache: &ResponseCache,
    ) -> PathBuf {
        let path = self.photo_without_response(name);
        let image = ImageInfo::new(
            path.to_string_lossy(),
            photo_bytes().to_vec(),
            face_qa_adapters::inspect(photo_bytes()).unwrap(),
        );
        cache.put(&image, &provider_response_json(faces)).unwrap();
        path
    }

    pub fn photo_without_response(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, photo_bytes()).unwrap();
        path
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Writes the user-level config file.
    pub fn xdg_config(&self, contents: &str) {
        self.write("xdg/face-qa/config.toml", contents);
    }

    /// Writes the project-local config file.
    pub fn project_config(&self, contents: &str) {
        self.write(".face-qa.toml", contents);
    }

    /// The CLI, run inside the workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("face-qa").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env("HOME", self.path());
        cmd
    }
}

/// Parses JSON Lines output.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
