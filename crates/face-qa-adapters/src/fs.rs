//! Filesystem adapter for discovering images and reading their metadata.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use face_qa_core::{ColorMode, ImageInfo, ImageLoadError, ImageMeta, ImageSource};
use image::{ColorType, ImageDecoder, ImageReader};
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Yields every image under a set of files and directories.
///
/// Directory entries are visited in sorted order, so a batch always comes out
/// in the same sequence. Subdirectories are only entered when `recursive` is set.
///
/// The file list is walked once, on first use, and reused afterwards so the
/// count hint always matches what [`ImageSource::images`] yields.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
    files: OnceLock<Vec<PathBuf>>,
}

impl FsImageSource {
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            paths,
            recursive,
            files: OnceLock::new(),
        }
    }

    fn files(&self) -> &[PathBuf] {
        self.files.get_or_init(|| {
            let files = self.discover();
            debug!(count = files.len(), "Discovered images");
            files
        })
    }

    fn discover(&self) -> Vec<PathBuf> {
        // (path, named on the command line)
        let mut pending: Vec<(PathBuf, bool)> =
            self.paths.iter().rev().map(|p| (p.clone(), true)).collect();
        let mut found = Vec::new();

        while let Some((path, explicit)) = pending.pop() {
            if path.is_file() {
                if has_image_extension(&path) {
                    found.push(path);
                } else if explicit {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                if explicit || self.recursive {
                    let children = sorted_entries(&path);
                    pending.extend(children.into_iter().rev().map(|child| (child, false)));
                }
            } else if explicit {
                warn!("Path does not exist: {}", path.display());
            }
        }

        found
    }
}

impl ImageSource for FsImageSource {
    fn images(
        &self,
    ) -> Box<dyn Iterator<Item = std::result::Result<ImageInfo, ImageLoadError>> + Send + '_>
    {
        Box::new(self.files().iter().map(|path| {
            load_image(path).map_err(|reason| ImageLoadError::new(path.to_string_lossy(), reason))
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.files().len())
    }
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut paths: Vec<_> = entries.flatten().map(|e| e.path()).collect();
            paths.sort();
            paths
        }
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            Vec::new()
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|known| e.eq_ignore_ascii_case(known)))
}

/// Reads an image file and inspects its header.
fn load_image(path: &Path) -> Result<ImageInfo> {
    let bytes = std::fs::read(path).context("Failed to read image")?;
    let meta = inspect(&bytes).context("Failed to decode image")?;

    debug!(
        path = %path.display(),
        width = meta.width,
        height = meta.height,
        color_mode = %meta.color_mode,
        "Loaded image"
    );

    Ok(ImageInfo::new(path.to_string_lossy(), bytes, meta))
}

/// Extracts size, dimensions and color mode from encoded image bytes.
///
/// Only the header is decoded; pixel data is never materialized.
///
/// # Errors
///
/// Returns an error if the format is unknown or the header is invalid.
pub fn inspect(bytes: &[u8]) -> Result<ImageMeta> {
    let decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();

    Ok(ImageMeta::new(
        bytes.len() as u64,
        width,
        height,
        color_mode(decoder.color_type()),
    ))
}

const fn color_mode(color: ColorType) -> ColorMode {
    match color {
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
        ColorType::L8 | ColorType::L16 => ColorMode::Grayscale,
        _ => ColorMode::Other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use face_qa_test_support::SyntheticImageBuilder;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("test.jpg")));
        assert!(has_image_extension(Path::new("test.JPEG")));
        assert!(has_image_extension(Path::new("test.png")));
        assert!(!has_image_extension(Path::new("test.jpg.json")));
        assert!(!has_image_extension(Path::new("test.txt")));
        assert!(!has_image_extension(Path::new("test")));
    }

    #[test]
    fn test_color_mode_mapping() {
        assert_eq!(color_mode(ColorType::Rgb8), ColorMode::Rgb);
        assert_eq!(color_mode(ColorType::L16), ColorMode::Grayscale);
        assert_eq!(color_mode(ColorType::Rgba8), ColorMode::Other);
        assert_eq!(color_mode(ColorType::La8), ColorMode::Other);
    }

    #[test]
    fn test_inspect_png_header() {
        let info = SyntheticImageBuilder::uniform_gray(32, 16, 200);
        let meta = inspect(&info.bytes).unwrap();
        assert_eq!((meta.width, meta.height), (32, 16));
        assert_eq!(meta.color_mode, ColorMode::Grayscale);
        assert_eq!(meta.byte_size, info.bytes.len() as u64);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect(b"definitely not an image").is_err());
    }

    #[test]
    fn test_discover_sorted_and_recursion_gated() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "sub/c.png"] {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"").unwrap();
        }
        let names = |recursive| {
            FsImageSource::new(vec![dir.path().to_path_buf()], recursive)
                .discover()
                .into_iter()
                .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(false), [PathBuf::from("a.jpg"), PathBuf::from("b.png")]);
        assert_eq!(
            names(true),
            [
                PathBuf::from("a.jpg"),
                PathBuf::from("b.png"),
                PathBuf::from("sub/c.png")
            ]
        );
    }

    #[test]
    fn test_file_list_is_walked_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"").unwrap();
        let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);

        assert_eq!(source.count_hint(), Some(1));
        std::fs::write(dir.path().join("b.png"), b"").unwrap();

        // Later additions are not picked up mid-batch
        assert_eq!(source.count_hint(), Some(1));
        assert_eq!(source.images().count(), 1);
    }

    #[test]
    fn test_load_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"garbage").unwrap();
        let source = FsImageSource::new(vec![path.clone()], false);

        let err = source.images().next().unwrap().unwrap_err();
        assert_eq!(err.path, path.to_string_lossy());
        assert!(format!("{:#}", err.reason).starts_with("Failed to decode image"));
    }
}
