//! Integration tests for the cached-response face provider.

#![allow(clippy::unwrap_used)]

use face_qa_adapters::{CacheKey, CachedResponseProvider, ResponseCache};
use face_qa_core::{evaluate, FaceAttributeProvider, ImageInfo, ThresholdConfig};
use face_qa_test_support::{provider_response_json, FaceAttributesBuilder, SyntheticImageBuilder};

fn image_in(dir: &std::path::Path, name: &str) -> ImageInfo {
    let mut info = SyntheticImageBuilder::noise_rgb(800, 800);
    let path = dir.join(name);
    std::fs::write(&path, &info.bytes).unwrap();
    info.path = path.to_string_lossy().into_owned();
    info
}

#[test]
fn test_reads_sidecar_response() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_in(dir.path(), "alice.png");
    let face = FaceAttributesBuilder::compliant().build();
    std::fs::write(
        dir.path().join("alice.png.json"),
        provider_response_json(&[face.clone()]),
    )
    .unwrap();

    let provider = CachedResponseProvider::new(ResponseCache::default());
    let faces = provider.faces(&image).unwrap();

    assert_eq!(faces, vec![face]);
    let report = evaluate(&image.meta, &faces, &ThresholdConfig::default()).unwrap();
    assert!(report.overall_pass);
}

#[test]
fn test_missing_response_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_in(dir.path(), "bob.png");

    let provider = CachedResponseProvider::new(ResponseCache::default());
    let err = provider.faces(&image).unwrap_err();

    assert!(err.to_string().contains("bob.png.json"));
}

#[test]
fn test_responses_dir_with_content_hash() {
    let dir = tempfile::tempdir().unwrap();
    let responses = dir.path().join("responses");
    let image = image_in(dir.path(), "carol.png");

    let cache = ResponseCache::new(Some(responses.clone()), CacheKey::ContentHash);
    let written = cache.put(&image, &provider_response_json(&[])).unwrap();
    assert!(written.starts_with(&responses));

    let provider = CachedResponseProvider::new(cache);
    assert!(provider.faces(&image).unwrap().is_empty());
}

#[test]
fn test_malformed_response_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let image = image_in(dir.path(), "dave.png");
    std::fs::write(dir.path().join("dave.png.json"), "{ truncated").unwrap();

    let provider = CachedResponseProvider::new(ResponseCache::default());
    let err = provider.faces(&image).unwrap_err();
    assert!(format!("{err:#}").contains("Malformed"));
}
