//! Face-attribute provider backed by cached detection responses.

use anyhow::{Context, Result};
use face_qa_core::{FaceAttributeProvider, FaceAttributes, ImageInfo};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::ResponseCache;

/// Body of a `DetectFaces` response; only the face list is read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectFacesResponse {
    #[serde(default)]
    face_details: Vec<Value>,
}

/// Parses a raw provider response into face records, in provider order.
///
/// Only the primary (first) record is evaluated, so only it must be
/// well-formed. A secondary record that does not parse is kept as an empty
/// record: it still counts as a detected face.
///
/// # Errors
///
/// Returns an error if the body is not a valid response or the primary
/// record is malformed.
pub fn parse_response(body: &str) -> Result<Vec<FaceAttributes>> {
    let response: DetectFacesResponse =
        serde_json::from_str(body).context("Malformed face-detection response")?;

    let mut records = response.face_details.into_iter();
    let Some(primary) = records.next() else {
        return Ok(Vec::new());
    };

    let mut faces = vec![serde_json::from_value::<FaceAttributes>(primary)
        .context("Malformed primary face record")?];
    faces.extend(records.enumerate().map(|(i, record)| {
        serde_json::from_value(record).unwrap_or_else(|e| {
            warn!(index = i + 1, "Ignoring malformed secondary face record: {e}");
            FaceAttributes::default()
        })
    }));

    Ok(faces)
}

/// Reads face attributes from a [`ResponseCache`].
///
/// A missing entry is an error; this provider never contacts a service.
pub struct CachedResponseProvider {
    cache: ResponseCache,
}

impl CachedResponseProvider {
    #[must_use]
    pub const fn new(cache: ResponseCache) -> Self {
        Self { cache }
    }

    #[must_use]
    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

impl FaceAttributeProvider for CachedResponseProvider {
    fn name(&self) -> &'static str {
        "cached-response"
    }

    fn faces(&self, image: &ImageInfo) -> Result<Vec<FaceAttributes>> {
        let body = self.cache.get(image)?.with_context(|| {
            format!(
                "No cached face-detection response at {}",
                self.cache.entry_path(image).display()
            )
        })?;
        let faces = parse_response(&body).with_context(|| format!("Response for {}", image.path))?;
        debug!(path = %image.path, faces = faces.len(), "Read cached faces");
        Ok(faces)
    }
}
