//! Mock implementations of core port traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use face_qa_core::domain::{FaceAttributes, ImageInfo, ImageReport};
use face_qa_core::ports::{
    FaceAttributeProvider, ImageLoadError, ImageSource, ProgressEvent, ProgressSink, ResultOutput,
};

/// Mock implementation of `FaceAttributeProvider` for testing.
///
/// Answers from a path-keyed table; unknown paths fall back to a default
/// response, or fail when none is set.
pub struct MockFaceProvider {
    responses: HashMap<String, Vec<FaceAttributes>>,
    fallback: Option<Vec<FaceAttributes>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFaceProvider {
    /// Creates a provider that returns `faces` for every image.
    #[must_use]
    pub fn always(faces: Vec<FaceAttributes>) -> Self {
        Self {
            responses: HashMap::new(),
            fallback: Some(faces),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a provider that fails for every image not added with [`Self::with`].
    #[must_use]
    pub fn failing() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the response for one image path.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, faces: Vec<FaceAttributes>) -> Self {
        self.responses.insert(path.into(), faces);
        self
    }

    /// Returns the paths queried so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FaceAttributeProvider for MockFaceProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn faces(&self, image: &ImageInfo) -> anyhow::Result<Vec<FaceAttributes>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(image.path.clone());

        self.responses
            .get(&image.path)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no mock response for {}", image.path))
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, plus entries that fail to load, and tracks
/// iteration for assertions.
pub struct MockImageSource {
    entries: Vec<Result<ImageInfo, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry at `path` that fails to load.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        self.entries.push(Err(path.into()));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, ImageLoadError>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.entries.iter().map(|entry| match entry {
            Ok(image) => Ok(image.clone()),
            Err(path) => Err(ImageLoadError::new(
                path.clone(),
                anyhow::anyhow!("unreadable test image"),
            )),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` that captures reports.
#[derive(Default)]
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<ImageReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<ImageReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &ImageReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` that captures events.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn count(&self, pred: fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns `(processed, skipped, rejected)` from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                processed,
                skipped,
                rejected,
            } => Some((*processed, *skipped, *rejected)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
