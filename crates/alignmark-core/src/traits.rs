//! Capability boundaries: document extraction and external judges.
//!
//! Implementations live outside this crate — `alignmark-extract` provides
//! document sources, and callers inject judges. The core never loads code
//! dynamically.

use std::path::Path;
use std::sync::Arc;

use crate::model::SubmissionImage;

/// Sentinel marking an embedded image's position in extracted text.
///
/// U+FFFC is the Unicode object replacement character; extractors emit one
/// per embedded image, in document order.
pub const IMAGE_SENTINEL: &str = "\u{FFFC}";

/// Extracted form of a submission document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Body text; each embedded image is marked by [`IMAGE_SENTINEL`].
    pub text: String,
    /// Images ordered by the numeric id embedded in their media filename.
    pub images: Vec<Arc<SubmissionImage>>,
}

/// Turns a submission file into text plus its ordered embedded images.
pub trait DocumentSource: Send + Sync {
    /// Short human-readable name, e.g. "plain-text".
    fn name(&self) -> &str;

    /// Extract `path`. Failures are reported per submission and never abort
    /// a batch.
    fn extract(&self, path: &Path) -> anyhow::Result<ExtractedDocument>;
}

/// Score and log produced by a judge.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: f64,
    pub log: String,
}

/// External scoring capability, dispatched by task id.
///
/// Registered judges take precedence over literal/regex matching for their
/// task. A judge that returns an error scores the task 0 with the error as
/// its log.
pub trait Judge: Send + Sync {
    fn run(&self, task_id: &str, text: &str) -> anyhow::Result<Verdict>;
}
