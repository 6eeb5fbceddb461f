//! Sentinel resolution: extracted text to alignment-ready submissions.

use std::path::Path;

use alignmark_core::model::Submission;
use alignmark_core::segment::image_marker;
use alignmark_core::traits::{DocumentSource, IMAGE_SENTINEL};

use crate::discover::student_id_from_path;

/// Rewrite every image sentinel to a positional `<img:i>` marker.
///
/// Markers number sentinels in occurrence order, which by the extraction
/// contract is also image-list order. A count mismatch is reported and
/// resolution continues; images past the marker count stay unreachable.
pub fn resolve_image_sentinels(text: &str, image_count: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut index = 0usize;
    while let Some(pos) = rest.find(IMAGE_SENTINEL) {
        out.push_str(&rest[..pos]);
        out.push_str(&image_marker(index));
        index += 1;
        rest = &rest[pos + IMAGE_SENTINEL.len()..];
    }
    out.push_str(rest);
    if index != image_count {
        tracing::warn!(
            sentinels = index,
            images = image_count,
            "image sentinel count does not match extracted image count"
        );
    }
    out
}

/// Extract one submission file and resolve its sentinels.
pub fn build_submission(
    source: &dyn DocumentSource,
    path: &Path,
    id_digits: usize,
) -> anyhow::Result<Submission> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let student_id = student_id_from_path(path, id_digits).unwrap_or_else(|| file_name.clone());
    let doc = source.extract(path)?;
    let text = resolve_image_sentinels(&doc.text, doc.images.len());
    Ok(Submission {
        student_id,
        file_name,
        text,
        images: doc.images,
    })
}
