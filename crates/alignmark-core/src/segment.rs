//! Carving an aligned submission into per-task answer spans.
//!
//! The template's boundary offsets mark where task markers used to sit.
//! After alignment, each offset is translated to a position in the edit
//! script, and everything the submission wrote strictly between two mapped
//! positions is that task's answer — inserted characters and any matched or
//! substituted ones that fell into the gap.

use std::sync::OnceLock;

use regex::Regex;

use crate::align::{AlignStep, Alignment};
use crate::error::CoreError;

/// Generic placeholder substituted for image markers in displayed text.
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Positional marker for the `index`-th image of a submission.
pub fn image_marker(index: usize) -> String {
    format!("<img:{index}>")
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"<img:(\d+)>").expect("marker pattern is valid"))
}

/// A per-task span carved out of the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSegment {
    /// Submission text for this span, trimmed, markers replaced by
    /// [`IMAGE_PLACEHOLDER`].
    pub text: String,
    /// Indices into the submission's image list, in marker order.
    pub image_indices: Vec<usize>,
}

/// Carve the submission into one segment per boundary offset.
///
/// Offset `k` maps to the span strictly between the steps consuming template
/// symbols `k-1` and `k`; offset `0` starts at the beginning of the edit
/// script, and an offset equal to the template length runs to its end.
/// Out-of-range offsets are an error, never clamped.
pub fn segment(
    alignment: &Alignment,
    boundaries: &[usize],
) -> Result<Vec<AnswerSegment>, CoreError> {
    // mapping[k] = index of the step consuming target symbol k, plus a
    // sentinel entry at the script length.
    let mut mapping = Vec::new();
    for (idx, step) in alignment.steps.iter().enumerate() {
        if step.target().is_some() {
            mapping.push(idx);
        }
    }
    mapping.push(alignment.steps.len());
    let target_len = mapping.len() - 1;

    let mut segments = Vec::with_capacity(boundaries.len());
    for &offset in boundaries {
        if offset > target_len {
            return Err(CoreError::BoundaryOutOfRange {
                offset,
                len: target_len,
            });
        }
        let lo = if offset == 0 { 0 } else { mapping[offset - 1] + 1 };
        let hi = mapping[offset];
        let raw: String = alignment.steps[lo..hi]
            .iter()
            .filter_map(AlignStep::query)
            .collect();
        segments.push(extract_image_markers(raw.trim()));
    }
    Ok(segments)
}

/// Pull positional image markers out of a carved span.
///
/// Every marker is replaced by the generic placeholder; its index joins the
/// segment's image list in occurrence order.
pub fn extract_image_markers(text: &str) -> AnswerSegment {
    let mut image_indices = Vec::new();
    let replaced = marker_regex().replace_all(text, |caps: &regex::Captures<'_>| {
        if let Ok(index) = caps[1].parse::<usize>() {
            image_indices.push(index);
        }
        IMAGE_PLACEHOLDER
    });
    AnswerSegment {
        text: replaced.into_owned(),
        image_indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{align_str, ScoringScheme};

    fn carve(query: &str, target: &str, boundaries: &[usize]) -> Vec<AnswerSegment> {
        let alignment = align_str(query, target, &ScoringScheme::default());
        segment(&alignment, boundaries).unwrap()
    }

    #[test]
    fn two_slot_form_recovers_both_answers() {
        let segments = carve("Name: Alice Age: 30", "Name:  Age: ", &[6, 12]);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Alice", "30"]);
    }

    #[test]
    fn boundary_at_template_start() {
        // The template opens with an answer slot.
        let segments = carve("yes rest", " rest", &[0]);
        assert_eq!(segments[0].text, "yes");
    }

    #[test]
    fn boundary_at_template_end() {
        let segments = carve("prefix tail-answer", "prefix ", &[7]);
        assert_eq!(segments[0].text, "tail-answer");
    }

    #[test]
    fn out_of_range_boundary_is_an_error() {
        let alignment = align_str("ab", "ab", &ScoringScheme::default());
        let err = segment(&alignment, &[3]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::BoundaryOutOfRange { offset: 3, len: 2 }
        ));
    }

    #[test]
    fn segments_partition_without_overlap() {
        let query = "A: one B: two C: three";
        let target = "A:  B:  C: ";
        let segments = carve(query, target, &[3, 7, 11]);
        assert_eq!(segments.len(), 3);
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn image_marker_is_replaced_and_collected() {
        let segments = carve("Before<img:0>After", "", &[0]);
        assert_eq!(segments[0].text, format!("Before{IMAGE_PLACEHOLDER}After"));
        assert_eq!(segments[0].image_indices, vec![0]);
    }

    #[test]
    fn markers_keep_occurrence_order() {
        let segment = extract_image_markers("x <img:2> y <img:0> z");
        assert_eq!(segment.image_indices, vec![2, 0]);
        assert_eq!(
            segment.text,
            format!("x {IMAGE_PLACEHOLDER} y {IMAGE_PLACEHOLDER} z")
        );
    }

    #[test]
    fn text_without_markers_is_untouched() {
        let segment = extract_image_markers("plain answer");
        assert_eq!(segment.text, "plain answer");
        assert!(segment.image_indices.is_empty());
    }

    #[test]
    fn adjacent_boundaries_share_the_gap() {
        // Two markers with no literal text between them see the same span;
        // matches the historical behavior of cumulative-length boundaries.
        let segments = carve("ab glued cd", "ab cd", &[3, 3]);
        assert_eq!(segments[0], segments[1]);
    }
}
