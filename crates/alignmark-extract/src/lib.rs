//! alignmark-extract — document sources and submission discovery.
//!
//! Implements the extraction boundary declared in `alignmark-core`: turning
//! submission files into sentinel-marked text plus ordered images, rewriting
//! sentinels into positional markers, and scanning a submissions directory
//! into gradeable units. Binary format decoding (docx and friends) plugs in
//! through the same [`DocumentSource`] trait from outside this workspace.

pub mod discover;
pub mod resolve;
pub mod source;

pub use discover::{extension_census, scan_submissions, student_id_from_path};
pub use resolve::{build_submission, resolve_image_sentinels};
pub use source::{source_for, PlainTextSource};

pub use alignmark_core::traits::{DocumentSource, ExtractedDocument, IMAGE_SENTINEL};
