//! alignmark-report — report model, JSON persistence, HTML rendering, and
//! per-student log files.

pub mod html;
pub mod logs;
pub mod report;

pub use html::{generate_html, write_html_report};
pub use logs::write_student_logs;
pub use report::{GradeReport, TemplateSummary};
