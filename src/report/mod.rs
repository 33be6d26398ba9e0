//! Reporting utilities: text tables and the JSON run report.

pub mod format;
pub mod json;

pub use format::{
    format_banner, format_descriptive, format_preview, format_regression, format_statistics,
};
pub use json::render_json;
