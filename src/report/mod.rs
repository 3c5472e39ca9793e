//! Report construction and rendering.

pub mod builder;
pub mod generator;

pub use builder::{build_report, ReportContext};
pub use generator::{generate_json_report, generate_text_report, write_report};
