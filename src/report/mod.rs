//! Leave report pipeline - turning a chat message or record into a PDF.
//!
//! - `parser` reads the structured chat message into a `Record`
//! - `calendar` derives Hijri dates and the issue date
//! - `identifier` derives the leave ID
//! - `layout` and `renderer` draw the fixed one-page template

pub mod assets;
pub mod calendar;
pub mod common;
pub mod generator;
pub mod identifier;
pub mod layout;
pub mod parser;
pub mod record;
pub mod renderer;
pub mod shaping;
pub mod traits;
pub mod validation;

pub use generator::{GeneratedReport, ReportGenerator, ReportRequest};
pub use record::{FieldKey, Record};
pub use renderer::{RenderedReport, ReportRenderer};
pub use traits::{Generator, Validator};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a report.
///
/// Malformed input never lands here; it degrades to defaults. Only a message
/// that is not a report at all, or a failure to produce the output file, is
/// surfaced.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("message is not a structured leave report")]
    NotStructured,
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build PDF document: {0}")]
    Pdf(String),
    #[error("failed to write report {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report generation task failed: {0}")]
    Blocking(String),
}
