//! OpenRocket import
//!
//! Loads a rocket document and resolves it into [`ResolvedShape`] records
//! that are handed to a [`ShapeSink`] one by one.

mod options;

use std::path::Path;

use crate::curve::CurveError;
use crate::document::{self, DocNode, DocumentError};
use crate::shape::ResolvedShape;
use crate::sink::ShapeSink;
use crate::walker::ComponentTreeWalker;

pub use options::{ImportOptions, OptionsError};

/// Errors that abort an import
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid value '{value}' for <{field}>")]
    InvalidNumber { field: String, value: String },

    #[error("Unknown position mode: {0}")]
    UnknownPositionMode(String),

    #[error("Unknown tab position: {0}")]
    UnknownTabPosition(String),

    #[error("Unknown nose cone shape: {0}")]
    UnknownShape(String),

    #[error("Element <{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Document has no <rocket> element")]
    MissingRocket,

    #[error("Invalid fin set: {0}")]
    InvalidFinSet(String),

    #[error("Could not resolve 'auto' value of <{field}> on {component}")]
    UnresolvedAuto { component: String, field: String },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),
}

/// A component that could not be resolved or built
#[derive(Debug, Clone, PartialEq)]
pub struct EmitFailure {
    pub component: String,
    pub reason: String,
}

/// Outcome of a completed traversal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Records accepted by the sink
    pub emitted: usize,
    /// Components without a usable profile or rejected by the sink;
    /// traversal continued past each of them
    pub failures: Vec<EmitFailure>,
    /// Elements that were not dispatched at their level
    pub skipped: Vec<String>,
    /// "auto" fields that fell back to 0
    pub defaulted: Vec<String>,
}

impl ImportReport {
    /// At least one body was built and none failed
    pub fn is_success(&self) -> bool {
        self.emitted > 0 && self.failures.is_empty()
    }
}

/// Resolve a parsed document, feeding every record into `sink`
pub fn resolve_document(
    root: &DocNode,
    options: &ImportOptions,
    sink: &mut dyn ShapeSink,
) -> Result<ImportReport, ImportError> {
    let report = ComponentTreeWalker::new(options, sink).walk(root)?;

    tracing::info!(
        "Resolved {} components ({} failed, {} skipped, {} auto defaults)",
        report.emitted,
        report.failures.len(),
        report.skipped.len(),
        report.defaulted.len()
    );

    Ok(report)
}

/// Resolve a parsed document into a list of records
pub fn resolve_rocket(
    root: &DocNode,
    options: &ImportOptions,
) -> Result<Vec<ResolvedShape>, ImportError> {
    let mut shapes = Vec::new();
    resolve_document(root, options, &mut shapes)?;
    Ok(shapes)
}

/// Load an `.ork` file and resolve it into `sink`
pub fn import_ork(
    path: impl AsRef<Path>,
    options: &ImportOptions,
    sink: &mut dyn ShapeSink,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    tracing::info!("Importing {}", path.display());

    let root = document::load_ork_with_entry(path, &options.archive_entry)?;
    resolve_document(&root, options, sink)
}
