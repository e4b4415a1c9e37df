// src/error.rs
use thiserror::Error;

/// A comprehensive error type for the entire document generation pipeline.
///
/// These are hard failures: when one of them is returned, no partial PDF is
/// produced.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown template: '{0}'")]
    UnknownTemplate(String),

    #[error("Unknown color scheme: '{0}'")]
    UnknownColorScheme(String),

    #[error("Document is not configured; set a template and color scheme first")]
    NotConfigured,

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failures scoped to a single chart or flowchart artifact.
///
/// These never abort generation: the assembler swaps the artifact for a
/// visible placeholder block and keeps going, so one malformed chart cannot
/// sink an otherwise valid multi-section document.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("no data points")]
    EmptySeries,

    #[error("no nodes")]
    EmptyGraph,
}
