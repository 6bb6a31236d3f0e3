//! Error type for the cfp2pdf library.
//!
//! Every failure is fatal: one bad row aborts the whole document and no
//! page already laid out is written. [`CfpError`] is returned from every
//! fallible entry point in [`crate::convert`] and the pipeline stages.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the cfp2pdf library.
#[derive(Debug, Error)]
pub enum CfpError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input CSV was not found at the given path.
    #[error("CSV file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The CSV tokenizer rejected the file (bad quoting, invalid UTF-8, ...).
    #[error("Failed to parse CSV '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row has fewer cells than the header has columns.
    #[error("Row on line {line} has {found} fields but the header has {expected}")]
    ShortRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    // ── Row content errors ────────────────────────────────────────────────
    /// A column every entry relies on is absent from the header.
    #[error("Required column '{column}' is missing from the CSV header")]
    MissingColumn { column: String },

    /// A speaker cell does not split into first|last|organization|email.
    #[error(
        "Malformed speaker field in column '{column}' on line {line}: expected 4 '|'-separated parts, got {parts} in {value:?}"
    )]
    MalformedSpeaker {
        column: String,
        line: u64,
        parts: usize,
        value: String,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// lopdf failed to encode a content stream or serialise the document.
    #[error("Failed to build PDF: {0}")]
    PdfBuild(String),

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
