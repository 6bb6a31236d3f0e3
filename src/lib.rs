//! # cfp2pdf
//!
//! Render a call-for-participation CSV export as a PDF review packet: one
//! page-break-delimited section per submission, with an optional blind
//! judging mode that withholds everything identifying the speakers.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CSV
//!  │
//!  ├─ 1. Input    header + lazily read rows (csv)
//!  ├─ 2. Classify every column mapped once to a FieldKind
//!  ├─ 3. Render   row → story blocks (address, speakers, generic fields)
//!  ├─ 4. Layout   word-wrap with Helvetica metrics, paginate
//!  └─ 5. Write    PDF serialisation (lopdf), atomic file replace
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cfp2pdf::{convert_to_file, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::builder().blind(true).build()?;
//!     let stats = convert_to_file("submissions.csv", "packet.pdf", &config)?;
//!     eprintln!("{} entries on {} pages", stats.entries, stats.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cfp2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! cfp2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod fields;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod story;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PageSize, RenderConfig, RenderConfigBuilder, DEFAULT_TITLE};
pub use convert::{
    convert_to_bytes, convert_to_file, convert_to_file_with_output, inspect, render_story,
};
pub use error::CfpError;
pub use fields::{Column, FieldKind, FieldPlan};
pub use output::{ConversionOutput, ConversionStats};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use story::{Block, Span, Story};
