//! Pipeline stages for CSV-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ entry ──────────────▶ layout ──▶ write
//! (csv)     ├─ address            (pages)    (lopdf)
//!           └─ speakers
//! ```
//!
//! 1. [`input`]: read the header and lazily yield data rows
//! 2. [`entry`]: dispatch each column of a row on its
//!    [`FieldKind`](crate::fields::FieldKind) and emit story blocks, using
//!    [`address`] and [`speakers`] for the composite sections
//! 3. [`layout`]: wrap paragraphs with [`metrics`] and paginate
//! 4. [`write`]: serialise the laid-out pages to PDF bytes

pub mod address;
pub mod entry;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod speakers;
pub mod write;
