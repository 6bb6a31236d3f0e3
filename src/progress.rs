//! Progress-callback trait for per-entry conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to receive
//! events as the renderer walks the CSV. The CSV is read lazily, so the
//! number of entries is only known once the run completes.
//!
//! # Example
//!
//! ```rust
//! use cfp2pdf::{ConversionProgressCallback, RenderConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_entry_complete(&self, entry_num: usize, entry_id: &str, blocks: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Entry {} ({}) → {} blocks", entry_num, entry_id, blocks);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = RenderConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the renderer as it processes each entry.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `Send + Sync` lets a config be shared with a
/// progress bar that ticks from another thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the header has been read and classified.
    ///
    /// # Arguments
    /// * `columns` - number of columns in the CSV header
    fn on_conversion_start(&self, columns: usize) {
        let _ = columns;
    }

    /// Called before an entry is rendered.
    ///
    /// # Arguments
    /// * `entry_num` - 1-indexed data row number
    fn on_entry_start(&self, entry_num: usize) {
        let _ = entry_num;
    }

    /// Called when an entry has been turned into document blocks.
    ///
    /// # Arguments
    /// * `entry_num` - 1-indexed data row number
    /// * `entry_id`  - value of the `Entry Id` column (or its placeholder)
    /// * `blocks`    - number of blocks the entry contributed
    fn on_entry_complete(&self, entry_num: usize, entry_id: &str, blocks: usize) {
        let _ = (entry_num, entry_id, blocks);
    }

    /// Called once after layout, before the PDF is serialised.
    ///
    /// # Arguments
    /// * `entries` - entries rendered
    /// * `pages`   - pages in the laid-out document
    fn on_conversion_complete(&self, entries: usize, pages: usize) {
        let _ = (entries, pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
