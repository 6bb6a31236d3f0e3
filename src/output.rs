//! Result types returned by the conversion entry points.

use crate::story::Story;
use serde::Serialize;

/// The rendered document before PDF serialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// Every block of the document in reading order.
    pub story: Story,
    pub stats: ConversionStats,
}

/// Counters for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Data rows rendered.
    pub entries: usize,
    /// Pages in the laid-out document, title page included.
    pub pages: usize,
    /// Blocks in the story.
    pub blocks: usize,
    /// Whether blind judging mode was on.
    pub blind: bool,
    /// Entries whose speaker block was withheld by blind mode.
    pub speakers_suppressed: usize,
    /// Wall-clock time of the run in milliseconds.
    pub duration_ms: u64,
}
