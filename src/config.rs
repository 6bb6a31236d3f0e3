//! Configuration types for CSV-to-PDF rendering.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. The CLI maps its flags onto the builder; the
//! library never reads flags or environment variables itself.

use crate::error::CfpError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title placed on the first page when none is configured.
pub const DEFAULT_TITLE: &str = "Call For Participation Entries";

/// Configuration for one conversion run.
///
/// # Example
/// ```rust
/// use cfp2pdf::{PageSize, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .blind(true)
///     .page_size(PageSize::A4)
///     .build()
///     .unwrap();
/// assert!(config.blind);
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Blind judging mode. Default: false.
    ///
    /// Suppresses the speaker/contact block and narrows every address to its
    /// "city, state zip" line.
    pub blind: bool,

    /// Heading of the first page. Default: [`DEFAULT_TITLE`].
    pub title: String,

    /// Physical page size. Default: [`PageSize::Letter`].
    pub page_size: PageSize,

    /// Body text size in points. Range: 6–24. Default: 10.
    ///
    /// Headings scale with it (title 1.8×, entry heading 1.4×).
    pub font_size: f32,

    /// Page margin on every side, in points. Default: 72 (one inch).
    pub margin: f32,

    /// Optional per-entry progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            blind: false,
            title: DEFAULT_TITLE.to_string(),
            page_size: PageSize::default(),
            font_size: 10.0,
            margin: 72.0,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("blind", &self.blind)
            .field("title", &self.title)
            .field("page_size", &self.page_size)
            .field("font_size", &self.font_size)
            .field("margin", &self.margin)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn blind(mut self, blind: bool) -> Self {
        self.config.blind = blind;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt.clamp(6.0, 24.0);
        self
    }

    pub fn margin(mut self, pt: f32) -> Self {
        self.config.margin = pt;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, CfpError> {
        let c = &self.config;
        if c.title.trim().is_empty() {
            return Err(CfpError::InvalidConfig("Title must not be empty".into()));
        }
        if !(6.0..=24.0).contains(&c.font_size) {
            return Err(CfpError::InvalidConfig(format!(
                "Font size must be 6–24pt, got {}",
                c.font_size
            )));
        }
        let (width, height) = c.page_size.dimensions();
        if !c.margin.is_finite() || c.margin < 0.0 || c.margin * 2.0 >= width.min(height) {
            return Err(CfpError::InvalidConfig(format!(
                "Margin {}pt leaves no room on a {}x{}pt page",
                c.margin, width, height
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Output page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// US Letter, 8.5 × 11 in. (default)
    #[default]
    Letter,
    /// ISO A4, 210 × 297 mm.
    A4,
}

impl PageSize {
    /// Width and height in PDF points (1/72 in).
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}
