//! The document model: an append-only sequence of renderable blocks.
//!
//! The formatter stages produce [`Block`]s; layout and PDF serialisation
//! consume them. Nothing downstream of [`Story`] knows about CSV columns.

use serde::{Deserialize, Serialize};

/// Vertical gap after a field, in points (0.1 in).
pub const FIELD_GAP: f32 = 7.2;
/// Vertical gap after the document title, in points (0.2 in).
pub const TITLE_GAP: f32 = 14.4;

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Target URI when the span is a hyperlink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            link: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            link: None,
        }
    }

    /// A hyperlink whose visible text is `text`.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            link: Some(href.into()),
        }
    }
}

/// A renderable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// Document title, largest type.
    Title(String),
    /// Entry heading.
    Heading(String),
    /// Flowing paragraph of styled spans.
    Paragraph(Vec<Span>),
    /// Vertical space in points.
    Spacer(f32),
    /// Force the next block onto a new page.
    PageBreak,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Span::plain(text)])
    }

    /// A bold `"{label}:"` paragraph.
    pub fn label(label: &str) -> Self {
        Block::Paragraph(vec![Span::bold(format!("{label}:"))])
    }

    /// `label: value` on a single line, label in bold.
    pub fn field(label: &str, value: impl Into<String>) -> Self {
        Block::Paragraph(vec![
            Span::bold(format!("{label}:")),
            Span::plain(format!(" {}", value.into())),
        ])
    }

    pub fn spacer() -> Self {
        Block::Spacer(FIELD_GAP)
    }

    /// Text content with styling dropped, `None` for spacers and breaks.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Block::Title(t) | Block::Heading(t) => Some(t.clone()),
            Block::Paragraph(spans) => Some(spans.iter().map(|s| s.text.as_str()).collect()),
            Block::Spacer(_) | Block::PageBreak => None,
        }
    }

    /// Markdown rendering, `None` for spacers.
    pub fn to_markdown(&self) -> Option<String> {
        match self {
            Block::Title(t) => Some(format!("# {t}")),
            Block::Heading(t) => Some(format!("## {t}")),
            Block::Paragraph(spans) => Some(spans.iter().map(span_markdown).collect()),
            Block::Spacer(_) => None,
            Block::PageBreak => Some("---".to_string()),
        }
    }
}

fn span_markdown(span: &Span) -> String {
    // Keep surrounding whitespace outside the emphasis markers.
    let trimmed = span.text.trim();
    if trimmed.is_empty() {
        return span.text.clone();
    }
    let lead = &span.text[..span.text.len() - span.text.trim_start().len()];
    let trail = &span.text[span.text.trim_end().len()..];
    let inner = match (&span.link, span.bold) {
        (Some(href), _) => format!("[{trimmed}]({href})"),
        (None, true) => format!("**{trimmed}**"),
        (None, false) => trimmed.to_string(),
    };
    format!("{lead}{inner}{trail}")
}

/// The whole document, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    blocks: Vec<Block>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// One line per text block, styling dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for line in self.blocks.iter().filter_map(Block::plain_text) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Markdown preview: one paragraph per text block, `---` per page break.
    pub fn to_markdown(&self) -> String {
        let parts: Vec<String> = self.blocks.iter().filter_map(Block::to_markdown).collect();
        let mut md = parts.join("\n\n");
        md.push('\n');
        md
    }
}
