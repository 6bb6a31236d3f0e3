//! Flowing layout: place story blocks onto fixed-size pages.
//!
//! Paragraphs are broken into words, filled into lines no wider than the
//! text frame and stacked top to bottom. A line that would cross the bottom
//! margin starts a new page. Explicit page breaks start a new page unless
//! the current one is still blank, and spacers are dropped at the top of a
//! page.

use crate::config::RenderConfig;
use crate::pipeline::metrics::{text_width, Face};
use crate::story::{Block, Span, Story};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Line height as a multiple of the font size.
const LEADING: f32 = 1.2;
const TITLE_SCALE: f32 = 1.8;
const HEADING_SCALE: f32 = 1.4;

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Page geometry and base type size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub body_size: f32,
}

impl LayoutSettings {
    pub fn from_config(config: &RenderConfig) -> Self {
        let (page_width, page_height) = config.page_size.dimensions();
        Self {
            page_width,
            page_height,
            margin: config.margin,
            body_size: config.font_size,
        }
    }

    fn frame_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.page_height - self.margin
    }

    fn bottom(&self) -> f32 {
        self.margin
    }
}

/// A run of text placed at a baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    /// Baseline, in PDF user space (origin bottom-left).
    pub y: f32,
    pub face: Face,
    pub size: f32,
    pub text: String,
}

/// A clickable rectangle `[x0, y0, x1, y1]` pointing at `uri`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    pub rect: [f32; 4],
    pub uri: String,
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
    pub links: Vec<LinkArea>,
}

/// Lay out `story`. Always returns at least one page.
pub fn layout_story(story: &Story, settings: &LayoutSettings) -> Vec<PageLayout> {
    let mut pager = Paginator::new(settings);
    let body = settings.body_size;

    for block in story.blocks() {
        match block {
            Block::Title(text) => {
                pager.paragraph(&[Span::bold(text.as_str())], body * TITLE_SCALE)
            }
            Block::Heading(text) => {
                pager.paragraph(&[Span::bold(text.as_str())], body * HEADING_SCALE)
            }
            Block::Paragraph(spans) => pager.paragraph(spans, body),
            Block::Spacer(height) => pager.spacer(*height),
            Block::PageBreak => pager.page_break(),
        }
    }

    let pages = pager.finish();
    debug!("Laid out {} blocks on {} pages", story.len(), pages.len());
    pages
}

/// A styled fragment of one line.
#[derive(Debug, Clone, PartialEq)]
struct Piece<'a> {
    text: String,
    face: Face,
    link: Option<&'a str>,
}

struct Word<'a> {
    text: &'a str,
    face: Face,
    link: Option<&'a str>,
    gap_before: bool,
}

fn face_of(span: &Span) -> Face {
    if span.bold {
        Face::Bold
    } else {
        Face::Regular
    }
}

/// Split spans into words, remembering where whitespace separated them.
fn words(spans: &[Span]) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut pending_gap = false;
    for span in spans {
        let mut prev_end = 0;
        for m in RE_WORD.find_iter(&span.text) {
            out.push(Word {
                text: m.as_str(),
                face: face_of(span),
                link: span.link.as_deref(),
                gap_before: m.start() > prev_end || (prev_end == 0 && pending_gap),
            });
            prev_end = m.end();
        }
        if prev_end < span.text.len() {
            pending_gap = true;
        } else if prev_end > 0 {
            pending_gap = false;
        }
    }
    out
}

/// Fill words into lines no wider than `max_width`.
fn wrap<'a>(spans: &'a [Span], size: f32, max_width: f32) -> Vec<Vec<Piece<'a>>> {
    let mut lines: Vec<Vec<Piece<'a>>> = Vec::new();
    let mut line: Vec<Piece<'a>> = Vec::new();
    let mut width = 0.0f32;

    for word in words(spans) {
        let word_width = text_width(word.text, word.face, size);
        let gap_width = match line.last() {
            Some(last) if word.gap_before => text_width(" ", last.face, size),
            _ => 0.0,
        };

        if !line.is_empty() && width + gap_width + word_width > max_width {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }

        if line.is_empty() && word_width > max_width {
            // Too long for any line: break between characters.
            for chunk in split_to_width(word.text, word.face, size, max_width) {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                width = text_width(chunk, word.face, size);
                line.push(Piece {
                    text: chunk.to_string(),
                    face: word.face,
                    link: word.link,
                });
            }
            continue;
        }

        let gap = !line.is_empty() && word.gap_before;
        match line.last_mut() {
            Some(last) if last.face == word.face && last.link == word.link => {
                if gap {
                    last.text.push(' ');
                    width += gap_width;
                }
                last.text.push_str(word.text);
            }
            last => {
                if let (true, Some(last)) = (gap, last) {
                    last.text.push(' ');
                    width += gap_width;
                }
                line.push(Piece {
                    text: word.text.to_string(),
                    face: word.face,
                    link: word.link,
                });
            }
        }
        width += word_width;
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Break `text` into chunks that each fit `max_width` (at least one char each).
fn split_to_width(text: &str, face: Face, size: f32, max_width: f32) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut width = 0.0f32;
    for (i, c) in text.char_indices() {
        let mut buf = [0u8; 4];
        let w = text_width(c.encode_utf8(&mut buf), face, size);
        if i > start && width + w > max_width {
            chunks.push(&text[start..i]);
            start = i;
            width = 0.0;
        }
        width += w;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

struct Paginator<'s> {
    settings: &'s LayoutSettings,
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor: f32,
    has_content: bool,
}

impl<'s> Paginator<'s> {
    fn new(settings: &'s LayoutSettings) -> Self {
        Self {
            settings,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: settings.top(),
            has_content: false,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.settings.top();
        self.has_content = false;
    }

    fn page_break(&mut self) {
        if self.has_content {
            self.new_page();
        }
    }

    fn spacer(&mut self, height: f32) {
        if !self.has_content {
            return;
        }
        self.cursor -= height;
        if self.cursor <= self.settings.bottom() {
            self.new_page();
        }
    }

    fn paragraph(&mut self, spans: &[Span], size: f32) {
        for line in wrap(spans, size, self.settings.frame_width()) {
            self.place_line(line, size);
        }
    }

    fn place_line(&mut self, line: Vec<Piece<'_>>, size: f32) {
        let line_height = size * LEADING;
        if self.has_content && self.cursor - line_height < self.settings.bottom() {
            self.new_page();
        }

        let baseline = self.cursor - size;
        let mut x = self.settings.margin;
        for piece in line {
            let width = text_width(&piece.text, piece.face, size);
            if let Some(uri) = piece.link {
                self.current.links.push(LinkArea {
                    rect: [x, baseline - size * 0.25, x + width, baseline + size * 0.85],
                    uri: uri.to_string(),
                });
            }
            if !piece.text.is_empty() {
                self.current.runs.push(TextRun {
                    x,
                    y: baseline,
                    face: piece.face,
                    size,
                    text: piece.text,
                });
            }
            x += width;
        }

        self.cursor -= line_height;
        self.has_content = true;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if self.has_content || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}
