//! Row renderer: turn one CSV entry into its page-set of blocks.
//!
//! Columns are visited in header order and dispatched on their
//! [`FieldKind`]. The address columns, the entry id and blank cells never
//! reach the generic `label: value` path.

use crate::config::RenderConfig;
use crate::error::CfpError;
use crate::fields::{FieldKind, FieldPlan, MISSING_ENTRY_ID};
use crate::pipeline::address::extract_address;
use crate::pipeline::input::Entry;
use crate::pipeline::speakers::format_speaker_info;
use crate::story::{Block, Span};
use tracing::debug;

/// Blocks produced for one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRender {
    pub entry_id: String,
    pub blocks: Vec<Block>,
    /// True when blind mode withheld a speaker block that would have shown.
    pub speakers_suppressed: bool,
}

/// Render `entry` as a page break, its `Entry ID` heading and its fields.
///
/// Every non-blank speaker column appends its own copy of the speaker block,
/// so an entry with two filled speaker columns shows the block twice.
///
/// # Errors
/// [`CfpError::MalformedSpeaker`] from the speaker block. The block is built
/// as soon as a non-blank speaker column is reached, in blind mode too, so
/// malformed speaker data fails both modes alike.
pub fn render_entry(
    plan: &FieldPlan,
    entry: &Entry,
    config: &RenderConfig,
) -> Result<EntryRender, CfpError> {
    let entry_id = match plan.entry_id() {
        Some(i) => entry.value(i).to_string(),
        None => MISSING_ENTRY_ID.to_string(),
    };

    let mut blocks = vec![
        Block::PageBreak,
        Block::Heading(format!("Entry ID: {entry_id}")),
        Block::spacer(),
    ];

    let address = extract_address(plan, entry);
    let mut speaker_blocks: Option<Vec<Block>> = None;
    let mut speakers_suppressed = false;

    for column in plan.columns() {
        let value = entry.value(column.index);
        if address.consumed.contains(&column.index)
            || column.kind == FieldKind::EntryId
            || value.trim().is_empty()
        {
            continue;
        }

        match column.kind {
            kind if kind.is_speaker() => {
                let info = match speaker_blocks.take() {
                    Some(info) => info,
                    None => format_speaker_info(plan, entry)?,
                };
                if config.blind {
                    speakers_suppressed = true;
                } else if !info.is_empty() {
                    blocks.extend(info.iter().cloned());
                    blocks.push(Block::spacer());
                }
                speaker_blocks = Some(info);
            }
            FieldKind::Phone | FieldKind::PrimaryEmail => {}
            FieldKind::JobTitle => {
                blocks.push(Block::field(&column.name, value));
                blocks.push(Block::spacer());
                blocks.push(Block::label("Address"));
                if config.blind {
                    blocks.push(Block::paragraph(address.block.blind_line()));
                } else {
                    blocks.extend(address.block.lines().into_iter().map(Block::paragraph));
                }
                blocks.push(Block::spacer());
            }
            FieldKind::AbstractLink => {
                blocks.push(Block::label("Abstract Link"));
                blocks.push(Block::Paragraph(vec![Span::link(value, value)]));
                blocks.push(Block::spacer());
            }
            _ => {
                blocks.push(Block::field(&column.name, value));
                blocks.push(Block::spacer());
            }
        }
    }

    debug!(
        "Entry {} (line {}): {} blocks{}",
        entry_id,
        entry.line(),
        blocks.len(),
        if speakers_suppressed {
            ", speaker block withheld"
        } else {
            ""
        }
    );

    Ok(EntryRender {
        entry_id,
        blocks,
        speakers_suppressed,
    })
}
