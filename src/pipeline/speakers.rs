//! Speaker block: the identifying part of an entry.
//!
//! Each speaker slot holds `first|last|organization|email`. Slots are read
//! in header order and the first blank one ends the list; slots after it
//! are not shown even when filled. The block always closes with the
//! primary contact fields.

use crate::error::CfpError;
use crate::fields::FieldPlan;
use crate::pipeline::input::Entry;
use crate::story::Block;
use tracing::debug;

/// Separator between the sub-fields of a speaker slot.
pub const SPEAKER_DELIMITER: char = '|';

/// One parsed speaker slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker<'a> {
    pub first: &'a str,
    pub last: &'a str,
    pub organization: &'a str,
    pub email: &'a str,
}

impl<'a> Speaker<'a> {
    /// Split a slot value into its four positional parts.
    ///
    /// Parts beyond the fourth are ignored.
    pub fn parse(value: &'a str) -> Option<Self> {
        let mut parts = value.split(SPEAKER_DELIMITER);
        Some(Self {
            first: parts.next()?,
            last: parts.next()?,
            organization: parts.next()?,
            email: parts.next()?,
        })
    }
}

/// Render the speaker list followed by the primary email, phone and job
/// title of `entry`.
///
/// # Errors
/// [`CfpError::MalformedSpeaker`] when a non-empty slot has fewer than four
/// `|`-separated parts.
pub fn format_speaker_info(plan: &FieldPlan, entry: &Entry) -> Result<Vec<Block>, CfpError> {
    let mut blocks = Vec::new();

    for &index in plan.speaker_slots() {
        let column = plan.name(index);
        let value = entry.value(index);
        if value.is_empty() {
            break;
        }

        let speaker = Speaker::parse(value).ok_or_else(|| CfpError::MalformedSpeaker {
            column: column.to_string(),
            line: entry.line(),
            parts: value.split(SPEAKER_DELIMITER).count(),
            value: value.to_string(),
        })?;

        if speaker.first.is_empty() || speaker.last.is_empty() {
            debug!(
                "Line {}: speaker list ends at '{}' (missing name)",
                entry.line(),
                column
            );
            break;
        }

        blocks.push(Block::label(column));
        blocks.push(Block::paragraph(format!(
            "{}, {}",
            speaker.first, speaker.last
        )));
        if !speaker.email.is_empty() {
            blocks.push(Block::paragraph(speaker.email));
        }
        if !speaker.organization.is_empty() {
            blocks.push(Block::paragraph(speaker.organization));
        }
        blocks.push(Block::spacer());
    }

    for (label, index) in [
        ("Primary Email", plan.primary_email()),
        ("Phone", plan.phone()),
        ("Job Title", plan.job_title()),
    ] {
        blocks.push(Block::label(label));
        blocks.push(Block::paragraph(entry.value_at(index)));
        blocks.push(Block::spacer());
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{AddressPart, PRIMARY_EMAIL};
    use crate::pipeline::input::Header;
    use crate::story::Story;

    const SLOT_1: &str = "Speaker(s)/ Author(s) Info 1";
    const SLOT_2: &str = "Speaker(s)/ Author(s) Info 2";

    fn plan() -> FieldPlan {
        let mut names: Vec<String> = vec![
            "Entry Id".into(),
            SLOT_1.into(),
            SLOT_2.into(),
            PRIMARY_EMAIL.into(),
            "Phone".into(),
        ];
        names.extend(AddressPart::ALL.iter().map(|p| p.column().to_string()));
        FieldPlan::new(&Header::new(names)).unwrap()
    }

    fn entry(slot1: &str, slot2: &str) -> Entry {
        let mut values: Vec<String> = vec![
            "9".into(),
            slot1.into(),
            slot2.into(),
            "contact@x.com".into(),
            "555-0100".into(),
        ];
        values.extend(std::iter::repeat_n(String::new(), 6));
        Entry::new(2, values)
    }

    fn text(blocks: Vec<Block>) -> Vec<String> {
        let mut story = Story::new();
        story.extend(blocks);
        story.plain_text().lines().map(str::to_string).collect()
    }

    #[test]
    fn parse_requires_four_parts() {
        assert_eq!(
            Speaker::parse("Jane|Doe|Acme|jane@x.com"),
            Some(Speaker {
                first: "Jane",
                last: "Doe",
                organization: "Acme",
                email: "jane@x.com",
            })
        );
        assert_eq!(Speaker::parse("Jane|Doe"), None);
        assert!(Speaker::parse("a|b|c|d|extra").is_some());
    }

    #[test]
    fn speaker_name_then_email_then_org() {
        let lines = text(format_speaker_info(&plan(), &entry("Jane|Doe|Acme|jane@x.com", "")).unwrap());
        assert_eq!(
            &lines[..4],
            &[
                format!("{SLOT_1}:"),
                "Jane, Doe".to_string(),
                "jane@x.com".to_string(),
                "Acme".to_string(),
            ]
        );
    }

    #[test]
    fn contact_fields_always_follow() {
        let lines = text(format_speaker_info(&plan(), &entry("", "")).unwrap());
        assert_eq!(
            lines,
            vec![
                "Primary Email:",
                "contact@x.com",
                "Phone:",
                "555-0100",
                "Job Title:",
                "",
            ]
        );
    }

    #[test]
    fn missing_name_stops_the_list() {
        let blocks =
            format_speaker_info(&plan(), &entry("|Doe|Acme|jane@x.com", "Ann|Lee|Org|a@b.c"))
                .unwrap();
        let lines = text(blocks);
        assert!(!lines.iter().any(|l| l.contains("Doe")));
        assert!(!lines.iter().any(|l| l.contains("Ann, Lee")));
        assert_eq!(lines[0], "Primary Email:");
    }

    #[test]
    fn empty_slot_drops_later_slots() {
        // A filled slot after an empty one is never shown.
        let mut e = entry("", "Ann|Lee|Org|a@b.c");
        let lines = text(format_speaker_info(&plan(), &e).unwrap());
        assert!(!lines.iter().any(|l| l.contains("Ann")));

        e = entry("Jane|Doe||", "Ann|Lee|Org|a@b.c");
        let lines = text(format_speaker_info(&plan(), &e).unwrap());
        assert!(lines.contains(&"Jane, Doe".to_string()));
        assert!(lines.contains(&"Ann, Lee".to_string()));
    }

    #[test]
    fn empty_email_and_org_are_skipped() {
        let lines = text(format_speaker_info(&plan(), &entry("Jane|Doe||", "")).unwrap());
        assert_eq!(lines[1], "Jane, Doe");
        assert_eq!(lines[2], "Primary Email:");
    }

    #[test]
    fn malformed_slot_is_an_error() {
        let err = format_speaker_info(&plan(), &entry("Jane|Doe", "")).unwrap_err();
        match err {
            CfpError::MalformedSpeaker { column, parts, .. } => {
                assert_eq!(column, SLOT_1);
                assert_eq!(parts, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
