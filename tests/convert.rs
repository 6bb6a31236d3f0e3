//! Integration tests: CSV fixtures on disk through the public entry points.
//!
//! Every test writes its own CSV into a temp directory, runs a conversion and
//! checks either the rendered story (Markdown preview) or the PDF itself via
//! lopdf.

use cfp2pdf::fields::AddressPart;
use cfp2pdf::{
    convert_to_bytes, convert_to_file, convert_to_file_with_output, inspect, render_story, Block,
    CfpError, ConversionProgressCallback, FieldKind, RenderConfig, Span,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SLOT_1: &str = "Speaker(s)/ Author(s) Info 1";
const SLOT_2: &str = "Speaker(s)/ Author(s) Info 2";
const PRIMARY_EMAIL: &str = "Primary/Preferred Email to contact (Enter Email)";
const ABSTRACT: &str = "Extended Abstract (upload)";

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Build a CSV with the given extra columns appended to `Entry Id` and the
/// six address columns. Each row lists `(column, value)` pairs; columns not
/// named in a row are left empty.
struct Fixture {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Fixture {
    fn new(extra: &[&str]) -> Self {
        let mut columns = vec!["Entry Id".to_string()];
        columns.extend(extra.iter().map(|c| c.to_string()));
        columns.extend(AddressPart::ALL.iter().map(|p| p.column().to_string()));
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn row(mut self, cells: &[(&str, &str)]) -> Self {
        let row = self
            .columns
            .iter()
            .map(|c| {
                cells
                    .iter()
                    .find(|(name, _)| name == c)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default()
            })
            .collect();
        self.rows.push(row);
        self
    }

    fn write(&self, dir: &TempDir) -> PathBuf {
        let path = dir.path().join("entries.csv");
        let mut wtr = csv::Writer::from_path(&path).unwrap();
        wtr.write_record(&self.columns).unwrap();
        for row in &self.rows {
            wtr.write_record(row).unwrap();
        }
        wtr.flush().unwrap();
        path
    }
}

fn config(blind: bool) -> RenderConfig {
    RenderConfig::builder().blind(blind).build().unwrap()
}

fn markdown(csv: &Path, blind: bool) -> String {
    render_story(csv, &config(blind)).unwrap().story.to_markdown()
}

fn page_count(pdf: &Path) -> usize {
    lopdf::Document::load(pdf).unwrap().get_pages().len()
}

// ── Document structure ───────────────────────────────────────────────────────

#[test]
fn one_page_per_entry_after_the_title_page() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Session Title"])
        .row(&[("Entry Id", "1"), ("Session Title", "Ownership")])
        .row(&[("Entry Id", "2"), ("Session Title", "Borrowing")])
        .write(&dir);
    let pdf = dir.path().join("out.pdf");

    let stats = convert_to_file(&csv, &pdf, &config(false)).unwrap();

    assert_eq!(stats.entries, 2);
    assert_eq!(stats.pages, 3);
    assert_eq!(page_count(&pdf), 3);
}

#[test]
fn file_output_also_returns_the_rendered_story() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Session Title"])
        .row(&[("Entry Id", "1"), ("Session Title", "Ownership")])
        .write(&dir);
    let pdf = dir.path().join("out.pdf");
    let recorder = Arc::new(Recorder::default());
    let config = RenderConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let output = convert_to_file_with_output(&csv, &pdf, &config).unwrap();

    assert_eq!(page_count(&pdf), output.stats.pages);
    assert_eq!(
        output.story,
        render_story(&csv, &RenderConfig::default()).unwrap().story
    );
    // One pass over the CSV.
    assert_eq!(recorder.started.load(Ordering::SeqCst), 1);
}

#[test]
fn header_only_csv_gives_title_page() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[]).write(&dir);

    let (bytes, stats) = convert_to_bytes(&csv, &config(false)).unwrap();

    assert_eq!(stats.entries, 0);
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn story_opens_with_title_then_entry_headings() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[]).row(&[("Entry Id", "42")]).write(&dir);

    let output = render_story(&csv, &config(false)).unwrap();
    let blocks = output.story.blocks();

    assert_eq!(
        blocks[0],
        Block::Title("Call For Participation Entries".into())
    );
    assert_eq!(blocks[2], Block::PageBreak);
    assert_eq!(blocks[3], Block::Heading("Entry ID: 42".into()));
}

#[test]
fn quoted_header_names_are_normalised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quoted.csv");
    let mut header = vec!["\"\"\"Entry Id\"\"\"".to_string()];
    let mut row = vec!["7".to_string()];
    for part in AddressPart::ALL {
        header.push(format!("\"{}\"", part.column()));
        row.push(String::new());
    }
    std::fs::write(&path, format!("{}\n{}\n", header.join(","), row.join(","))).unwrap();

    let plan = inspect(&path).unwrap();
    assert_eq!(plan.columns()[0].kind, FieldKind::EntryId);
    assert!(markdown(&path, false).contains("## Entry ID: 7"));
}

// ── Blind mode and the address block ─────────────────────────────────────────

#[test]
fn blind_job_title_shows_only_the_locality_line() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Job Title"])
        .row(&[
            ("Entry Id", "42"),
            ("Job Title", "Chair"),
            ("Address (Street Address)", "1 Main St"),
            ("Address (City)", "Springfield"),
            ("Address (State / Province)", "IL"),
            ("Address (ZIP / Postal Code)", "62701"),
        ])
        .write(&dir);

    let md = markdown(&csv, true);

    assert_eq!(md.matches("Entry ID: 42").count(), 1);
    assert!(md.contains("**Job Title:** Chair"));
    assert!(md.contains("Springfield, IL 62701"));
    assert!(!md.contains("1 Main St"));
}

#[test]
fn blind_mode_drops_the_visa_note_line() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Job Title"])
        .row(&[
            ("Entry Id", "43"),
            ("Job Title", "Chair"),
            ("Address (City)", "Springfield"),
            ("Address (State / Province)", "IL"),
            ("Address (ZIP / Postal Code)", "62701"),
            (
                "Address (Note: We are unable to sponsor or provide visas.)",
                "Understood",
            ),
        ])
        .write(&dir);

    let blind = markdown(&csv, true);
    assert!(blind.ends_with("**Address:**\n\nSpringfield, IL 62701\n"));
    assert!(!blind.contains("Understood"));

    let sighted = markdown(&csv, false);
    assert!(sighted.contains("Springfield, IL 62701\n\nUnderstood"));
}

#[test]
fn address_columns_never_render_as_fields() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Job Title"])
        .row(&[
            ("Entry Id", "1"),
            ("Job Title", "Chair"),
            ("Address (Street Address)", "1 Main St"),
            ("Address (Address Line 2)", "Suite 5"),
        ])
        .write(&dir);

    let md = markdown(&csv, false);

    assert!(md.contains("1 Main St\n\nSuite 5"));
    assert!(!md.contains("Address (Street Address)"));
    assert!(!md.contains("Address (Address Line 2)"));
}

#[test]
fn speaker_block_depends_on_blind_mode() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[SLOT_1, PRIMARY_EMAIL])
        .row(&[
            ("Entry Id", "3"),
            (SLOT_1, "Jane|Doe|Acme|jane@x.com"),
            (PRIMARY_EMAIL, "contact@x.com"),
        ])
        .write(&dir);

    let blind = render_story(&csv, &config(true)).unwrap();
    let blind_md = blind.story.to_markdown();
    assert!(!blind_md.contains("Jane"));
    assert!(!blind_md.contains("contact@x.com"));
    assert_eq!(blind.stats.speakers_suppressed, 1);

    let sighted_md = markdown(&csv, false);
    let name = sighted_md.find("Jane, Doe").unwrap();
    let email = sighted_md.find("jane@x.com").unwrap();
    let org = sighted_md.find("Acme").unwrap();
    assert!(name < email && email < org);
}

#[test]
fn speaker_block_repeats_per_filled_speaker_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[SLOT_1, SLOT_2])
        .row(&[
            ("Entry Id", "9"),
            (SLOT_1, "Jane|Doe|Acme|jane@x.com"),
            (SLOT_2, "Ann|Lee|Org|ann@x.com"),
        ])
        .write(&dir);

    let md = markdown(&csv, false);
    assert_eq!(md.matches("Jane, Doe").count(), 2);
    assert_eq!(md.matches("**Primary Email:**").count(), 2);

    let blind = render_story(&csv, &config(true)).unwrap();
    assert!(!blind.story.to_markdown().contains("Jane"));
    assert_eq!(blind.stats.speakers_suppressed, 1);
}

#[test]
fn whitespace_only_speaker_cell_renders_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[SLOT_1, "Track"])
        .row(&[("Entry Id", "10"), (SLOT_1, "   "), ("Track", "Systems")])
        .write(&dir);

    for blind in [false, true] {
        let md = markdown(&csv, blind);
        assert!(md.contains("**Track:** Systems"));
        assert!(!md.contains("**Primary Email:**"));
    }
}

#[test]
fn missing_speaker_name_stops_the_speaker_list() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[SLOT_1, SLOT_2])
        .row(&[
            ("Entry Id", "4"),
            (SLOT_1, "|Doe|Acme|jane@x.com"),
            (SLOT_2, "Ann|Lee|Org|ann@x.com"),
        ])
        .write(&dir);

    let md = markdown(&csv, false);

    assert!(!md.contains("Doe"));
    assert!(!md.contains("Ann, Lee"));
    assert!(md.contains("**Primary Email:**"));
}

// ── Generic fields and links ─────────────────────────────────────────────────

#[test]
fn every_generic_field_appears_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Session Title", "Track", "Level", "Notes"])
        .row(&[
            ("Entry Id", "5"),
            ("Session Title", "Zero-cost abstractions"),
            ("Track", "Systems"),
            ("Level", "Advanced"),
        ])
        .write(&dir);

    let md = markdown(&csv, true);

    for (key, value) in [
        ("Session Title", "Zero-cost abstractions"),
        ("Track", "Systems"),
        ("Level", "Advanced"),
    ] {
        let expected = format!("**{key}:** {value}");
        assert_eq!(md.matches(&expected).count(), 1, "{expected}");
    }
    assert!(!md.contains("Notes"));
}

#[test]
fn extended_abstract_becomes_a_pdf_link() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[ABSTRACT])
        .row(&[("Entry Id", "6"), (ABSTRACT, "http://x")])
        .write(&dir);

    let output = render_story(&csv, &config(true)).unwrap();
    assert!(output
        .story
        .blocks()
        .contains(&Block::Paragraph(vec![Span::link("http://x", "http://x")])));

    let (bytes, _) = convert_to_bytes(&csv, &config(true)).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let annotated = doc
        .get_pages()
        .into_values()
        .filter(|id| {
            doc.get_dictionary(*id)
                .map(|page| page.has(b"Annots"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(annotated, 1);
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn missing_csv_is_file_not_found() {
    let err = render_story("/definitely/not/here.csv", &config(false)).unwrap_err();
    assert!(matches!(err, CfpError::FileNotFound { .. }));
}

#[test]
fn missing_address_column_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-address.csv");
    std::fs::write(&path, "Entry Id,Session Title\n1,Intro\n").unwrap();

    let err = inspect(&path).unwrap_err();
    assert!(matches!(err, CfpError::MissingColumn { .. }));
    let err = render_story(&path, &config(false)).unwrap_err();
    assert!(matches!(err, CfpError::MissingColumn { .. }));
}

#[test]
fn short_row_aborts_without_writing_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&["Session Title"]).write(&dir);
    let mut text = std::fs::read_to_string(&csv).unwrap();
    text.push_str("1,Intro,,\n");
    std::fs::write(&csv, text).unwrap();
    let pdf = dir.path().join("out.pdf");

    let err = convert_to_file(&csv, &pdf, &config(false)).unwrap_err();

    assert!(matches!(err, CfpError::ShortRow { expected: 8, found: 4, .. }));
    assert!(!pdf.exists());
}

#[test]
fn malformed_speaker_fails_in_both_modes() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[SLOT_1])
        .row(&[("Entry Id", "8"), (SLOT_1, "Jane|Doe")])
        .write(&dir);

    for blind in [false, true] {
        let err = render_story(&csv, &config(blind)).unwrap_err();
        assert!(matches!(err, CfpError::MalformedSpeaker { parts: 2, .. }));
    }
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    started: AtomicUsize,
    ids: Mutex<Vec<String>>,
    finished: Mutex<Option<(usize, usize)>>,
}

impl ConversionProgressCallback for Recorder {
    fn on_entry_start(&self, _entry_num: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_entry_complete(&self, _entry_num: usize, entry_id: &str, _blocks: usize) {
        self.ids.lock().unwrap().push(entry_id.to_string());
    }

    fn on_conversion_complete(&self, entries: usize, pages: usize) {
        *self.finished.lock().unwrap() = Some((entries, pages));
    }
}

#[test]
fn progress_callback_sees_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let csv = Fixture::new(&[])
        .row(&[("Entry Id", "a")])
        .row(&[("Entry Id", "b")])
        .write(&dir);
    let recorder = Arc::new(Recorder::default());
    let config = RenderConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    render_story(&csv, &config).unwrap();

    assert_eq!(recorder.started.load(Ordering::SeqCst), 2);
    assert_eq!(*recorder.ids.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(*recorder.finished.lock().unwrap(), Some((2, 3)));
}
