//! Top-level conversion entry points.
//!
//! Every entry point runs the same synchronous pipeline: read the header,
//! classify its columns once, render the rows in file order, then lay out
//! and serialise the whole story. Any error aborts the run; nothing built
//! so far is salvaged.

use crate::config::RenderConfig;
use crate::error::CfpError;
use crate::fields::FieldPlan;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::layout::{layout_story, LayoutSettings, PageLayout};
use crate::pipeline::{entry, input, write};
use crate::story::{Block, Story, TITLE_GAP};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Render the CSV at `csv_path` into a [`Story`] without producing a PDF.
///
/// The story is still laid out so `stats.pages` matches what
/// [`convert_to_bytes`] would produce.
///
/// # Errors
/// Any [`CfpError`] from reading, classifying or rendering the rows.
pub fn render_story(
    csv_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ConversionOutput, CfpError> {
    let run = build(csv_path.as_ref(), config)?;
    Ok(ConversionOutput {
        story: run.story,
        stats: run.stats,
    })
}

/// Convert the CSV at `csv_path` to PDF bytes held in memory.
pub fn convert_to_bytes(
    csv_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<(Vec<u8>, ConversionStats), CfpError> {
    let run = build(csv_path.as_ref(), config)?;
    let bytes = write::write_pdf(&run.pages, &run.settings, &config.title)?;
    debug!("Serialised PDF: {} bytes", bytes.len());
    Ok((bytes, run.stats))
}

/// Convert the CSV at `csv_path` and write the PDF to `pdf_path`.
///
/// Uses atomic write (temp file in the target directory + rename), so a
/// failed run never leaves a partial file behind.
pub fn convert_to_file(
    csv_path: impl AsRef<Path>,
    pdf_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ConversionStats, CfpError> {
    convert_to_file_with_output(csv_path, pdf_path, config).map(|output| output.stats)
}

/// Like [`convert_to_file`], but also hand back the rendered story.
///
/// The CSV is read and laid out once; use this when a preview of the story
/// is needed alongside the PDF.
pub fn convert_to_file_with_output(
    csv_path: impl AsRef<Path>,
    pdf_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ConversionOutput, CfpError> {
    let run = build(csv_path.as_ref(), config)?;
    let bytes = write::write_pdf(&run.pages, &run.settings, &config.title)?;
    let path = pdf_path.as_ref();
    write_atomic(path, &bytes)?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(ConversionOutput {
        story: run.story,
        stats: run.stats,
    })
}

/// Classify the header of the CSV at `csv_path` without reading any rows.
///
/// Fails with [`CfpError::MissingColumn`] exactly when a conversion would.
pub fn inspect(csv_path: impl AsRef<Path>) -> Result<FieldPlan, CfpError> {
    let csv = input::open_csv(csv_path.as_ref())?;
    FieldPlan::new(csv.header())
}

// ── Internal helpers ─────────────────────────────────────────────────────

struct Run {
    story: Story,
    pages: Vec<PageLayout>,
    settings: LayoutSettings,
    stats: ConversionStats,
}

fn build(csv_path: &Path, config: &RenderConfig) -> Result<Run, CfpError> {
    let start = Instant::now();
    info!(
        "Starting conversion: {} (blind: {})",
        csv_path.display(),
        config.blind
    );

    let mut csv = input::open_csv(csv_path)?;
    let plan = FieldPlan::new(csv.header())?;
    debug!(
        "Classified {} columns ({} speaker slots)",
        plan.columns().len(),
        plan.speaker_slots().len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(plan.columns().len());
    }

    let mut story = Story::new();
    story.push(Block::Title(config.title.clone()));
    story.push(Block::Spacer(TITLE_GAP));

    let mut entries = 0usize;
    let mut speakers_suppressed = 0usize;

    for row in csv.entries() {
        let row = row?;
        let entry_num = entries + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_entry_start(entry_num);
        }

        let rendered = entry::render_entry(&plan, &row, config)?;
        if rendered.speakers_suppressed {
            speakers_suppressed += 1;
        }
        let block_count = rendered.blocks.len();
        story.extend(rendered.blocks);
        entries = entry_num;

        if let Some(ref cb) = config.progress_callback {
            cb.on_entry_complete(entry_num, &rendered.entry_id, block_count);
        }
    }

    let settings = LayoutSettings::from_config(config);
    let pages = layout_story(&story, &settings);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(entries, pages.len());
    }

    let stats = ConversionStats {
        entries,
        pages: pages.len(),
        blocks: story.len(),
        blind: config.blind,
        speakers_suppressed,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} entries, {} pages, {}ms",
        stats.entries, stats.pages, stats.duration_ms
    );

    Ok(Run {
        story,
        pages,
        settings,
        stats,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CfpError> {
    let write_err = |source| CfpError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
