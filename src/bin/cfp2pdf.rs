//! CLI binary for cfp2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RenderConfig` and prints results.

use anyhow::{Context, Result};
use cfp2pdf::{
    convert_to_file_with_output, inspect, ConversionProgressCallback, PageSize, ProgressCallback,
    RenderConfig,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner counting rendered entries. The CSV
/// is read lazily, so there is no total to draw a bar against.
struct CliProgressCallback {
    bar: ProgressBar,
    verbose: bool,
}

impl CliProgressCallback {
    fn new(verbose: bool) -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  {pos:>4} entries  {msg}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading header…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar, verbose })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, columns: usize) {
        self.bar.set_prefix("Rendering");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Header has {columns} columns"))
        ));
    }

    fn on_entry_start(&self, entry_num: usize) {
        self.bar.set_message(format!("row {entry_num}"));
    }

    fn on_entry_complete(&self, _entry_num: usize, entry_id: &str, blocks: usize) {
        if self.verbose {
            self.bar.println(format!(
                "  {} Entry {:<8}  {}",
                green("✓"),
                entry_id,
                dim(&format!("{blocks:>3} blocks")),
            ));
        }
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, entries: usize, pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} entries laid out on {} pages",
            green("✔"),
            bold(&entries.to_string()),
            bold(&pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full review packet
  cfp2pdf submissions.csv packet.pdf

  # Blind judging: speaker names, emails, organisations and street
  # addresses are withheld
  cfp2pdf submissions.csv blind.pdf --blind

  # A4 paper with a custom cover title
  cfp2pdf --page-size a4 --title "Track Review 2026" submissions.csv packet.pdf

  # Also write a Markdown preview of the packet
  cfp2pdf submissions.csv packet.pdf --markdown packet.md

  # Show how each CSV column will be treated (writes nothing)
  cfp2pdf --inspect-only submissions.csv packet.pdf

ENVIRONMENT VARIABLES:
  CFP2PDF_TITLE   Title of the first page
  RUST_LOG        Override the log filter (e.g. cfp2pdf=debug)
"#;

/// Render call-for-participation CSV exports as PDF review packets.
#[derive(Parser, Debug)]
#[command(
    name = "cfp2pdf",
    version,
    about = "Render call-for-participation CSV exports as PDF review packets",
    long_about = "Render a call-for-participation CSV export as a PDF with one section per \
submission. Blind judging mode withholds speaker details and narrows addresses to their \
city, state and ZIP line.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// CSV export to read.
    csv_file: PathBuf,

    /// PDF file to write.
    pdf_file: PathBuf,

    /// Blind judging mode: exclude speaker information.
    #[arg(long, env = "CFP2PDF_BLIND")]
    blind: bool,

    /// Title of the first page.
    #[arg(long, env = "CFP2PDF_TITLE")]
    title: Option<String>,

    /// Paper size.
    #[arg(long, value_enum, default_value = "letter")]
    page_size: PageSizeArg,

    /// Also write a Markdown preview of the document to this file.
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Print the rendered story and stats as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Print the column classification only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress spinner.
    #[arg(long, env = "CFP2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    Letter,
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers what INFO logs would say, so only warnings get
    // through while it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let plan = inspect(&cli.csv_file).context("Failed to inspect CSV")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("Failed to serialize columns")?
            );
        } else {
            println!("File:     {}", cli.csv_file.display());
            println!("Columns:  {}", plan.columns().len());
            println!("Speaker slots: {}", plan.speaker_slots().len());
            println!();
            for column in plan.columns() {
                println!(
                    "  {:>3}  {:<24} {}",
                    column.index,
                    format!("{:?}", column.kind),
                    column.name
                );
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new(cli.verbose);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    if !cli.quiet {
        let message = if cli.blind {
            "Blind judging mode is enabled. Speaker information will be excluded."
        } else {
            "Blind judging mode is disabled. Speaker information will be included."
        };
        // Keep stdout clean for the JSON document.
        if cli.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_to_file_with_output(&cli.csv_file, &cli.pdf_file, &config)
        .context("Conversion failed")?;
    let stats = &output.stats;

    // ── Previews (from the same rendered story) ──────────────────────────
    if let Some(ref md_path) = cli.markdown {
        std::fs::write(md_path, output.story.to_markdown()).with_context(|| {
            format!("Failed to write Markdown preview to {}", md_path.display())
        })?;
    }
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet {
        let message = format!(
            "Successfully converted {} to {}",
            cli.csv_file.display(),
            cli.pdf_file.display()
        );
        if cli.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
        if !show_progress {
            eprintln!(
                "{}",
                dim(&format!(
                    "{} entries, {} pages, {}ms",
                    stats.entries, stats.pages, stats.duration_ms
                ))
            );
        }
    }

    Ok(())
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenderConfig> {
    let mut builder = RenderConfig::builder()
        .blind(cli.blind)
        .page_size(cli.page_size.into());

    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
