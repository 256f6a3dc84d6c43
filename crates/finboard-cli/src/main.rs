use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finboard_core::MetricsCache;
use finboard_core::config_file::{self, ConfigFile};
use finboard_ingest::{DEFAULT_REPORT_FILE, ReportLoader};
use finboard_reporting::{DashboardView, ExportFormat};

mod output;

use output::ColorMode;

/// Financial Research Dashboard - headline metrics from an annual report PDF
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (default: ./.finboard.toml over the platform config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard for a report
    Show {
        /// Path to the report PDF (or .txt); defaults to 2025_AnnualReport1.pdf next to the binary
        report: Option<PathBuf>,

        /// Output format: text, markdown or json
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Write the dashboard to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of leading PDF pages to read (0 = all)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show which extraction rules matched and what each figure was set to
    Inspect {
        /// Path to the report PDF (or .txt)
        report: Option<PathBuf>,

        /// Number of leading PDF pages to read (0 = all)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Also print the extracted text
        #[arg(long)]
        show_text: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config_file::load_explicit(path)?,
        None => config_file::load_config(),
    };

    match cli.command {
        Command::Show {
            report,
            format,
            output,
            max_pages,
            no_color,
        } => show(&config, report, format, output, max_pages, no_color),
        Command::Inspect {
            report,
            max_pages,
            show_text,
            no_color,
        } => inspect(&config, report, max_pages, show_text, no_color),
    }
}

/// Resolve the report path: CLI argument > `FINBOARD_REPORT` > config file >
/// `2025_AnnualReport1.pdf` beside the executable.
fn resolve_report_path(report: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    report
        .or_else(|| std::env::var("FINBOARD_REPORT").ok().map(PathBuf::from))
        .or_else(|| {
            config
                .source
                .as_ref()
                .and_then(|s| s.report_path.as_ref())
                .map(PathBuf::from)
        })
        .or_else(finboard_ingest::default_report_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE))
}

fn build_loader(config: &ConfigFile, max_pages: Option<usize>) -> anyhow::Result<ReportLoader> {
    let loader = ReportLoader::from_config_file(config)?;
    Ok(match max_pages {
        Some(pages) => loader.with_max_pages(pages),
        None => loader,
    })
}

fn show(
    config: &ConfigFile,
    report: Option<PathBuf>,
    format: ExportFormat,
    output: Option<PathBuf>,
    max_pages: Option<usize>,
    no_color: bool,
) -> anyhow::Result<()> {
    let report_path = resolve_report_path(report, config);
    tracing::debug!(path = %report_path.display(), ?format, "rendering dashboard");
    let loader = build_loader(config, max_pages)?;
    let cache = MetricsCache::new();

    let outcome = loader.load_cached(&cache, &report_path);
    let view = DashboardView::from_outcome(&outcome);

    if let Some(ref output_path) = output {
        finboard_reporting::export_results(&view, format, output_path)
            .map_err(|e| anyhow::anyhow!(e))?;
        eprintln!("Dashboard written to {}", output_path.display());
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    match format {
        ExportFormat::Text => {
            output::print_dashboard(&mut stdout, &view, ColorMode(!no_color))?;
        }
        other => {
            let rendered =
                finboard_reporting::render(&view, other).map_err(|e| anyhow::anyhow!(e))?;
            writeln!(stdout, "{}", rendered)?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn inspect(
    config: &ConfigFile,
    report: Option<PathBuf>,
    max_pages: Option<usize>,
    show_text: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let report_path = resolve_report_path(report, config);
    let loader = build_loader(config, max_pages)?;
    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout().lock();

    let text = match loader.read_text(&report_path) {
        Ok(text) => text,
        Err(e) => {
            output::print_error(&mut stdout, &display_name(&report_path), &e.to_string(), color)?;
            return Ok(());
        }
    };

    if show_text {
        output::print_text(&mut stdout, &text, color)?;
    }

    match loader.extractor().extract_with_provenance(&text) {
        Ok(extraction) => output::print_inspection(
            &mut stdout,
            &display_name(&report_path),
            loader.extractor().config(),
            &extraction,
            color,
        )?,
        Err(e) => {
            output::print_error(&mut stdout, &display_name(&report_path), &e.to_string(), color)?
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
