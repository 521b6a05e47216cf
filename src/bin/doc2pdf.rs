//! CLI binary for doc2pdf.
//!
//! A thin shim over the library crate: `serve` runs the HTTP service,
//! `convert` turns one local file into a PDF on disk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc2pdf::server::{self, ServerConfig};
use doc2pdf::{convert_to_file, output_filename, ConversionConfig};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  doc2pdf serve --port 8080
  doc2pdf convert report.xlsx
  doc2pdf convert deck.pptx -o out/deck.pdf --json

SUPPORTED INPUT:
  xlsx xls xlsm   spreadsheet, one table per sheet
  pptx ppt        slides, one page per slide
  docx doc        Word document, paragraphs then tables
  txt             plain text

HTTP:
  GET  /          upload page (drag and drop)
  POST /convert   multipart form, field "file"; answers with the PDF
  GET  /health    {"status":"healthy","version":"..."}
"#;

/// Convert office documents and plain text to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "doc2pdf",
    version,
    about = "Convert spreadsheets, slide decks, Word documents and plain text to PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOC2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOC2PDF_QUIET")]
    quiet: bool,

    /// Longest edge, in pixels, of embedded images.
    #[arg(long, global = true, env = "DOC2PDF_MAX_IMAGE_PIXELS", default_value_t = 2000)]
    max_image_pixels: u32,

    /// Upload size cap in MiB.
    #[arg(long, global = true, env = "DOC2PDF_MAX_UPLOAD_MB", default_value_t = 16,
          value_parser = clap::value_parser!(u64).range(1..=4096))]
    max_upload_mb: u64,

    /// Directory for per-conversion scratch files (default: system temp).
    #[arg(long, global = true, env = "DOC2PDF_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP conversion service.
    Serve {
        /// Address to bind.
        #[arg(long, env = "DOC2PDF_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },

    /// Convert a local file.
    Convert {
        /// Input document (.xlsx, .xls, .xlsm, .pptx, .ppt, .docx, .doc, .txt).
        input: PathBuf,

        /// Output PDF path. Default: the sanitised input name with `.pdf`,
        /// next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print conversion stats and warnings as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Command::Serve { host, port } => {
            server::serve(ServerConfig {
                host,
                port,
                conversion: config,
            })
            .await
            .context("Server failed")?;
        }
        Command::Convert {
            ref input,
            ref output,
            json,
        } => {
            let output_path = match output {
                Some(p) => p.clone(),
                None => default_output_path(input),
            };
            let result = convert_to_file(input, &output_path, &config)
                .await
                .with_context(|| format!("Failed to convert {}", input.display()))?;

            if json {
                let json = serde_json::to_string_pretty(&result).context("Failed to serialise output")?;
                println!("{json}");
            } else if !cli.quiet {
                for warning in &result.warnings {
                    eprintln!("  {} {}", yellow("⚠"), warning);
                }
                eprintln!(
                    "{}  {} pages  {}ms  →  {}",
                    green("✔"),
                    result.stats.page_count,
                    result.stats.total_duration_ms,
                    bold(&output_path.display().to_string()),
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let max_upload_bytes = usize::try_from(cli.max_upload_mb * 1024 * 1024).context("Upload limit too large")?;
    let mut builder = ConversionConfig::builder()
        .max_image_pixels(cli.max_image_pixels)
        .max_upload_bytes(max_upload_bytes);
    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_root(dir);
    }
    builder.build().context("Invalid configuration")
}

fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(output_filename(&name))
}
