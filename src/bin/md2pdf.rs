//! CLI binary for resume-md2pdf.
//!
//! A thin shim over the library crate: maps flags to `ResumeConfig`, asks
//! before clobbering files, and prints one status line per run.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use resume_md2pdf::pipeline::input;
use resume_md2pdf::{
    convert_to_file, default_output_path, inspect, normalize_output_path, ResumeConfig,
    ResumeError, StyleFile, Theme,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const AFTER_HELP: &str = r##"EXAMPLES:
  # Convert beside the input (resume.md -> resume.pdf)
  md2pdf resume.md

  # Explicit output, green theme, replace an existing file
  md2pdf resume.md out/jane.pdf --theme green --force

  # Sparse style overrides on top of a theme
  md2pdf resume.md --theme compact --config style.toml

  # Reproducible durations ("Present" resolves to this date)
  md2pdf resume.md --today 2024-06-01

  # Show what the parser extracted, as JSON
  md2pdf resume.md --inspect

INPUT FORMAT:
  # Jane Doe                         name (required)
  **Senior Engineer**                tagline
  jane@example.com | Berlin          contact lines
  ## EXPERIENCE                      section (SUMMARY, SKILLS, EXPERIENCE,
  ### Acme Corp                        EDUCATION, CERTIFICATIONS, anything else)
  **Staff Engineer** | March 2020 - Present
  - Led the platform team

THEMES:
  default   navy headings, Helvetica
  green     dark green headings
  compact   smaller type and margins, sections may split across pages
  classic   Times, black and grey

STYLE FILE (TOML, every key optional):
  theme = "green"
  primary_color = "#1a5e3a"
  font_family = "times"
  page_size = "a4"
  bullet_size = 10.0

ENVIRONMENT VARIABLES:
  MD2PDF_CONFIG, MD2PDF_THEME, MD2PDF_TODAY, MD2PDF_INPUTS_DIR,
  MD2PDF_OUTPUTS_DIR, MD2PDF_FORCE, MD2PDF_YES, MD2PDF_NO_DURATIONS,
  MD2PDF_NO_KEEP_TOGETHER, MD2PDF_INSPECT, MD2PDF_VERBOSE, MD2PDF_QUIET
  RUST_LOG                overrides -v / -q log filtering
"##;

/// Convert a markdown résumé into a styled PDF.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert a markdown résumé into a styled, paginated PDF",
    long_about = "Convert a markdown résumé (name, tagline, contact, summary, skills, \
experience, education, certifications) into a styled, paginated PDF. Role durations \
such as \"(1 year 10 months)\" are computed from the date ranges.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown résumé to convert.
    input: PathBuf,

    /// PDF to write (default: input name with .pdf).
    output: Option<PathBuf>,

    /// TOML file with style overrides.
    #[arg(long, env = "MD2PDF_CONFIG")]
    config: Option<PathBuf>,

    /// Base theme: default, green, compact, classic.
    #[arg(long, env = "MD2PDF_THEME", value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Do not append durations to date ranges.
    #[arg(long, env = "MD2PDF_NO_DURATIONS")]
    no_durations: bool,

    /// Let sections split across pages freely.
    #[arg(long, env = "MD2PDF_NO_KEEP_TOGETHER")]
    no_keep_together: bool,

    /// Date used for "Present" (YYYY-MM-DD; default: today).
    #[arg(long, env = "MD2PDF_TODAY", value_parser = parse_today)]
    today: Option<NaiveDate>,

    /// Folder searched when INPUT is not found as given.
    #[arg(long, env = "MD2PDF_INPUTS_DIR")]
    inputs_dir: Option<PathBuf>,

    /// Folder for generated PDFs when OUTPUT is omitted (created if missing).
    #[arg(long, env = "MD2PDF_OUTPUTS_DIR")]
    outputs_dir: Option<PathBuf>,

    /// Overwrite an existing output without asking.
    #[arg(short, long, env = "MD2PDF_FORCE")]
    force: bool,

    /// Answer yes to every prompt.
    #[arg(short, long, env = "MD2PDF_YES")]
    yes: bool,

    /// Print the parsed résumé as JSON instead of writing a PDF.
    #[arg(long, env = "MD2PDF_INSPECT")]
    inspect: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

fn parse_theme(s: &str) -> std::result::Result<Theme, String> {
    s.parse::<Theme>().map_err(|e| e.to_string())
}

fn parse_today(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{s}': {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = build_config(&cli)?;

    // ── Resolve input ────────────────────────────────────────────────────
    let input_path = input::resolve_input(&cli.input, config.inputs_folder.as_deref())
        .context("Cannot open input")?;

    if !input::is_markdown(&input_path) {
        eprintln!(
            "{} '{}' does not have a .md extension",
            cyan("⚠"),
            input_path.display()
        );
        if !cli.yes && !confirm("Continue anyway?")? {
            bail!("Cancelled: input is not a markdown file");
        }
    }

    // ── Inspect mode ─────────────────────────────────────────────────────
    if cli.inspect {
        let resume = inspect(&input_path, &config).context("Failed to parse résumé")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&resume).context("Failed to serialize résumé")?
        );
        return Ok(());
    }

    // ── Output path ──────────────────────────────────────────────────────
    let output_path = match cli.output {
        Some(ref path) => normalize_output_path(path),
        None => {
            if let Some(ref dir) = config.outputs_folder {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create outputs folder {}", dir.display())
                })?;
            }
            default_output_path(&cli.input, config.outputs_folder.as_deref())
        }
    };

    if output_path.exists() && !config.overwrite {
        let question = format!("'{}' already exists. Overwrite?", output_path.display());
        if !cli.yes && !confirm(&question)? {
            bail!("Cancelled: {} left untouched", output_path.display());
        }
        config.overwrite = true;
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let written = match convert_to_file(&input_path, &output_path, &config) {
        Ok(path) => path,
        Err(e) => {
            if let Some(hint) = failure_hint(&e) {
                eprintln!("{} {}", dim("hint:"), hint);
            }
            return Err(anyhow::Error::new(e).context("Conversion failed"));
        }
    };

    if !cli.quiet {
        eprintln!(
            "{}  {}  →  {}",
            green("✔"),
            dim(&input_path.display().to_string()),
            bold(&written.display().to_string()),
        );
    }

    Ok(())
}

/// One extra line for failures the user can fix from the command line.
fn failure_hint(err: &ResumeError) -> Option<&'static str> {
    if err.is_parse_error() {
        Some("the first heading must be the name, e.g. '# Jane Doe'")
    } else if err.is_render_error() {
        Some("check that the output folder exists and is writable")
    } else {
        None
    }
}

/// Map CLI args to `ResumeConfig`.
fn build_config(cli: &Cli) -> Result<ResumeConfig> {
    let theme = cli.theme.unwrap_or_default();
    let mut builder = ResumeConfig::builder()
        .theme(theme)
        .calculate_durations(!cli.no_durations)
        .overwrite(cli.force);

    if let Some(ref path) = cli.config {
        builder = builder.style_file(load_style(path, theme)?);
    }
    if cli.no_keep_together {
        builder = builder.keep_sections_together(false);
    }
    if let Some(date) = cli.today {
        builder = builder.today(date);
    }
    if let Some(ref dir) = cli.inputs_dir {
        builder = builder.inputs_folder(dir);
    }
    if let Some(ref dir) = cli.outputs_dir {
        builder = builder.outputs_folder(dir);
    }

    builder.build().context("Invalid configuration")
}

fn load_style(path: &Path, theme: Theme) -> Result<StyleFile> {
    StyleFile::load(path, &theme.style())
        .with_context(|| format!("Failed to load style config {}", path.display()))
}

/// Ask a yes/no question on stderr; anything but y/yes (including EOF) is no.
fn confirm(question: &str) -> Result<bool> {
    eprint!("{} {} [y/N] ", cyan("?"), question);
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer from stdin")?;

    let yes = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    if !yes {
        eprintln!("{}", red("✘ declined"));
    }
    Ok(yes)
}
