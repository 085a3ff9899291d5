//! Conversion entry points.
//!
//! Everything here is synchronous: a résumé is a few kilobytes of text and
//! the whole pipeline runs in well under a frame, so there is no runtime to
//! spin up. The layering is:
//!
//! ```text
//! convert_to_file ─▶ convert_file ─▶ convert_str ─▶ parse ─▶ render
//!  (atomic write)     (resolve+read)
//! ```
//!
//! [`inspect`] stops after parsing and hands back the record, which is what
//! the CLI's `--inspect` flag prints.

use crate::config::ResumeConfig;
use crate::error::ResumeError;
use crate::model::Resume;
use crate::pipeline::layout::RenderOptions;
use crate::pipeline::{duration, inline, input, parse, render};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info, warn};

static DURATIONS_UNAVAILABLE: Once = Once::new();

/// Resolve the configuration into the renderer's options.
///
/// Durations are only computed when both requested and compiled in; asking
/// for them without the `durations` feature logs a single warning per
/// process and renders without the phrases.
pub fn render_options(config: &ResumeConfig) -> RenderOptions {
    let durations = config.calculate_durations && duration::is_available();
    if config.calculate_durations && !durations {
        DURATIONS_UNAVAILABLE.call_once(|| {
            warn!(
                "Duration calculation requested but the `durations` feature is disabled; \
                 rendering without durations"
            );
        });
    }
    RenderOptions {
        today: config.effective_today(),
        durations,
        keep_sections_together: config.keep_sections_together,
    }
}

/// Convert markdown text to PDF bytes.
pub fn convert_str(markdown: &str, config: &ResumeConfig) -> Result<Vec<u8>, ResumeError> {
    let resume = parse::parse_resume(markdown)?;
    info!(
        "Parsed resume for '{}' ({} section(s))",
        inline::strip_markup(&resume.name),
        resume.sections.len()
    );
    debug!("{} date range(s) eligible for durations", resume.date_range_count());
    render::render_pdf(&resume, &config.style, &render_options(config))
}

/// Read a markdown file (with inputs-folder fallback) and convert it.
pub fn convert_file(
    input_path: impl AsRef<Path>,
    config: &ResumeConfig,
) -> Result<Vec<u8>, ResumeError> {
    let path = input::resolve_input(input_path.as_ref(), config.inputs_folder.as_deref())?;
    info!("Converting {}", path.display());
    let text = input::read_input(&path)?;
    convert_str(&text, config)
}

/// Convert a markdown file and write the PDF to `output_path`.
///
/// The path gets a `.pdf` extension when it has none. An existing file is
/// an [`ResumeError::OutputExists`] unless `config.overwrite` is set, and
/// the parent directory must already exist. Nothing is written when
/// parsing or rendering fails. Returns the path actually written.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ResumeConfig,
) -> Result<PathBuf, ResumeError> {
    let output = normalize_output_path(output_path.as_ref());
    if output.exists() && !config.overwrite {
        return Err(ResumeError::OutputExists { path: output });
    }

    let bytes = convert_file(input_path, config)?;
    write_atomic(&output, &bytes, config.overwrite)?;
    info!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(output)
}

/// Parse a markdown file without rendering it.
pub fn inspect(
    input_path: impl AsRef<Path>,
    config: &ResumeConfig,
) -> Result<Resume, ResumeError> {
    let path = input::resolve_input(input_path.as_ref(), config.inputs_folder.as_deref())?;
    let text = input::read_input(&path)?;
    parse::parse_resume(&text)
}

// ── Output paths ─────────────────────────────────────────────────────────

/// The input's file name with a `.pdf` extension, placed in
/// `outputs_folder` when one is given and beside the input otherwise.
pub fn default_output_path(input_path: &Path, outputs_folder: Option<&Path>) -> PathBuf {
    let file_name = input_path
        .file_stem()
        .map(|stem| {
            let mut name = stem.to_os_string();
            name.push(".pdf");
            PathBuf::from(name)
        })
        .unwrap_or_else(|| PathBuf::from("resume.pdf"));

    match outputs_folder {
        Some(dir) => dir.join(file_name),
        None => input_path.with_file_name(file_name),
    }
}

/// Append `.pdf` unless the path already ends with it (any case).
pub fn normalize_output_path(path: &Path) -> PathBuf {
    let has_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if has_pdf {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".pdf");
    PathBuf::from(name)
}

// ── Atomic write ─────────────────────────────────────────────────────────

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// On failure the destination is untouched and the temp file is removed.
pub fn write_atomic(path: &Path, bytes: &[u8], overwrite: bool) -> Result<(), ResumeError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Err(ResumeError::OutputDirMissing { dir });
    }

    let write_err = |source: std::io::Error| ResumeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    debug!("Staged {} bytes at {}", bytes.len(), tmp.path().display());

    let persisted = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted.map(|_| ()).map_err(|e| {
        if !overwrite && e.error.kind() == ErrorKind::AlreadyExists {
            ResumeError::OutputExists {
                path: path.to_path_buf(),
            }
        } else {
            write_err(e.error)
        }
    })
}
