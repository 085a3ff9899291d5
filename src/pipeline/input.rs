//! Input resolution: find the markdown file and read it.
//!
//! A bare file name that does not exist in the working directory is looked
//! up again in the configured inputs folder. When both lookups fail the
//! error carries up to [`MAX_SUGGESTIONS`] similarly named `.md` files,
//! ranked by Jaro-Winkler similarity of their stems, so the CLI can print a
//! "did you mean" list.

use crate::error::ResumeError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strsim::jaro_winkler;
use tracing::debug;

pub const MAX_SUGGESTIONS: usize = 5;

/// Minimum stem similarity for a file to be suggested.
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Locate the input file.
///
/// Returns the path as given when it exists, otherwise the same relative
/// path (or just its file name) inside `inputs_folder`.
pub fn resolve_input(path: &Path, inputs_folder: Option<&Path>) -> Result<PathBuf, ResumeError> {
    if path.exists() {
        debug!("Resolved input: {}", path.display());
        return Ok(path.to_path_buf());
    }

    if let Some(folder) = inputs_folder.filter(|_| path.is_relative()) {
        let candidates = [
            Some(folder.join(path)),
            path.file_name().map(|name| folder.join(name)),
        ];
        if let Some(found) = candidates.into_iter().flatten().find(|c| c.exists()) {
            debug!("Resolved input from inputs folder: {}", found.display());
            return Ok(found);
        }
    }

    Err(ResumeError::FileNotFound {
        path: path.to_path_buf(),
        suggestions: suggest_similar(path, inputs_folder),
    })
}

/// Read the whole input as UTF-8, rejecting whitespace-only files.
pub fn read_input(path: &Path) -> Result<String, ResumeError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ResumeError::PermissionDenied {
            path: path.to_path_buf(),
        },
        ErrorKind::NotFound => ResumeError::FileNotFound {
            path: path.to_path_buf(),
            suggestions: Vec::new(),
        },
        _ => ResumeError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if text.trim().is_empty() {
        return Err(ResumeError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// True for `.md` and `.markdown` files (any case).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Markdown files near `path` whose names resemble it, best match first.
pub fn suggest_similar(path: &Path, inputs_folder: Option<&Path>) -> Vec<PathBuf> {
    let target = stem_lower(path);
    if target.is_empty() {
        return Vec::new();
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut dirs = vec![parent];
    if let Some(folder) = inputs_folder {
        if !dirs.iter().any(|d| d == folder) {
            dirs.push(folder.to_path_buf());
        }
    }

    let mut scored: Vec<(f64, PathBuf)> = Vec::new();
    for dir in &dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let candidate = entry.path();
            if !candidate.is_file() || !is_markdown(&candidate) {
                continue;
            }
            let score = jaro_winkler(&target, &stem_lower(&candidate));
            if score >= SIMILARITY_THRESHOLD {
                scored.push((score, candidate));
            }
        }
    }

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, p)| p)
        .collect()
}

fn stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
