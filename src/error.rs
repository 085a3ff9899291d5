//! Error types for the resume-md2pdf library.
//!
//! Every failure that stops a conversion is a [`ResumeError`]. The variants
//! fall into four groups that callers (the CLI above all) treat differently:
//!
//! * **Input**: the markdown file is missing, unreadable or empty. A missing
//!   file carries a list of similarly named candidates so the caller can
//!   print a "did you mean" hint.
//! * **Parse**: the document has no `# Name` heading.
//! * **Output**: the destination exists and overwriting was not allowed, or
//!   the PDF could not be written.
//! * **Config**: a style file or builder value is invalid.
//!
//! A date that cannot be parsed is *not* an error: the duration calculator
//! answers `None` and the résumé renders without the phrase.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the resume-md2pdf library.
#[derive(Debug, Error)]
pub enum ResumeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path (nor in the inputs folder).
    #[error("Input file not found: '{}'{}", .path.display(), format_suggestions(.suggestions))]
    FileNotFound {
        path: PathBuf,
        suggestions: Vec<PathBuf>,
    },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nCheck file permissions and try again.", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{}': {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but contains only whitespace.
    #[error("Input file '{}' is empty", .path.display())]
    EmptyInput { path: PathBuf },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// No top-level `# Name` heading was found.
    #[error("Resume must contain a name (# Name)\nMake sure your markdown file follows the expected resume format.")]
    MissingName,

    // ── Output errors ─────────────────────────────────────────────────────
    /// The destination already exists and overwriting was not allowed.
    #[error("Output file '{}' already exists", .path.display())]
    OutputExists { path: PathBuf },

    /// The destination's parent directory does not exist.
    #[error("Output directory '{}' does not exist", .dir.display())]
    OutputDirMissing { dir: PathBuf },

    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed or a style value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A style file could not be read or parsed.
    #[error("Failed to load style config '{}': {detail}", .path.display())]
    ConfigLoadFailed { path: PathBuf, detail: String },
}

impl ResumeError {
    /// True for errors caused by the document's content rather than I/O.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ResumeError::MissingName)
    }

    /// True for errors raised while producing the PDF.
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            ResumeError::OutputDirMissing { .. } | ResumeError::OutputWriteFailed { .. }
        )
    }
}

fn format_suggestions(suggestions: &[PathBuf]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nDid you mean one of these?");
    for s in suggestions {
        out.push_str(&format!("\n  - {}", s.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_lists_suggestions() {
        let e = ResumeError::FileNotFound {
            path: PathBuf::from("resme.md"),
            suggestions: vec![PathBuf::from("resume.md"), PathBuf::from("resume_v2.md")],
        };
        let msg = e.to_string();
        assert!(msg.contains("resme.md"), "got: {msg}");
        assert!(msg.contains("Did you mean"), "got: {msg}");
        assert!(msg.contains("  - resume_v2.md"), "got: {msg}");
    }

    #[test]
    fn file_not_found_without_suggestions_is_one_line() {
        let e = ResumeError::FileNotFound {
            path: PathBuf::from("missing.md"),
            suggestions: vec![],
        };
        assert_eq!(e.to_string(), "Input file not found: 'missing.md'");
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        assert!(ResumeError::MissingName.is_parse_error());
        assert!(!ResumeError::MissingName.is_render_error());
    }

    #[test]
    fn write_failure_is_a_render_error() {
        let e = ResumeError::OutputWriteFailed {
            path: PathBuf::from("/ro/out.pdf"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(e.is_render_error());
        assert!(e.to_string().contains("/ro/out.pdf"));
    }
}
