//! # resume-md2pdf
//!
//! Turn a markdown résumé into a styled, paginated PDF.
//!
//! ## Why a fixed convention?
//!
//! Résumés share one shape: a name, a tagline, contact details, then a
//! handful of well-known sections. Leaning on that shape lets the parser pull
//! out typed fields (dates, job titles, skill groups) from plain markdown, so
//! the renderer can style each one and work out how long every role lasted
//! without any markup beyond `#`, `**` and `-`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown
//!  │
//!  ├─ 1. Input     resolve the path (inputs-folder fallback), read, reject empty
//!  ├─ 2. Parse     name, tagline, contact, typed sections → Resume
//!  ├─ 3. Inline    **bold**, *italic*, [links](url) → styled runs
//!  ├─ 4. Duration  "March 2020 - Present" → "1 year 10 months"
//!  ├─ 5. Layout    story of flowables → wrapped lines on pages
//!  └─ 6. Render    pages → PDF bytes (base-14 fonts), atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_md2pdf::{convert_to_file, ResumeConfig, Theme};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResumeConfig::builder()
//!         .theme(Theme::Green)
//!         .overwrite(true)
//!         .build()?;
//!     let written = convert_to_file("resume.md", "resume.pdf", &config)?;
//!     eprintln!("wrote {}", written.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber) |
//! | `durations` | on      | Free-form date parsing and role durations |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! resume-md2pdf = { version = "0.1", default-features = false, features = ["durations"] }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    PageSize, ResumeConfig, ResumeConfigBuilder, Rgb, StyleConfig, StyleFile, Theme,
};
pub use convert::{
    convert_file, convert_str, convert_to_file, default_output_path, inspect,
    normalize_output_path, render_options,
};
pub use error::ResumeError;
pub use model::{
    CertificationEntry, CondensedRole, DateRange, EducationEntry, EndDate, ExperienceEntry,
    Resume, Section, SectionBody, SkillGroup,
};
pub use pipeline::fonts::FontFamily;
pub use pipeline::layout::RenderOptions;
