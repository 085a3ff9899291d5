//! Pipeline stages for markdown-to-PDF conversion.
//!
//! Each submodule implements one transformation step and is testable on its
//! own; only [`input`] and the final write in [`crate::convert`] touch the
//! filesystem.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ parse ──▶ layout ──▶ render
//! (path)    (Resume)  (pages)    (PDF bytes)
//!             │          ▲
//!             │       inline, duration, fonts
//!             └──────────┘
//! ```
//!
//! 1. [`input`]: resolve the user-supplied path and read the text
//! 2. [`parse`]: pattern-match the résumé convention into a
//!    [`crate::model::Resume`]
//! 3. [`inline`]: emphasis and links inside a line become styled spans
//! 4. [`duration`]: free-form date ranges become "N years M months"
//! 5. [`fonts`]: base-14 font names and glyph widths for wrapping
//! 6. [`layout`]: build the story of flowables and paginate it
//! 7. [`render`]: serialize pages with `pdf-writer`

pub mod duration;
pub mod fonts;
pub mod inline;
pub mod input;
pub mod layout;
pub mod parse;
pub mod render;
