//! Inline formatting: markdown emphasis → styled text runs.
//!
//! The renderer does not understand markdown. It draws [`Span`]s, each a run
//! of text in one face (regular, bold, italic, bold-italic), optionally a
//! hyperlink. This module is the only place that knows the markdown syntax
//! for those runs.
//!
//! ## Rule order
//!
//! 1. Strip decorative emoji used in contact lines (📧, 🔗, …); the standard
//!    PDF fonts have no glyphs for them.
//! 2. Links `[text](url)`, first, so asterisks inside URLs are left alone.
//! 3. Bold `**text**`, non-greedy, so two bold runs on a line stay separate.
//! 4. Italic `*text*`, single asterisks that are not part of a bold marker.
//!
//! Anything that does not match (a lone `*`, an unclosed `**`, `[text]`
//! without a URL) passes through as literal text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A run of text drawn in a single style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            link: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    fn same_style(&self, other: &Span) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.link == other.link
    }
}

/// A paragraph's worth of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichText {
    pub spans: Vec<Span>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run, merging it into the previous one when styles match.
    pub fn push(&mut self, span: Span) {
        if span.text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.same_style(&span) {
                last.text.push_str(&span.text);
                return;
            }
        }
        self.spans.push(span);
    }

    /// Append every run of `other`.
    pub fn extend(&mut self, other: RichText) {
        for span in other.spans {
            self.push(span);
        }
    }

    /// Builder form of [`RichText::push`].
    pub fn with(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// Force every run to bold (used for headings built from inline text).
    pub fn emboldened(mut self) -> Self {
        for span in &mut self.spans {
            span.bold = true;
        }
        self
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

// ── Rule 1: Strip decorative emoji ───────────────────────────────────────────

static RE_EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[📧🔗📄💼🎓🏆📍📱☎🌐]\u{FE0F}?\s?").unwrap());

fn strip_emoji(input: &str) -> String {
    RE_EMOJI.replace_all(input, "").to_string()
}

// ── Rule 2: Links ────────────────────────────────────────────────────────────

static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());

// ── Rule 3: Bold ─────────────────────────────────────────────────────────────

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

// ── Rule 4: Italic ───────────────────────────────────────────────────────────

/// Single-asterisk emphasis. The regex crate has no look-around, so the
/// "not part of `**`" check happens in [`push_italics`].
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());

/// Convert a markdown fragment to styled runs.
pub fn to_rich_text(input: &str) -> RichText {
    let text = strip_emoji(input);
    let mut out = RichText::new();

    let mut last = 0;
    for caps in RE_LINK.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        push_emphasis(&mut out, &text[last..whole.start()], None);
        push_emphasis(&mut out, &caps[1], Some(caps[2].to_string()));
        last = whole.end();
    }
    push_emphasis(&mut out, &text[last..], None);
    out
}

/// Markdown fragment → plain text with all inline markers removed.
pub fn strip_markup(input: &str) -> String {
    to_rich_text(input).plain_text()
}

fn push_emphasis(out: &mut RichText, text: &str, link: Option<String>) {
    let mut last = 0;
    for caps in RE_BOLD.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_italics(out, &text[last..whole.start()], false, &link);
        push_italics(out, &caps[1], true, &link);
        last = whole.end();
    }
    push_italics(out, &text[last..], false, &link);
}

fn push_italics(out: &mut RichText, text: &str, bold: bool, link: &Option<String>) {
    let bytes = text.as_bytes();
    let mut last = 0;
    for caps in RE_ITALIC.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        // Skip `**` fragments left over from an unclosed bold marker.
        let touches_star = (whole.start() > 0 && bytes[whole.start() - 1] == b'*')
            || bytes.get(whole.end()) == Some(&b'*');
        if touches_star {
            continue;
        }
        out.push(Span {
            text: text[last..whole.start()].to_string(),
            bold,
            italic: false,
            link: link.clone(),
        });
        out.push(Span {
            text: caps[1].to_string(),
            bold,
            italic: true,
            link: link.clone(),
        });
        last = whole.end();
    }
    out.push(Span {
        text: text[last..].to_string(),
        bold,
        italic: false,
        link: link.clone(),
    });
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_italic() {
        let rt = to_rich_text("**Bold** and *italic*");
        assert_eq!(
            rt.spans,
            vec![Span::bold("Bold"), Span::plain(" and "), Span::italic("italic")]
        );
    }

    #[test]
    fn test_two_bold_runs_stay_separate() {
        let rt = to_rich_text("**Rust** or **Go**");
        assert_eq!(
            rt.spans,
            vec![Span::bold("Rust"), Span::plain(" or "), Span::bold("Go")]
        );
    }

    #[test]
    fn test_link() {
        let rt = to_rich_text("[LinkedIn](https://linkedin.com/in/user)");
        assert_eq!(rt.spans.len(), 1);
        assert_eq!(rt.spans[0].text, "LinkedIn");
        assert_eq!(
            rt.spans[0].link.as_deref(),
            Some("https://linkedin.com/in/user")
        );
    }

    #[test]
    fn test_bold_inside_link_text() {
        let rt = to_rich_text("see [**docs**](https://example.org/a*b*c)");
        assert_eq!(rt.spans[0], Span::plain("see "));
        assert!(rt.spans[1].bold);
        assert_eq!(rt.spans[1].link.as_deref(), Some("https://example.org/a*b*c"));
    }

    #[test]
    fn test_italic_inside_bold() {
        let rt = to_rich_text("**very *important* work**");
        assert_eq!(rt.plain_text(), "very important work");
        assert!(rt.spans.iter().all(|s| s.bold));
        assert!(rt.spans.iter().any(|s| s.italic && s.text == "important"));
    }

    #[test]
    fn test_unbalanced_markup_passes_through() {
        assert_eq!(strip_markup("5 * 3 = 15"), "5 * 3 = 15");
        assert_eq!(strip_markup("**unclosed bold"), "**unclosed bold");
        assert_eq!(strip_markup("[no url]"), "[no url]");
    }

    #[test]
    fn test_emoji_removed() {
        assert_eq!(strip_markup("📧 jane@example.com"), "jane@example.com");
        assert_eq!(strip_markup("📍Remote"), "Remote");
    }

    #[test]
    fn test_adjacent_runs_merge() {
        let rt = RichText::new()
            .with(Span::plain("a"))
            .with(Span::plain("b"))
            .with(Span::bold("c"));
        assert_eq!(rt.spans, vec![Span::plain("ab"), Span::bold("c")]);
    }
}
