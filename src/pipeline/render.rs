//! PDF emission: laid-out pages → PDF bytes via `pdf-writer`.
//!
//! ## Why the base-14 fonts?
//!
//! Helvetica, Times and Courier are guaranteed to exist in every PDF viewer,
//! so the file needs no embedded font programs and stays a few kilobytes.
//! The price is the WinAnsi character set: text is encoded with
//! [`encode_win_ansi`] and anything outside it prints as `?`.
//!
//! ## Object layout
//!
//! ```text
//! 1            catalog
//! 2            page tree
//! 3            document info
//! 4..=7        fonts F1..F4 (regular, bold, italic, bold-italic)
//! 8..          per page: page, content stream, then one object per link
//! ```

use crate::config::StyleConfig;
use crate::error::ResumeError;
use crate::model::Resume;
use crate::pipeline::fonts::{encode_win_ansi, Face};
use crate::pipeline::inline::strip_markup;
use crate::pipeline::layout::{self, Item, LaidOutDocument, Page, RenderOptions, TextRun};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::{debug, info};

/// Value of the document info `Creator` entry.
pub const CREATOR: &str = concat!("resume-md2pdf ", env!("CARGO_PKG_VERSION"));

/// Lay out `resume` and serialize it as a PDF.
///
/// Rendering itself cannot fail; the `Result` is kept so callers handle
/// render and write failures uniformly.
pub fn render_pdf(
    resume: &Resume,
    style: &StyleConfig,
    opts: &RenderOptions,
) -> Result<Vec<u8>, ResumeError> {
    let doc = layout::layout(resume, style, opts);
    let title = strip_markup(&resume.name);
    info!("Rendering {} page(s) for '{}'", doc.page_count(), title);
    Ok(write_document(&doc, &title))
}

/// Serialize a laid-out document.
pub fn write_document(doc: &LaidOutDocument, title: &str) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let mut next = || {
        let id = alloc;
        alloc = Ref::new(id.get() + 1);
        id
    };

    let catalog_id = next();
    let tree_id = next();
    let info_id = next();
    let font_ids: Vec<(Face, Ref)> = Face::ALL.iter().map(|&face| (face, next())).collect();

    let mut pdf = Pdf::new();

    for &(face, id) in &font_ids {
        pdf.type1_font(id)
            .base_font(Name(doc.family.base_font(face).as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let mut page_ids = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let page_id = next();
        let content_id = next();
        let links: Vec<(Ref, &TextRun)> = page
            .runs()
            .filter(|run| run.link.is_some())
            .map(|run| (next(), run))
            .collect();

        pdf.stream(content_id, &page_content(page));

        for &(annot_id, run) in &links {
            let Some(uri) = run.link.as_deref() else {
                continue;
            };
            let mut annot = pdf.annotation(annot_id);
            annot.subtype(AnnotationType::Link);
            annot.rect(Rect::new(
                run.x,
                run.y - run.size * 0.25,
                run.x + run.width,
                run.y + run.size * 0.85,
            ));
            annot.border(0.0, 0.0, 0.0, None);
            annot
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(uri.as_bytes()));
            annot.finish();
        }

        let mut page_writer = pdf.page(page_id);
        page_writer.media_box(Rect::new(0.0, 0.0, doc.width, doc.height));
        page_writer.parent(tree_id);
        page_writer.contents(content_id);
        {
            let mut resources = page_writer.resources();
            let mut fonts = resources.fonts();
            for &(face, id) in &font_ids {
                fonts.pair(Name(face.resource_name()), id);
            }
        }
        if !links.is_empty() {
            page_writer.annotations(links.iter().map(|(id, _)| *id));
        }
        page_writer.finish();

        debug!(
            "Page {}: {} items, {} link(s)",
            page_ids.len() + 1,
            page.items.len(),
            links.len()
        );
        page_ids.push(page_id);
    }

    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .creator(TextStr(CREATOR))
        .producer(TextStr(CREATOR));

    pdf.finish()
}

/// Content stream for one page: rules first, then text runs.
fn page_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();

    for item in &page.items {
        if let Item::Rule(rule) = item {
            let (r, g, b) = rule.color.to_unit();
            content
                .set_stroke_rgb(r, g, b)
                .set_line_width(rule.thickness)
                .move_to(rule.x1, rule.y)
                .line_to(rule.x2, rule.y)
                .stroke();
        }
    }

    content.begin_text();
    for run in page.runs() {
        let (r, g, b) = run.color.to_unit();
        content
            .set_font(Name(run.face.resource_name()), run.size)
            .set_fill_rgb(r, g, b)
            .set_text_matrix([1.0, 0.0, 0.0, 1.0, run.x, run.y])
            .show(Str(&encode_win_ansi(&run.text)));
    }
    content.end_text();

    content.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse_resume;
    use chrono::NaiveDate;

    fn opts() -> RenderOptions {
        RenderOptions {
            today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            durations: true,
            keep_sections_together: true,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_output_is_a_pdf() {
        let resume = parse_resume("# Jane Doe\n## SUMMARY\nBuilds things.\n").unwrap();
        let bytes = render_pdf(&resume, &StyleConfig::default(), &opts()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"(Jane Doe)"));
    }

    #[test]
    fn test_title_has_no_markup() {
        let resume = parse_resume("# **Jane** Doe\n").unwrap();
        let bytes = render_pdf(&resume, &StyleConfig::default(), &opts()).unwrap();
        assert!(!contains(&bytes, b"**"));
    }

    #[test]
    fn test_font_family_follows_style() {
        let resume = parse_resume("# Jane Doe\n").unwrap();
        let style = StyleConfig {
            font_family: crate::pipeline::fonts::FontFamily::Times,
            ..StyleConfig::default()
        };
        let bytes = render_pdf(&resume, &style, &opts()).unwrap();
        assert!(contains(&bytes, b"/Times-Roman"));
        assert!(!contains(&bytes, b"/Helvetica"));
    }

    #[test]
    fn test_links_become_annotations() {
        let resume =
            parse_resume("# Jane Doe\n[GitHub](https://github.com/jane) | jane@example.com\n")
                .unwrap();
        let bytes = render_pdf(&resume, &StyleConfig::default(), &opts()).unwrap();
        assert!(contains(&bytes, b"/Annots"));
        assert!(contains(&bytes, b"(https://github.com/jane)"));
    }

    #[test]
    fn test_page_count_matches_layout() {
        let body = "- a fairly long bullet line about shipping software\n".repeat(120);
        let resume = parse_resume(&format!("# Jane Doe\n## PROJECTS\n{body}")).unwrap();
        let doc = layout::layout(&resume, &StyleConfig::default(), &opts());
        assert!(doc.page_count() > 1);
        let bytes = write_document(&doc, "Jane Doe");
        let expected = format!("/Count {}", doc.page_count());
        assert!(contains(&bytes, expected.as_bytes()));
    }
}
