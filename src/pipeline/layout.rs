//! Page layout: [`Resume`] → story of flowables → positioned text on pages.
//!
//! Layout happens in two steps so each can be tested without producing PDF
//! bytes:
//!
//! 1. [`build_story`] turns the record into a flat list of [`Flowable`]s
//!    (paragraphs in named roles, spacers, divider rules, keep-together
//!    groups). No geometry yet.
//! 2. [`paginate`] word-wraps every paragraph against the standard font
//!    width tables and places lines top-down, starting a new page whenever
//!    the next line would cross the bottom margin. A keep-together group
//!    that does not fit in the space left moves to a fresh page, unless it
//!    is taller than a whole page, in which case it splits like any other
//!    content.
//!
//! Coordinates in the output are PDF user space: points, origin at the
//! bottom-left corner, `y` growing upwards. Text positions are baselines.

use crate::config::{Rgb, StyleConfig};
use crate::model::{
    BodyLine, CertificationEntry, CondensedRole, DateRange, EducationEntry, ExperienceEntry,
    Resume, Section, SectionBody, SectionKind, SkillGroup,
};
use crate::pipeline::duration::duration_phrase;
use crate::pipeline::fonts::{Face, FontFamily};
use crate::pipeline::inline::{to_rich_text, RichText, Span};
use chrono::NaiveDate;
use tracing::debug;

/// Space below a divider rule, matching the gap under section headers.
const RULE_PADDING: f32 = 8.0;
/// Space after each regular experience entry.
const ENTRY_GAP: f32 = 8.0;
/// Gap between the bullet glyph and the bullet text.
const BULLET_GAP: f32 = 3.0;
const EPSILON: f32 = 0.01;

/// Per-run switches for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Date that "Present" resolves to.
    pub today: NaiveDate,
    /// Append duration phrases after experience dates.
    pub durations: bool,
    /// Honor keep-together hints.
    pub keep_sections_together: bool,
}

// ── Story ────────────────────────────────────────────────────────────────────

/// The typographic role of a paragraph; each maps to one paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Name,
    Subtitle,
    Contact,
    SectionHeader,
    JobTitle,
    CompanyInfo,
    Bullet,
    SkillCategory,
    SkillList,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Resolved paragraph style for one [`Role`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParaStyle {
    pub face: Face,
    pub size: f32,
    pub leading: f32,
    pub color: Rgb,
    pub align: Align,
    pub left_indent: f32,
    pub space_before: f32,
    pub space_after: f32,
}

impl Role {
    pub fn style(self, s: &StyleConfig) -> ParaStyle {
        let plain = |face: Face, size: f32, color: Rgb, space_after: f32| ParaStyle {
            face,
            size,
            leading: size * 1.2,
            color,
            align: Align::Left,
            left_indent: 0.0,
            space_before: 0.0,
            space_after,
        };
        match self {
            Role::Name => ParaStyle {
                align: Align::Center,
                ..plain(Face::BOLD, s.name_size, s.primary_color, s.space_after_name)
            },
            Role::Subtitle => ParaStyle {
                align: Align::Center,
                ..plain(Face::REGULAR, s.subtitle_size, s.accent_color, s.space_after_subtitle)
            },
            Role::Contact => ParaStyle {
                align: Align::Center,
                ..plain(Face::REGULAR, s.contact_size, s.muted_color, s.space_after_contact)
            },
            Role::SectionHeader => ParaStyle {
                space_before: s.space_before_section,
                ..plain(
                    Face::BOLD,
                    s.section_header_size,
                    s.primary_color,
                    s.space_after_section_header,
                )
            },
            Role::JobTitle => plain(
                Face::BOLD,
                s.job_title_size,
                s.text_color,
                s.space_after_job_title,
            ),
            Role::CompanyInfo => plain(
                Face::ITALIC,
                s.company_info_size,
                s.muted_color,
                s.space_after_company_info,
            ),
            Role::Bullet => ParaStyle {
                leading: s.leading_bullet,
                left_indent: s.bullet_indent,
                ..plain(Face::REGULAR, s.bullet_size, s.text_color, s.space_after_bullet)
            },
            Role::SkillCategory => plain(
                Face::BOLD,
                s.skill_category_size,
                s.text_color,
                s.space_after_skill_category,
            ),
            Role::SkillList => ParaStyle {
                leading: s.leading_skill_list,
                ..plain(Face::REGULAR, s.skill_list_size, s.text_color, s.space_after_skill_list)
            },
            Role::Summary => ParaStyle {
                leading: s.leading_summary,
                ..plain(Face::REGULAR, s.summary_size, s.text_color, s.space_after_summary)
            },
        }
    }
}

/// One element of the story.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph {
        role: Role,
        text: RichText,
        /// Draw a hanging `•` in the left indent.
        bullet: bool,
    },
    Spacer(f32),
    /// Full-width horizontal rule under a section header.
    Divider,
    /// Children that should land on the same page.
    KeepTogether(Vec<Flowable>),
}

impl Flowable {
    fn para(role: Role, text: RichText) -> Self {
        Flowable::Paragraph {
            role,
            text,
            bullet: false,
        }
    }

    fn bullet(text: RichText) -> Self {
        Flowable::Paragraph {
            role: Role::Bullet,
            text,
            bullet: true,
        }
    }
}

/// Build the story for `resume`: header block, then one block per
/// populated section in document order.
pub fn build_story(resume: &Resume, opts: &RenderOptions) -> Vec<Flowable> {
    let mut story = vec![Flowable::para(Role::Name, to_rich_text(&resume.name))];
    if let Some(tagline) = &resume.tagline {
        story.push(Flowable::para(Role::Subtitle, to_rich_text(tagline)));
    }
    if let Some(contact) = resume.contact_line() {
        story.push(Flowable::para(Role::Contact, to_rich_text(&contact)));
    }

    for section in resume.sections.iter().filter(|s| !s.is_empty()) {
        section_story(&mut story, section, opts);
    }
    story
}

fn section_story(story: &mut Vec<Flowable>, section: &Section, opts: &RenderOptions) {
    let header = vec![
        Flowable::para(Role::SectionHeader, to_rich_text(&section.heading)),
        Flowable::Divider,
    ];

    let (blocks, trailer): (Vec<Vec<Flowable>>, Option<Flowable>) = match &section.body {
        SectionBody::Summary(text) => (
            vec![vec![Flowable::para(Role::Summary, to_rich_text(text))]],
            None,
        ),
        SectionBody::Skills(groups) => (groups.iter().map(skill_block).collect(), None),
        SectionBody::Experience { entries, earlier } => {
            let mut blocks: Vec<Vec<Flowable>> =
                entries.iter().map(|e| entry_block(e, opts)).collect();
            if !earlier.is_empty() {
                blocks.push(earlier_block(earlier, opts));
            }
            (blocks, None)
        }
        SectionBody::Education(entries) => (
            entries.iter().map(education_block).collect(),
            Some(Flowable::Spacer(6.0)),
        ),
        SectionBody::Certifications(entries) => (
            entries.iter().map(|c| vec![Flowable::bullet(certification_text(c))]).collect(),
            Some(Flowable::Spacer(6.0)),
        ),
        SectionBody::Other(lines) => (
            lines.iter().map(|l| body_line_block(l, opts)).collect(),
            Some(Flowable::Spacer(6.0)),
        ),
    };

    let keep_whole = opts.keep_sections_together && keeps_whole(section);
    debug!(
        "Section '{}': {} blocks{}",
        section.heading,
        blocks.len(),
        if keep_whole { ", kept together" } else { "" }
    );

    if keep_whole {
        let mut group = header;
        group.extend(blocks.into_iter().flatten());
        group.extend(trailer);
        story.push(Flowable::KeepTogether(group));
        return;
    }

    let mut blocks = blocks.into_iter();
    if opts.keep_sections_together {
        // Never leave a header alone at the bottom of a page.
        let mut group = header;
        if let Some(first) = blocks.next() {
            group.extend(first);
        }
        story.push(Flowable::KeepTogether(group));
    } else {
        story.extend(header);
    }
    for block in blocks {
        story.extend(block);
    }
    story.extend(trailer);
}

/// Summary and short sections stay on one page when keep-together is on.
fn keeps_whole(section: &Section) -> bool {
    if SectionKind::from_heading(&section.heading) == SectionKind::Summary {
        return true;
    }
    let upper = section.heading.to_uppercase();
    ["EDUCATION", "CERTIFICATION", "AWARD", "HONOR"]
        .iter()
        .any(|k| upper.contains(k))
}

fn skill_block(group: &SkillGroup) -> Vec<Flowable> {
    let mut block = Vec::new();
    if let Some(label) = &group.label {
        block.push(Flowable::para(
            Role::SkillCategory,
            to_rich_text(label).emboldened(),
        ));
    }
    if !group.values.is_empty() {
        block.push(Flowable::para(
            Role::SkillList,
            to_rich_text(&group.values.join(", ")),
        ));
    }
    block
}

/// Dates as written, plus "(duration)" when one can be computed.
fn dates_text(range: &DateRange, opts: &RenderOptions) -> String {
    match duration_phrase(range, opts.today, opts.durations) {
        Some(phrase) => format!("{range} ({phrase})"),
        None => range.to_string(),
    }
}

fn entry_block(entry: &ExperienceEntry, opts: &RenderOptions) -> Vec<Flowable> {
    let mut block = vec![Flowable::para(
        Role::JobTitle,
        to_rich_text(&entry.company).emboldened(),
    )];

    let mut info = RichText::new();
    if let Some(title) = &entry.title {
        info.extend(to_rich_text(title).emboldened());
    }
    if let Some(dates) = &entry.dates {
        if !info.is_blank() {
            info.push(Span::plain(" | "));
        }
        info.extend(to_rich_text(&dates_text(dates, opts)));
    }
    if !info.is_blank() {
        block.push(Flowable::para(Role::CompanyInfo, info));
    }

    block.extend(entry.bullets.iter().map(|b| Flowable::bullet(to_rich_text(b))));
    if let Some(tech) = &entry.technologies {
        block.push(Flowable::para(Role::CompanyInfo, to_rich_text(tech)));
    }
    block.push(Flowable::Spacer(ENTRY_GAP));
    block
}

fn role_text(role: &CondensedRole, opts: &RenderOptions) -> RichText {
    let mut text = to_rich_text(&role.company).emboldened();
    if !role.title.is_empty() {
        text.push(Span::plain(" | "));
        text.extend(to_rich_text(&role.title));
    }
    if let Some(dates) = &role.dates {
        text.push(Span::plain(" | "));
        text.extend(to_rich_text(&dates_text(dates, opts)));
    }
    text
}

fn earlier_block(roles: &[CondensedRole], opts: &RenderOptions) -> Vec<Flowable> {
    let mut block = vec![
        Flowable::Spacer(12.0),
        Flowable::para(
            Role::JobTitle,
            RichText::new().with(Span::bold("Earlier Experience")),
        ),
    ];
    for role in roles {
        block.push(Flowable::para(Role::Bullet, role_text(role, opts)));
        block.push(Flowable::Spacer(4.0));
    }
    block.push(Flowable::Spacer(6.0));

    if opts.keep_sections_together {
        vec![Flowable::KeepTogether(block)]
    } else {
        block
    }
}

fn education_block(entry: &EducationEntry) -> Vec<Flowable> {
    let mut block = vec![Flowable::para(
        Role::JobTitle,
        to_rich_text(&entry.degree).emboldened(),
    )];
    let info: Vec<&str> = entry
        .institution
        .iter()
        .chain(entry.dates.iter())
        .map(String::as_str)
        .collect();
    if !info.is_empty() {
        block.push(Flowable::para(
            Role::CompanyInfo,
            to_rich_text(&info.join(" | ")),
        ));
    }
    block.extend(entry.details.iter().map(|d| Flowable::bullet(to_rich_text(d))));
    block
}

fn certification_text(cert: &CertificationEntry) -> RichText {
    let mut text = to_rich_text(&cert.name).emboldened();
    for extra in cert.issuer.iter().chain(cert.date.iter()) {
        text.push(Span::plain(" | "));
        text.extend(to_rich_text(extra));
    }
    text
}

fn body_line_block(line: &BodyLine, opts: &RenderOptions) -> Vec<Flowable> {
    match line {
        BodyLine::Role(role) => vec![
            Flowable::para(Role::Bullet, role_text(role, opts)),
            Flowable::Spacer(6.0),
        ],
        BodyLine::Bullet(text) => vec![Flowable::bullet(to_rich_text(text))],
        BodyLine::Heading(text) => vec![Flowable::para(
            Role::JobTitle,
            to_rich_text(text).emboldened(),
        )],
        BodyLine::Text(text) => vec![Flowable::para(Role::SkillList, to_rich_text(text))],
    }
}

// ── Laid-out document ────────────────────────────────────────────────────────

/// A run of text at a fixed position in one face and color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub size: f32,
    pub face: Face,
    pub color: Rgb,
    pub text: String,
    /// Advance width in points.
    pub width: f32,
    pub link: Option<String>,
}

/// A stroked horizontal line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub thickness: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(TextRun),
    Rule(Rule),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
}

impl Page {
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            Item::Text(run) => Some(run),
            Item::Rule(_) => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(|item| match item {
            Item::Rule(rule) => Some(rule),
            Item::Text(_) => None,
        })
    }

    /// Text of each visual line, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut last_y: Option<f32> = None;
        for run in self.runs() {
            match (last_y, lines.last_mut()) {
                (Some(y), Some(line)) if (y - run.y).abs() < EPSILON => line.push_str(&run.text),
                _ => lines.push(run.text.clone()),
            }
            last_y = Some(run.y);
        }
        lines
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

/// Output of [`paginate`].
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub width: f32,
    pub height: f32,
    pub family: FontFamily,
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the first page whose text contains `needle`.
    pub fn find_page(&self, needle: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.contains_text(needle))
    }
}

/// Build the story for `resume` and paginate it.
pub fn layout(resume: &Resume, style: &StyleConfig, opts: &RenderOptions) -> LaidOutDocument {
    paginate(&build_story(resume, opts), style)
}

// ── Line breaking ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Fragment {
    face: Face,
    link: Option<String>,
    text: String,
}

#[derive(Debug, Clone, Default)]
struct Word {
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone)]
struct LineRun {
    face: Face,
    link: Option<String>,
    text: String,
    width: f32,
}

#[derive(Debug, Clone, Default)]
struct Line {
    runs: Vec<LineRun>,
    width: f32,
}

/// Split styled text into whitespace-separated words. A word may span
/// several faces (`**Rust**,` is one word in two faces).
fn words(text: &RichText, base: Face) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();

    for span in &text.spans {
        let face = Face {
            bold: base.bold || span.bold,
            italic: base.italic || span.italic,
        };
        for c in span.text.chars() {
            if c.is_whitespace() && c != '\u{a0}' {
                if !current.fragments.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.fragments.last_mut() {
                Some(f) if f.face == face && f.link == span.link => f.text.push(c),
                _ => current.fragments.push(Fragment {
                    face,
                    link: span.link.clone(),
                    text: c.to_string(),
                }),
            }
        }
    }
    if !current.fragments.is_empty() {
        words.push(current);
    }
    words
}

fn word_width(word: &Word, family: FontFamily, size: f32) -> f32 {
    word.fragments
        .iter()
        .map(|f| family.metrics(f.face).measure(&f.text, size))
        .sum()
}

/// Cut a word into pieces no wider than `max_width`, breaking between
/// characters. Every piece holds at least one character.
fn break_word(word: Word, family: FontFamily, size: f32, max_width: f32) -> Vec<Word> {
    let mut pieces = Vec::new();
    let mut current = Word::default();
    let mut width = 0.0_f32;

    for frag in word.fragments {
        let metrics = family.metrics(frag.face);
        for c in frag.text.chars() {
            let mut buf = [0u8; 4];
            let w = metrics.measure(c.encode_utf8(&mut buf), size);
            if !current.fragments.is_empty() && width + w > max_width + EPSILON {
                pieces.push(std::mem::take(&mut current));
                width = 0.0;
            }
            width += w;
            match current.fragments.last_mut() {
                Some(f) if f.face == frag.face && f.link == frag.link => f.text.push(c),
                _ => current.fragments.push(Fragment {
                    face: frag.face,
                    link: frag.link.clone(),
                    text: c.to_string(),
                }),
            }
        }
    }
    if !current.fragments.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap. A word wider than `max_width` is broken across lines.
fn wrap(text: &RichText, ps: &ParaStyle, family: FontFamily, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut width = 0.0_f32;
    let space = family.metrics(ps.face).measure(" ", ps.size);

    for word in words(text, ps.face) {
        let mut w = word_width(&word, family, ps.size);
        let word = if w > max_width + EPSILON {
            if !line.is_empty() {
                lines.push(assemble_line(std::mem::take(&mut line), family, ps.size));
                width = 0.0;
            }
            let mut pieces = break_word(word, family, ps.size, max_width);
            let Some(last) = pieces.pop() else {
                continue;
            };
            for piece in pieces {
                lines.push(assemble_line(vec![piece], family, ps.size));
            }
            w = word_width(&last, family, ps.size);
            last
        } else {
            word
        };
        if !line.is_empty() && width + space + w > max_width + EPSILON {
            lines.push(assemble_line(std::mem::take(&mut line), family, ps.size));
            width = 0.0;
        }
        width += if line.is_empty() { w } else { space + w };
        line.push(word);
    }
    if !line.is_empty() {
        lines.push(assemble_line(line, family, ps.size));
    }
    lines
}

/// Merge the fragments of a line's words into as few runs as possible.
/// The space between two words joins the run before it.
fn assemble_line(words: Vec<Word>, family: FontFamily, size: f32) -> Line {
    let mut runs: Vec<LineRun> = Vec::new();
    for (i, word) in words.into_iter().enumerate() {
        if i > 0 {
            if let Some(last) = runs.last_mut() {
                last.text.push(' ');
            }
        }
        for frag in word.fragments {
            match runs.last_mut() {
                Some(run) if run.face == frag.face && run.link == frag.link => {
                    run.text.push_str(&frag.text)
                }
                _ => runs.push(LineRun {
                    face: frag.face,
                    link: frag.link,
                    text: frag.text,
                    width: 0.0,
                }),
            }
        }
    }

    let mut width = 0.0;
    for run in &mut runs {
        run.width = family.metrics(run.face).measure(&run.text, size);
        width += run.width;
    }
    Line { runs, width }
}

// ── Pagination ───────────────────────────────────────────────────────────────

/// A flowable with its lines already broken.
enum Block {
    Para {
        style: ParaStyle,
        lines: Vec<Line>,
        bullet: bool,
    },
    Space(f32),
    Rule,
    Group(Vec<Block>),
}

fn prepare(flowable: &Flowable, style: &StyleConfig) -> Block {
    match flowable {
        Flowable::Paragraph { role, text, bullet } => {
            let ps = role.style(style);
            let width = style.frame_width() - ps.left_indent;
            Block::Para {
                style: ps,
                lines: wrap(text, &ps, style.font_family, width),
                bullet: *bullet,
            }
        }
        Flowable::Spacer(h) => Block::Space(*h),
        Flowable::Divider => Block::Rule,
        Flowable::KeepTogether(children) => {
            Block::Group(children.iter().map(|c| prepare(c, style)).collect())
        }
    }
}

struct Paginator<'a> {
    style: &'a StyleConfig,
    pages: Vec<Page>,
    /// Top of the free space on the current page.
    cursor: f32,
    /// Nothing has been placed on the current page yet.
    fresh: bool,
}

impl<'a> Paginator<'a> {
    fn new(style: &'a StyleConfig) -> Self {
        Self {
            style,
            pages: vec![Page::default()],
            cursor: style.page_size.height() - style.margin_top,
            fresh: true,
        }
    }

    fn bottom(&self) -> f32 {
        self.style.margin_bottom
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.bottom()
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.style.page_size.height() - self.style.margin_top;
        self.fresh = true;
    }

    fn push(&mut self, item: Item) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    /// Height `block` would take if placed now.
    fn height(&self, block: &Block, at_top: bool) -> f32 {
        match block {
            Block::Para { style, lines, .. } if !lines.is_empty() => {
                let before = if at_top { 0.0 } else { style.space_before };
                before + lines.len() as f32 * style.leading + style.space_after
            }
            Block::Para { .. } => 0.0,
            Block::Space(h) => {
                if at_top {
                    0.0
                } else {
                    *h
                }
            }
            Block::Rule => self.style.divider_thickness + RULE_PADDING,
            Block::Group(children) => {
                let mut at_top = at_top;
                let mut total = 0.0;
                for child in children {
                    let h = self.height(child, at_top);
                    if h > 0.0 {
                        at_top = false;
                    }
                    total += h;
                }
                total
            }
        }
    }

    fn place(&mut self, block: &Block) {
        match block {
            Block::Para {
                style,
                lines,
                bullet,
            } => self.place_paragraph(style, lines, *bullet),
            Block::Space(h) => {
                if !self.fresh {
                    self.cursor -= h;
                }
            }
            Block::Rule => {
                let needed = self.style.divider_thickness + RULE_PADDING;
                if needed > self.remaining() + EPSILON && !self.fresh {
                    self.new_page();
                }
                let thickness = self.style.divider_thickness;
                let rule = Rule {
                    x1: self.style.margin_left,
                    x2: self.style.margin_left + self.style.frame_width(),
                    y: self.cursor - thickness / 2.0,
                    thickness,
                    color: self.style.divider_color,
                };
                if thickness > 0.0 {
                    self.push(Item::Rule(rule));
                }
                self.cursor -= needed;
                self.fresh = false;
            }
            Block::Group(children) => {
                let h = self.height(block, self.fresh);
                let frame = self.style.frame_height();
                if h > self.remaining() + EPSILON && !self.fresh && h <= frame {
                    self.new_page();
                }
                for child in children {
                    self.place(child);
                }
            }
        }
    }

    fn place_paragraph(&mut self, ps: &ParaStyle, lines: &[Line], bullet: bool) {
        if lines.is_empty() {
            return;
        }
        if !self.fresh {
            self.cursor -= ps.space_before;
        }

        let family = self.style.font_family;
        let left = self.style.margin_left + ps.left_indent;
        let avail = self.style.frame_width() - ps.left_indent;

        for (i, line) in lines.iter().enumerate() {
            if self.cursor - ps.leading < self.bottom() - EPSILON && !self.fresh {
                self.new_page();
            }
            let baseline = self.cursor - ps.leading * 0.8;

            if bullet && i == 0 {
                let glyph = family.metrics(Face::REGULAR).measure("•", ps.size);
                self.push(Item::Text(TextRun {
                    x: (left - glyph - BULLET_GAP).max(self.style.margin_left),
                    y: baseline,
                    size: ps.size,
                    face: Face::REGULAR,
                    color: ps.color,
                    text: "•".into(),
                    width: glyph,
                    link: None,
                }));
            }

            let mut x = match ps.align {
                Align::Left => left,
                Align::Center => left + ((avail - line.width) / 2.0).max(0.0),
            };
            for run in &line.runs {
                let color = if run.link.is_some() {
                    self.style.link_color
                } else {
                    ps.color
                };
                self.push(Item::Text(TextRun {
                    x,
                    y: baseline,
                    size: ps.size,
                    face: run.face,
                    color,
                    text: run.text.clone(),
                    width: run.width,
                    link: run.link.clone(),
                }));
                x += run.width;
            }

            self.cursor -= ps.leading;
            self.fresh = false;
        }

        self.cursor -= ps.space_after;
    }
}

/// Place `story` on pages of the configured size.
pub fn paginate(story: &[Flowable], style: &StyleConfig) -> LaidOutDocument {
    let mut paginator = Paginator::new(style);
    for flowable in story {
        let block = prepare(flowable, style);
        paginator.place(&block);
    }
    debug!("Laid out {} page(s)", paginator.pages.len());

    LaidOutDocument {
        width: style.page_size.width(),
        height: style.page_size.height(),
        family: style.font_family,
        pages: paginator.pages,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse_resume;

    fn opts(durations: bool, keep: bool) -> RenderOptions {
        RenderOptions {
            today: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
            durations,
            keep_sections_together: keep,
        }
    }

    const SAMPLE: &str = "\
# Jane Doe
**Staff Engineer**
jane@example.com | [GitHub](https://github.com/jane)

## EXPERIENCE
### Acme Corp
**Staff Engineer**
March 2020 - Present
- Led the storage team

### Earlier Experience
**Globex** | Developer | June 2018 - September 2021
";

    #[test]
    fn test_minimal_record_has_only_the_name() {
        let resume = parse_resume("# Solo Name\n").unwrap();
        let doc = layout(&resume, &StyleConfig::default(), &opts(true, true));
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].lines(), vec!["Solo Name"]);
        assert_eq!(doc.pages[0].rules().count(), 0);
    }

    #[test]
    fn test_name_is_centered() {
        let style = StyleConfig::default();
        let resume = parse_resume("# Solo Name\n").unwrap();
        let doc = layout(&resume, &style, &opts(true, true));
        let run = doc.pages[0].runs().next().unwrap();
        let expected = (style.page_size.width() - run.width) / 2.0;
        assert!((run.x - expected).abs() < 0.01, "x = {}, expected {}", run.x, expected);
        assert!(run.face.bold);
    }

    #[cfg(feature = "durations")]
    #[test]
    fn test_durations_appended_after_dates() {
        let resume = parse_resume(SAMPLE).unwrap();
        let doc = layout(&resume, &StyleConfig::default(), &opts(true, true));
        let page = &doc.pages[0];
        assert!(page.contains_text("Staff Engineer | March 2020 – Present (1 year 10 months)"));
        assert!(page.contains_text("June 2018 – September 2021 (3 years 3 months)"));
    }

    #[cfg(not(feature = "durations"))]
    #[test]
    fn test_durations_requested_without_parser_keeps_dates() {
        let resume = parse_resume(SAMPLE).unwrap();
        let doc = layout(&resume, &StyleConfig::default(), &opts(true, true));
        let page = &doc.pages[0];
        assert!(page.contains_text("March 2020 – Present"));
        assert!(!page.lines().iter().any(|l| l.contains("year")));
    }

    #[test]
    fn test_durations_disabled_keeps_dates() {
        let resume = parse_resume(SAMPLE).unwrap();
        let doc = layout(&resume, &StyleConfig::default(), &opts(false, true));
        let page = &doc.pages[0];
        assert!(page.contains_text("March 2020 – Present"));
        assert!(!page.lines().iter().any(|l| l.contains("year")));
    }

    #[test]
    fn test_section_header_and_divider() {
        let resume = parse_resume(SAMPLE).unwrap();
        let style = StyleConfig::default();
        let doc = layout(&resume, &style, &opts(true, true));
        let rules: Vec<&Rule> = doc.pages[0].rules().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].x1, style.margin_left);
        assert_eq!(rules[0].color, style.divider_color);
        assert!(doc.pages[0].contains_text("EXPERIENCE"));
    }

    #[test]
    fn test_links_keep_their_target() {
        let resume = parse_resume(SAMPLE).unwrap();
        let style = StyleConfig::default();
        let doc = layout(&resume, &style, &opts(true, true));
        let link = doc.pages[0]
            .runs()
            .find(|r| r.link.is_some())
            .expect("contact line has a link");
        assert_eq!(link.text, "GitHub");
        assert_eq!(link.link.as_deref(), Some("https://github.com/jane"));
        assert_eq!(link.color, style.link_color);
    }

    #[test]
    fn test_bullets_hang_in_the_indent() {
        let resume = parse_resume(SAMPLE).unwrap();
        let style = StyleConfig::default();
        let doc = layout(&resume, &style, &opts(true, true));
        let runs: Vec<&TextRun> = doc.pages[0].runs().collect();
        let glyph = runs.iter().position(|r| r.text == "•").unwrap();
        assert!(runs[glyph].x < style.margin_left + style.bullet_indent);
        assert_eq!(runs[glyph + 1].text, "Led the storage team");
        assert_eq!(runs[glyph + 1].x, style.margin_left + style.bullet_indent);
    }

    #[test]
    fn test_long_paragraph_wraps_within_frame() {
        let long = "word ".repeat(400);
        let resume = parse_resume(&format!("# X\n## SUMMARY\n{long}\n")).unwrap();
        let style = StyleConfig::default();
        let doc = layout(&resume, &style, &opts(true, true));
        let right = style.margin_left + style.frame_width();
        for page in &doc.pages {
            for run in page.runs() {
                assert!(run.x + run.width <= right + 0.01, "run overflows: {run:?}");
                assert!(run.y >= style.margin_bottom);
            }
        }
        assert!(doc.pages[0].lines().len() > 10);
    }

    #[test]
    fn test_overlong_word_is_broken_within_frame() {
        let url = format!("https://example.com/{}", "a".repeat(200));
        let resume = parse_resume(&format!("# X\njane@example.com | {url}\n")).unwrap();
        let style = StyleConfig::default();
        let doc = layout(&resume, &style, &opts(true, true));
        let right = style.margin_left + style.frame_width();
        for run in doc.pages[0].runs() {
            assert!(run.x + run.width <= right + 0.01, "run overflows: {run:?}");
        }
        let joined: String = doc.pages[0].lines().concat();
        assert!(joined.contains(&url));
    }

    #[test]
    fn test_break_word_keeps_every_character() {
        let rt = to_rich_text("**bold**plain");
        let word = words(&rt, Face::REGULAR).remove(0);
        let pieces = break_word(word, FontFamily::Helvetica, 10.0, 20.0);
        assert!(pieces.len() > 1);
        let text: String = pieces
            .iter()
            .flat_map(|p| p.fragments.iter().map(|f| f.text.as_str()))
            .collect();
        assert_eq!(text, "boldplain");
        for piece in &pieces {
            assert!(word_width(piece, FontFamily::Helvetica, 10.0) <= 20.01);
        }
    }

    #[test]
    fn test_oversized_group_splits_across_pages() {
        let long = "lorem ipsum dolor sit amet ".repeat(900);
        let resume = parse_resume(&format!("# X\n## SUMMARY\n{long}\n")).unwrap();
        let doc = layout(&resume, &StyleConfig::default(), &opts(true, true));
        assert!(doc.page_count() >= 2);
        // The summary starts right under the header, not on a fresh page.
        assert_eq!(doc.find_page("SUMMARY"), Some(0));
    }

    fn filler_then_education() -> Resume {
        let mut md = String::from("# Jane Doe\n## NOTES\n");
        for i in 0..35 {
            md.push_str(&format!("- Note number {i}\n"));
        }
        md.push_str("## EDUCATION\n");
        for degree in ["B.S. One", "M.S. Two", "Ph.D. Three", "Cert Four"] {
            md.push_str(&format!("**{degree}** | Some University | 2010\n"));
        }
        parse_resume(&md).unwrap()
    }

    #[test]
    fn test_keep_together_moves_short_section() {
        let doc = layout(&filler_then_education(), &StyleConfig::default(), &opts(true, true));
        let header = doc.find_page("EDUCATION").unwrap();
        let last = doc.find_page("Cert Four").unwrap();
        assert_eq!(header, 1);
        assert_eq!(header, last);
    }

    #[test]
    fn test_without_keep_together_section_splits() {
        let doc = layout(&filler_then_education(), &StyleConfig::default(), &opts(true, false));
        let header = doc.find_page("EDUCATION").unwrap();
        let last = doc.find_page("Cert Four").unwrap();
        assert_eq!(header, 0);
        assert_eq!(last, 1);
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let resume = parse_resume("# X\n## SKILLS\n## AWARDS\n- Best in show\n").unwrap();
        let story = build_story(&resume, &opts(true, true));
        let headers = story
            .iter()
            .flat_map(|f| match f {
                Flowable::KeepTogether(children) => children.clone(),
                other => vec![other.clone()],
            })
            .filter(|f| matches!(f, Flowable::Paragraph { role: Role::SectionHeader, .. }))
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn test_word_spanning_faces_stays_together() {
        let rt = to_rich_text("use **Rust**, daily");
        let w = words(&rt, Face::REGULAR);
        assert_eq!(w.len(), 3);
        assert_eq!(w[1].fragments.len(), 2);
        assert!(w[1].fragments[0].face.bold);
        assert_eq!(w[1].fragments[1].text, ",");
    }
}
