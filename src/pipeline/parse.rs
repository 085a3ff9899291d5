//! Document parsing: markdown résumé text → [`Resume`].
//!
//! Parsing happens in two passes.
//!
//! 1. **Outline.** A single scan over trimmed lines splits the document into
//!    a preamble (name, tagline, contact lines) and raw sections, each with
//!    free content lines and `###` subsections. Blank lines and `---`
//!    separators carry no meaning and are dropped here.
//! 2. **Typing.** Each raw section is handed to the reader for its kind
//!    (summary, skills, experience, …), which applies that kind's
//!    line-prefix conventions.
//!
//! Only the name is mandatory. Dates are kept as written; whether they are
//! dates at all is decided later by the duration calculator.

use crate::error::ResumeError;
use crate::model::{
    BodyLine, CertificationEntry, CondensedRole, DateRange, EducationEntry, EndDate,
    ExperienceEntry, Resume, Section, SectionBody, SectionKind, SkillGroup,
};
use crate::pipeline::duration::is_present_sentinel;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Parse a markdown résumé.
///
/// # Errors
/// [`ResumeError::MissingName`] when the document has no `# Name` heading.
pub fn parse_resume(input: &str) -> Result<Resume, ResumeError> {
    let outline = outline(input);
    let name = outline.name.ok_or(ResumeError::MissingName)?;

    let sections: Vec<Section> = outline
        .sections
        .into_iter()
        .map(|raw| {
            let kind = SectionKind::from_heading(&raw.heading);
            debug!(
                "Section '{}' ({:?}): {} lines, {} subsections",
                raw.heading,
                kind,
                raw.content.len(),
                raw.subsections.len()
            );
            let body = match kind {
                SectionKind::Summary => read_summary(&raw),
                SectionKind::Skills => read_skills(&raw),
                SectionKind::Experience => read_experience(&raw),
                SectionKind::Education => read_education(&raw),
                SectionKind::Certifications => read_certifications(&raw),
                SectionKind::Other => read_other(&raw),
            };
            Section {
                heading: raw.heading,
                body,
            }
        })
        .collect();

    Ok(Resume {
        name,
        tagline: outline.tagline,
        contact: outline.contact,
        sections,
    })
}

// ── Pass 1: outline ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Outline {
    name: Option<String>,
    tagline: Option<String>,
    contact: Vec<String>,
    sections: Vec<RawSection>,
}

#[derive(Debug)]
struct RawSection {
    heading: String,
    content: Vec<String>,
    subsections: Vec<RawSubsection>,
}

#[derive(Debug)]
struct RawSubsection {
    name: String,
    lines: Vec<String>,
}

fn outline(input: &str) -> Outline {
    let mut out = Outline::default();

    for line in input.lines().map(str::trim) {
        if line.is_empty() || line == "---" {
            continue;
        }

        if let Some(heading) = line.strip_prefix("# ") {
            if out.name.is_none() && !heading.trim().is_empty() {
                out.name = Some(heading.trim().to_string());
            }
            continue;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            out.sections.push(RawSection {
                heading: heading.trim().to_string(),
                content: Vec::new(),
                subsections: Vec::new(),
            });
            continue;
        }

        let Some(section) = out.sections.last_mut() else {
            // Preamble: tagline and contact lines follow the name.
            if out.name.is_none() {
                debug!("Ignoring line before the name heading: {line}");
            } else if out.tagline.is_none() && is_full_bold(line) {
                out.tagline = Some(strip_bold(line));
            } else {
                out.contact.push(line.to_string());
            }
            continue;
        };

        if let Some(name) = line.strip_prefix("### ") {
            section.subsections.push(RawSubsection {
                name: name.trim().to_string(),
                lines: Vec::new(),
            });
        } else if let Some(sub) = section.subsections.last_mut() {
            sub.lines.push(line.to_string());
        } else {
            section.content.push(line.to_string());
        }
    }

    out
}

// ── Line helpers ─────────────────────────────────────────────────────────────

static RE_TRAILING_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

/// Separators between a start and an end date that are safe to split on.
static RE_RANGE_SEP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:-{1,2}|–|—|to|until|through)\s+|\s*[–—]\s*").unwrap()
});

static RE_LIST_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:,|;|\||•|·)\s*").unwrap());

static RE_BOLD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([^*]+?)\*\*\s*:?\s*(.*)$").unwrap());

static RE_PLAIN_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:,*]{1,40}):\s+(.+)$").unwrap());

static RE_YEAR_IN_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\(((?:19|20)\d{2}[^)]*)\)$").unwrap());

fn is_full_bold(line: &str) -> bool {
    line.len() > 4 && line.starts_with("**") && line.ends_with("**")
}

fn strip_bold(line: &str) -> String {
    line.replace("**", "").trim().to_string()
}

/// The text of a bullet line (`•`, `-`, `*`, `+` markers), or `None`.
fn bullet_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('•') {
        return Some(rest.trim());
    }
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

fn is_technologies_line(line: &str) -> bool {
    line.contains("Technologies:") || line.contains("Tech used:") || line.starts_with("**Tech")
}

/// Drop an already-computed duration such as "(2 years)" from a dates line.
fn strip_trailing_duration(text: &str) -> String {
    RE_TRAILING_PARENS.replace(text, "").trim().to_string()
}

fn strip_emphasis_wrappers(text: &str) -> &str {
    text.trim_matches(|c| c == '*' || c == '_').trim()
}

/// Split a dates line into start and end.
///
/// `March 2020 – Present`, `2019-03 - 2020-05` and `2018–2020` all split;
/// a bare hyphen only splits when both sides look like dates on their own,
/// so `2020-03` stays a single start date.
pub fn parse_date_range(text: &str) -> DateRange {
    let stripped = strip_trailing_duration(text);
    let cleaned = strip_emphasis_wrappers(&stripped).to_string();

    let mut parts = RE_RANGE_SEP.splitn(&cleaned, 2);
    let start = parts.next().unwrap_or_default().trim().to_string();
    if let Some(end) = parts.next() {
        return DateRange {
            start,
            end: end_date(end.trim()),
        };
    }

    if let Some((raw_start, raw_end)) = cleaned.split_once('-') {
        let (start, end) = (raw_start.trim(), raw_end.trim());
        if !raw_end.contains('-') && looks_like_date(start) && looks_like_date(end) {
            return DateRange {
                start: start.to_string(),
                end: end_date(end),
            };
        }
    }

    DateRange {
        start: cleaned,
        end: EndDate::Unspecified,
    }
}

fn end_date(text: &str) -> EndDate {
    if is_present_sentinel(text) {
        EndDate::Present(text.to_string())
    } else {
        EndDate::On(text.to_string())
    }
}

fn looks_like_date(text: &str) -> bool {
    let has_year = text
        .as_bytes()
        .windows(4)
        .any(|w| w.iter().all(u8::is_ascii_digit));
    has_year || is_present_sentinel(text) || text.chars().any(char::is_alphabetic)
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('|')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// `**Company** | Title | Dates` → [`CondensedRole`].
pub fn parse_condensed_role(line: &str) -> Option<CondensedRole> {
    let line = bullet_text(line).unwrap_or(line);
    if !line.contains('|') {
        return None;
    }
    let fields = split_fields(line);
    let (company, rest) = fields.split_first()?;
    let (title, dates) = match rest {
        [] => (String::new(), None),
        [title] => (title.clone(), None),
        [title, dates @ ..] => (title.clone(), Some(parse_date_range(&dates.join(" | ")))),
    };
    Some(CondensedRole {
        company: strip_bold(company),
        title,
        dates,
    })
}

// ── Pass 2: section readers ──────────────────────────────────────────────────

fn read_summary(raw: &RawSection) -> SectionBody {
    let text = raw
        .content
        .iter()
        .chain(raw.subsections.iter().flat_map(|s| s.lines.iter()))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    SectionBody::Summary(text)
}

fn read_skills(raw: &RawSection) -> SectionBody {
    let mut groups = Vec::new();
    // A label line (`**Cloud**`, `### Tools`) waiting for its values line.
    let mut pending: Option<String> = None;

    for line in &raw.content {
        read_skill_line(line, &mut pending, &mut groups);
    }
    for sub in &raw.subsections {
        open_skill_label(strip_bold(&sub.name), &mut pending, &mut groups);
        for line in &sub.lines {
            read_skill_line(line, &mut pending, &mut groups);
        }
    }
    if let Some(label) = pending {
        groups.push(SkillGroup {
            label: Some(label),
            values: Vec::new(),
        });
    }

    SectionBody::Skills(groups)
}

fn open_skill_label(label: String, pending: &mut Option<String>, groups: &mut Vec<SkillGroup>) {
    if let Some(unused) = pending.replace(label) {
        groups.push(SkillGroup {
            label: Some(unused),
            values: Vec::new(),
        });
    }
}

fn read_skill_line(line: &str, pending: &mut Option<String>, groups: &mut Vec<SkillGroup>) {
    let line = bullet_text(line).unwrap_or(line);

    if let Some(c) = RE_BOLD_LABEL.captures(line) {
        let label = c[1].trim().trim_end_matches(':').trim().to_string();
        let rest = c[2].trim();
        if rest.is_empty() {
            open_skill_label(label, pending, groups);
        } else {
            pending.take();
            groups.push(SkillGroup {
                label: Some(label),
                values: split_values(rest),
            });
        }
        return;
    }

    if pending.is_none() {
        if let Some(c) = RE_PLAIN_LABEL.captures(line) {
            groups.push(SkillGroup {
                label: Some(c[1].trim().to_string()),
                values: split_values(&c[2]),
            });
            return;
        }
    }

    groups.push(SkillGroup {
        label: pending.take(),
        values: split_values(line),
    });
}

fn split_values(text: &str) -> Vec<String> {
    RE_LIST_SEP
        .split(text.trim())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_experience(raw: &RawSection) -> SectionBody {
    let mut entries = Vec::new();
    let mut earlier = Vec::new();

    for line in &raw.content {
        match parse_condensed_role(line) {
            Some(role) => earlier.push(role),
            None => debug!("Experience line outside any entry ignored: {line}"),
        }
    }

    for sub in &raw.subsections {
        if is_earlier_block(&sub.name) {
            earlier.extend(sub.lines.iter().map(|line| {
                parse_condensed_role(line).unwrap_or_else(|| CondensedRole {
                    company: strip_bold(bullet_text(line).unwrap_or(line)),
                    title: String::new(),
                    dates: None,
                })
            }));
        } else {
            entries.push(read_entry(sub));
        }
    }

    SectionBody::Experience { entries, earlier }
}

fn is_earlier_block(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("earlier") && lower.contains("experience")
}

fn read_entry(sub: &RawSubsection) -> ExperienceEntry {
    let mut entry = ExperienceEntry {
        company: strip_bold(&sub.name),
        title: None,
        dates: None,
        bullets: Vec::new(),
        technologies: None,
    };

    let mut lines = sub.lines.iter().map(String::as_str).peekable();
    while let Some(line) = lines.next() {
        if is_technologies_line(line) {
            entry.technologies = Some(bullet_text(line).unwrap_or(line).to_string());
        } else if entry.title.is_none() && line.starts_with("**") {
            match line.split_once('|') {
                Some((title, dates)) => {
                    entry.title = Some(strip_bold(title));
                    entry.dates = Some(parse_date_range(dates));
                }
                None => {
                    entry.title = Some(strip_bold(line));
                    let next_is_dates = lines.peek().is_some_and(|next| {
                        !next.starts_with("**")
                            && bullet_text(next).is_none()
                            && !is_technologies_line(next)
                    });
                    if next_is_dates && entry.dates.is_none() {
                        entry.dates = lines.next().map(parse_date_range);
                    }
                }
            }
        } else if let Some(text) = bullet_text(line) {
            entry.bullets.push(text.to_string());
        } else if entry.dates.is_none() && !line.starts_with("**") {
            entry.dates = Some(parse_date_range(line));
        } else {
            entry.bullets.push(line.to_string());
        }
    }

    entry
}

fn read_education(raw: &RawSection) -> SectionBody {
    let mut entries: Vec<EducationEntry> = Vec::new();
    // Whether the last entry came from a heading and can absorb more lines.
    let mut open = false;

    let fill = |entry: &mut EducationEntry, text: &str| {
        let fields = split_fields(text);
        if entry.institution.is_none() && !fields.is_empty() {
            entry.institution = fields.first().cloned();
            if fields.len() > 1 {
                entry.dates = Some(fields[1..].join(" | "));
            }
        } else {
            entry.details.push(text.to_string());
        }
    };

    for line in &raw.content {
        if is_full_bold(line) && !line.contains('|') {
            entries.push(education_from_fields(&[strip_bold(line)]));
            open = true;
            continue;
        }
        if line.starts_with("**") {
            entries.push(education_from_fields(&split_fields(line)));
            open = true;
            continue;
        }

        let bullet = bullet_text(line);
        if open {
            if let Some(entry) = entries.last_mut() {
                match bullet {
                    Some(text) => entry.details.push(text.to_string()),
                    None => fill(entry, line),
                }
                continue;
            }
        }
        entries.push(education_from_fields(&split_fields(bullet.unwrap_or(line))));
    }

    for sub in &raw.subsections {
        let mut entry = education_from_fields(&split_fields(&sub.name));
        for line in &sub.lines {
            match bullet_text(line) {
                Some(text) => entry.details.push(text.to_string()),
                None => fill(&mut entry, line),
            }
        }
        entries.push(entry);
    }

    SectionBody::Education(entries)
}

fn education_from_fields(fields: &[String]) -> EducationEntry {
    let mut fields = fields.iter().map(|f| strip_bold(f));
    EducationEntry {
        degree: fields.next().unwrap_or_default(),
        institution: fields.next(),
        dates: {
            let rest: Vec<String> = fields.collect();
            (!rest.is_empty()).then(|| rest.join(" | "))
        },
        details: Vec::new(),
    }
}

fn read_certifications(raw: &RawSection) -> SectionBody {
    let mut entries: Vec<CertificationEntry> = raw
        .content
        .iter()
        .map(|line| certification_from_line(bullet_text(line).unwrap_or(line)))
        .collect();

    for sub in &raw.subsections {
        let mut entry = certification_from_line(&sub.name);
        for line in &sub.lines {
            let text = bullet_text(line).unwrap_or(line).to_string();
            if entry.issuer.is_none() {
                entry.issuer = Some(text);
            } else if entry.date.is_none() {
                entry.date = Some(text);
            }
        }
        entries.push(entry);
    }

    SectionBody::Certifications(entries)
}

fn certification_from_line(line: &str) -> CertificationEntry {
    let fields = split_fields(line);
    let mut iter = fields.iter().map(|f| strip_bold(f));
    let first = iter.next().unwrap_or_default();
    let issuer = iter.next();
    let date = iter.next();

    // "AWS Solutions Architect (2023)" carries its date in parentheses.
    if date.is_none() {
        if let Some(c) = RE_YEAR_IN_PARENS.captures(&first) {
            return CertificationEntry {
                name: c[1].trim().to_string(),
                issuer,
                date: Some(c[2].to_string()),
            };
        }
    }

    CertificationEntry {
        name: first,
        issuer,
        date,
    }
}

fn read_other(raw: &RawSection) -> SectionBody {
    let mut lines: Vec<BodyLine> = raw.content.iter().map(|l| classify_line(l)).collect();
    for sub in &raw.subsections {
        lines.push(BodyLine::Heading(strip_bold(&sub.name)));
        lines.extend(sub.lines.iter().map(|l| classify_line(l)));
    }
    SectionBody::Other(lines)
}

fn classify_line(line: &str) -> BodyLine {
    if line.starts_with("**") && line.contains('|') {
        if let Some(role) = parse_condensed_role(line) {
            return BodyLine::Role(role);
        }
    }
    if let Some(text) = bullet_text(line) {
        return BodyLine::Bullet(text.to_string());
    }
    if is_full_bold(line) {
        return BodyLine::Heading(strip_bold(line));
    }
    BodyLine::Text(line.to_string())
}

// ── Tests ────────────────────────────────────────────────────────────────────
