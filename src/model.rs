//! The parsed résumé record and its parts.
//!
//! A [`Resume`] is built once by [`crate::pipeline::parse::parse_resume`] and
//! is read-only afterwards. Sections keep their document order so the
//! renderer can lay them out exactly as the author arranged them; the typed
//! accessors (`summary()`, `experience()`, …) find the first section of each
//! kind for callers that do not care about order.
//!
//! Text fields keep their inline markdown (`**bold**`, `[link](url)`); the
//! inline formatter turns them into styled runs at render time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    /// Text of the first `# ` heading, trimmed. Never empty.
    pub name: String,
    /// First full-bold line before any section (`**Senior Engineer**`).
    pub tagline: Option<String>,
    /// Contact lines (email, location, links) in document order.
    pub contact: Vec<String>,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl Resume {
    /// Contact lines joined with `" | "`, or `None` when there are none.
    pub fn contact_line(&self) -> Option<String> {
        if self.contact.is_empty() {
            None
        } else {
            Some(self.contact.join(" | "))
        }
    }

    pub fn summary(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match &s.body {
            SectionBody::Summary(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn skills(&self) -> &[SkillGroup] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Skills(groups) => Some(groups.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn experience(&self) -> &[ExperienceEntry] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Experience { entries, .. } => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Condensed one-line roles from an "Earlier Experience" block.
    pub fn earlier_experience(&self) -> &[CondensedRole] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Experience { earlier, .. } => Some(earlier.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn education(&self) -> &[EducationEntry] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Education(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn certifications(&self) -> &[CertificationEntry] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Certifications(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Number of date ranges the renderer may attach a duration to.
    pub fn date_range_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| match &s.body {
                SectionBody::Experience { entries, earlier } => {
                    entries.iter().filter(|e| e.dates.is_some()).count()
                        + earlier.iter().filter(|r| r.dates.is_some()).count()
                }
                SectionBody::Other(lines) => lines
                    .iter()
                    .filter(|l| matches!(l, BodyLine::Role(r) if r.dates.is_some()))
                    .count(),
                _ => 0,
            })
            .sum()
    }
}

/// One `## HEADING` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text as written (e.g. `PROFESSIONAL SUMMARY`).
    pub heading: String,
    pub body: SectionBody,
}

impl Section {
    /// True when the section has nothing to render below its header.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            SectionBody::Summary(text) => text.trim().is_empty(),
            SectionBody::Skills(groups) => groups.is_empty(),
            SectionBody::Experience { entries, earlier } => {
                entries.is_empty() && earlier.is_empty()
            }
            SectionBody::Education(entries) => entries.is_empty(),
            SectionBody::Certifications(entries) => entries.is_empty(),
            SectionBody::Other(lines) => lines.is_empty(),
        }
    }
}

/// Section contents, by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Summary(String),
    Skills(Vec<SkillGroup>),
    Experience {
        entries: Vec<ExperienceEntry>,
        earlier: Vec<CondensedRole>,
    },
    Education(Vec<EducationEntry>),
    Certifications(Vec<CertificationEntry>),
    /// Any other section (awards, projects, publications…).
    Other(Vec<BodyLine>),
}

/// The kind of a section, chosen from keywords in its heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Certifications,
    Other,
}

impl SectionKind {
    /// Classify a `## ` heading. Matching is by keyword on the upper-cased
    /// heading, so `Technical Skills` and `SKILLS & TOOLS` both land on
    /// [`SectionKind::Skills`].
    pub fn from_heading(heading: &str) -> Self {
        let upper = heading.to_uppercase();
        if upper.contains("SUMMARY") {
            SectionKind::Summary
        } else if upper.contains("SKILL") {
            SectionKind::Skills
        } else if upper.contains("EXPERIENCE") {
            SectionKind::Experience
        } else if upper.contains("EDUCATION") {
            SectionKind::Education
        } else if upper.contains("CERTIFICATION") {
            SectionKind::Certifications
        } else {
            SectionKind::Other
        }
    }
}

/// A labelled list of skills (`**Languages:** Rust, Go`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub label: Option<String>,
    pub values: Vec<String>,
}

/// One `### Company` entry of the experience section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: Option<String>,
    pub dates: Option<DateRange>,
    pub bullets: Vec<String>,
    /// The technologies line as written, label included.
    pub technologies: Option<String>,
}

/// A one-line role: `**Company** | Title | Dates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedRole {
    pub company: String,
    pub title: String,
    pub dates: Option<DateRange>,
}

/// A free-form start date and an end date or the "Present" sentinel.
///
/// Neither side is validated; the duration calculator decides whether the
/// strings are dates at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: EndDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndDate {
    /// Open-ended ("Present", "Current", "Now"). Keeps the original label.
    Present(String),
    On(String),
    /// The dates line did not split into two parts.
    Unspecified,
}

impl EndDate {
    pub fn is_present(&self) -> bool {
        matches!(self, EndDate::Present(_))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            EndDate::Present(label) | EndDate::On(label) => {
                write!(f, "{} \u{2013} {}", self.start, label)
            }
            EndDate::Unspecified => f.write_str(&self.start),
        }
    }
}

/// A degree or course of study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: Option<String>,
    pub dates: Option<String>,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
}

/// A classified line of a generic section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BodyLine {
    /// `### Heading` or a standalone `**bold**` line.
    Heading(String),
    Role(CondensedRole),
    Bullet(String),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Resume {
        Resume {
            name: "Jane Doe".into(),
            tagline: None,
            contact: vec!["jane@example.com".into(), "Remote".into()],
            sections: vec![
                Section {
                    heading: "PROFESSIONAL SUMMARY".into(),
                    body: SectionBody::Summary("Builds things.".into()),
                },
                Section {
                    heading: "EXPERIENCE".into(),
                    body: SectionBody::Experience {
                        entries: vec![ExperienceEntry {
                            company: "Acme".into(),
                            title: Some("Engineer".into()),
                            dates: Some(DateRange {
                                start: "March 2020".into(),
                                end: EndDate::Present("Present".into()),
                            }),
                            bullets: vec![],
                            technologies: None,
                        }],
                        earlier: vec![],
                    },
                },
            ],
        }
    }

    #[test]
    fn accessors_find_sections() {
        let r = sample();
        assert_eq!(r.summary(), Some("Builds things."));
        assert_eq!(r.experience().len(), 1);
        assert!(r.skills().is_empty());
        assert!(r.education().is_empty());
        assert!(r.certifications().is_empty());
        assert_eq!(r.date_range_count(), 1);
    }

    #[test]
    fn contact_line_joins_items() {
        assert_eq!(
            sample().contact_line().as_deref(),
            Some("jane@example.com | Remote")
        );
    }

    #[test]
    fn section_kind_by_keyword() {
        assert_eq!(SectionKind::from_heading("Professional Summary"), SectionKind::Summary);
        assert_eq!(SectionKind::from_heading("TECHNICAL SKILLS"), SectionKind::Skills);
        assert_eq!(SectionKind::from_heading("Work Experience"), SectionKind::Experience);
        assert_eq!(SectionKind::from_heading("EDUCATION"), SectionKind::Education);
        assert_eq!(SectionKind::from_heading("Certifications"), SectionKind::Certifications);
        assert_eq!(SectionKind::from_heading("AWARDS"), SectionKind::Other);
    }

    #[test]
    fn date_range_display() {
        let r = DateRange {
            start: "June 2018".into(),
            end: EndDate::On("September 2021".into()),
        };
        assert_eq!(r.to_string(), "June 2018 \u{2013} September 2021");
        let open = DateRange {
            start: "2019".into(),
            end: EndDate::Unspecified,
        };
        assert_eq!(open.to_string(), "2019");
    }
}
