//! Configuration types for résumé conversion.
//!
//! Two structs split the knobs by who reads them:
//!
//! * [`StyleConfig`]: colors, font sizes, spacing and page geometry. Read
//!   only by the renderer. Comes from a named [`Theme`], optionally
//!   overridden by a sparse TOML file.
//! * [`ResumeConfig`]: what the conversion does (durations, keep-together,
//!   folders, overwrite, the injected "today"). Built via
//!   [`ResumeConfig::builder()`].
//!
//! Both are loaded once before rendering and never mutated afterwards.

use crate::error::ResumeError;
use crate::pipeline::fonts::FontFamily;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for a résumé conversion.
///
/// # Example
/// ```rust
/// use resume_md2pdf::{ResumeConfig, Theme};
///
/// let config = ResumeConfig::builder()
///     .theme(Theme::Green)
///     .calculate_durations(false)
///     .build()
///     .unwrap();
/// assert!(!config.calculate_durations);
/// ```
#[derive(Debug, Clone)]
pub struct ResumeConfig {
    /// Visual parameters handed to the renderer.
    pub style: StyleConfig,

    /// Append "(N years M months)" after experience dates. Default: true.
    ///
    /// Has no effect when the crate is built without the `durations`
    /// feature; the conversion logs a warning once and renders dates only.
    pub calculate_durations: bool,

    /// Avoid splitting short sections across a page boundary. Default: true.
    pub keep_sections_together: bool,

    /// Folder searched for the input when the given path does not exist.
    pub inputs_folder: Option<PathBuf>,

    /// Folder receiving the PDF when no output path is given.
    pub outputs_folder: Option<PathBuf>,

    /// Replace an existing output file. Default: false.
    pub overwrite: bool,

    /// Date that "Present" resolves to. `None` means the local date at
    /// conversion time.
    pub today: Option<NaiveDate>,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            calculate_durations: true,
            keep_sections_together: true,
            inputs_folder: None,
            outputs_folder: None,
            overwrite: false,
            today: None,
        }
    }
}

impl ResumeConfig {
    /// Create a new builder for `ResumeConfig`.
    pub fn builder() -> ResumeConfigBuilder {
        ResumeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The date "Present" resolves to for this run.
    pub fn effective_today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Builder for [`ResumeConfig`].
#[derive(Debug)]
pub struct ResumeConfigBuilder {
    config: ResumeConfig,
}

impl ResumeConfigBuilder {
    pub fn style(mut self, style: StyleConfig) -> Self {
        self.config.style = style;
        self
    }

    /// Use a built-in theme. The compact theme also turns off
    /// keep-together so more content fits per page.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.style = theme.style();
        self.config.keep_sections_together = theme.keeps_sections_together();
        self
    }

    /// Apply a loaded style file. A theme named in the file also brings
    /// that theme's keep-together default.
    pub fn style_file(mut self, file: StyleFile) -> Self {
        if let Some(theme) = file.theme {
            self.config.keep_sections_together = theme.keeps_sections_together();
        }
        self.config.style = file.style;
        self
    }

    pub fn calculate_durations(mut self, v: bool) -> Self {
        self.config.calculate_durations = v;
        self
    }

    pub fn keep_sections_together(mut self, v: bool) -> Self {
        self.config.keep_sections_together = v;
        self
    }

    pub fn inputs_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.inputs_folder = Some(dir.into());
        self
    }

    pub fn outputs_folder(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.outputs_folder = Some(dir.into());
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn today(mut self, date: NaiveDate) -> Self {
        self.config.today = Some(date);
        self
    }

    /// Build the configuration, validating the style.
    pub fn build(self) -> Result<ResumeConfig, ResumeError> {
        self.config.style.validate()?;
        Ok(self.config)
    }
}

// ── Style ────────────────────────────────────────────────────────────────

/// Visual parameters for the rendered résumé. All lengths are in points.
///
/// Every field has a default, so a style file only lists what it changes:
///
/// ```toml
/// theme = "classic"
/// font_family = "times"
/// name_size = 26
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    // Colors
    /// Name, section headers.
    pub primary_color: Rgb,
    /// Tagline.
    pub accent_color: Rgb,
    /// Contact line, dates, technologies.
    pub muted_color: Rgb,
    /// Body text.
    pub text_color: Rgb,
    pub divider_color: Rgb,
    pub link_color: Rgb,

    pub font_family: FontFamily,

    // Font sizes
    pub name_size: f32,
    pub subtitle_size: f32,
    pub contact_size: f32,
    pub section_header_size: f32,
    pub job_title_size: f32,
    pub company_info_size: f32,
    pub bullet_size: f32,
    pub skill_category_size: f32,
    pub skill_list_size: f32,
    pub summary_size: f32,

    // Page geometry
    pub page_size: PageSize,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,

    // Vertical spacing
    pub space_after_name: f32,
    pub space_after_subtitle: f32,
    pub space_after_contact: f32,
    pub space_after_section_header: f32,
    pub space_after_job_title: f32,
    pub space_after_company_info: f32,
    pub space_after_bullet: f32,
    pub space_after_skill_category: f32,
    pub space_after_skill_list: f32,
    pub space_after_summary: f32,
    pub space_before_section: f32,

    pub leading_bullet: f32,
    pub leading_summary: f32,
    pub leading_skill_list: f32,

    /// Left indent of bullet text; the `•` hangs in this gutter.
    pub bullet_indent: f32,
    pub divider_thickness: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            primary_color: Rgb(0x1e, 0x40, 0xaf),
            accent_color: Rgb(0x1e, 0x3a, 0x8a),
            muted_color: Rgb(0x6b, 0x72, 0x80),
            text_color: Rgb(0x1f, 0x29, 0x37),
            divider_color: Rgb(0x1e, 0x40, 0xaf),
            link_color: Rgb(0x00, 0x00, 0xff),
            font_family: FontFamily::Helvetica,
            name_size: 24.0,
            subtitle_size: 12.0,
            contact_size: 9.0,
            section_header_size: 13.0,
            job_title_size: 11.0,
            company_info_size: 10.0,
            bullet_size: 9.5,
            skill_category_size: 10.0,
            skill_list_size: 9.0,
            summary_size: 10.0,
            page_size: PageSize::Letter,
            margin_top: 36.0,
            margin_bottom: 36.0,
            margin_left: 54.0,
            margin_right: 54.0,
            space_after_name: 6.0,
            space_after_subtitle: 12.0,
            space_after_contact: 20.0,
            space_after_section_header: 8.0,
            space_after_job_title: 2.0,
            space_after_company_info: 6.0,
            space_after_bullet: 4.0,
            space_after_skill_category: 2.0,
            space_after_skill_list: 6.0,
            space_after_summary: 12.0,
            space_before_section: 12.0,
            leading_bullet: 12.0,
            leading_summary: 13.0,
            leading_skill_list: 11.0,
            bullet_indent: 12.0,
            divider_thickness: 1.0,
        }
    }
}

impl StyleConfig {
    /// Usable width between the left and right margins.
    pub fn frame_width(&self) -> f32 {
        self.page_size.width() - self.margin_left - self.margin_right
    }

    /// Usable height between the top and bottom margins.
    pub fn frame_height(&self) -> f32 {
        self.page_size.height() - self.margin_top - self.margin_bottom
    }

    /// Check that every size is positive and the margins leave room to draw.
    pub fn validate(&self) -> Result<(), ResumeError> {
        let sizes = [
            ("name_size", self.name_size),
            ("subtitle_size", self.subtitle_size),
            ("contact_size", self.contact_size),
            ("section_header_size", self.section_header_size),
            ("job_title_size", self.job_title_size),
            ("company_info_size", self.company_info_size),
            ("bullet_size", self.bullet_size),
            ("skill_category_size", self.skill_category_size),
            ("skill_list_size", self.skill_list_size),
            ("summary_size", self.summary_size),
        ];
        for (name, v) in sizes {
            if !(v > 0.0 && v <= 144.0) {
                return Err(ResumeError::InvalidConfig(format!(
                    "{name} must be in (0, 144] pt, got {v}"
                )));
            }
        }

        let lengths = [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("space_after_name", self.space_after_name),
            ("space_after_subtitle", self.space_after_subtitle),
            ("space_after_contact", self.space_after_contact),
            ("space_after_section_header", self.space_after_section_header),
            ("space_after_job_title", self.space_after_job_title),
            ("space_after_company_info", self.space_after_company_info),
            ("space_after_bullet", self.space_after_bullet),
            ("space_after_skill_category", self.space_after_skill_category),
            ("space_after_skill_list", self.space_after_skill_list),
            ("space_after_summary", self.space_after_summary),
            ("space_before_section", self.space_before_section),
            ("leading_bullet", self.leading_bullet),
            ("leading_summary", self.leading_summary),
            ("leading_skill_list", self.leading_skill_list),
            ("bullet_indent", self.bullet_indent),
            ("divider_thickness", self.divider_thickness),
        ];
        for (name, v) in lengths {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(ResumeError::InvalidConfig(format!(
                    "{name} must be ≥ 0, got {v}"
                )));
            }
        }

        if self.frame_width() < 144.0 || self.frame_height() < 144.0 {
            return Err(ResumeError::InvalidConfig(format!(
                "Margins leave a {:.0}×{:.0} pt frame; at least 144×144 is required",
                self.frame_width(),
                self.frame_height()
            )));
        }
        Ok(())
    }

    /// Parse a sparse TOML style on top of `base`.
    ///
    /// A top-level `theme = "<name>"` key replaces `base` with that theme
    /// before the other keys are applied. Unknown keys are rejected.
    pub fn from_toml_str(text: &str, base: &StyleConfig) -> Result<StyleConfig, ResumeError> {
        StyleFile::from_toml_str(text, base).map(|file| file.style)
    }

    /// Load a style file on top of `base`.
    pub fn load(path: &Path, base: &StyleConfig) -> Result<StyleConfig, ResumeError> {
        StyleFile::load(path, base).map(|file| file.style)
    }
}

/// A parsed style file: the merged style plus the theme it named, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleFile {
    pub theme: Option<Theme>,
    pub style: StyleConfig,
}

impl StyleFile {
    /// See [`StyleConfig::from_toml_str`].
    pub fn from_toml_str(text: &str, base: &StyleConfig) -> Result<StyleFile, ResumeError> {
        let mut overlay: toml::Table =
            toml::from_str(text).map_err(|e| ResumeError::InvalidConfig(e.to_string()))?;

        let theme = match overlay.remove("theme") {
            None => None,
            Some(toml::Value::String(name)) => Some(name.parse::<Theme>()?),
            Some(other) => {
                return Err(ResumeError::InvalidConfig(format!(
                    "theme must be a string, got {other}"
                )))
            }
        };
        let base = theme.map_or_else(|| base.clone(), Theme::style);

        let mut merged = match toml::Value::try_from(&base) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => {
                return Err(ResumeError::InvalidConfig(
                    "style did not serialize to a table".into(),
                ))
            }
            Err(e) => return Err(ResumeError::InvalidConfig(e.to_string())),
        };
        merged.extend(overlay);

        let style: StyleConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ResumeError::InvalidConfig(e.to_string()))?;
        style.validate()?;
        Ok(StyleFile { theme, style })
    }

    /// Read and parse a style file on top of `base`.
    pub fn load(path: &Path, base: &StyleConfig) -> Result<StyleFile, ResumeError> {
        let text = std::fs::read_to_string(path).map_err(|e| ResumeError::ConfigLoadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_toml_str(&text, base).map_err(|e| match e {
            ResumeError::InvalidConfig(detail) => ResumeError::ConfigLoadFailed {
                path: path.to_path_buf(),
                detail,
            },
            other => other,
        })
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Built-in color and spacing schemes.
///
/// | Theme | Look |
/// |-------|------|
/// | `default` | Professional blue headers |
/// | `green`   | Emerald headers, same spacing |
/// | `compact` | Smaller type and margins, sections may split |
/// | `classic` | Black and gray, thin dividers (ATS-friendly) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Green,
    Compact,
    Classic,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Green, Theme::Compact, Theme::Classic];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Green => "green",
            Theme::Compact => "compact",
            Theme::Classic => "classic",
        }
    }

    pub fn style(self) -> StyleConfig {
        let base = StyleConfig::default();
        match self {
            Theme::Default => base,
            Theme::Green => {
                let green = Rgb(0x04, 0x78, 0x57);
                StyleConfig {
                    primary_color: green,
                    accent_color: Rgb(0x06, 0x5f, 0x46),
                    divider_color: green,
                    ..base
                }
            }
            Theme::Compact => StyleConfig {
                name_size: 22.0,
                subtitle_size: 11.0,
                contact_size: 8.5,
                section_header_size: 12.0,
                job_title_size: 10.5,
                company_info_size: 9.5,
                bullet_size: 9.0,
                skill_category_size: 9.5,
                skill_list_size: 8.5,
                summary_size: 9.5,
                margin_top: 28.8,
                margin_bottom: 28.8,
                margin_left: 43.2,
                margin_right: 43.2,
                space_after_name: 4.0,
                space_after_subtitle: 8.0,
                space_after_contact: 16.0,
                space_after_section_header: 6.0,
                space_after_company_info: 4.0,
                space_after_bullet: 3.0,
                space_after_skill_list: 4.0,
                space_after_summary: 10.0,
                space_before_section: 10.0,
                leading_bullet: 11.0,
                leading_summary: 12.0,
                leading_skill_list: 10.0,
                bullet_indent: 10.0,
                ..base
            },
            Theme::Classic => StyleConfig {
                primary_color: Rgb(0x00, 0x00, 0x00),
                accent_color: Rgb(0x33, 0x33, 0x33),
                muted_color: Rgb(0x66, 0x66, 0x66),
                text_color: Rgb(0x00, 0x00, 0x00),
                divider_color: Rgb(0x00, 0x00, 0x00),
                divider_thickness: 0.5,
                ..base
            },
        }
    }

    /// Whether this theme keeps short sections on one page.
    pub fn keeps_sections_together(self) -> bool {
        !matches!(self, Theme::Compact)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ResumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| {
                ResumeError::InvalidConfig(format!(
                    "Unknown theme '{s}' (expected one of: default, green, compact, classic)"
                ))
            })
    }
}

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 8.5 × 11 in.
    #[default]
    Letter,
    /// 210 × 297 mm.
    A4,
}

impl PageSize {
    pub fn width(self) -> f32 {
        match self {
            PageSize::Letter => 612.0,
            PageSize::A4 => 595.28,
        }
    }

    pub fn height(self) -> f32 {
        match self {
            PageSize::Letter => 792.0,
            PageSize::A4 => 841.89,
        }
    }
}

/// An sRGB color, written `#rrggbb` in style files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0..=1.0 for PDF color operators.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let expand =
            |c: &str| u8::from_str_radix(c, 16).map_err(|_| format!("Invalid color '{s}'"));
        match hex.len() {
            6 if hex.is_ascii() => Ok(Rgb(
                expand(&hex[0..2])?,
                expand(&hex[2..4])?,
                expand(&hex[4..6])?,
            )),
            3 if hex.is_ascii() => {
                let digit = |i: usize| expand(&hex[i..=i]).map(|v| v * 17);
                Ok(Rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => Err(format!("Invalid color '{s}' (expected #rrggbb)")),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}
