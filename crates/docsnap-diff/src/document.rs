//! Paragraph records produced by extractors.
//!
//! A paragraph carries its text as a list of runs plus paragraph-level
//! attributes. [`Paragraph::decorate`] renders it with inline markers for
//! the enabled formatting aspects; [`strip_markup`] removes the markers
//! again, so the plain text is the same whatever the flags are.

use crate::config::FormatFlags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

fn markup_regex() -> &'static Regex {
    MARKUP_REGEX.get_or_init(|| {
        Regex::new(r"<[^>]+>").expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// Remove formatting markers from decorated text.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    markup_regex().replace_all(text, "")
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    fn decorate(&self, flags: &FormatFlags) -> String {
        let mut txt = self.text.clone();
        if self.bold && flags.bold {
            txt = format!("<b>{txt}</b>");
        }
        if self.italic && flags.italic {
            txt = format!("<i>{txt}</i>");
        }
        if self.underline && flags.underline {
            txt = format!("<u>{txt}</u>");
        }
        if let Some(font) = self.font.as_deref().filter(|f| !f.is_empty()) {
            if flags.font {
                txt = format!("<font:{font}>{txt}</font>");
            }
        }
        if let Some(size) = self.size {
            if flags.size {
                txt = format!("<size:{size}>{txt}</size>");
            }
        }
        if let Some(color) = self.color.as_deref().filter(|c| !c.is_empty()) {
            if flags.color {
                txt = format!("<color:{color}>{txt}</color>");
            }
        }
        txt
    }
}

/// One inline element of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Run {
    Text(TextRun),
    Image,
    Table { rows: Vec<Vec<String>> },
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Run::Text(TextRun::new(text))
    }
}

/// An ordered text unit of a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    /// Position in the source document.
    pub index: usize,

    /// Paragraph text; used as-is when there are no runs.
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,

    pub numbering: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// A paragraph of unformatted text.
    pub fn plain(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            ..Default::default()
        }
    }

    /// A paragraph made of runs; `text` is filled from the runs.
    pub fn from_runs(index: usize, runs: Vec<Run>) -> Self {
        let mut paragraph = Self {
            index,
            runs,
            ..Default::default()
        };
        paragraph.text = paragraph.plain_text();
        paragraph
    }

    /// Render the paragraph with markers for the enabled formatting aspects.
    pub fn decorate(&self, flags: &FormatFlags) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(ls) = self.line_spacing {
            if flags.line_spacing {
                parts.push(format!("<ls:{ls}/>"));
            }
        }
        if let Some(align) = self.alignment.as_deref().filter(|a| !a.is_empty()) {
            if flags.alignment {
                parts.push(format!("<align:{align}/>"));
            }
        }
        if self.numbering && flags.numbering {
            parts.push("<num/>".to_string());
        }

        if self.runs.is_empty() {
            parts.push(self.text.clone());
            return parts.concat();
        }

        for run in &self.runs {
            match run {
                Run::Image => {
                    if flags.images {
                        parts.push("<image/>".to_string());
                    }
                }
                Run::Table { rows } => {
                    let table_text = rows
                        .iter()
                        .map(|row| row.join(" | "))
                        .collect::<Vec<_>>()
                        .join("\n");
                    if flags.tables {
                        parts.push(format!("<table>{table_text}</table>"));
                    } else {
                        parts.push(table_text);
                    }
                }
                Run::Text(text_run) => parts.push(text_run.decorate(flags)),
            }
        }

        parts.concat()
    }

    /// Marker-free text; identical for every flag combination.
    pub fn plain_text(&self) -> String {
        strip_markup(&self.decorate(&FormatFlags::none())).into_owned()
    }
}
