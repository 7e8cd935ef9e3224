//! Markdown documents.
//!
//! Each block (paragraph, heading, list item, code block, table) becomes one
//! paragraph record. Strong and emphasis spans become bold and italic runs.

use super::{Extractor, ParagraphSource};
use crate::document::{Paragraph, Run, TextRun};
use crate::error::{ExtractResult, ExtractionError};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::path::Path;

/// Markdown extractor.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownExtractor {
    options: Options,
}

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }

    /// Split markdown source into paragraph records.
    pub fn parse(&self, source: &str) -> Vec<Paragraph> {
        let mut builder = BlockBuilder::default();
        for event in Parser::new_ext(source, self.options) {
            builder.handle(event);
        }
        builder.finish()
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for MarkdownExtractor {
    fn name(&self) -> &str {
        "markdown"
    }

    fn get_text(&self, path: &Path) -> ExtractResult<String> {
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn paragraphs(&self) -> Option<&dyn ParagraphSource> {
        Some(self)
    }
}

impl ParagraphSource for MarkdownExtractor {
    fn get_paragraphs(&self, path: &Path) -> ExtractResult<Vec<Paragraph>> {
        let source = self.get_text(path)?;
        Ok(self.parse(&source))
    }
}

struct OpenBlock {
    style: Option<String>,
    numbering: bool,
    runs: Vec<Run>,
}

#[derive(Default)]
struct BlockBuilder {
    out: Vec<Paragraph>,
    block: Option<OpenBlock>,
    bold: usize,
    italic: usize,
    in_image: usize,
    table: Option<Vec<Vec<String>>>,
    row: Vec<String>,
    cell: Option<String>,
}

impl BlockBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Code(text) => self.text(&text),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.block.is_none() {
                    self.open(None, false);
                }
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.open(Some(format!("Heading {}", heading_number(level))), false);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.open(Some("Code".to_string()), false);
            }
            Tag::Item => {
                self.flush();
                self.open(None, true);
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(Vec::new());
            }
            Tag::TableHead | Tag::TableRow => self.row.clear(),
            Tag::TableCell => self.cell = Some(String::new()),
            Tag::Strong => self.bold += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::Image { .. } => {
                if let Some(block) = self.block.as_mut() {
                    block.runs.push(Run::Image);
                }
                self.in_image += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.block.as_ref().is_some_and(|b| !b.numbering) {
                    self.flush();
                }
            }
            TagEnd::Heading(_) | TagEnd::CodeBlock | TagEnd::Item => self.flush(),
            TagEnd::TableCell => {
                if let Some(cell) = self.cell.take() {
                    self.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let row = std::mem::take(&mut self.row);
                if let Some(table) = self.table.as_mut() {
                    table.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(rows) = self.table.take() {
                    if !rows.is_empty() {
                        let index = self.out.len();
                        let mut paragraph = Paragraph::from_runs(index, vec![Run::Table { rows }]);
                        paragraph.style = Some("Table".to_string());
                        self.out.push(paragraph);
                    }
                }
            }
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Image => self.in_image = self.in_image.saturating_sub(1),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
            return;
        }
        // Alt text is not document content.
        if self.in_image > 0 {
            return;
        }
        let Some(block) = self.block.as_mut() else {
            return;
        };

        let bold = self.bold > 0;
        let italic = self.italic > 0;
        if let Some(Run::Text(last)) = block.runs.last_mut() {
            if last.bold == bold && last.italic == italic {
                last.text.push_str(text);
                return;
            }
        }
        block.runs.push(Run::Text(TextRun {
            text: text.to_string(),
            bold,
            italic,
            ..Default::default()
        }));
    }

    fn open(&mut self, style: Option<String>, numbering: bool) {
        self.block = Some(OpenBlock {
            style,
            numbering,
            runs: Vec::new(),
        });
    }

    fn flush(&mut self) {
        let Some(mut block) = self.block.take() else {
            return;
        };

        if let Some(Run::Text(last)) = block.runs.last_mut() {
            let trimmed = last.text.trim_end_matches('\n').len();
            last.text.truncate(trimmed);
        }
        let has_content = block.runs.iter().any(|run| match run {
            Run::Text(t) => !t.text.trim().is_empty(),
            Run::Image | Run::Table { .. } => true,
        });
        if !has_content {
            return;
        }

        let index = self.out.len();
        let mut paragraph = Paragraph::from_runs(index, block.runs);
        paragraph.style = block.style;
        paragraph.numbering = block.numbering;
        self.out.push(paragraph);
    }

    fn finish(mut self) -> Vec<Paragraph> {
        self.flush();
        self.out
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
