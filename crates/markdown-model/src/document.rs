use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::classify::{classify_line, classify_section_level, heading_text, LineType, SectionLevel};
use crate::error::{ModelError, ModelResult};

/// Where an edit places the new element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Append after the last element.
    End,
    /// Insert before the element currently at this index; the length of the
    /// collection is accepted and behaves like `End`.
    At(usize),
}

/// A single body line together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    text: String,
    line_type: LineType,
    #[serde(skip)]
    original_text: String,
}

impl Line {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Line {
            line_type: classify_line(&text),
            original_text: text.clone(),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_type(&self) -> LineType {
        self.line_type
    }

    /// Source text replayed verbatim on serialization.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}

/// A headed block of lines. The section with `SectionLevel::Null` holds the
/// content before the first header and has no header line of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    level: SectionLevel,
    heading: String,
    #[serde(skip)]
    original_header_line: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    /// The implicit leading section.
    pub(crate) fn leading() -> Self {
        Section {
            level: SectionLevel::Null,
            heading: String::new(),
            original_header_line: None,
            lines: Vec::new(),
        }
    }

    pub(crate) fn from_header_line(header_line: &str) -> Self {
        let level = classify_section_level(header_line);
        if level.is_null() {
            return Section::leading();
        }
        Section {
            level,
            heading: heading_text(header_line).to_string(),
            original_header_line: Some(header_line.to_string()),
            lines: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// A leading section that never received content.
    pub(crate) fn is_vacuous(&self) -> bool {
        self.level.is_null() && self.lines.is_empty()
    }

    pub fn level(&self) -> SectionLevel {
        self.level
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Header line exactly as it appeared in the source (or as supplied to
    /// `Document::add_section`). `None` for the leading section.
    pub fn original_header_line(&self) -> Option<&str> {
        self.original_header_line.as_deref()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// In-memory markdown document: optional front matter followed by an ordered,
/// flat list of sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    path: PathBuf,
    title: String,
    front_matter: Option<Mapping>,
    sections: Vec<Section>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Document {
            path: path.into(),
            title: String::new(),
            front_matter: None,
            sections: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Heading of the first H1 seen while parsing; empty when there was none.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn front_matter(&self) -> Option<&Mapping> {
        self.front_matter.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Value stored under `key` in the front matter.
    pub fn front_matter_value(&self, key: &str) -> Option<&Value> {
        self.front_matter.as_ref()?.get(key)
    }

    /// Value stored under `key`, or `default` when the key or the whole front
    /// matter block is absent.
    pub fn get_front_matter(&self, key: &str, default: impl Into<Value>) -> Value {
        self.front_matter_value(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    pub(crate) fn set_front_matter(&mut self, front_matter: Option<Mapping>) {
        self.front_matter = front_matter;
    }

    pub(crate) fn set_title_if_unset(&mut self, heading: &str) {
        if self.title.is_empty() {
            self.title = heading.to_string();
        }
    }

    pub(crate) fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Insert a section built from `header_line`, which is stored verbatim and
    /// replayed on serialization. Returns the index of the new section.
    pub fn add_section(&mut self, header_line: &str, position: Position) -> ModelResult<usize> {
        let index = resolve_position(position, self.sections.len())?;
        let section = Section::from_header_line(header_line);
        let starts_with_leading = self
            .sections
            .first()
            .is_some_and(|first| first.level.is_null());

        if section.level.is_null() {
            if index != 0 {
                return Err(ModelError::InvalidSection(format!(
                    "a section without a header can only be inserted first, not at {index}"
                )));
            }
            if starts_with_leading {
                return Err(ModelError::InvalidSection(
                    "document already starts with a section without a header".to_string(),
                ));
            }
        } else if index == 0 && starts_with_leading {
            return Err(ModelError::InvalidSection(format!(
                "cannot insert '{}' before the leading section",
                header_line.trim()
            )));
        }

        self.sections.insert(index, section);
        Ok(index)
    }

    /// Insert a classified line into the section at `section_index`. Returns
    /// the index of the new line within that section.
    pub fn add_line(
        &mut self,
        section_index: usize,
        text: &str,
        position: Position,
    ) -> ModelResult<usize> {
        let section_count = self.sections.len();
        let section = self
            .sections
            .get_mut(section_index)
            .ok_or(ModelError::Index {
                index: section_index,
                len: section_count,
            })?;
        let index = resolve_position(position, section.lines.len())?;
        section.lines.insert(index, Line::new(text));
        Ok(index)
    }
}

fn resolve_position(position: Position, len: usize) -> ModelResult<usize> {
    match position {
        Position::End => Ok(len),
        Position::At(index) if index <= len => Ok(index),
        Position::At(index) => Err(ModelError::Index { index, len }),
    }
}
