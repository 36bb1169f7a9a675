use std::path::PathBuf;

use log::debug;

use crate::classify::{classify_section_level, heading_text, is_header_line, SectionLevel};
use crate::document::{Document, Line, Section};
use crate::error::ModelResult;
use crate::front_matter::{parse_front_matter, split_front_matter};

impl Document {
    /// Parse markdown text into a document tagged with `path`.
    ///
    /// Any line whose trimmed form starts with `#` opens a new section; every
    /// other line is classified and attached to the current section. A single
    /// blank line directly after the front matter (or at the very start of a
    /// file without front matter) is dropped.
    pub fn parse_str(path: impl Into<PathBuf>, content: &str) -> ModelResult<Document> {
        let mut document = Document::new(path);
        let lines: Vec<&str> = content.lines().collect();

        let mut cursor = 0;
        if let Some(block) = split_front_matter(&lines)? {
            document.set_front_matter(Some(parse_front_matter(&block.payload)?));
            cursor = block.body_start;
        }

        if lines.get(cursor).is_some_and(|line| line.is_empty()) {
            cursor += 1;
        }

        let mut current = Section::leading();
        for line in &lines[cursor.min(lines.len())..] {
            if is_header_line(line) {
                let level = classify_section_level(line);
                if level == SectionLevel::H1 {
                    document.set_title_if_unset(heading_text(line));
                }
                let finished = std::mem::replace(&mut current, Section::from_header_line(line));
                flush(&mut document, finished);
            } else {
                current.push_line(Line::new(*line));
            }
        }
        flush(&mut document, current);

        debug!(
            "parsed {}: {} sections, front matter {}",
            document.path().display(),
            document.len(),
            if document.front_matter().is_some() {
                "present"
            } else {
                "absent"
            }
        );

        Ok(document)
    }
}

fn flush(document: &mut Document, section: Section) {
    if !section.is_vacuous() {
        document.push_section(section);
    }
}
