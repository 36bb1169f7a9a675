//! Line and heading classification.
//!
//! Both classifiers trim the input first and then look only at its prefix, so
//! they never fail and never depend on surrounding lines.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Markdown construct a single body line starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineType {
    Plain,
    CodeFence,
    Image,
    ListItem,
    Quote,
    TableRow,
    TaskItem,
    NumberedListItem,
}

impl LineType {
    /// Canonical prefix for the construct; empty for plain text.
    pub fn marker(self) -> &'static str {
        match self {
            LineType::Plain => "",
            LineType::CodeFence => "```",
            LineType::Image => "![",
            LineType::ListItem => "- ",
            LineType::Quote => "> ",
            LineType::TableRow => "| ",
            LineType::TaskItem => "- [ ] ",
            LineType::NumberedListItem => "1. ",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineType::Plain => "plain",
            LineType::CodeFence => "code-fence",
            LineType::Image => "image",
            LineType::ListItem => "list-item",
            LineType::Quote => "quote",
            LineType::TableRow => "table-row",
            LineType::TaskItem => "task-item",
            LineType::NumberedListItem => "numbered-list-item",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading depth of a section. `Null` marks the implicit section holding
/// content that appears before the first header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionLevel {
    Null,
    Heading(usize),
}

impl SectionLevel {
    pub const H1: SectionLevel = SectionLevel::Heading(1);
    pub const H2: SectionLevel = SectionLevel::Heading(2);
    pub const H3: SectionLevel = SectionLevel::Heading(3);
    pub const H4: SectionLevel = SectionLevel::Heading(4);
    pub const H5: SectionLevel = SectionLevel::Heading(5);
    pub const H6: SectionLevel = SectionLevel::Heading(6);

    pub fn is_null(self) -> bool {
        matches!(self, SectionLevel::Null)
    }

    pub fn depth(self) -> Option<usize> {
        match self {
            SectionLevel::Null => None,
            SectionLevel::Heading(depth) => Some(depth),
        }
    }

    /// The run of `#` characters for this level.
    pub fn marker(self) -> String {
        "#".repeat(self.depth().unwrap_or(0))
    }
}

impl fmt::Display for SectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionLevel::Null => f.write_str("null"),
            SectionLevel::Heading(depth) => write!(f, "h{depth}"),
        }
    }
}

fn task_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^- \[.\] ").expect("task item pattern is valid"))
}

fn numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+\.").expect("numbered item pattern is valid"))
}

/// Classify a body line. First match wins; task items are checked before
/// plain list items because they share the `- ` prefix.
pub fn classify_line(content: &str) -> LineType {
    let trimmed = content.trim();

    if task_pattern().is_match(trimmed) {
        return LineType::TaskItem;
    }

    let prefixed = [
        LineType::CodeFence,
        LineType::Image,
        LineType::ListItem,
        LineType::Quote,
        LineType::TableRow,
    ];
    if let Some(line_type) = prefixed
        .into_iter()
        .find(|line_type| trimmed.starts_with(line_type.marker()))
    {
        return line_type;
    }

    if numbered_pattern().is_match(trimmed) {
        return LineType::NumberedListItem;
    }

    LineType::Plain
}

/// Section level of a header line: the length of its leading `#` run, or
/// `Null` when the trimmed line does not start with `#`. Runs longer than six
/// are passed through unchanged.
pub fn classify_section_level(content: &str) -> SectionLevel {
    let trimmed = content.trim();
    let depth = trimmed.chars().take_while(|ch| *ch == '#').count();
    if depth == 0 {
        SectionLevel::Null
    } else {
        SectionLevel::Heading(depth)
    }
}

/// Text after the first space of the trimmed header line, or empty when the
/// line has no space.
pub fn heading_text(header_line: &str) -> &str {
    let trimmed = header_line.trim();
    match trimmed.find(' ') {
        Some(idx) => &trimmed[idx + 1..],
        None => "",
    }
}

pub(crate) fn is_header_line(line: &str) -> bool {
    line.trim().starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_construct() {
        let cases = [
            ("```", LineType::CodeFence),
            ("```rust", LineType::CodeFence),
            ("![alt](x)", LineType::Image),
            ("- item", LineType::ListItem),
            ("> quote", LineType::Quote),
            ("| a | b |", LineType::TableRow),
            ("- [x] done", LineType::TaskItem),
            ("- [ ] todo", LineType::TaskItem),
            ("1. first", LineType::NumberedListItem),
            ("42.", LineType::NumberedListItem),
            ("plain text", LineType::Plain),
            ("", LineType::Plain),
        ];

        for (input, expected) in cases {
            assert_eq!(classify_line(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(classify_line("   - nested item"), LineType::ListItem);
        assert_eq!(classify_line("\t> quoted\t"), LineType::Quote);
        assert_eq!(classify_line("  - [x] indented task"), LineType::TaskItem);
    }

    #[test]
    fn near_misses_fall_through() {
        assert_eq!(classify_line("-item"), LineType::Plain);
        assert_eq!(classify_line(">quote"), LineType::Plain);
        assert_eq!(classify_line("|a|"), LineType::Plain);
        assert_eq!(classify_line("- [x]done"), LineType::ListItem);
        assert_eq!(classify_line("- [xx] wide"), LineType::ListItem);
        assert_eq!(classify_line("1) first"), LineType::Plain);
        assert_eq!(classify_line("!image"), LineType::Plain);
    }

    #[test]
    fn decimal_tokens_count_as_numbered_items() {
        assert_eq!(classify_line("123.456"), LineType::NumberedListItem);
        assert_eq!(classify_line("3.14 is pi"), LineType::NumberedListItem);
    }

    #[test]
    fn section_levels_follow_hash_run() {
        assert_eq!(classify_section_level("# Title"), SectionLevel::H1);
        assert_eq!(classify_section_level("  ### Three"), SectionLevel::H3);
        assert_eq!(classify_section_level("######"), SectionLevel::H6);
        assert_eq!(
            classify_section_level("######## Deep"),
            SectionLevel::Heading(8)
        );
        assert_eq!(classify_section_level("#tag"), SectionLevel::H1);
        assert_eq!(classify_section_level("Not a header"), SectionLevel::Null);
        assert_eq!(classify_section_level(""), SectionLevel::Null);
    }

    #[test]
    fn heading_text_strips_one_space_after_marker() {
        assert_eq!(heading_text("# My Title"), "My Title");
        assert_eq!(heading_text("##  Padded"), " Padded");
        assert_eq!(heading_text("  ## Indented  "), "Indented");
        assert_eq!(heading_text("#"), "");
        assert_eq!(heading_text("#NoSpace"), "");
    }

    #[test]
    fn level_markers_and_labels() {
        assert_eq!(SectionLevel::H3.marker(), "###");
        assert_eq!(SectionLevel::Null.marker(), "");
        assert_eq!(SectionLevel::H2.to_string(), "h2");
        assert_eq!(LineType::TaskItem.to_string(), "task-item");
    }
}
