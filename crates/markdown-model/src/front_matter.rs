//! YAML front matter delimited by `---` lines at the very start of a file.

use serde_yaml::{Mapping, Value};

use crate::error::{ModelError, ModelResult};

pub const DELIMITER: &str = "---";

/// Location of a front matter block within the line list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterBlock {
    /// Lines between the delimiters, newline-terminated.
    pub payload: String,
    /// Index of the first line after the closing delimiter.
    pub body_start: usize,
}

/// Find the front matter block. The first line must be exactly `---`; the
/// block ends at the next line that is exactly `---`.
pub fn split_front_matter(lines: &[&str]) -> ModelResult<Option<FrontMatterBlock>> {
    if lines.first() != Some(&DELIMITER) {
        return Ok(None);
    }

    let closing = lines
        .iter()
        .skip(1)
        .position(|line| *line == DELIMITER)
        .map(|offset| offset + 1)
        .ok_or_else(|| {
            ModelError::FrontMatter("unterminated block: missing closing '---'".to_string())
        })?;

    let mut payload = String::new();
    for line in &lines[1..closing] {
        payload.push_str(line);
        payload.push('\n');
    }

    Ok(Some(FrontMatterBlock {
        payload,
        body_start: closing + 1,
    }))
}

/// Parse a block payload. A block that is present but empty (or holds only
/// comments) yields an empty mapping; anything other than a mapping is
/// rejected.
pub fn parse_front_matter(payload: &str) -> ModelResult<Mapping> {
    if payload.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value =
        serde_yaml::from_str(payload).map_err(|err| ModelError::FrontMatter(err.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(ModelError::FrontMatter(format!(
            "expected a key-value mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Render a complete block including both delimiters and the blank line that
/// separates it from the body. An empty mapping renders as an empty block.
pub fn encode_front_matter(mapping: &Mapping) -> ModelResult<String> {
    let yaml = if mapping.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(mapping).map_err(|err| ModelError::FrontMatter(err.to_string()))?
    };
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n"))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
