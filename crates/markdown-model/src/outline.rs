use std::fmt::Write;

use serde_yaml::Value;

use crate::document::Document;

/// Human-readable listing of a parsed document: title, front matter keys,
/// then every section with its classified lines.
pub fn render_outline(document: &Document) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Title: {}", document.title());
    if let Some(front_matter) = document.front_matter() {
        let keys: Vec<String> = front_matter.keys().map(display_key).collect();
        let _ = writeln!(out, "Front matter: {}", keys.join(", "));
    }

    for (index, section) in document.sections().iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "[{index}] {} {}",
            section.level(),
            section.heading()
        );
        for (line_index, line) in section.lines().iter().enumerate() {
            let _ = writeln!(
                out,
                "    {line_index:>3} ({}) {}",
                line.line_type(),
                line.text()
            );
        }
    }

    out
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|rendered| rendered.trim_end().to_string())
            .unwrap_or_else(|_| "?".to_string()),
    }
}
