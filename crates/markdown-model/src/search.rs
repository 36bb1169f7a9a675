//! Read-only lookups over a document's sections.

use std::cmp::Ordering;

use strsim::normalized_levenshtein;

use crate::classify::SectionLevel;
use crate::document::{Document, Section};

/// A section returned by a lookup, together with its position so callers can
/// route edits back through `Document`.
#[derive(Debug, Clone, Copy)]
pub struct SectionMatch<'a> {
    pub index: usize,
    pub section: &'a Section,
}

impl<'a> SectionMatch<'a> {
    pub fn heading(&self) -> &'a str {
        self.section.heading()
    }

    pub fn level(&self) -> SectionLevel {
        self.section.level()
    }
}

/// True when every character of `query` occurs in `target` in the same order.
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let mut remaining = target.chars();
    query
        .chars()
        .all(|wanted| remaining.by_ref().any(|ch| ch == wanted))
}

impl Document {
    /// Sections whose heading fuzzy-matches `query`, optionally restricted to
    /// one level, in document order.
    pub fn search_sections(
        &self,
        query: &str,
        level: Option<SectionLevel>,
    ) -> Vec<SectionMatch<'_>> {
        self.sections()
            .iter()
            .enumerate()
            .filter(|(_, section)| level.map_or(true, |wanted| section.level() == wanted))
            .filter(|(_, section)| fuzzy_match(query, section.heading()))
            .map(|(index, section)| SectionMatch { index, section })
            .collect()
    }

    /// Index of the first section with exactly this level and heading.
    pub fn find_section(&self, level: SectionLevel, heading: &str) -> Option<usize> {
        self.sections()
            .iter()
            .position(|section| section.level() == level && section.heading() == heading)
    }

    /// Non-empty headings ordered by similarity to `query`, most similar first.
    pub fn suggest_headings(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        let mut scored: Vec<(&str, f64)> = self
            .sections()
            .iter()
            .map(Section::heading)
            .filter(|heading| !heading.is_empty())
            .map(|heading| {
                (
                    heading,
                    normalized_levenshtein(&needle, &heading.to_lowercase()),
                )
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(limit)
            .map(|(heading, _)| heading)
            .collect()
    }
}
