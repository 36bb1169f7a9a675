//! Line-preserving markdown document model.
//!
//! A file is split into optional YAML front matter and a flat list of
//! sections, each opened by a header line and holding classified body lines.
//! Sections and lines keep their source text so that writing an unedited
//! document reproduces the input.

pub mod classify;
pub mod context;
pub mod document;
pub mod error;
pub mod front_matter;
pub mod fs;
pub mod outline;
mod parse;
pub mod search;
mod serialize;

pub use classify::{classify_line, classify_section_level, heading_text, LineType, SectionLevel};
pub use context::DocumentContext;
pub use document::{Document, Line, Position, Section};
pub use error::{ExitCode, ModelError, ModelResult};
pub use markdown_model_config::{Config, LoadOptions, WriteSettings};
pub use outline::render_outline;
pub use search::{fuzzy_match, SectionMatch};
pub use serde_yaml::{Mapping, Value};
