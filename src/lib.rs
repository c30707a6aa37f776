//! Library for reflowing Markdown-like documents.
//!
//! The formatter re-wraps paragraph text so that no line exceeds a
//! configured nominal width, while copying frontmatter, fenced code,
//! tables, and embedded HTML verbatim and never splitting headings.
//! Inline constructs (links, code spans, math expressions, emphasis
//! markers) count their rendered width rather than their raw markup
//! width, so a long URL hidden behind short display text does not force
//! a line break.
//!
//! The main entry point is [`format`]; [`FormatterConfig`] carries the
//! character limit and heading spacing rules and can be loaded from a
//! `.mdreflow.toml` file.

#[macro_use]
mod macros;

pub mod config;
pub mod indent;
pub mod io;
pub mod reflow;
pub mod segment;
pub mod split;

pub use config::{CONFIG_FILE_NAME, ConfigError, FormatterConfig};
pub use indent::{continuation_indent, leading_spaces};
pub use io::{is_formatted, rewrite, rewrite_with};
pub use reflow::{format, reflow_lines};
pub use segment::{Segment, SegmentError, SegmentKind};
pub use split::{KIND_PRIORITY, split_by_kind, split_segments};
