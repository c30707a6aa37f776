//! Block classification and paragraph reflow.
//!
//! The document is processed line by line through a small state machine:
//! frontmatter, fenced code, tables, and embedded HTML are copied
//! verbatim, headings are copied verbatim with blank-line spacing applied
//! around them, and everything else is reflowed under the character limit
//! by greedily packing [`Segment`]s into lines.

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::{
    config::FormatterConfig,
    indent::{continuation_indent, leading_spaces},
    segment::{Segment, SegmentError, SegmentKind},
    split::split_segments,
};

const FRONTMATTER_DELIMITER: &str = "---";
const CODE_FENCE: &str = "```";

static HEADING_RE: LazyLock<Regex> = lazy_regex!(r"^#+ ", "heading regex should compile");

static WIKILINK_RE: LazyLock<Regex> =
    lazy_regex!(r"\[\[.*?\]\]", "wikilink masking regex should compile");

static HTML_OPEN_RE: LazyLock<Regex> =
    lazy_regex!(r"<([A-Za-z][A-Za-z0-9-]*)", "html open tag regex should compile");

/// Which verbatim construct, if any, the classifier is currently inside.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockState {
    Frontmatter,
    CodeFence,
    Table,
    HtmlBlock(String),
    Normal,
}

/// Format a whole document.
///
/// The result is fully computed before being returned, so a failure leaves
/// nothing half-written for the caller to clean up.
///
/// # Errors
/// Returns [`SegmentError`] on an internal classification fault; this does
/// not happen for any well-formed input.
pub fn format(text: &str, config: &FormatterConfig) -> Result<String, SegmentError> {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    Ok(reflow_lines(&lines, config)?.join("\n"))
}

/// Reflow a document given as a sequence of lines.
///
/// # Errors
/// Returns [`SegmentError`] on an internal classification fault.
pub fn reflow_lines(lines: &[String], config: &FormatterConfig) -> Result<Vec<String>, SegmentError> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut state = if lines.first().map(String::as_str) == Some(FRONTMATTER_DELIMITER) {
        BlockState::Frontmatter
    } else {
        BlockState::Normal
    };
    // Blank lines the previous line requires after itself.
    let mut pending_newlines = 0usize;

    for (i, line) in lines.iter().enumerate() {
        match &state {
            BlockState::Frontmatter => {
                out.push(line.clone());
                if i > 0 && line == FRONTMATTER_DELIMITER {
                    state = BlockState::Normal;
                }
                continue;
            }
            BlockState::CodeFence => {
                out.push(line.clone());
                if line.starts_with(CODE_FENCE) {
                    state = BlockState::Normal;
                }
                continue;
            }
            BlockState::Table => {
                if is_table_row(line) {
                    out.push(line.clone());
                    continue;
                }
                state = BlockState::Normal;
            }
            BlockState::HtmlBlock(tag) => {
                out.push(line.clone());
                if line.contains(&closing_tag(tag)) {
                    state = BlockState::Normal;
                }
                continue;
            }
            BlockState::Normal => {}
        }

        if line.starts_with(CODE_FENCE) {
            out.push(line.clone());
            state = BlockState::CodeFence;
            continue;
        }

        if is_table_row(line)
            && lines
                .get(i + 1)
                .is_some_and(|next| is_table_separator(next))
        {
            out.push(line.clone());
            state = BlockState::Table;
            continue;
        }

        if let Some(tag) = html_open_tag(line) {
            out.push(line.clone());
            if !line.contains(&closing_tag(tag)) {
                state = BlockState::HtmlBlock(tag.to_string());
            }
            continue;
        }

        let is_heading = HEADING_RE.is_match(line);

        // A blank line already present satisfies one of the blank lines a
        // heading requires after itself; otherwise reformatting would grow
        // the gap on every run.
        if !is_heading && pending_newlines > 0 && line.trim().is_empty() {
            pending_newlines -= 1;
            out.push(line.clone());
            continue;
        }

        let newlines = infer_newlines_before(
            &out,
            pending_newlines,
            is_heading,
            config.newlines_before_heading,
        );
        if newlines > 0
            && let Some(last) = out.last_mut()
        {
            last.push_str(&"\n".repeat(newlines));
        }

        if is_heading {
            // Headings bypass the character limit.
            out.push(line.clone());
            pending_newlines = config.newlines_after_heading;
            continue;
        }

        format_paragraph(line, config.character_limit, &mut out)?;
        pending_newlines = 0;
    }

    Ok(out)
}

/// Blank lines to append before the current line.
///
/// Non-heading lines pass the carried requirement through unchanged. For a
/// heading the output so far is scanned backward, up to `required` steps,
/// counting blank lines already present; the deficit against
/// `max(requested, required)` is returned, clamped at zero.
fn infer_newlines_before(out: &[String], requested: usize, is_heading: bool, required: usize) -> usize {
    if !is_heading || out.is_empty() {
        return requested;
    }

    // Scan far enough back that `existing` can reach `required` when the
    // heading is already fully spaced.
    let stop = out.len().saturating_sub(required + 1);
    let mut existing = 0;
    for idx in (stop..out.len()).rev() {
        if !out[idx].trim().is_empty() {
            existing = out.len() - 1 - idx;
            break;
        }
    }

    requested.max(required).saturating_sub(existing)
}

/// A candidate table row: contains an unescaped pipe outside `[[...]]`.
fn is_table_row(line: &str) -> bool {
    let masked = WIKILINK_RE.replace_all(line, "");
    let bytes = masked.as_bytes();
    bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'|' && (i == 0 || bytes[i - 1] != b'\\'))
}

/// A header separator confirms the preceding candidate row as a table.
fn is_table_separator(line: &str) -> bool {
    line.contains('-') && line.contains('|')
}

fn closing_tag(tag: &str) -> String {
    format!("</{tag}")
}

/// The name of the first unescaped opening tag on `line`, if any.
fn html_open_tag(line: &str) -> Option<&str> {
    for cap in HTML_OPEN_RE.captures_iter(line) {
        let whole = cap.get(0).expect("capture 0 is the whole match");
        if whole.start() > 0 && line.as_bytes()[whole.start() - 1] == b'\\' {
            continue;
        }
        return Some(cap.get(1).expect("html open tag capture").as_str());
    }
    None
}

/// Line being assembled while packing one paragraph.
struct LineAccumulator {
    current: String,
    nominal_len: usize,
    /// Prefix for every continuation line; fixed when the paragraph starts.
    indent: String,
}

impl LineAccumulator {
    fn new(leading: &str, indent: String) -> Self {
        Self {
            current: leading.to_string(),
            nominal_len: UnicodeWidthStr::width(leading),
            indent,
        }
    }

    fn is_blank(&self) -> bool {
        self.current.trim().is_empty()
    }

    /// Flush the current line, trimmed of trailing whitespace. Returns
    /// `false` when the line held nothing visible and was dropped.
    fn flush_into(&mut self, out: &mut Vec<String>) -> bool {
        if self.is_blank() {
            return false;
        }
        out.push(self.current.trim_end().to_string());
        true
    }

    /// Start a continuation line carrying the paragraph indent.
    fn restart(&mut self) {
        self.current.clone_from(&self.indent);
        self.nominal_len = UnicodeWidthStr::width(self.indent.as_str());
    }

    fn append(&mut self, segment: &Segment, proposed: usize, space: bool) {
        if space && !self.current.is_empty() && !self.current.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
        self.current.push_str(segment.as_str());
        self.nominal_len = proposed;
    }
}

/// Whether a joining space belongs between `prior` and `current`.
///
/// Two words always get one. Typed segments carry their own delimiters and
/// abut adjacent text that was adjacent in the source; an empty word next
/// to a typed segment marks where the source had a space.
fn requires_space(prior: Option<&Segment>, current: &Segment) -> bool {
    let Some(prior) = prior else {
        return false;
    };
    let prior_plain = prior.kind() == SegmentKind::Text;
    let current_plain = current.kind() == SegmentKind::Text;
    (prior_plain && current_plain)
        || (!prior_plain && current.as_str().is_empty())
        || (prior.as_str().is_empty() && !current_plain)
}

/// Reflow one paragraph line into `out` under `limit`.
///
/// The first output line keeps the paragraph's own leading whitespace;
/// continuations carry the inferred indent. Block math is always emitted
/// on its own line. A paragraph that produces no visible content still
/// emits its original (blank) line so deliberate spacing survives.
pub(crate) fn format_paragraph(
    line: &str,
    limit: usize,
    out: &mut Vec<String>,
) -> Result<(), SegmentError> {
    let leading = leading_spaces(line);
    let trimmed = &line[leading.len()..];
    let indent = format!("{leading}{}", continuation_indent(trimmed));

    let segments = split_segments(trimmed)?;

    let mut acc = LineAccumulator::new(leading, indent);
    let mut flushed = false;
    let mut prior: Option<&Segment> = None;

    for segment in &segments {
        if segment.kind() == SegmentKind::BlockMath {
            acc.flush_into(out);
            out.push(segment.as_str().trim().to_string());
            flushed = true;
            acc.restart();
            prior = Some(segment);
            continue;
        }

        let proposed = acc.nominal_len + 1 + segment.nominal_len();
        if proposed <= limit {
            acc.append(segment, proposed, requires_space(prior, segment));
        } else {
            flushed |= acc.flush_into(out);
            acc.restart();
            acc.current.push_str(segment.as_str());
            acc.nominal_len += segment.nominal_len();
        }
        prior = Some(segment);
    }

    if !acc.flush_into(out) && !flushed {
        out.push(acc.current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_need_an_unescaped_pipe() {
        assert!(is_table_row("| a | b |"));
        assert!(!is_table_row(r"a \| b"));
        assert!(!is_table_row("see [[page|alias]] here"));
        assert!(is_table_row("[[page|alias]] | cell"));
    }

    #[test]
    fn html_open_tag_is_detected() {
        assert_eq!(html_open_tag("<div class=\"x\">"), Some("div"));
        assert_eq!(html_open_tag("text <span>"), Some("span"));
        assert_eq!(html_open_tag(r"escaped \<div>"), None);
        assert_eq!(html_open_tag("a < b"), None);
    }

    #[test]
    fn words_get_single_joining_spaces() {
        let a = Segment::text("a");
        let b = Segment::text("b");
        assert!(requires_space(Some(&a), &b));
        assert!(!requires_space(None, &a));
    }

    #[test]
    fn typed_segments_abut_adjacent_words() {
        let word = Segment::text("a");
        let link = Segment::external_link("[x](y)").unwrap();
        let empty = Segment::text("");
        assert!(!requires_space(Some(&word), &link));
        assert!(!requires_space(Some(&link), &word));
        assert!(requires_space(Some(&link), &empty));
        assert!(requires_space(Some(&empty), &link));
    }
}
