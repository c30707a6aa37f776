//! Whitespace and continuation-indent inference.
//!
//! Wrapped continuations of a paragraph repeat the line's leading
//! whitespace plus an indent implied by its marker: comment and callout
//! markers are repeated verbatim, list markers are replaced by spaces of
//! equal length so continuations align under the item text.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_SPACES_RE: LazyLock<Regex> =
    lazy_regex!(r"^\s+", "leading whitespace regex should compile");

static COMMENT_RE: LazyLock<Regex> = lazy_regex!(r"^%% ", "comment marker regex should compile");

static CALLOUT_RE: LazyLock<Regex> = lazy_regex!(r"^(?:> )+", "callout marker regex should compile");

// Permit task-list checkboxes after the bullet, like `- [ ] ` or `- [x] `.
static UNORDERED_LIST_RE: LazyLock<Regex> = lazy_regex!(
    r"^[-*+] (?:\[[ xX]\] )?",
    "unordered list marker regex should compile",
);

static ORDERED_LIST_RE: LazyLock<Regex> =
    lazy_regex!(r"^\d+\. ", "ordered list marker regex should compile");

/// The maximal whitespace prefix of `line`, possibly empty.
#[must_use]
pub fn leading_spaces(line: &str) -> &str {
    LEADING_SPACES_RE.find(line).map_or("", |m| m.as_str())
}

/// The indent every wrapped continuation of this paragraph must carry,
/// derived from the marker that opens `trimmed` (a line already stripped
/// of leading whitespace).
///
/// Comment (`%% `) and callout (`> `, possibly repeated) markers are
/// themselves the indent, so continuations repeat them; list markers
/// produce spaces of the marker's length; anything else produces an empty
/// indent.
#[must_use]
pub fn continuation_indent(trimmed: &str) -> String {
    if let Some(found) = COMMENT_RE.find(trimmed) {
        return found.as_str().to_string();
    }
    if let Some(found) = CALLOUT_RE.find(trimmed) {
        return found.as_str().to_string();
    }
    if let Some(found) = UNORDERED_LIST_RE.find(trimmed) {
        return " ".repeat(found.as_str().len());
    }
    if let Some(found) = ORDERED_LIST_RE.find(trimmed) {
        return " ".repeat(found.as_str().len());
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callout_marker_is_repeated() {
        assert_eq!(continuation_indent("> quoted text"), "> ");
        assert_eq!(continuation_indent("> > nested"), "> > ");
    }

    #[test]
    fn comment_marker_is_repeated() {
        assert_eq!(continuation_indent("%% hidden note"), "%% ");
    }

    #[test]
    fn task_checkbox_extends_the_marker() {
        assert_eq!(continuation_indent("- [ ] chore"), " ".repeat(6));
        assert_eq!(continuation_indent("- [x] done"), " ".repeat(6));
    }
}
