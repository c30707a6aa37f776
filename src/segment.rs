//! Inline segment classification.
//!
//! A [`Segment`] is the atomic unit moved by the line packer: an exact span
//! of source text paired with the nominal width it occupies once rendered.
//! Links, code spans, and math expressions render narrower than their raw
//! markup, so each kind carries its own width rule. Typed constructors
//! validate the delimiter pattern up front; handing them mismatched text is
//! a caller bug and yields a [`SegmentError`].

use std::{fmt, sync::LazyLock};

use regex::Regex;
use unicode_width::UnicodeWidthStr;

static INLINE_CODE_RE: LazyLock<Regex> =
    lazy_regex!(r"`[^`]*`", "inline code regex should compile");
static INLINE_CODE_SPAN_RE: LazyLock<Regex> =
    lazy_regex!(r"^`[^`]*`$", "inline code span regex should compile");

static EXTERNAL_LINK_RE: LazyLock<Regex> =
    lazy_regex!(r"!?\[.*?\]\(.*?\)", "external link regex should compile");
static EXTERNAL_LINK_SPAN_RE: LazyLock<Regex> =
    lazy_regex!(r"^!?\[.*\]\(.*\)$", "external link span regex should compile");
static EXTERNAL_DISPLAY_RE: LazyLock<Regex> =
    lazy_regex!(r"\[(.*?)\]", "external display regex should compile");

static INTERNAL_LINK_RE: LazyLock<Regex> =
    lazy_regex!(r"!?\[\[.*?\]\]", "internal link regex should compile");
static INTERNAL_LINK_SPAN_RE: LazyLock<Regex> =
    lazy_regex!(r"^!?\[\[.*\]\]$", "internal link span regex should compile");
static INTERNAL_DISPLAY_RE: LazyLock<Regex> =
    lazy_regex!(r"\[\[.*?\|(.*?)\]\]", "internal display regex should compile");
static INTERNAL_TARGET_RE: LazyLock<Regex> =
    lazy_regex!(r"\[\[.+\]\]", "internal target regex should compile");

static INLINE_MATH_RE: LazyLock<Regex> =
    lazy_regex!(r"\$[^$]+\$", "inline math regex should compile");
static INLINE_MATH_SPAN_RE: LazyLock<Regex> =
    lazy_regex!(r"^\$[^$]+\$$", "inline math span regex should compile");

static BLOCK_MATH_RE: LazyLock<Regex> =
    lazy_regex!(r"\$\$.*?\$\$", "block math regex should compile");
static BLOCK_MATH_SPAN_RE: LazyLock<Regex> =
    lazy_regex!(r"^\$\$.*\$\$$", "block math span regex should compile");

/// The classification of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Ordinary text, including empty spans left by word splitting.
    Text,
    /// A backtick-delimited code span.
    InlineCode,
    /// A Markdown-style `[display](target)` link, optionally embedded
    /// with a leading `!`.
    ExternalLink,
    /// A wiki-style `[[target]]` or `[[target|display]]` link.
    InternalLink,
    /// A single-dollar `$...$` math expression.
    InlineMath,
    /// A two-dollar `$$...$$` math expression; always emitted on its own
    /// output line.
    BlockMath,
}

impl SegmentKind {
    /// Returns `true` if `text` matches this kind's full-span delimiter
    /// pattern.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Self::Text => true,
            Self::InlineCode => INLINE_CODE_SPAN_RE.is_match(text),
            Self::ExternalLink => EXTERNAL_LINK_SPAN_RE.is_match(text),
            Self::InternalLink => INTERNAL_LINK_SPAN_RE.is_match(text),
            Self::InlineMath => INLINE_MATH_SPAN_RE.is_match(text),
            Self::BlockMath => BLOCK_MATH_SPAN_RE.is_match(text),
        }
    }

    /// The pattern used to locate occurrences of this kind inside a line,
    /// or `None` for plain text, which matches anything.
    #[must_use]
    pub(crate) fn pattern(self) -> Option<&'static Regex> {
        match self {
            Self::Text => None,
            Self::InlineCode => Some(&INLINE_CODE_RE),
            Self::ExternalLink => Some(&EXTERNAL_LINK_RE),
            Self::InternalLink => Some(&INTERNAL_LINK_RE),
            Self::InlineMath => Some(&INLINE_MATH_RE),
            Self::BlockMath => Some(&BLOCK_MATH_RE),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Text => "plain text",
            Self::InlineCode => "an inline code span",
            Self::ExternalLink => "an external link",
            Self::InternalLink => "an internal link",
            Self::InlineMath => "an inline math expression",
            Self::BlockMath => "a block math expression",
        }
    }
}

/// Error returned when a typed segment constructor is handed text that does
/// not match the kind's delimiter pattern.
///
/// The splitter only constructs a typed segment after its pattern has
/// matched, so this error surfaces a programming mistake rather than a
/// malformed document. Callers must propagate it, not coerce the text to
/// plain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentError {
    kind: SegmentKind,
    text: String,
}

impl SegmentError {
    fn new(kind: SegmentKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    /// The kind the text failed to classify as.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not {}", self.text, self.kind.describe())
    }
}

impl std::error::Error for SegmentError {}

/// A classified span of text with a nominal display width.
///
/// Concatenating the `text` of the segments produced from a line
/// reconstructs that line exactly; the nominal width is what the packer
/// charges against the character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    kind: SegmentKind,
    text: String,
    nominal_len: usize,
}

impl Segment {
    /// Create a plain-text segment. Unescaped emphasis markers (`*`, `_`,
    /// `~~`, `==`) are rendered away, so they do not count toward the
    /// nominal width.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let nominal_len =
            UnicodeWidthStr::width(text.as_str()).saturating_sub(emphasis_marker_width(&text));
        Self {
            kind: SegmentKind::Text,
            text,
            nominal_len,
        }
    }

    /// Create an inline code segment from a backtick-delimited span.
    ///
    /// The nominal width is the inner text's width, floored at 2 so very
    /// short spans do not collapse.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` is not a backtick pair.
    pub fn inline_code(text: impl Into<String>) -> Result<Self, SegmentError> {
        let text = text.into();
        if !SegmentKind::InlineCode.matches(&text) {
            return Err(SegmentError::new(SegmentKind::InlineCode, &text));
        }
        let inner = &text[1..text.len() - 1];
        let nominal_len = UnicodeWidthStr::width(inner).max(2);
        Ok(Self {
            kind: SegmentKind::InlineCode,
            text,
            nominal_len,
        })
    }

    /// Create an external link segment from `[display](target)` markup.
    ///
    /// The nominal width is the display text's width, floored at 2; if the
    /// display text cannot be extracted the full text length is used.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` is not an external link.
    pub fn external_link(text: impl Into<String>) -> Result<Self, SegmentError> {
        let text = text.into();
        if !SegmentKind::ExternalLink.matches(&text) {
            return Err(SegmentError::new(SegmentKind::ExternalLink, &text));
        }
        let nominal_len = EXTERNAL_DISPLAY_RE.captures(&text).map_or_else(
            || text.chars().count(),
            |cap| UnicodeWidthStr::width(&cap[1]).max(2),
        );
        Ok(Self {
            kind: SegmentKind::ExternalLink,
            text,
            nominal_len,
        })
    }

    /// Create an internal link segment from `[[target]]` or
    /// `[[target|display]]` markup.
    ///
    /// With a `|display` part the nominal width is the display text's
    /// width; otherwise it is the raw length minus the two bracket pairs
    /// when a target is present, or the full raw length for `[[]]`.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` is not an internal link.
    pub fn internal_link(text: impl Into<String>) -> Result<Self, SegmentError> {
        let text = text.into();
        if !SegmentKind::InternalLink.matches(&text) {
            return Err(SegmentError::new(SegmentKind::InternalLink, &text));
        }
        let nominal_len = if let Some(cap) = INTERNAL_DISPLAY_RE.captures(&text) {
            UnicodeWidthStr::width(&cap[1])
        } else if INTERNAL_TARGET_RE.is_match(&text) {
            text.chars().count().saturating_sub(4)
        } else {
            text.chars().count()
        };
        Ok(Self {
            kind: SegmentKind::InternalLink,
            text,
            nominal_len,
        })
    }

    /// Create an inline math segment from a `$...$` expression.
    ///
    /// The rendered width of a math expression is not computable from its
    /// source, so the width of the expression with spaces stripped is used
    /// as an approximation.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` is not a dollar-delimited pair.
    pub fn inline_math(text: impl Into<String>) -> Result<Self, SegmentError> {
        let text = text.into();
        if !SegmentKind::InlineMath.matches(&text) {
            return Err(SegmentError::new(SegmentKind::InlineMath, &text));
        }
        let inner = text[1..text.len() - 1].replace(' ', "");
        let nominal_len = UnicodeWidthStr::width(inner.as_str());
        Ok(Self {
            kind: SegmentKind::InlineMath,
            text,
            nominal_len,
        })
    }

    /// Create a block math segment from a `$$...$$` expression.
    ///
    /// Block math is always placed on its own output line, so the nominal
    /// width (the full text's width) never competes for line space.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` is not a two-dollar pair.
    pub fn block_math(text: impl Into<String>) -> Result<Self, SegmentError> {
        let text = text.into();
        if !SegmentKind::BlockMath.matches(&text) {
            return Err(SegmentError::new(SegmentKind::BlockMath, &text));
        }
        let nominal_len = UnicodeWidthStr::width(text.as_str());
        Ok(Self {
            kind: SegmentKind::BlockMath,
            text,
            nominal_len,
        })
    }

    /// Construct a segment of the given kind, dispatching to the matching
    /// typed constructor.
    ///
    /// # Errors
    /// Returns [`SegmentError`] if `text` does not match `kind`'s pattern.
    pub fn classified(kind: SegmentKind, text: impl Into<String>) -> Result<Self, SegmentError> {
        match kind {
            SegmentKind::Text => Ok(Self::text(text)),
            SegmentKind::InlineCode => Self::inline_code(text),
            SegmentKind::ExternalLink => Self::external_link(text),
            SegmentKind::InternalLink => Self::internal_link(text),
            SegmentKind::InlineMath => Self::inline_math(text),
            SegmentKind::BlockMath => Self::block_math(text),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The exact source text of this segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The width this segment counts as when filling a line.
    #[must_use]
    pub fn nominal_len(&self) -> usize {
        self.nominal_len
    }

    /// Returns `true` for plain-text segments.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == SegmentKind::Text
    }
}

/// Total width of unescaped emphasis markers in `text`.
///
/// Emphasis characters disappear when rendered: `*` and `_` count one each,
/// `~~` and `==` count two per pair. A marker directly preceded by a
/// backslash is literal and keeps its width; doubled backslashes are not
/// special-cased, matching the approximate escape handling used for
/// delimiters.
fn emphasis_marker_width(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut width = 0;
    let mut i = 0;
    while i < chars.len() {
        let escaped = i > 0 && chars[i - 1] == '\\';
        match chars[i] {
            '*' | '_' if !escaped => width += 1,
            c @ ('~' | '=') if !escaped && chars.get(i + 1) == Some(&c) => {
                width += 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    width
}
