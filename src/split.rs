//! Recursive segment splitting.
//!
//! A line of paragraph text is partitioned into [`Segment`]s by trying each
//! kind's pattern in a fixed priority order and recursing into the plain
//! gaps, then splitting whatever text remains on single spaces so the
//! packer can move one word at a time. The produced segments concatenate
//! back to the input exactly.

use crate::segment::{Segment, SegmentError, SegmentKind};

/// Kinds tried by [`split_segments`], most specific first.
///
/// The two-dollar form must be consumed before the one-dollar form, and the
/// double-bracket internal link before the single-bracket external link,
/// or the narrower syntax would be misread from inside the wider one.
/// Inline code is the most general single-character delimiter and goes
/// last.
pub const KIND_PRIORITY: [SegmentKind; 5] = [
    SegmentKind::BlockMath,
    SegmentKind::InlineMath,
    SegmentKind::InternalLink,
    SegmentKind::ExternalLink,
    SegmentKind::InlineCode,
];

/// An opening delimiter directly preceded by a backslash is user-escaped
/// and must not start a match. The preceding byte is always ASCII when it
/// is a backslash, so byte indexing is safe here.
fn opener_escaped(text: &str, start: usize) -> bool {
    start > 0 && text.as_bytes()[start - 1] == b'\\'
}

/// Split `text` on every non-overlapping, unescaped occurrence of `kind`'s
/// pattern, alternating plain-text gaps with typed segments in source
/// order. Empty gap pieces are dropped.
///
/// # Errors
/// Returns [`SegmentError`] if a located match fails classification, which
/// indicates a pattern/constructor mismatch inside this crate.
pub fn split_by_kind(text: &str, kind: SegmentKind) -> Result<Vec<Segment>, SegmentError> {
    let Some(pattern) = kind.pattern() else {
        return Ok(vec![Segment::text(text)]);
    };

    let mut segments = Vec::new();
    let mut gap_start = 0;
    let mut search_from = 0;
    while let Some(found) = pattern.find_at(text, search_from) {
        if opener_escaped(text, found.start()) {
            // Skip past the escaped opener and look again. All openers are
            // ASCII, so the next byte is a character boundary.
            search_from = found.start() + 1;
            continue;
        }
        if found.start() > gap_start {
            segments.push(Segment::text(&text[gap_start..found.start()]));
        }
        segments.push(Segment::classified(kind, found.as_str())?);
        gap_start = found.end();
        search_from = found.end();
        if search_from >= text.len() {
            break;
        }
    }
    if gap_start < text.len() {
        segments.push(Segment::text(&text[gap_start..]));
    }
    Ok(segments)
}

fn resplit_text(segments: Vec<Segment>, kind: SegmentKind) -> Result<Vec<Segment>, SegmentError> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.is_text() {
            out.extend(split_by_kind(segment.as_str(), kind)?);
        } else {
            out.push(segment);
        }
    }
    Ok(out)
}

/// Split the remaining plain-text segments on single spaces.
///
/// Empty words are kept: they mark where the source had a space adjacent
/// to a typed segment, which the packer's spacing rule relies on.
fn split_words(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::new();
    for segment in segments {
        if segment.is_text() {
            out.extend(segment.as_str().split(' ').map(Segment::text));
        } else {
            out.push(segment);
        }
    }
    out
}

/// Partition one line of text into an ordered sequence of segments.
///
/// Each kind in [`KIND_PRIORITY`] is applied in turn, re-splitting only the
/// plain-text gaps left by earlier passes, and the final plain remainder is
/// broken into words. Concatenating the result reproduces `text` exactly.
///
/// # Errors
/// Returns [`SegmentError`] on an internal pattern/constructor mismatch.
pub fn split_segments(text: &str) -> Result<Vec<Segment>, SegmentError> {
    let mut segments = vec![Segment::text(text)];
    for kind in KIND_PRIORITY {
        segments = resplit_text(segments, kind)?;
    }
    Ok(split_words(segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(Segment::as_str).collect()
    }

    #[test]
    fn plain_text_splits_into_words() {
        let segments = split_segments("a dream is a wish your heart makes").unwrap();
        let words: Vec<&str> = segments.iter().map(Segment::as_str).collect();
        assert_eq!(words.join(" "), "a dream is a wish your heart makes");
    }

    #[test]
    fn splitting_by_kind_round_trips_mixed_constructs() {
        let text = "see [[note|the note]] and [docs](https://example.com) or `code`";
        for kind in KIND_PRIORITY {
            assert_eq!(joined(&split_by_kind(text, kind).unwrap()), text);
        }
    }

    #[test]
    fn each_construct_is_classified() {
        let segments =
            split_segments("see [[note]] and [docs](x) or `code` and $x$ plus $$y$$").unwrap();
        let typed: Vec<SegmentKind> = segments
            .iter()
            .filter(|s| !s.is_text())
            .map(Segment::kind)
            .collect();
        assert_eq!(
            typed,
            vec![
                SegmentKind::InternalLink,
                SegmentKind::ExternalLink,
                SegmentKind::InlineCode,
                SegmentKind::InlineMath,
                SegmentKind::BlockMath,
            ]
        );
    }

    #[test]
    fn escaped_opener_is_left_in_plain_text() {
        let segments = split_segments(r"\[not](a-link)").unwrap();
        assert!(segments.iter().all(Segment::is_text));
    }

    #[test]
    fn unclosed_bracket_never_matches() {
        let segments = split_segments("[dangling](oops").unwrap();
        assert!(segments.iter().all(Segment::is_text));
    }
}
