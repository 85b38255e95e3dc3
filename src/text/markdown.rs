//! Bold-emphasis parsing for slide text.
//!
//! Only `**bold**` is recognised. Pairs never nest; the first marker opens and
//! the next one on the same line closes. Offsets are character indices into
//! the clean text.

// Allow expect for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::expect_used)]

use std::sync::LazyLock;
use regex::Regex;

/// The emphasis marker.
const MARKER: &str = "**";

/// A marker pair around at least one character, matched non-greedily.
/// Pairs never cross a line break.
static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.+?)\*\*").expect("valid regex: RE_BOLD")
});

/// A styled range over clean text, `start..end` in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSegment {
    /// First character of the range.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    /// Whether the range was wrapped in markers.
    pub bold: bool,
}

impl StyledSegment {
    /// Number of characters covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the segment covers nothing.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Marker-free text plus the segments that partition it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedText {
    /// Text with all markers removed.
    pub clean: String,
    /// Ordered, contiguous, non-overlapping segments covering `clean`.
    pub segments: Vec<StyledSegment>,
}

impl ParsedText {
    /// Ranges that should receive emphasis styling.
    pub fn bold_ranges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.segments
            .iter()
            .filter(|s| s.bold && !s.is_empty())
            .map(|s| (s.start, s.end))
    }
}

/// Parse `text` into clean text and styled segments.
pub fn parse(text: &str) -> ParsedText {
    let mut parsed = ParsedText::default();
    let mut cursor = 0;
    let mut last = 0;

    for caps in RE_BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            push(&mut parsed, &mut cursor, &text[last..whole.start()], false);
        }
        push(&mut parsed, &mut cursor, inner.as_str(), true);
        last = whole.end();
    }

    if last < text.len() {
        push(&mut parsed, &mut cursor, &text[last..], false);
    }

    parsed
}

/// Text with every marker removed.
fn strip_markers(text: &str) -> String {
    text.replace(MARKER, "")
}

fn push(parsed: &mut ParsedText, cursor: &mut usize, raw: &str, bold: bool) {
    // Stray markers inside a piece are dropped so offsets stay aligned with `clean`
    let piece = strip_markers(raw);
    let len = piece.chars().count();
    if len == 0 {
        return;
    }
    parsed.segments.push(StyledSegment { start: *cursor, end: *cursor + len, bold });
    parsed.clean.push_str(&piece);
    *cursor += len;
}
