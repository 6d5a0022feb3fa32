//! Line-ending normalization.
//!
//! Structural analysis works line by line, so every line terminator is
//! rewritten to `\n` first: `\r\n`, a bare `\r`, NEL (U+0085), LINE
//! SEPARATOR (U+2028) and PARAGRAPH SEPARATOR (U+2029). Nothing else is
//! touched; other control characters stay in the text verbatim.

use std::borrow::Cow;

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Unify line endings to `\n`.
///
/// Borrows the input when it already uses `\n` only.
///
/// ```rust
/// use mdslabs::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains(is_line_terminator) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            // "\r\n" collapses into one terminator
            chars.next_if_eq(&'\n');
            out.push('\n');
        } else if is_line_terminator(c) {
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
