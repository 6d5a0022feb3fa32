//! Boundary-aware decomposition of oversized paragraphs.
//!
//! A paragraph that exceeds the size cap is broken at the coarsest boundary
//! that helps, trying progressively finer ones:
//!
//! ```text
//! 1. Lines      "\n"
//! 2. Sentences  UAX #29 sentence bounds ("Dr. Smith" stays whole)
//! 3. Words      UAX #29 word bounds (never inside a word or a grapheme)
//! ```
//!
//! Paragraph breaks are not in this list: blank lines already separate
//! paragraphs into distinct blocks before we get here.
//!
//! A piece is only broken further when it alone is still too large, so the
//! recursion depth is bounded by the length of the hierarchy. A piece that
//! survives every level (a long URL, a base64 blob) comes back whole and is
//! emitted as an oversized chunk rather than cut mid-word.
//!
//! Pieces are fine-grained on purpose; the packer merges neighbours back up
//! to the size cap.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// A split point class, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Line,
    Sentence,
    Word,
}

impl Boundary {
    pub const HIERARCHY: [Boundary; 3] = [Self::Line, Self::Sentence, Self::Word];

    /// Split `text` at this boundary, keeping every byte.
    fn split(self, text: &str) -> Vec<(usize, &str)> {
        match self {
            Self::Line => text
                .split_inclusive('\n')
                .scan(0, |offset, line| {
                    let start = *offset;
                    *offset += line.len();
                    Some((start, line))
                })
                .collect(),
            Self::Sentence => text.split_sentence_bound_indices().collect(),
            Self::Word => text.split_word_bound_indices().collect(),
        }
    }
}

/// A contiguous slice of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    /// Byte span in the document.
    pub span: Range<usize>,
    /// Length in characters.
    pub chars: usize,
}

/// Decompose `text` (located at byte `offset` in the document) into pieces
/// of at most `max_chars` characters wherever a boundary allows it.
///
/// Pieces are returned in order and tile `text` exactly.
pub(crate) fn decompose(text: &str, offset: usize, max_chars: usize) -> Vec<Piece> {
    let mut pieces = Vec::new();
    decompose_at(text, offset, max_chars, 0, &mut pieces);
    pieces
}

fn decompose_at(text: &str, offset: usize, max_chars: usize, level: usize, out: &mut Vec<Piece>) {
    let chars = text.chars().count();
    if chars <= max_chars {
        out.push(Piece {
            span: offset..offset + text.len(),
            chars,
        });
        return;
    }

    let Some(boundary) = Boundary::HIERARCHY.get(level) else {
        tracing::trace!(chars, max_chars, "unbreakable piece exceeds size cap");
        out.push(Piece {
            span: offset..offset + text.len(),
            chars,
        });
        return;
    };

    let parts = boundary.split(text);
    if parts.len() <= 1 {
        decompose_at(text, offset, max_chars, level + 1, out);
        return;
    }

    for (start, part) in parts {
        decompose_at(part, offset + start, max_chars, level + 1, out);
    }
}
