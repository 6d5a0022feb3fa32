//! Greedy packing of units into size-bounded chunks.
//!
//! Each segment is flattened into units: code fences, tables and heading
//! lines are atomic; a paragraph is one unit when it fits and is decomposed
//! at line/sentence/word boundaries when it does not. Units are then packed
//! in order until the next one would push the chunk past the cap.
//!
//! ```text
//! max = 40
//!
//! units:  [# Intro][blank][para 18][blank][para 30][```code 55```]
//! chunks: [# Intro .. para 18]  [para 30]  [```code 55```] (oversized)
//! ```
//!
//! Blank units never start or end a chunk; they are only absorbed between
//! two content units. Chunk content is the trimmed slice of the document
//! between its first and last unit, so sizes are computed on trimmed text.

use std::ops::Range;

use crate::boundary::decompose;
use crate::chunk::{Chunk, ChunkMetadata};
use crate::config::ChunkingStrategy;
use crate::scan::{BlockKind, ScannedDocument};
use crate::strategy::Segment;

#[derive(Debug, Clone, PartialEq, Eq)]
enum UnitKind {
    Blank,
    Text,
    Heading,
    Code { language: Option<String>, closed: bool },
    Table { malformed: bool },
}

#[derive(Debug, Clone)]
struct Unit {
    kind: UnitKind,
    span: Range<usize>,
    /// Characters in `span`.
    chars: usize,
    /// Leading whitespace characters.
    lead_ws: usize,
    /// Trailing whitespace characters.
    trail_ws: usize,
    path: usize,
    /// First piece of a decomposed paragraph: always starts a new chunk.
    fresh: bool,
}

impl Unit {
    fn new(text: &str, kind: UnitKind, span: Range<usize>, chars: usize, path: usize) -> Self {
        let slice = &text[span.clone()];
        let lead_ws = slice.chars().take_while(|c| c.is_whitespace()).count();
        let kind = if lead_ws == chars { UnitKind::Blank } else { kind };
        let trail_ws = if kind == UnitKind::Blank {
            0
        } else {
            slice.chars().rev().take_while(|c| c.is_whitespace()).count()
        };
        Self {
            kind,
            span,
            chars,
            lead_ws,
            trail_ws,
            path,
            fresh: false,
        }
    }

    /// Characters once surrounding whitespace is trimmed.
    fn content_chars(&self) -> usize {
        self.chars - self.lead_ws - self.trail_ws
    }
}

/// A chunk under construction: units `first..=last`.
#[derive(Debug, Clone, Copy)]
struct Open {
    first: usize,
    last: usize,
    /// Trimmed length in characters.
    len: usize,
    /// Trailing whitespace of `last`, trimmed from `len` but kept in the
    /// text if another unit is appended.
    tail_ws: usize,
}

pub(crate) struct Packer<'d, 'a> {
    doc: &'d ScannedDocument<'a>,
    max_chars: usize,
    strategy: ChunkingStrategy,
    chunks: Vec<Chunk>,
}

impl<'d, 'a> Packer<'d, 'a> {
    pub fn new(doc: &'d ScannedDocument<'a>, max_chars: usize, strategy: ChunkingStrategy) -> Self {
        Self {
            doc,
            max_chars,
            strategy,
            chunks: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<Chunk> {
        self.chunks
    }

    fn units(&self, segment: &Segment) -> Vec<Unit> {
        let text = self.doc.text();
        let mut units = Vec::with_capacity(segment.blocks.len());

        for block in &self.doc.blocks()[segment.blocks.clone()] {
            let slice = &text[block.span.clone()];
            let chars = slice.chars().count();
            let kind = match &block.kind {
                BlockKind::Blank => UnitKind::Blank,
                BlockKind::Heading { .. } => UnitKind::Heading,
                BlockKind::Fence { language, closed } => UnitKind::Code {
                    language: language.clone(),
                    closed: *closed,
                },
                BlockKind::Table { malformed } => UnitKind::Table {
                    malformed: *malformed,
                },
                // Trailing newlines and hard-break spaces are trimmed from
                // chunk content, so they never decide decomposition.
                BlockKind::Paragraph if slice.trim().chars().count() > self.max_chars => {
                    let pieces = decompose(slice, block.span.start, self.max_chars);
                    tracing::trace!(
                        chars,
                        pieces = pieces.len(),
                        "decomposed oversized paragraph"
                    );
                    let first = units.len();
                    units.extend(pieces.into_iter().map(|piece| {
                        Unit::new(text, UnitKind::Text, piece.span, piece.chars, block.path)
                    }));
                    if let Some(unit) = units[first..]
                        .iter_mut()
                        .find(|unit| unit.kind != UnitKind::Blank)
                    {
                        unit.fresh = true;
                    }
                    continue;
                }
                BlockKind::Paragraph => UnitKind::Text,
            };
            units.push(Unit::new(text, kind, block.span.clone(), chars, block.path));
        }

        units
    }

    /// Pack one segment. Chunks never cross segment boundaries.
    pub fn pack(&mut self, segment: &Segment) {
        let units = self.units(segment);
        let mut open: Option<Open> = None;
        // Blank characters seen since `open.last`.
        let mut gap = 0;

        for (i, unit) in units.iter().enumerate() {
            if unit.kind == UnitKind::Blank {
                if open.is_some() {
                    gap += unit.chars;
                }
                continue;
            }

            let extended = match open {
                Some(current) if !unit.fresh => {
                    let len = current.len + current.tail_ws + gap + unit.chars - unit.trail_ws;
                    (len <= self.max_chars).then_some(Open {
                        first: current.first,
                        last: i,
                        len,
                        tail_ws: unit.trail_ws,
                    })
                }
                _ => None,
            };

            open = match extended {
                Some(next) => Some(next),
                None => {
                    if let Some(done) = open.take() {
                        self.emit(&units, done);
                    }
                    Some(Open {
                        first: i,
                        last: i,
                        len: unit.content_chars(),
                        tail_ws: unit.trail_ws,
                    })
                }
            };
            gap = 0;
        }

        if let Some(done) = open {
            self.emit(&units, done);
        }
    }

    fn emit(&mut self, units: &[Unit], open: Open) {
        let text = self.doc.text();
        let members = &units[open.first..=open.last];
        let raw_start = members[0].span.start;
        let raw = &text[raw_start..members[members.len() - 1].span.end];

        let start = raw_start + (raw.len() - raw.trim_start().len());
        let end = raw_start + raw.trim_end().len();
        let content = &text[start..end];
        let char_count = content.chars().count();
        debug_assert_eq!(char_count, open.len);

        let mut contains_code = false;
        let mut code_language = None;
        let mut unterminated_fence = false;
        let mut contains_table = false;
        let mut malformed_table = false;
        for unit in members {
            match &unit.kind {
                UnitKind::Code { language, closed } => {
                    contains_code = true;
                    unterminated_fence |= !closed;
                    if code_language.is_none() {
                        code_language.clone_from(language);
                    }
                }
                UnitKind::Table { malformed } => {
                    contains_table = true;
                    malformed_table |= malformed;
                }
                _ => {}
            }
        }

        // Body content decides the path; a chunk of bare headings takes the
        // innermost one.
        let path = members
            .iter()
            .find(|unit| !matches!(unit.kind, UnitKind::Heading | UnitKind::Blank))
            .unwrap_or(&members[members.len() - 1])
            .path;

        let oversized = char_count > self.max_chars;
        if oversized {
            tracing::trace!(
                chars = char_count,
                max = self.max_chars,
                start,
                "emitting oversized atomic chunk"
            );
        }

        let metadata = ChunkMetadata {
            chunking_strategy: self.strategy,
            contains_code,
            code_language,
            header_path: self.doc.path(path).to_vec(),
            char_count,
            chunk_index: self.chunks.len(),
            start,
            end,
            start_line: self.doc.line_of(start),
            end_line: self.doc.line_of(end - 1),
            contains_table,
            oversized,
            unterminated_fence,
            malformed_table,
        };
        self.chunks.push(Chunk {
            content: content.to_string(),
            metadata,
        });
    }
}
