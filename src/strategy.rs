//! Segmentation strategies.
//!
//! A strategy decides where chunks are *not allowed* to cross: it cuts the
//! scanned document into segments, and the packer then fills each segment
//! with size-bounded chunks.
//!
//! | Strategy | Segments | Falls back when |
//! |----------|----------|-----------------|
//! | `header-based` | one per heading section | no headings |
//! | `size-based` | the whole document | never |
//! | `code-aware` | each code fence alone, prose in between | no fences |
//!
//! `auto` resolves to `header-based` when the document has headings and to
//! `size-based` otherwise.

use std::ops::Range;

use crate::config::ChunkingStrategy;
use crate::scan::{BlockKind, ScannedDocument};

/// A run of blocks that no chunk may cross.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    /// Indices into [`ScannedDocument::blocks`].
    pub blocks: Range<usize>,
}

/// A segmentation algorithm.
pub(crate) trait Splitter: Send + Sync {
    /// Cut the document into ordered, contiguous segments.
    fn split(&self, doc: &ScannedDocument<'_>) -> Vec<Segment>;
}

/// One segment per heading section.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeaderSplitter;

/// The whole document as a single segment.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SizeSplitter;

/// Fenced code spans isolated from surrounding prose.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CodeAwareSplitter;

fn heading_level(kind: &BlockKind) -> Option<u8> {
    match kind {
        BlockKind::Heading { level } => Some(*level),
        _ => None,
    }
}

impl Splitter for HeaderSplitter {
    fn split(&self, doc: &ScannedDocument<'_>) -> Vec<Segment> {
        let blocks = doc.blocks();
        if blocks.is_empty() {
            return Vec::new();
        }

        let mut starts: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| heading_level(&block.kind).is_some())
            .map(|(i, _)| i)
            .collect();
        if starts.first() != Some(&0) {
            starts.insert(0, 0);
        }

        let mut segments = Vec::with_capacity(starts.len());
        // A heading with no body is carried into a deeper child section.
        let mut carried: Option<usize> = None;

        for (k, &start) in starts.iter().enumerate() {
            let end = starts.get(k + 1).copied().unwrap_or(blocks.len());
            let level = heading_level(&blocks[start].kind);
            let body_empty = blocks[start + 1..end]
                .iter()
                .all(|block| block.kind == BlockKind::Blank);
            let child_follows = match (level, blocks.get(end).and_then(|b| heading_level(&b.kind))) {
                (Some(level), Some(next)) => next > level,
                _ => false,
            };

            if level.is_some() && body_empty && child_follows {
                carried.get_or_insert(start);
                continue;
            }

            segments.push(Segment {
                blocks: carried.take().unwrap_or(start)..end,
            });
        }

        segments
    }
}

impl Splitter for SizeSplitter {
    fn split(&self, doc: &ScannedDocument<'_>) -> Vec<Segment> {
        vec![Segment {
            blocks: 0..doc.blocks().len(),
        }]
    }
}

impl Splitter for CodeAwareSplitter {
    fn split(&self, doc: &ScannedDocument<'_>) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut run_start = 0;

        for (i, block) in doc.blocks().iter().enumerate() {
            if matches!(block.kind, BlockKind::Fence { .. }) {
                if run_start < i {
                    segments.push(Segment {
                        blocks: run_start..i,
                    });
                }
                segments.push(Segment { blocks: i..i + 1 });
                run_start = i + 1;
            }
        }
        if run_start < doc.blocks().len() {
            segments.push(Segment {
                blocks: run_start..doc.blocks().len(),
            });
        }

        segments
    }
}

/// Resolve the configured strategy against what the scan found.
///
/// Never returns [`ChunkingStrategy::Auto`].
pub(crate) fn resolve(requested: ChunkingStrategy, doc: &ScannedDocument<'_>) -> ChunkingStrategy {
    let resolved = match requested {
        ChunkingStrategy::Auto | ChunkingStrategy::HeaderBased if doc.has_headings() => {
            ChunkingStrategy::HeaderBased
        }
        ChunkingStrategy::CodeAware if doc.has_fences() => ChunkingStrategy::CodeAware,
        _ => ChunkingStrategy::SizeBased,
    };

    if requested != ChunkingStrategy::Auto && requested != resolved {
        tracing::debug!(
            requested = %requested,
            resolved = %resolved,
            "no structure for requested strategy, degrading"
        );
    }
    resolved
}

static HEADER: HeaderSplitter = HeaderSplitter;
static SIZE: SizeSplitter = SizeSplitter;
static CODE_AWARE: CodeAwareSplitter = CodeAwareSplitter;

/// Registry lookup: the splitter for a concrete strategy.
///
/// `Auto` has no splitter of its own; [`resolve`] it first. Passing it here
/// falls back to size-based splitting.
pub(crate) fn splitter_for(strategy: ChunkingStrategy) -> &'static dyn Splitter {
    match strategy {
        ChunkingStrategy::HeaderBased => &HEADER,
        ChunkingStrategy::CodeAware => &CODE_AWARE,
        ChunkingStrategy::SizeBased | ChunkingStrategy::Auto => &SIZE,
    }
}
