//! The Chunk type: a slice of a document plus the metadata an indexer needs.

use serde::{Deserialize, Serialize};

use crate::config::ChunkingStrategy;

/// Per-chunk metadata.
///
/// Serializes as a flat mapping, so downstream stores can keep it next to
/// the embedding without a schema of their own:
///
/// ```text
/// {
///   "chunking_strategy": "header-based",
///   "contains_code": true,
///   "code_language": "python",
///   "header_path": ["Guide", "Install"],
///   "char_count": 412,
///   ...
/// }
/// ```
///
/// ## Offsets
///
/// `start` and `end` are byte offsets into the *normalized* document (line
/// endings unified to `\n`), matching Rust's string slicing semantics.
/// Sizes (`char_count`) are Unicode scalar values, never bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// The concrete strategy that produced this chunk. Never `auto`.
    pub chunking_strategy: ChunkingStrategy,
    /// Whether the chunk holds at least one fenced code span.
    pub contains_code: bool,
    /// Declared language of the first fenced code span, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<String>,
    /// Enclosing heading texts, outermost first.
    pub header_path: Vec<String>,
    /// Length of the content in characters.
    pub char_count: usize,
    /// Zero-based position of this chunk in the output sequence.
    pub chunk_index: usize,
    /// Byte offset where the content starts in the normalized document.
    pub start: usize,
    /// Byte offset where the content ends (exclusive).
    pub end: usize,
    /// 1-based line of the first content character.
    pub start_line: usize,
    /// 1-based line of the last content character.
    pub end_line: usize,
    /// Whether the chunk holds a pipe table.
    pub contains_table: bool,
    /// Set when a single atomic unit exceeded the configured maximum.
    pub oversized: bool,
    /// A code fence in the chunk was never closed and ran to the end of
    /// the document.
    #[serde(default)]
    pub unterminated_fence: bool,
    /// A table in the chunk has rows whose cell count differs from its
    /// header row.
    #[serde(default)]
    pub malformed_table: bool,
}

/// One bounded unit of output text.
///
/// Chunks are plain values: they are created fresh by every call, carry no
/// identity beyond their position and are never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, trimmed of surrounding whitespace. Never empty.
    pub content: String,
    /// Structural metadata.
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// The length of this chunk in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.metadata.char_count
    }

    /// Whether this chunk is empty. The engine never emits empty chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The byte span of this chunk in the normalized document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.metadata.start..self.metadata.end
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meta = &self.metadata;
        write!(
            f,
            "Chunk {{ index: {}, strategy: {}, span: {}..{}, chars: {}",
            meta.chunk_index, meta.chunking_strategy, meta.start, meta.end, meta.char_count
        )?;
        if !meta.header_path.is_empty() {
            write!(f, ", path: {}", meta.header_path.join(" > "))?;
        }
        if let Some(lang) = &meta.code_language {
            write!(f, ", code: {lang}")?;
        }
        if meta.oversized {
            f.write_str(", oversized")?;
        }
        f.write_str(" }")
    }
}
