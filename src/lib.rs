//! # mdslabs
//!
//! Markdown-aware text chunking for indexing pipelines.
//!
//! ## The Problem
//!
//! Retrieval systems embed and index documents in pieces ("chunks"). Plain
//! size-based splitting is fine for prose, but most documents fed to an
//! indexer are semi-structured: READMEs, API docs, crawled pages converted
//! to Markdown. Splitting those blindly produces chunks like:
//!
//! - half a code block, with the opening fence in one chunk and the body in
//!   the next
//! - a table whose header row is separated from its data
//! - a paragraph that has lost the heading telling you what it is about
//!
//! This crate scans the document's structure first and only splits where the
//! structure allows it.
//!
//! ## Pipeline
//!
//! ```text
//! text ─► normalize ─► scan ─► strategy ─► segments ─► pack ─► Vec<Chunk>
//!         \r\n → \n    headings   auto /      no chunk     size cap,
//!                      fences     header /    crosses a    boundary
//!                      tables     size /      segment      priority
//!                      paragraphs code-aware
//! ```
//!
//! ## Strategies
//!
//! ### Header-Based
//!
//! One segment per heading section. Every chunk carries its `header_path`,
//! the chain of enclosing headings:
//!
//! ```text
//! # Guide
//! ## Install          header_path = ["Guide", "Install"]
//! Run the installer.
//! ```
//!
//! ### Size-Based
//!
//! The whole document is one segment, packed up to the size cap. Paragraphs
//! that are too large are broken at line, then sentence, then word
//! boundaries (UAX #29), never inside a word.
//!
//! ### Code-Aware
//!
//! Every fenced code block becomes its own chunk; prose in between is packed
//! by size.
//!
//! ### Auto
//!
//! Header-based when the document has headings, size-based otherwise.
//!
//! ## Atomic Units
//!
//! Fenced code spans, tables and heading lines are never split. When one of
//! them alone exceeds the cap it is emitted whole and flagged `oversized`,
//! since a truncated code block is worse for retrieval than a large one.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdslabs::{ChunkingEngine, EngineConfig};
//!
//! let doc = "# Intro\nSome text.\n\n## Usage\n```python\nprint('hi')\n```";
//!
//! let engine = ChunkingEngine::new(EngineConfig::default()).unwrap();
//! for chunk in engine.process_content(doc) {
//!     println!("{chunk}");
//! }
//!
//! let usage = &engine.process_content(doc)[1];
//! assert_eq!(usage.metadata.header_path, ["Intro", "Usage"]);
//! assert_eq!(usage.metadata.code_language.as_deref(), Some("python"));
//! ```
//!
//! ## Sizes
//!
//! Sizes are counted in characters (Unicode scalar values), not bytes:
//! `"你好世界"` is 4 characters. Chunk boundaries always fall on character
//! and grapheme boundaries.
//!
//! ## Performance
//!
//! Scanning, segmentation and packing are each a single linear pass.
//! Decomposition recursion is bounded by the three boundary levels.

mod boundary;
mod chunk;
mod config;
mod engine;
mod error;
mod normalize;
mod pack;
mod scan;
mod strategy;

pub use chunk::{Chunk, ChunkMetadata};
pub use config::{ChunkingStrategy, EngineConfig, DEFAULT_MAX_CHUNK_SIZE};
pub use engine::ChunkingEngine;
pub use error::{Error, Result};
pub use normalize::normalize_line_endings;

/// A text chunking strategy.
///
/// Lets callers hold any chunker behind one interface:
///
/// ```rust
/// use mdslabs::{Chunk, Chunker, ChunkingEngine};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<Chunk> {
///     chunker.chunk(text)
/// }
///
/// let markdown = ChunkingEngine::markdown(500);
/// let prose = ChunkingEngine::prose(500);
///
/// let text = "# Title\nHello world. This is a test.";
/// let chunks1 = chunk_document(&markdown, text);
/// let chunks2 = chunk_document(&prose, text);
/// assert_eq!(chunks1[0].metadata.header_path, ["Title"]);
/// assert_eq!(chunks2[0].metadata.header_path, ["Title"]);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks, in document order.
    fn chunk(&self, text: &str) -> Vec<Chunk>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
