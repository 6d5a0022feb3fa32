//! The chunking engine: normalize, scan, segment, pack.

use crate::config::{ChunkingStrategy, EngineConfig};
use crate::error::Result;
use crate::normalize::normalize_line_endings;
use crate::pack::Packer;
use crate::scan::scan;
use crate::strategy::{resolve, splitter_for};
use crate::{Chunk, Chunker};

/// Markdown-aware chunking engine.
///
/// The configuration is fixed at construction; every call is an independent
/// pure transformation, so one engine can be shared across threads.
///
/// ## Example
///
/// ```rust
/// use mdslabs::{ChunkingEngine, ChunkingStrategy, EngineConfig};
///
/// let engine = ChunkingEngine::new(EngineConfig::default().with_max_chunk_size(200)).unwrap();
/// let chunks = engine.process_content("# Guide\n## Install\nRun the installer.");
///
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].metadata.header_path, ["Guide", "Install"]);
/// assert_eq!(chunks[0].metadata.chunking_strategy, ChunkingStrategy::HeaderBased);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChunkingEngine {
    config: EngineConfig,
}

impl ChunkingEngine {
    /// Create an engine from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`](crate::Error::InvalidChunkSize)
    /// if `max_chunk_size == 0`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// An `auto` engine: header sections for Markdown, size-only otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size == 0`.
    #[must_use]
    pub fn markdown(max_chunk_size: usize) -> Self {
        Self::with_strategy(ChunkingStrategy::Auto, max_chunk_size)
    }

    /// A size-based engine for unstructured prose.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size == 0`.
    #[must_use]
    pub fn prose(max_chunk_size: usize) -> Self {
        Self::with_strategy(ChunkingStrategy::SizeBased, max_chunk_size)
    }

    /// An engine with an explicit strategy.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size == 0`.
    #[must_use]
    pub fn with_strategy(strategy: ChunkingStrategy, max_chunk_size: usize) -> Self {
        assert!(max_chunk_size > 0, "max_chunk_size must be > 0");
        Self {
            config: EngineConfig {
                chunking_strategy: strategy,
                max_chunk_size,
            },
        }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Split text into ordered chunks.
    ///
    /// Never fails: malformed Markdown degrades to simpler segmentation.
    /// Returns an empty `Vec` exactly when the input is empty or whitespace.
    #[must_use]
    pub fn process_content(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let normalized = normalize_line_endings(text);
        let doc = scan(&normalized);
        let strategy = resolve(self.config.chunking_strategy, &doc);

        let segments = splitter_for(strategy).split(&doc);
        let mut packer = Packer::new(&doc, self.config.max_chunk_size, strategy);
        for segment in &segments {
            packer.pack(segment);
        }
        let chunks = packer.finish();

        tracing::debug!(
            strategy = %strategy,
            bytes = normalized.len(),
            blocks = doc.blocks().len(),
            tables = doc.table_count(),
            segments = segments.len(),
            chunks = chunks.len(),
            "chunked document"
        );
        chunks
    }

    /// Split raw bytes, which must be UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if the
    /// bytes are not valid UTF-8.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<Vec<Chunk>> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.process_content(text))
    }
}

impl Chunker for ChunkingEngine {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.process_content(text)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.config.max_chunk_size).max(1)
    }
}
