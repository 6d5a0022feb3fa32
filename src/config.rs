//! Engine configuration.
//!
//! An [`EngineConfig`] is built once and never changes afterwards. It can be
//! assembled in code or loaded from TOML:
//!
//! ```toml
//! chunking_strategy = "header-based"
//! max_chunk_size = 1200
//! ```
//!
//! Missing keys fall back to [`EngineConfig::default`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default chunk ceiling in characters (~512 tokens at ~4 chars/token).
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2048;

/// Which segmentation algorithm the engine runs.
///
/// `Auto` is only a selector: every emitted chunk records the concrete
/// strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingStrategy {
    /// Header-based when the document has headings, size-based otherwise.
    #[default]
    Auto,
    /// One segment per heading section.
    HeaderBased,
    /// The whole document is one segment, split only by size.
    SizeBased,
    /// Each fenced code span is isolated in its own segment.
    CodeAware,
}

impl ChunkingStrategy {
    /// All strategies, `Auto` first.
    pub const ALL: [ChunkingStrategy; 4] = [
        Self::Auto,
        Self::HeaderBased,
        Self::SizeBased,
        Self::CodeAware,
    ];

    /// The kebab-case tag used in configuration and chunk metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::HeaderBased => "header-based",
            Self::SizeBased => "size-based",
            Self::CodeAware => "code-aware",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == tag)
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

/// Configuration for a [`ChunkingEngine`](crate::ChunkingEngine).
///
/// # Examples
///
/// ```rust
/// use mdslabs::{ChunkingStrategy, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_strategy(ChunkingStrategy::SizeBased)
///     .with_max_chunk_size(500);
/// assert!(config.validate().is_ok());
///
/// let config = EngineConfig::from_toml_str("chunking_strategy = \"code-aware\"").unwrap();
/// assert_eq!(config.chunking_strategy, ChunkingStrategy::CodeAware);
/// assert_eq!(config.max_chunk_size, mdslabs::DEFAULT_MAX_CHUNK_SIZE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Segmentation algorithm.
    pub chunking_strategy: ChunkingStrategy,
    /// Maximum chunk length in characters (Unicode scalar values).
    pub max_chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunking_strategy: ChunkingStrategy::Auto,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl EngineConfig {
    /// Replace the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ChunkingStrategy) -> Self {
        self.chunking_strategy = strategy;
        self
    }

    /// Replace the maximum chunk size.
    #[must_use]
    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    /// Check that the configuration can drive an engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `max_chunk_size == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.max_chunk_size));
        }
        Ok(())
    }

    /// Parse and validate a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid TOML or names
    /// an unknown strategy, and [`Error::InvalidChunkSize`] if it sets a
    /// zero size.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
