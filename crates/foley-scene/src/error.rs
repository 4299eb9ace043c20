//! Error types for caching and scene orchestration.

use thiserror::Error;

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors from the content cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Synthesis failed for a cache miss.
    #[error("synthesis failed: {0}")]
    Synth(#[from] foley_synth::SynthError),

    /// I/O error reading or writing the cache directory.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the scene orchestrator and scene table.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The requested scene name is not in the table.
    #[error("unknown scene '{name}'")]
    UnknownScene {
        /// The requested name.
        name: String,
    },

    /// Neither a valid file nor a derivable prompt produced a bed.
    #[error("no bed source could be resolved for scene '{name}'")]
    BedUnresolved {
        /// The scene whose bed failed to resolve.
        name: String,
    },

    /// An operation that needs an active scene was called while idle.
    #[error("no active scene")]
    NoActiveScene,

    /// Cache failure surfaced to the caller.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Scene table could not be read.
    #[error("failed to read scene table: {0}")]
    Io(#[from] std::io::Error),

    /// Scene table could not be parsed.
    #[error("failed to parse scene table: {0}")]
    Parse(#[from] serde_json::Error),
}
