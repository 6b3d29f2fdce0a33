//! Error type shared by every layer of the engine.

use thiserror::Error;

/// Contract violations surfaced by the engine.
///
/// None of these are transient: the algorithm is deterministic, so every
/// error points at malformed input or an invalid parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("dimension mismatch: chunk of length {left} compared with chunk of length {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("ragged document: chunk {chunk} has {found} dimensions, expected {expected}")]
    RaggedDocument {
        chunk: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-finite value in chunk {chunk}, dimension {dimension}")]
    NonFiniteValue { chunk: usize, dimension: usize },

    #[error("window too small: window size must be at least 1")]
    WindowTooSmall,

    #[error("window out of bounds: chunk {index} has no predecessor at offset {offset}")]
    WindowOutOfBounds { index: usize, offset: usize },

    #[error("index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("undefined correlation: need at least 2 nonzero dimensions, got {nonzero}")]
    UndefinedCorrelation { nonzero: usize },

    #[error("undefined correlation: ranks are constant in at least one vector")]
    ConstantRanks,

    #[error("two-sample test needs two non-empty samples")]
    EmptySample,

    #[error("corpus mismatch: {documents} documents but {authors} authors")]
    CorpusMismatch { documents: usize, authors: usize },
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
