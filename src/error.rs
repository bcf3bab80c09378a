use thiserror::Error;

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Misuse of the pipeline by its caller.
///
/// Bad content never shows up here: malformed records are skipped by the
/// corpus adapter and dangling edges are dropped by the assembler.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("global pair cap must be at least 1, got {0}")]
    InvalidPairCap(usize),

    #[error("per-node fan-out cap must be at least 1, got {0}")]
    InvalidFanOutCap(usize),

    #[error("canvas dimensions must be positive and finite, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("layout iteration count must be at least 1")]
    ZeroIterations,

    #[error("invalid corpus JSON")]
    CorpusJson(#[from] serde_json::Error),
}
