use thiserror::Error;

use crate::ollama::client::OllamaError;

/// Failures scoped to a single document. The run loop reports these and moves
/// on to the next document; only the exit status remembers them.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file is empty")]
    Empty,
    #[error("read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("chunk {index} summarization failed: {source}")]
    Chunk {
        index: usize,
        #[source]
        source: OllamaError,
    },
    #[error("final summary failed: {0}")]
    Merge(#[source] OllamaError),
    #[error("write summary: {0}")]
    Write(#[source] std::io::Error),
}

/// No usable model could be resolved. Unlike [`DocumentError`] this halts the
/// whole run before any document is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelSelectionError {
    #[error("no preferred models configured")]
    NoPreferredModels,
}
