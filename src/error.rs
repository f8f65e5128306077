//! Error types for unwiki library.

use std::io;
use thiserror::Error;

/// Result type alias for unwiki operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a collection.
///
/// Content anomalies (malformed embedded metadata, unknown macros,
/// unterminated macro arguments) are recovered where they occur and never
/// surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing rendered output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A manifest or site record could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store has no body for the requested article revision.
    #[error("Article not found: wiki {wiki}, revision {revision}")]
    ArticleNotFound {
        /// Owning wiki key
        wiki: usize,
        /// Revision id
        revision: u64,
    },

    /// The store has no site record for the requested wiki.
    #[error("Site information not found for wiki {0}")]
    SiteNotFound(usize),

    /// The bundle workspace is missing or malformed.
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// A rendering option is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
