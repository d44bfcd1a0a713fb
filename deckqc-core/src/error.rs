use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for deck processing.
///
/// The parsers themselves never fail: malformed input degrades to "no
/// sections found" or "no tables found" and is surfaced here only at the
/// assembly boundary, so callers get one clear failure point per deck.
#[derive(Debug, Error)]
pub enum DeckError {
    /// The deck produced no named sections (empty file, or no recognized
    /// keyword header anywhere in it).
    #[error("deck '{deck}' contains no recognized sections")]
    EmptyDeck { deck: String },

    #[error("failed to read deck file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load QC config from {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, DeckError>;
