//! Error types for newsworthy operations.

use thiserror::Error;

/// Errors that can occur while editing, importing or exporting a page.
#[derive(Error, Debug)]
pub enum Error {
    /// The natural dimensions of an image could not be determined.
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// None of the accepted video URL shapes matched.
    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(String),

    /// A block-adding operation was called without a selected section.
    #[error("No section selected")]
    NoSectionSelected,

    /// A transient asset could not be converted to a durable encoding.
    #[error("Failed to externalize asset: {0}")]
    AssetExternalize(String),

    /// The HTML input could not be read as text.
    #[error("Failed to parse HTML content: {0}")]
    DecodeParse(String),

    /// Serialized sections were neither a JSON string nor an array of sections.
    #[error("Invalid document format: {0}")]
    LoadFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
