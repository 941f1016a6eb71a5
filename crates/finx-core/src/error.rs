//! Error types for the finx-core library.

use thiserror::Error;

/// Main error type for the finx library.
#[derive(Error, Debug)]
pub enum FinxError {
    /// Uploaded document could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Field extraction setup or lookup failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning raw upload bytes into grids or text lines.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The spreadsheet container could not be opened or a sheet could not be read.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// The CSV payload was malformed.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Nothing was uploaded.
    #[error("document is empty")]
    Empty,
}

/// Errors related to extractor construction and profile lookup.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A configured label produced an invalid pattern.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },

    /// The requested invoice profile is not configured.
    #[error("unknown invoice profile: {0}")]
    UnknownProfile(String),

    /// A running total left the range of the money type.
    #[error("{0} total is too large")]
    Overflow(String),
}

/// Result type for the finx library.
pub type Result<T> = std::result::Result<T, FinxError>;
