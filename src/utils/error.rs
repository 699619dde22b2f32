// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Could not reach {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Client build / body read failures

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 Internal Server Error

    #[error("SEC rejected the request (403), check User-Agent and rate limits")]
    RateLimited,

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Expected table '.{0}' not found in page")]
    TableNotFound(&'static str),

    #[error("Could not find INFORMATION TABLE for this ticker")]
    InformationTableNotFound,

    #[error("Ambiguous INFORMATION TABLE, several documents match: {0:?}")]
    AmbiguousInformationTable(Vec<String>),

    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Accessing document that is not recent enough (requested #{requested}, {available} filings available)")]
    NotRecentEnough { requested: usize, available: usize },

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Process exit code reported by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        // Every handled failure path exits with 1.
        1
    }
}
