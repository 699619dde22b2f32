// src/extractors/mod.rs
// Page-structure extraction, kept free of network access.
pub mod documents;
pub mod filings;
pub mod holdings;

// Re-export key extraction types for convenience
pub use documents::parse_document_index;
pub use filings::parse_filing_list;
pub use holdings::parse_information_table;
