// src/edgar/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value written for fields a schema variant does not carry.
pub const NOT_APPLICABLE: &str = "n/a";

/// One historical filing from the filer-search results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingReference {
    pub position: usize,        // 1 = most recent
    pub form_type: String,      // e.g., "13F-HR"
    pub filing_date: Option<NaiveDate>,
    pub index_link: String,     // Relative link to the filing's document index page
}

/// A (document type label, link) row scraped from a filing index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub doc_type: String,
    pub link: String,
}

/// A single flattened row of a 13F information table.
///
/// Field order and renames define the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    #[serde(rename = "Name of Issuer")]
    pub name_of_issuer: String,
    #[serde(rename = "Title of Class")]
    pub title_of_class: String,
    #[serde(rename = "Cusip")]
    pub cusip: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "SSH Prnamt")]
    pub ssh_prnamt: String,
    #[serde(rename = "SSH Prnamt Type")]
    pub ssh_prnamt_type: String,
    #[serde(rename = "Put Call")]
    pub put_call: String,
    #[serde(rename = "Investment Discretion")]
    pub investment_discretion: String,
    #[serde(rename = "Other Manager")]
    pub other_manager: String,
    #[serde(rename = "Voting Sole")]
    pub voting_sole: String,
    #[serde(rename = "Voting Shared")]
    pub voting_shared: String,
    #[serde(rename = "Voting None")]
    pub voting_none: String,
}

impl HoldingRecord {
    pub const HEADERS: [&'static str; 12] = [
        "Name of Issuer",
        "Title of Class",
        "Cusip",
        "Value",
        "SSH Prnamt",
        "SSH Prnamt Type",
        "Put Call",
        "Investment Discretion",
        "Other Manager",
        "Voting Sole",
        "Voting Shared",
        "Voting None",
    ];
}
