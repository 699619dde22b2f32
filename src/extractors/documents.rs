// src/extractors/documents.rs
//! Filing index page scraping and INFORMATION TABLE selection.

use crate::edgar::models::DocumentEntry;
use crate::extractors::filings::cell_text;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Class marking the document table on a filing index page.
pub const DOCUMENT_TABLE_CLASS: &str = "tableFile";
/// Label marker of the holdings document.
pub const INFORMATION_TABLE: &str = "INFORMATION TABLE";

static DOCUMENT_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".tableFile").expect("Failed to compile DOCUMENT_TABLE_SELECTOR")
});
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR")
});

/// Label → link mapping of one filing's documents.
///
/// Inserting an existing label replaces its link but keeps its original slot.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    entries: Vec<DocumentEntry>,
    by_label: HashMap<String, usize>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, doc_type: String, link: String) {
        match self.by_label.get(&doc_type) {
            Some(&slot) => {
                tracing::trace!("Replacing link for '{}': {} -> {}", doc_type, self.entries[slot].link, link);
                self.entries[slot].link = link;
            }
            None => {
                self.by_label.insert(doc_type.clone(), self.entries.len());
                self.entries.push(DocumentEntry { doc_type, link });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Picks the information table document.
    ///
    /// Labels are matched by case-sensitive substring. An exact
    /// `INFORMATION TABLE` label wins over other matches; several non-exact
    /// matches are rejected as ambiguous.
    pub fn information_table(&self) -> Result<&DocumentEntry, ExtractError> {
        if let Some(exact) = self.entries.iter().find(|e| e.doc_type == INFORMATION_TABLE) {
            return Ok(exact);
        }

        let candidates: Vec<&DocumentEntry> = self
            .entries
            .iter()
            .filter(|e| e.doc_type.contains(INFORMATION_TABLE))
            .collect();

        match candidates.as_slice() {
            [] => Err(ExtractError::InformationTableNotFound),
            [single] => Ok(*single),
            many => Err(ExtractError::AmbiguousInformationTable(
                many.iter().map(|e| e.doc_type.clone()).collect(),
            )),
        }
    }
}

/// Builds the document index from the `tableFile` table of a filing index page.
///
/// Columns are: sequence, description, document (link), type, size.
pub fn parse_document_index(html: &str) -> Result<DocumentIndex, ExtractError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&DOCUMENT_TABLE_SELECTOR)
        .next()
        .ok_or(ExtractError::TableNotFound(DOCUMENT_TABLE_CLASS))?;

    let mut index = DocumentIndex::new();
    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < 4 {
            continue; // Header row or truncated row
        }
        let Some(link) = cells[2]
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            tracing::debug!("Skipping document row without a link: '{}'", cell_text(&cells[3]));
            continue;
        };
        index.insert(cell_text(&cells[3]), link.to_string());
    }

    tracing::debug!("Parsed {} document types from filing index", index.len());
    Ok(index)
}
