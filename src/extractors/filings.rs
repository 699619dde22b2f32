// src/extractors/filings.rs
//! Scrapes the filer-search results page into ordered filing references.

use crate::edgar::models::FilingReference;
use crate::utils::error::ExtractError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Class marking the results table on the filer-search page.
pub const FILING_TABLE_CLASS: &str = "tableFile2";

static FILING_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".tableFile2").expect("Failed to compile FILING_TABLE_SELECTOR")
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

/// Extracts one reference per data row of the results table, most recent first.
///
/// Columns are: form type, document links, description, filing date, file number.
pub fn parse_filing_list(html: &str) -> Result<Vec<FilingReference>, ExtractError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&FILING_TABLE_SELECTOR)
        .next()
        .ok_or(ExtractError::TableNotFound(FILING_TABLE_CLASS))?;

    let mut filings = Vec::new();
    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
        if cells.is_empty() {
            continue; // Header row (th cells only)
        }

        let Some(link) = cells
            .get(1)
            .and_then(|cell| cell.select(&LINK_SELECTOR).next())
            .and_then(|a| a.value().attr("href"))
        else {
            tracing::warn!("Skipping filing row without a document link: '{}'", cell_text(&cells[0]));
            continue;
        };

        let form_type = cell_text(&cells[0]);
        let filing_date = cells
            .get(3)
            .and_then(|cell| NaiveDate::parse_from_str(&cell_text(cell), "%Y-%m-%d").ok());

        let reference = FilingReference {
            position: filings.len() + 1,
            form_type,
            filing_date,
            index_link: link.to_string(),
        };
        tracing::trace!("Filing #{}: {} {:?} -> {}", reference.position, reference.form_type, reference.filing_date, reference.index_link);
        filings.push(reference);
    }

    tracing::debug!("Parsed {} filings from results table", filings.len());
    Ok(filings)
}

pub(crate) fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
