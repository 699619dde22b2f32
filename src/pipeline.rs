// src/pipeline.rs
//! filer search -> filing index -> information table -> holdings.

use crate::edgar::client::DocumentSource;
use crate::edgar::models::{FilingReference, HoldingRecord};
use crate::extractors::{parse_document_index, parse_filing_list, parse_information_table};
use crate::utils::config::EdgarConfig;
use crate::utils::error::AppError;
use reqwest::Url;

pub struct HoldingsPipeline<'a, S> {
    source: &'a S,
    config: &'a EdgarConfig,
}

impl<'a, S: DocumentSource> HoldingsPipeline<'a, S> {
    pub fn new(source: &'a S, config: &'a EdgarConfig) -> Self {
        Self { source, config }
    }

    /// Lists the fund's filings, most recent first.
    pub async fn list_filings(&self, identifier: &str) -> Result<Vec<FilingReference>, AppError> {
        let url = self.config.filing_search_url(identifier);
        tracing::info!("Searching {} filings for {}", self.config.form_type, identifier);

        let html = self.source.fetch(&url).await?;
        let filings = parse_filing_list(&html)?;

        tracing::info!("Found {} filings for {}", filings.len(), identifier);
        Ok(filings)
    }

    /// Resolves the information table link of the filing at `recent` (1 = most recent).
    pub async fn resolve_information_table(&self, filings: &[FilingReference], recent: usize) -> Result<Url, AppError> {
        let filing = select_filing(filings, recent)?;
        tracing::info!(
            "Using filing #{} ({}, filed {})",
            filing.position,
            filing.form_type,
            filing.filing_date.map_or_else(|| "unknown".to_string(), |d| d.to_string())
        );

        let index_url = self.config.resolve_link(&filing.index_link)?;
        let html = self.source.fetch(&index_url).await?;
        let index = parse_document_index(&html)?;
        tracing::debug!(
            "Document types: {:?}",
            index.entries().iter().map(|e| e.doc_type.as_str()).collect::<Vec<_>>()
        );

        let entry = index.information_table()?;
        let url = self.config.resolve_link(&entry.link)?;
        tracing::info!("Resolved '{}' to {}", entry.doc_type, url);
        Ok(url)
    }

    /// Downloads and flattens the information table.
    pub async fn fetch_holdings(&self, url: &Url) -> Result<Vec<HoldingRecord>, AppError> {
        let xml = self.source.fetch(url).await?;
        Ok(parse_information_table(&xml)?)
    }

    /// Runs every stage for one fund. Nothing is written here.
    pub async fn run(&self, identifier: &str, recent: usize) -> Result<Vec<HoldingRecord>, AppError> {
        let filings = self.list_filings(identifier).await?;
        let url = self.resolve_information_table(&filings, recent).await?;
        self.fetch_holdings(&url).await
    }
}

/// Picks filing `recent` (1-based). Zero or past the end is out of range.
pub fn select_filing(filings: &[FilingReference], recent: usize) -> Result<&FilingReference, AppError> {
    recent
        .checked_sub(1)
        .and_then(|idx| filings.get(idx))
        .ok_or(AppError::NotRecentEnough { requested: recent, available: filings.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::models::NOT_APPLICABLE;
    use crate::utils::error::{EdgarError, ExtractError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages keyed by full URL and records every request.
    #[derive(Default)]
    struct CannedSource {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl CannedSource {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl DocumentSource for CannedSource {
        async fn fetch(&self, url: &Url) -> Result<String, EdgarError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| EdgarError::NotFound(url.to_string()))
        }
    }

    const SEARCH_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK=BRK&type=13f&count=100";

    const SEARCH_HTML: &str = r#"
        <table class="tableFile2">
          <tr><th>Filings</th><th>Format</th><th>Description</th><th>Filing Date</th><th>File/Film Number</th></tr>
          <tr><td>13F-HR</td><td><a href="/Archives/edgar/data/1/q4-index.htm">Documents</a></td><td></td><td>2024-02-14</td><td></td></tr>
          <tr><td>13F-HR</td><td><a href="/Archives/edgar/data/1/q3-index.htm">Documents</a></td><td></td><td>2023-11-14</td><td></td></tr>
        </table>
    "#;

    const Q4_INDEX_HTML: &str = r#"
        <table class="tableFile">
          <tr><th>Seq</th><th>Description</th><th>Document</th><th>Type</th><th>Size</th></tr>
          <tr><td>1</td><td></td><td><a href="/Archives/edgar/data/1/primary_doc.xml">primary_doc.xml</a></td><td>13F-HR</td><td>1</td></tr>
          <tr><td>2</td><td></td><td><a href="/Archives/edgar/data/1/xslForm13F_X02/q4.xml">q4.html</a></td><td>INFORMATION TABLE</td><td></td></tr>
          <tr><td>2</td><td></td><td><a href="/Archives/edgar/data/1/q4.xml">q4.xml</a></td><td>INFORMATION TABLE</td><td>2</td></tr>
        </table>
    "#;

    const Q3_INDEX_HTML: &str = r#"
        <table class="tableFile">
          <tr><td>1</td><td></td><td><a href="/Archives/edgar/data/1/q3.xml">q3.xml</a></td><td>INFORMATION TABLE</td><td>2</td></tr>
        </table>
    "#;

    const Q4_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<informationTable xmlns="http://www.sec.gov/edgar/document/thirteenf/informationtable">
  <infoTable>
    <nameOfIssuer>APPLE INC</nameOfIssuer><titleOfClass>COM</titleOfClass><cusip>037833100</cusip><value>174347</value>
    <shrsOrPrnAmt><sshPrnamt>915560382</sshPrnamt><sshPrnamtType>SH</sshPrnamtType></shrsOrPrnAmt>
    <investmentDiscretion>DFND</investmentDiscretion><otherManager>4,8,11</otherManager>
    <votingAuthority><Sole>915560382</Sole><Shared>0</Shared><None>0</None></votingAuthority>
  </infoTable>
  <infoTable><nameOfIssuer>TRUNCATED</nameOfIssuer></infoTable>
</informationTable>"#;

    const Q3_XML: &str = r#"<informationTable>
  <infoTable>
    <nameOfIssuer>COCA COLA CO</nameOfIssuer><titleOfClass>COM</titleOfClass><cusip>191216100</cusip><value>23640</value>
    <shrsOrPrnAmt><sshPrnamt>400000000</sshPrnamt><sshPrnamtType>SH</sshPrnamtType></shrsOrPrnAmt>
    <investmentDiscretion>DFND</investmentDiscretion>
    <votingAuthority><Sole>400000000</Sole><Shared>0</Shared><None>0</None></votingAuthority>
  </infoTable>
</informationTable>"#;

    fn edgar_site() -> CannedSource {
        CannedSource::default()
            .with(SEARCH_URL, SEARCH_HTML)
            .with("https://www.sec.gov/Archives/edgar/data/1/q4-index.htm", Q4_INDEX_HTML)
            .with("https://www.sec.gov/Archives/edgar/data/1/q3-index.htm", Q3_INDEX_HTML)
            .with("https://www.sec.gov/Archives/edgar/data/1/q4.xml", Q4_XML)
            .with("https://www.sec.gov/Archives/edgar/data/1/q3.xml", Q3_XML)
    }

    #[test]
    fn test_most_recent_filing_by_default() {
        let source = edgar_site();
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let records = tokio_test::block_on(pipeline.run("BRK", 1)).unwrap();

        assert_eq!(records.len(), 1, "truncated member should be skipped");
        assert_eq!(records[0].name_of_issuer, "APPLE INC");
        assert_eq!(records[0].other_manager, "4,8,11");
        assert_eq!(records[0].put_call, NOT_APPLICABLE);
        assert_eq!(
            source.requests(),
            vec![
                SEARCH_URL.to_string(),
                "https://www.sec.gov/Archives/edgar/data/1/q4-index.htm".to_string(),
                "https://www.sec.gov/Archives/edgar/data/1/q4.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_second_most_recent_filing() {
        let source = edgar_site();
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let records = tokio_test::block_on(pipeline.run("BRK", 2)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name_of_issuer, "COCA COLA CO");
        assert_eq!(records[0].other_manager, NOT_APPLICABLE);
    }

    #[test]
    fn test_not_recent_enough_fails_before_fetching_index() {
        let source = edgar_site();
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let err = tokio_test::block_on(pipeline.run("BRK", 3)).unwrap_err();

        assert!(matches!(err, AppError::NotRecentEnough { requested: 3, available: 2 }));
        assert_eq!(source.requests(), vec![SEARCH_URL.to_string()]);
    }

    #[test]
    fn test_missing_information_table_stops_pipeline() {
        let source = edgar_site().with(
            "https://www.sec.gov/Archives/edgar/data/1/q4-index.htm",
            r#"<table class="tableFile"><tr><td>1</td><td></td><td><a href="/p.xml">p.xml</a></td><td>13F-HR</td></tr></table>"#,
        );
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let err = tokio_test::block_on(pipeline.run("BRK", 1)).unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractError::InformationTableNotFound)));
        assert_eq!(source.requests().len(), 2, "holdings document must not be fetched");
    }

    #[test]
    fn test_unexpected_search_page_is_parse_error() {
        let source = CannedSource::default().with(SEARCH_URL, "<html><body>No matching CIK.</body></html>");
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let err = tokio_test::block_on(pipeline.list_filings("BRK")).unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractError::TableNotFound("tableFile2"))));
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let source = CannedSource::default();
        let config = EdgarConfig::default();
        let pipeline = HoldingsPipeline::new(&source, &config);

        let err = tokio_test::block_on(pipeline.run("BRK", 1)).unwrap_err();

        assert!(matches!(err, AppError::Edgar(EdgarError::NotFound(_))));
    }

    #[test]
    fn test_select_filing_bounds() {
        let filings = vec![
            FilingReference { position: 1, form_type: "13F-HR".into(), filing_date: None, index_link: "/a".into() },
            FilingReference { position: 2, form_type: "13F-HR".into(), filing_date: None, index_link: "/b".into() },
        ];

        assert_eq!(select_filing(&filings, 1).unwrap().index_link, "/a");
        assert_eq!(select_filing(&filings, 2).unwrap().index_link, "/b");
        assert!(matches!(select_filing(&filings, 0), Err(AppError::NotRecentEnough { .. })));
        assert!(matches!(select_filing(&filings, 3), Err(AppError::NotRecentEnough { .. })));
        assert!(matches!(select_filing(&[], 1), Err(AppError::NotRecentEnough { available: 0, .. })));
    }
}
