// src/utils/config.rs
use reqwest::Url;
use crate::utils::error::{AppError, EdgarError};

pub const DEFAULT_BASE_URL: &str = "https://www.sec.gov";
// SEC rejects anonymous agents; override with EDGAR_USER_AGENT for real runs.
pub const DEFAULT_USER_AGENT: &str = "thirteenf_extractor admin@example.com";
pub const DEFAULT_FORM_TYPE: &str = "13f";
pub const DEFAULT_MAX_RESULTS: u32 = 100;

pub const BASE_URL_ENV: &str = "EDGAR_BASE_URL";
pub const USER_AGENT_ENV: &str = "EDGAR_USER_AGENT";

/// Settings shared by every EDGAR request of a run.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// Host root that filing and document links are relative to.
    pub base_url: Url,
    pub user_agent: String,
    /// Form type passed to the filer search (`type=` query parameter).
    pub form_type: String,
    /// Maximum number of filings requested from the filer search (`count=`).
    pub max_results: u32,
}

impl EdgarConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        Ok(Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            form_type: DEFAULT_FORM_TYPE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    /// Builds the configuration from defaults, overridden by `EDGAR_BASE_URL`
    /// and `EDGAR_USER_AGENT` when they are set.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EdgarConfig::from_env`], reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base = get(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base)?;

        if let Some(agent) = get(USER_AGENT_ENV) {
            if agent.trim().is_empty() {
                return Err(AppError::Config(format!("{} is set but empty", USER_AGENT_ENV)));
            }
            tracing::debug!("Using User-Agent from {}", USER_AGENT_ENV);
            config.user_agent = agent;
        } else {
            tracing::warn!("{} not set, using default User-Agent '{}'", USER_AGENT_ENV, DEFAULT_USER_AGENT);
        }

        Ok(config)
    }

    /// Filer-search URL listing the fund's filings of the configured form type.
    pub fn filing_search_url(&self, identifier: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/cgi-bin/browse-edgar");
        url.query_pairs_mut()
            .clear()
            .append_pair("action", "getcompany")
            .append_pair("CIK", identifier)
            .append_pair("type", &self.form_type)
            .append_pair("count", &self.max_results.to_string());
        url
    }

    /// Resolves a link scraped from an EDGAR page against the host root.
    /// Absolute links are returned unchanged.
    pub fn resolve_link(&self, link: &str) -> Result<Url, EdgarError> {
        self.base_url
            .join(link)
            .map_err(|e| EdgarError::InvalidUrl(link.to_string(), e.to_string()))
    }
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            form_type: DEFAULT_FORM_TYPE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
