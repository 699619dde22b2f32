// src/edgar/client.rs
use crate::utils::config::EdgarConfig;
use crate::utils::error::EdgarError;
use reqwest::{header, Url};

/// Anything that can hand back the body of an EDGAR page.
///
/// The pipeline only talks to EDGAR through this trait.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    async fn fetch(&self, url: &Url) -> Result<String, EdgarError>;
}

/// reqwest-backed [`DocumentSource`] configured for EDGAR interaction.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
}

impl EdgarClient {
    /// Creates a reqwest client with the User-Agent SEC requires.
    pub fn new(config: &EdgarConfig) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            // No timeout beyond transport defaults
            .build()?;
        tracing::debug!("Using User-Agent: {}", config.user_agent);
        Ok(Self { http })
    }
}

impl DocumentSource for EdgarClient {
    /// Downloads a page. A transport failure means the host is unreachable;
    /// non-2xx statuses are mapped to specific errors.
    async fn fetch(&self, url: &Url) -> Result<String, EdgarError> {
        tracing::debug!("Fetching: {}", url);

        let host = url.host_str().unwrap_or("EDGAR").to_string();
        let response = self.http.get(url.clone())
            // Filing index pages are HTML, the information table is XML
            .header(header::ACCEPT, "application/xml,text/html,text/plain,*/*")
            .send()
            .await
            .map_err(|source| EdgarError::Unreachable { host, source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::NotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}
