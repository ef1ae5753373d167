//! Source file download

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::error::{Result, StudyError};

/// Retrieves the raw bytes of a document's source file
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Connection timeout (default: 10 seconds)
    pub connect_timeout: Duration,
    /// Request timeout (default: 30 seconds)
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP fetcher for downloading source PDFs
///
/// A single failed attempt is terminal for the document this cycle; there
/// are no retries. Transient failures surface as `error` status until the
/// document is externally reset.
pub struct HttpContentFetcher {
    client: Client,
}

impl HttpContentFetcher {
    /// Create a fetcher with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher with custom timeouts
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StudyError::Fetch {
                url: "client_init".to_string(),
                source: e,
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading source file: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StudyError::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudyError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| StudyError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        Ok(bytes.to_vec())
    }
}
