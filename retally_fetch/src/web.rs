use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{FetchError, Result};
use crate::retry::retry_with_backoff;
use crate::TextSource;

/// Web fetcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout (seconds)
    #[serde(default = "FetchConfig::default_timeout")]
    pub timeout: u64,

    /// User-Agent header
    #[serde(default = "FetchConfig::default_user_agent")]
    pub user_agent: String,

    /// Maximum response size (bytes)
    #[serde(default = "FetchConfig::default_max_size")]
    pub max_size: usize,

    /// Seconds to wait before each retry of a transient failure
    #[serde(default)]
    pub retry_delays: Vec<u64>,
}

impl FetchConfig {
    const fn default_timeout() -> u64 {
        30
    }

    fn default_user_agent() -> String {
        format!("Mozilla/5.0 (compatible; retally/{})", env!("CARGO_PKG_VERSION"))
    }

    const fn default_max_size() -> usize {
        10_000_000 // 10MB
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            max_size: Self::default_max_size(),
            retry_delays: Vec::new(),
        }
    }
}

/// Parse `url` and accept only http and https.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    Ok(parsed)
}

/// Fetches pages over HTTP and decodes them as (lossy) UTF-8.
pub struct WebFetcher {
    client: Client,
    config: FetchConfig,
}

impl WebFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &Url) -> Result<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(size) = response.content_length() {
            self.check_size(size)?;
        }

        let bytes = response.bytes().await?;
        self.check_size(bytes.len() as u64)?;

        info!("Fetched {} bytes from {url}", bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.config.max_size as u64 {
            return Err(FetchError::TooLarge {
                size,
                max: self.config.max_size,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TextSource for WebFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = validate_url(url)?;
        retry_with_backoff(
            || self.fetch_once(&url),
            &self.config.retry_delays,
            FetchError::is_transient,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.max_size, 10_000_000);
        assert!(config.user_agent.contains("retally"));
        assert!(config.retry_delays.is_empty());
    }

    #[test]
    fn test_fetch_config_partial_json() {
        let config: FetchConfig = serde_json::from_str(r#"{"timeout": 5, "retry_delays": [1, 2]}"#).unwrap();
        assert_eq!(config.timeout, 5);
        assert_eq!(config.retry_delays, [1, 2]);
        assert_eq!(config.max_size, FetchConfig::default().max_size);
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://en.wikipedia.org/wiki/Rust").is_ok());
        assert!(matches!(
            validate_url("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(FetchError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_web_fetcher_new() {
        assert!(WebFetcher::new(FetchConfig::default()).is_ok());
    }

    #[test]
    fn test_size_limit() {
        let Ok(fetcher) = WebFetcher::new(FetchConfig {
            max_size: 10,
            ..FetchConfig::default()
        }) else {
            panic!("Failed to create WebFetcher");
        };
        assert!(fetcher.check_size(10).is_ok());
        assert!(matches!(
            fetcher.check_size(11),
            Err(FetchError::TooLarge { size: 11, max: 10 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_scheme_without_network() {
        let Ok(fetcher) = WebFetcher::new(FetchConfig::default()) else {
            panic!("Failed to create WebFetcher");
        };
        let err = fetcher.fetch_text("file:///etc/passwd").await.unwrap_err();
        assert!(!err.is_transient());
    }
}
