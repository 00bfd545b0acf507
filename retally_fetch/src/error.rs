use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme `{0}` (only http and https)")]
    UnsupportedScheme(String),

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("response too large: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: usize },
}

impl FetchError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidUrl { .. }
            | Self::UnsupportedScheme(_)
            | Self::Client(_)
            | Self::TooLarge { .. } => false,
        }
    }
}
