#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Text sources for the extraction commands: an HTTP fetcher and a
//! markup-to-plain-text converter.

pub mod error;
pub mod html;
pub mod retry;
pub mod web;

pub use error::{FetchError, Result};
pub use html::html_to_text;
pub use retry::retry_with_backoff;
pub use web::{FetchConfig, WebFetcher, validate_url};

use async_trait::async_trait;

/// Something that can turn a URL into decoded text.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
