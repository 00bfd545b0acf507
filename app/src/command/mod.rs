//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input struct, so
//! dispatch in `main` is fully static.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use retally_config::{Config, PresetConfig, Presets};
use retally_core::{GroupId, Pattern, RankedList};
use retally_fetch::{TextSource, WebFetcher, html_to_text};
use tokio::io::AsyncReadExt;
use tracing::info;

mod check;
mod domains;
mod extract;
mod info;
mod init;
mod reformat;
mod version;
mod years;

pub use check::{CheckInput, CheckStrategy};
pub use domains::{DomainsInput, DomainsStrategy};
pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use reformat::{ReformatInput, ReformatStrategy};
pub use version::VersionStrategy;
pub use years::{YearsInput, YearsStrategy};

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// How list-like results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub limit: Option<usize>,
    pub json: bool,
}

impl Output {
    fn ranked(self, out: &mut impl Write, list: RankedList) -> anyhow::Result<()> {
        let list = match self.limit {
            Some(n) => list.top(n),
            None => list,
        };

        if self.json {
            serde_json::to_writer_pretty(&mut *out, &list)?;
            writeln!(out)?;
        } else {
            for entry in &list {
                writeln!(out, "{} {}", entry.value, entry.count)?;
            }
        }
        Ok(())
    }

    fn values<S: AsRef<str>>(self, out: &mut impl Write, values: &[S]) -> anyhow::Result<()> {
        let values = &values[..self.limit.map_or(values.len(), |n| n.min(values.len()))];

        if self.json {
            let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
            serde_json::to_writer_pretty(&mut *out, &values)?;
            writeln!(out)?;
        } else {
            for value in values {
                writeln!(out, "{}", value.as_ref())?;
            }
        }
        Ok(())
    }
}

/// Where a command reads its input text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    Text(String),
    Url { url: String, strip_html: bool },
}

impl Source {
    async fn read(self, config: &Config) -> anyhow::Result<String> {
        match self {
            Self::Url { .. } => {
                let fetcher = WebFetcher::new(config.fetch.clone())?;
                self.read_with(&fetcher).await
            }
            other => other.read_local().await,
        }
    }

    async fn read_with(self, fetcher: &dyn TextSource) -> anyhow::Result<String> {
        match self {
            Self::Url { url, strip_html } => fetch_page(fetcher, &url, strip_html).await,
            other => other.read_local().await,
        }
    }

    async fn read_local(self) -> anyhow::Result<String> {
        match self {
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("Failed to read stdin")?;
                Ok(text)
            }
            Self::File(path) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            Self::Text(text) => Ok(text),
            Self::Url { url, .. } => anyhow::bail!("{url} is not a local source"),
        }
    }
}

/// Fetch `url` and optionally reduce the markup to its visible text.
async fn fetch_page(fetcher: &dyn TextSource, url: &str, strip_html: bool) -> anyhow::Result<String> {
    info!("Fetching {url}");
    let markup = fetcher
        .fetch_text(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    Ok(if strip_html {
        html_to_text(&markup)
    } else {
        markup
    })
}

fn preset<'c>(config: &'c Config, name: &str) -> anyhow::Result<&'c PresetConfig> {
    config.presets.get(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown preset `{name}` (expected one of: {})",
            Presets::NAMES.join(", ")
        )
    })
}

fn compile(source: &str) -> anyhow::Result<Pattern> {
    Ok(Pattern::new(source)?)
}

/// Check a user-supplied group selector against the pattern up front.
fn group<'a>(pattern: &Pattern, selector: Option<&'a str>) -> anyhow::Result<GroupId<'a>> {
    let group = selector.map_or(GroupId::Index(0), GroupId::parse);
    if !pattern.has_group(group) {
        anyhow::bail!("Pattern `{pattern}` has no group {group}");
    }
    Ok(group)
}
