use anyhow::Context;
use retally_config::Config;
use retally_core::{GroupId, Pattern, RankedList, extract_values, rank};
use retally_fetch::{TextSource, WebFetcher};
use tracing::info;

use super::Output;

/// Input parameters for the Years command strategy.
#[derive(Debug, Clone, Default)]
pub struct YearsInput {
    /// Page to scan; falls back to the preset URL
    pub url: Option<String>,
    /// Pattern override; falls back to the preset pattern
    pub pattern: Option<String>,
    /// Skip the markup-to-text step
    pub raw: bool,
    pub output: Output,
}

/// Strategy for counting the years mentioned on a page.
///
/// Fetches the page, reduces it to visible text (unless `raw`), extracts
/// every year and prints them by descending frequency.
///
/// The `raw` variant matches against the markup itself, so years inside
/// attributes and scripts are counted too and the totals differ.
#[derive(Debug, Clone, Copy)]
pub struct YearsStrategy;

impl super::CommandStrategy for YearsStrategy {
    type Input = YearsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let preset = &config.presets.years;

        let url = input
            .url
            .or_else(|| preset.url.clone())
            .context("No URL given and the `years` preset has none")?;
        let pattern = super::compile(input.pattern.as_deref().unwrap_or(&preset.pattern))?;

        let fetcher = WebFetcher::new(config.fetch.clone())?;
        let ranked = count_years(&fetcher, &url, &pattern, input.raw).await?;

        input.output.ranked(&mut std::io::stdout().lock(), ranked)
    }
}

async fn count_years(
    source: &dyn TextSource,
    url: &str,
    pattern: &Pattern,
    raw: bool,
) -> anyhow::Result<RankedList> {
    let text = super::fetch_page(source, url, !raw).await?;
    let years = extract_values(pattern, &text, GroupId::Index(0))?;
    info!("Found {} year mentions in {} bytes", years.len(), text.len());
    Ok(rank(years))
}
