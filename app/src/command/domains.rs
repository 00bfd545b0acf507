use anyhow::Context;
use retally_config::Config;
use retally_core::{GroupId, Pattern, extract_values, rank};
use retally_fetch::{TextSource, WebFetcher};
use tracing::info;

use super::Output;

/// Input parameters for the Domains command strategy.
#[derive(Debug, Clone, Default)]
pub struct DomainsInput {
    pub url: Option<String>,
    pub pattern: Option<String>,
    /// Group holding the domain; falls back to the preset group
    pub group: Option<String>,
    /// Print a frequency table instead of every occurrence
    pub rank: bool,
    pub output: Output,
}

/// Strategy for listing the domains linked from a page.
///
/// The pattern runs over the raw markup, since links live in attributes
/// that a text conversion would drop.
#[derive(Debug, Clone, Copy)]
pub struct DomainsStrategy;

impl super::CommandStrategy for DomainsStrategy {
    type Input = DomainsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let preset = &config.presets.domains;

        let url = input
            .url
            .or_else(|| preset.url.clone())
            .context("No URL given and the `domains` preset has none")?;
        let pattern = super::compile(input.pattern.as_deref().unwrap_or(&preset.pattern))?;
        let selector = input.group.as_deref().or(preset.group.as_deref());
        let group = super::group(&pattern, selector)?;

        let fetcher = WebFetcher::new(config.fetch.clone())?;
        let domains = scrape_domains(&fetcher, &url, &pattern, group).await?;

        let mut out = std::io::stdout().lock();
        if input.rank {
            input.output.ranked(&mut out, rank(&domains))
        } else {
            input.output.values(&mut out, &domains)
        }
    }
}

async fn scrape_domains(
    source: &dyn TextSource,
    url: &str,
    pattern: &Pattern,
    group: GroupId<'_>,
) -> anyhow::Result<Vec<String>> {
    let markup = super::fetch_page(source, url, false).await?;
    let domains: Vec<String> = extract_values(pattern, &markup, group)?
        .into_iter()
        .map(str::to_string)
        .collect();
    info!("Found {} domain links on {url}", domains.len());
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::StubSource;

    const URL: &str = "https://moz.test/top500";
    const PAGE: &str = r#"<ul>
<li><a href="https://www.youtube.com/watch?v=1">YouTube</a></li>
<li><a href="http://example.com">Example</a> see also https://example.com/about</li>
<li>ftp://files.example.net is ignored</li>
</ul>"#;

    fn preset_pattern() -> (Pattern, String) {
        let preset = Config::default().presets.domains;
        (
            Pattern::new(&preset.pattern).unwrap(),
            preset.group.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_scrapes_domains_in_page_order() {
        let (pattern, group) = preset_pattern();
        let stub = StubSource::page(URL, PAGE);
        let domains = scrape_domains(&stub, URL, &pattern, GroupId::parse(&group))
            .await
            .unwrap();
        assert_eq!(domains, ["youtube.com", "example.com", "example.com"]);
    }

    #[tokio::test]
    async fn test_domains_rank() {
        let (pattern, group) = preset_pattern();
        let stub = StubSource::page(URL, PAGE);
        let domains = scrape_domains(&stub, URL, &pattern, GroupId::parse(&group))
            .await
            .unwrap();
        let ranked = rank(&domains);
        assert_eq!(ranked.as_slice()[0].value, "example.com");
        assert_eq!(ranked.as_slice()[0].count, 2);
        assert_eq!(ranked.total(), 3);
    }

    #[tokio::test]
    async fn test_numbered_group_selects_scheme() {
        let (pattern, _) = preset_pattern();
        let stub = StubSource::page(URL, PAGE);
        let schemes = scrape_domains(&stub, URL, &pattern, GroupId::Index(1))
            .await
            .unwrap();
        assert_eq!(schemes, ["https://", "http://", "https://"]);
    }
}
