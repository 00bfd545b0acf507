use retally_config::Config;
use retally_core::{Pattern, SubstitutionTemplate, substitute_n};
use tracing::debug;

use super::Source;

/// Input parameters for the Reformat command strategy.
#[derive(Debug, Clone)]
pub struct ReformatInput {
    pub pattern: Option<String>,
    pub template: Option<String>,
    /// Preset supplying whichever of pattern/template is not given
    pub preset: String,
    /// Replace at most this many matches, 0 for all
    pub count: usize,
    pub source: Source,
}

/// Strategy for rewriting matches through a `\N` template, e.g. turning
/// day/month/year dates into month/day/year.
#[derive(Debug, Clone, Copy)]
pub struct ReformatStrategy;

impl super::CommandStrategy for ReformatStrategy {
    type Input = ReformatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let preset = super::preset(&config, &input.preset)?;

        let pattern = super::compile(input.pattern.as_deref().unwrap_or(&preset.pattern))?;
        let Some(template) = input.template.as_deref().or(preset.template.as_deref()) else {
            anyhow::bail!("Preset `{}` has no template; pass --template", input.preset);
        };
        let template = SubstitutionTemplate::parse(template, &pattern)?;

        let text = input.source.read(&config).await?;
        let rewritten = reformat(&pattern, &template, &text, input.count)?;

        if rewritten.ends_with('\n') {
            print!("{rewritten}");
        } else {
            println!("{rewritten}");
        }
        Ok(())
    }
}

fn reformat(
    pattern: &Pattern,
    template: &SubstitutionTemplate,
    text: &str,
    count: usize,
) -> anyhow::Result<String> {
    debug!("Rewriting with {} -> {}", pattern.as_str(), template.as_str());
    Ok(substitute_n(pattern, template, text, count)?)
}
