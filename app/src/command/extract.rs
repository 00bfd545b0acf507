use retally_config::Config;
use retally_core::{GroupId, Pattern, extract_values, rank};

use super::{Output, Source};

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Pattern to apply; mutually exclusive with `preset`
    pub pattern: Option<String>,
    pub preset: Option<String>,
    pub group: Option<String>,
    pub rank: bool,
    pub output: Output,
    pub source: Source,
}

/// Strategy for generic extraction over a file, URL, literal text or stdin.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;

        let (source, preset_group) = match (&input.pattern, &input.preset) {
            (Some(pattern), _) => (pattern.clone(), None),
            (None, Some(name)) => {
                let preset = super::preset(&config, name)?;
                (preset.pattern.clone(), preset.group.clone())
            }
            (None, None) => anyhow::bail!("Either --pattern or --preset is required"),
        };
        let pattern = super::compile(&source)?;
        let group = super::group(&pattern, input.group.as_deref().or(preset_group.as_deref()))?;

        let text = input.source.read(&config).await?;
        let values = select(&pattern, &text, group)?;

        let mut out = std::io::stdout().lock();
        if input.rank {
            input.output.ranked(&mut out, rank(&values))
        } else {
            input.output.values(&mut out, &values)
        }
    }
}

fn select<'t>(pattern: &Pattern, text: &'t str, group: GroupId<'_>) -> anyhow::Result<Vec<&'t str>> {
    Ok(extract_values(pattern, text, group)?)
}
