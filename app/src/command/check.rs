use retally_config::Config;
use retally_core::Pattern;

/// Input parameters for the Check command strategy.
#[derive(Debug, Clone)]
pub struct CheckInput {
    pub pattern: Option<String>,
    pub preset: String,
    pub inputs: Vec<String>,
}

/// Strategy for testing strings against a pattern, one `true`/`false` line
/// per input. A non-matching input is not an error.
#[derive(Debug, Clone, Copy)]
pub struct CheckStrategy;

impl super::CommandStrategy for CheckStrategy {
    type Input = CheckInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let source = match input.pattern {
            Some(pattern) => pattern,
            None => super::preset(&config, &input.preset)?.pattern.clone(),
        };
        let pattern = super::compile(&source)?;

        for result in check(&pattern, &input.inputs)? {
            println!("{result}");
        }
        Ok(())
    }
}

fn check(pattern: &Pattern, inputs: &[String]) -> anyhow::Result<Vec<bool>> {
    inputs
        .iter()
        .map(|input| pattern.is_match(input).map_err(anyhow::Error::from))
        .collect()
}
