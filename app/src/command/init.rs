use retally_config::Config;

/// Strategy for initializing the configuration.
///
/// Writes the built-in defaults to `~/retally/config.json`, refusing to
/// overwrite an existing file.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;
        println!("Created {}", path.display());
        Ok(())
    }
}
