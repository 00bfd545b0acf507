use retally_config::{Config, PresetConfig, Presets};

/// Strategy for displaying the effective configuration: where it was read
/// from, fetch settings and every preset.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== retally Configuration ===\n");

        if path.exists() {
            println!("File: {}", path.display());
        } else {
            println!("File: {} (not found, using defaults)", path.display());
        }
        println!();

        println!("Fetch:");
        println!("  Timeout: {}s", config.fetch.timeout);
        println!("  User-Agent: {}", config.fetch.user_agent);
        println!("  Max Size: {} bytes", config.fetch.max_size);
        if config.fetch.retry_delays.is_empty() {
            println!("  Retries: none");
        } else {
            println!("  Retry Delays: {:?}s", config.fetch.retry_delays);
        }
        println!();

        println!("Presets:");
        for name in Presets::NAMES {
            if let Some(preset) = config.presets.get(name) {
                print_preset(name, preset);
            }
        }

        Ok(())
    }
}

fn print_preset(name: &str, preset: &PresetConfig) {
    println!("  {name}:");
    println!("    Pattern: {}", preset.pattern);
    if let Some(ref template) = preset.template {
        println!("    Template: {template}");
    }
    if let Some(ref group) = preset.group {
        println!("    Group: {group}");
    }
    if let Some(ref url) = preset.url {
        println!("    URL: {url}");
    }
}
