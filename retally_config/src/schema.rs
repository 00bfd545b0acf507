use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use retally_fetch::FetchConfig;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub presets: Presets,
}

/// A named pattern with the defaults a command needs to run without flags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PresetConfig {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PresetConfig {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            template: None,
            group: None,
            url: None,
        }
    }

    fn with_template(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }

    fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Presets {
    #[serde(default = "Presets::default_years")]
    pub years: PresetConfig,
    #[serde(default = "Presets::default_domains")]
    pub domains: PresetConfig,
    #[serde(default = "Presets::default_dates")]
    pub dates: PresetConfig,
    #[serde(default = "Presets::default_comments")]
    pub comments: PresetConfig,
    #[serde(default = "Presets::default_number_lines")]
    pub number_lines: PresetConfig,
    #[serde(default = "Presets::default_email")]
    pub email: PresetConfig,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            years: Self::default_years(),
            domains: Self::default_domains(),
            dates: Self::default_dates(),
            comments: Self::default_comments(),
            number_lines: Self::default_number_lines(),
            email: Self::default_email(),
        }
    }
}

impl Presets {
    pub const NAMES: [&'static str; 6] = [
        "years",
        "domains",
        "dates",
        "comments",
        "number-lines",
        "email",
    ];

    fn default_years() -> PresetConfig {
        PresetConfig::new(r"\b(?:19|20)\d{2}\b")
            .with_url("https://en.wikipedia.org/wiki/Diplomatic_history_of_World_War_II")
    }

    fn default_domains() -> PresetConfig {
        PresetConfig::new(
            r"(https?://)(www\.)?(?P<domain>[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6})(?P<path>/[-a-zA-Z0-9@:%_/+.~#?&=]*)?",
        )
        .with_group("domain")
        .with_url("https://moz.com/top500")
    }

    fn default_dates() -> PresetConfig {
        PresetConfig::new(r"\b(0?[1-9]|[12]\d|3[01])([ /\-])(0?[1-9]|1[012])\2(\d{4})")
            .with_template(r"\3\2\1\2\4")
    }

    fn default_comments() -> PresetConfig {
        PresetConfig::new(r"(/\*+)(.*)(\*+/)").with_template(r"\1\n\2\n\3")
    }

    fn default_number_lines() -> PresetConfig {
        PresetConfig::new(r"(?m)^([0-9]+)$")
    }

    fn default_email() -> PresetConfig {
        PresetConfig::new(r"^.[^@\s]+@.[^@\s]+\.\w{2,6}$")
    }

    /// Look a preset up by its command-line name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PresetConfig> {
        match name {
            "years" => Some(&self.years),
            "domains" => Some(&self.domains),
            "dates" => Some(&self.dates),
            "comments" => Some(&self.comments),
            "number-lines" | "number_lines" => Some(&self.number_lines),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("retally"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;

        Ok(config)
    }

    /// Load the config file if there is one, built-in defaults otherwise.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            info!("Loading config from {}", config_path.display());
            Self::load_from(&config_path)
        } else {
            info!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        let config_path = config_dir.join("config.json");
        Self::create_config_at(&config_path)?;
        Ok(config_path)
    }

    pub fn create_config_at(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let content = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(config_path, content)?;

        info!("Created config at {}", config_path.display());
        Ok(())
    }
}
