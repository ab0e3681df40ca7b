//! Construction parameters and config file loading for skipscore.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use skipscore_logging::LoggingConfig;
use std::path::PathBuf;

/// Default cap on the number of levels a list may use.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default chance that a node is promoted to the next level.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

/// Hard upper bound accepted for `max_level`.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Configuration format types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl Default for ConfigFormat {
    fn default() -> Self {
        Self::Yaml
    }
}

impl ConfigFormat {
    /// Pick a format from a file extension, falling back to YAML.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::default(),
        }
    }
}

/// Skip list construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipListConfig {
    /// Maximum number of levels a node (and the list) may reach
    #[serde(default = "default_max_level")]
    pub max_level: usize,

    /// Promotion probability for the level generator
    #[serde(default = "default_probability")]
    pub probability: f64,

    /// Fixed seed for reproducible level draws
    #[serde(default)]
    pub seed: Option<u64>,

    /// Diagnostic logging; disabled when absent
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_max_level() -> usize {
    DEFAULT_MAX_LEVEL
}

fn default_probability() -> f64 {
    DEFAULT_PROBABILITY
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
            logging: None,
        }
    }
}

impl SkipListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Check that the parameters describe a usable level distribution.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            bail!(
                "max_level must be between 1 and {}, got {}",
                MAX_LEVEL_LIMIT,
                self.max_level
            );
        }
        if !self.probability.is_finite() || self.probability <= 0.0 || self.probability >= 1.0 {
            bail!(
                "probability must be strictly between 0 and 1, got {}",
                self.probability
            );
        }
        Ok(())
    }
}

/// Parse and validate configuration text in the given format
pub fn parse_config(contents: &str, format: ConfigFormat) -> anyhow::Result<SkipListConfig> {
    let config: SkipListConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(contents).context("Failed to parse JSON config")?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
pub fn load_config<P: Into<PathBuf>>(path: P) -> anyhow::Result<SkipListConfig> {
    let path = path.into();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    parse_config(&contents, ConfigFormat::from_path(&path))
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Save configuration to a file
pub fn save_config<P: Into<PathBuf>>(config: &SkipListConfig, path: P) -> anyhow::Result<()> {
    let path = path.into();
    let contents = match ConfigFormat::from_path(&path) {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to serialize JSON config")?
        }
        ConfigFormat::Yaml => {
            serde_yaml::to_string(config).context("Failed to serialize YAML config")?
        }
    };

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipscore_logging::LogLevel;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn config_default_values() {
        let config = SkipListConfig::default();
        assert_eq!(config.max_level, 16);
        assert_eq!(config.probability, 0.25);
        assert!(config.seed.is_none());
        assert!(config.logging.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_and_oversized_max_level() {
        assert!(SkipListConfig::new().with_max_level(0).validate().is_err());
        assert!(SkipListConfig::new().with_max_level(33).validate().is_err());
        assert!(SkipListConfig::new().with_max_level(1).validate().is_ok());
        assert!(SkipListConfig::new().with_max_level(32).validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_probability() {
        for p in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let err = SkipListConfig::new().with_probability(p).validate();
            assert!(err.is_err(), "probability {p} should be rejected");
        }
        assert!(SkipListConfig::new().with_probability(0.5).validate().is_ok());
    }

    #[test]
    fn validate_message_names_field() {
        let err = SkipListConfig::new().with_max_level(0).validate().unwrap_err();
        assert!(err.to_string().contains("max_level"));
    }

    #[test]
    fn parse_fills_missing_fields_with_defaults() {
        let config = parse_config("seed: 7\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_level, DEFAULT_MAX_LEVEL);
        assert_eq!(config.probability, DEFAULT_PROBABILITY);
    }

    #[test]
    fn parse_rejects_invalid_values() {
        let err = parse_config(r#"{"probability": 2.0}"#, ConfigFormat::Json).unwrap_err();
        assert!(err.to_string().contains("probability"));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(parse_config("{not json", ConfigFormat::Json).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Yaml);
    }

    #[test]
    fn load_save_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skiplist.yaml");

        let config = SkipListConfig::new()
            .with_max_level(8)
            .with_probability(0.5)
            .with_seed(42)
            .with_logging(LoggingConfig::new().with_level(LogLevel::Debug));

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_save_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("skiplist.json");

        let config = SkipListConfig::default();

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.yaml");

        let err = load_config(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }
}
