//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::domain::registry::DuplicateTagPolicy;
use crate::services::ordering::InvalidTimestampPolicy;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Output storage format for the occupancy dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory for default output and simulated datasets
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub invalid_timestamps: InvalidTimestampPolicy,
    #[serde(default)]
    pub duplicate_tags: DuplicateTagPolicy,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_file: default_output_file(),
            invalid_timestamps: InvalidTimestampPolicy::default(),
            duplicate_tags: DuplicateTagPolicy::default(),
            output_format: OutputFormat::default(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_output_file() -> String {
    "occupancy.csv".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tags")]
    pub tags: usize,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// Fixed seed for reproducible datasets (unset draws entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_registry_file")]
    pub registry_file: String,
    #[serde(default = "default_events_file")]
    pub events_file: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            duration_minutes: default_duration_minutes(),
            seed: None,
            registry_file: default_registry_file(),
            events_file: default_events_file(),
        }
    }
}

fn default_tags() -> usize {
    50
}

fn default_duration_minutes() -> u32 {
    120
}

fn default_registry_file() -> String {
    "registry.csv".to_string()
}

fn default_events_file() -> String {
    "events.csv".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Main configuration struct used by the binaries
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    output_file: String,
    invalid_timestamps: InvalidTimestampPolicy,
    duplicate_tags: DuplicateTagPolicy,
    output_format: OutputFormat,
    sim_tags: usize,
    sim_duration_minutes: u32,
    sim_seed: Option<u64>,
    sim_registry_file: String,
    sim_events_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        let TomlConfig { pipeline, simulation } = toml_config;
        Self {
            data_dir: PathBuf::from(pipeline.data_dir),
            output_file: pipeline.output_file,
            invalid_timestamps: pipeline.invalid_timestamps,
            duplicate_tags: pipeline.duplicate_tags,
            output_format: pipeline.output_format,
            sim_tags: simulation.tags,
            sim_duration_minutes: simulation.duration_minutes,
            sim_seed: simulation.seed,
            sim_registry_file: simulation.registry_file,
            sim_events_file: simulation.events_file,
            config_file,
        }
    }

    /// Determine config file path from the CLI flag or environment
    pub fn resolve_config_path(explicit: Option<&str>) -> String {
        if let Some(path) = explicit {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration from a path, falling back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "config_fallback_to_defaults");
                Self::default()
            }
        }
    }

    /// Load configuration - `--config` path, then CONFIG_FILE, then config/dev.toml
    pub fn load(explicit: Option<&str>) -> Self {
        Self::load_from_path(Self::resolve_config_path(explicit))
    }

    /// Default destination for the occupancy dataset
    pub fn default_output_path(&self) -> PathBuf {
        self.data_dir.join(&self.output_file)
    }

    pub fn default_registry_path(&self) -> PathBuf {
        self.data_dir.join(&self.sim_registry_file)
    }

    pub fn default_events_path(&self) -> PathBuf {
        self.data_dir.join(&self.sim_events_file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn invalid_timestamps(&self) -> InvalidTimestampPolicy {
        self.invalid_timestamps
    }

    pub fn duplicate_tags(&self) -> DuplicateTagPolicy {
        self.duplicate_tags
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn sim_tags(&self) -> usize {
        self.sim_tags
    }

    pub fn sim_duration_minutes(&self) -> u32 {
        self.sim_duration_minutes
    }

    pub fn sim_seed(&self) -> Option<u64> {
        self.sim_seed
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir(), Path::new("data"));
        assert_eq!(config.default_output_path(), PathBuf::from("data").join("occupancy.csv"));
        assert_eq!(config.invalid_timestamps(), InvalidTimestampPolicy::Fail);
        assert_eq!(config.duplicate_tags(), DuplicateTagPolicy::FirstWins);
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(config.sim_tags(), 50);
        assert_eq!(config.sim_duration_minutes(), 120);
        assert!(config.sim_seed().is_none());
        assert_eq!(config.config_file(), "default");
    }

    #[test]
    fn test_simulation_paths_under_data_dir() {
        let config = Config::default();
        assert_eq!(config.default_registry_path(), PathBuf::from("data").join("registry.csv"));
        assert_eq!(config.default_events_path(), PathBuf::from("data").join("events.csv"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[pipeline]
invalid_timestamps = "skip"
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());

        assert_eq!(config.invalid_timestamps(), InvalidTimestampPolicy::Skip);
        assert_eq!(config.duplicate_tags(), DuplicateTagPolicy::FirstWins);
        assert_eq!(config.sim_tags(), 50);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let parsed: Result<TomlConfig, _> = toml::from_str(
            r#"
[pipeline]
invalid_timestamps = "coerce"
"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_resolve_config_path_prefers_flag() {
        assert_eq!(Config::resolve_config_path(Some("config/garage.toml")), "config/garage.toml");
    }
}
