use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::page::{DEFAULT_CONTAINER_CLASS, DEFAULT_SEGMENT_CLASS, Selector};
use crate::utils::paths::get_config_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_container_class")]
    pub container_class: String,

    #[serde(default = "default_segment_class")]
    pub segment_class: String,
}

fn default_container_class() -> String {
    DEFAULT_CONTAINER_CLASS.to_string()
}

fn default_segment_class() -> String {
    DEFAULT_SEGMENT_CLASS.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            container_class: default_container_class(),
            segment_class: default_segment_class(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub fn selector(&self) -> Selector {
        Selector::new(&self.container_class, &self.segment_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.container_class, "captions-text");
        assert_eq!(config.segment_class, "ytp-caption-segment");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("container_class"));
        assert!(toml_str.contains("segment_class"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
        container_class = "subs"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.container_class, "subs");
        assert_eq!(config.segment_class, "ytp-caption-segment");
    }

    #[test]
    fn test_selector_from_config() {
        let config = Config::default();
        assert_eq!(config.selector(), Selector::default());
    }
}
