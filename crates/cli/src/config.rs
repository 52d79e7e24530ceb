//! Configuration management for Marvin CLI
//!
//! Handles loading and saving configuration from ~/.marvin/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marvin::{MarvinConfig, ModuleName, RouterConfig, SmsConfig};
use serde::{Deserialize, Serialize};

/// Configuration for Marvin CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub sms: SmsConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_true")]
    pub show_gated_modules: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_gated_modules: true,
        }
    }
}

impl Config {
    /// Get the default path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".marvin")
            .join("config.toml")
    }

    /// Load configuration from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.marvin().validate()?;
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The library configuration carried by this file
    pub fn marvin(&self) -> MarvinConfig {
        MarvinConfig {
            router: self.router.clone(),
            sms: self.sms.clone(),
        }
    }

    /// Get a configuration value by key path (e.g., "sms.sender_name")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["router", "priority"] => Some(join_modules(&self.router.priority)),
            ["router", "fallback_message"] => Some(self.router.fallback_message.clone()),
            ["router", "extra_keywords", module] => {
                let module: ModuleName = module.parse().ok()?;
                Some(
                    self.router
                        .extra_keywords
                        .get(module.as_str())
                        .map(|words| words.join(","))
                        .unwrap_or_default(),
                )
            }
            ["sms", "sender_name"] => Some(self.sms.sender_name.clone()),
            ["sms", "country_prefix"] => Some(self.sms.country_prefix.clone()),
            ["display", "color"] => Some(self.display.color.to_string()),
            ["display", "show_gated_modules"] => Some(self.display.show_gated_modules.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path. The result must still be a
    /// valid configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        let mut updated = self.clone();

        match parts.as_slice() {
            ["router", "priority"] => updated.router.priority = parse_modules(value)?,
            ["router", "fallback_message"] => {
                updated.router.fallback_message = value.to_string()
            }
            ["router", "extra_keywords", module] => {
                let module: ModuleName = module.parse().map_err(anyhow::Error::msg)?;
                let words = split_list(value);
                if words.is_empty() {
                    updated.router.extra_keywords.remove(module.as_str());
                } else {
                    updated
                        .router
                        .extra_keywords
                        .insert(module.as_str().to_string(), words);
                }
            }
            ["sms", "sender_name"] => updated.sms.sender_name = value.to_string(),
            ["sms", "country_prefix"] => updated.sms.country_prefix = value.to_string(),
            ["display", "color"] => updated.display.color = parse_flag(value)?,
            ["display", "show_gated_modules"] => {
                updated.display.show_gated_modules = parse_flag(value)?
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        updated.marvin().validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("Expected true or false, got {:?}", value))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_modules(value: &str) -> Result<Vec<ModuleName>> {
    split_list(value)
        .iter()
        .map(|name| name.parse::<ModuleName>().map_err(anyhow::Error::msg))
        .collect()
}

pub fn join_modules(modules: &[ModuleName]) -> String {
    modules
        .iter()
        .map(|module| module.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn set_values_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("router.priority", "calendar, weather, music").unwrap();
        config.set("router.extra_keywords.wiki", "define,Explain").unwrap();
        config.set("sms.sender_name", "Sam").unwrap();
        config.set("display.color", "false").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.get("router.priority").as_deref(),
            Some("calendar,weather,music")
        );
        assert_eq!(
            loaded.get("router.extra_keywords.wiki").as_deref(),
            Some("define,explain")
        );
        assert_eq!(loaded.get("sms.sender_name").as_deref(), Some("Sam"));
        assert!(!loaded.display.color);
    }

    #[test]
    fn invalid_values_are_rejected_and_leave_config_untouched() {
        let mut config = Config::default();
        assert!(config.set("router.priority", "music,music").is_err());
        assert!(config.set("router.priority", "music,radio").is_err());
        assert!(config.set("sms.country_prefix", "44").is_err());
        assert!(config.set("server.url", "http://localhost").is_err());
        assert!(config.set("display.color", "maybe").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sms]\nsender_name = \"Robin\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sms.sender_name, "Robin");
        assert_eq!(config.sms.country_prefix, "+1");
        assert_eq!(config.router, RouterConfig::default());
    }
}
