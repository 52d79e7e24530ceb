//! # Marvin - Command Classification and Routing
//!
//! Rule-based natural-language layer of the Marvin voice assistant. Free-text
//! commands are gated by per-module keywords, matched against ordered pattern
//! tables and turned into typed intents for music, weather, calendar, SMS,
//! stock quote, encyclopedia and sports backends.

pub mod conversation;
pub mod dates;
pub mod extract;
pub mod intents;
pub mod lexicon;
pub mod pattern;
pub mod router;

#[cfg(test)]
mod tables_tests;

use std::collections::{BTreeMap, HashSet};

pub use conversation::{Conversation, ScriptedConversation};
pub use intents::{
    CalendarIntent, Classifier, GameQuery, Intent, ModuleName, MusicIntent, ParsedCommand,
    PlaylistRef, SmsIntent, SportsIntent, StocksIntent, WeatherIntent, WikiIntent,
};
pub use lexicon::Lexicon;
pub use pattern::{ExtractionError, PatternTable, Rule};
pub use router::{
    BackendError, ClassifiedModule, CommandModule, IntentHandler, IntentRouter,
    IntentRouterBuilder, KeywordGate,
};
use serde::{Deserialize, Serialize};

/// Core configuration for Marvin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarvinConfig {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub sms: SmsConfig,
}

impl MarvinConfig {
    pub fn validate(&self) -> Result<()> {
        self.router.validate()?;
        self.sms.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Order in which gated modules are offered a command.
    pub priority: Vec<ModuleName>,
    pub fallback_message: String,
    /// Keywords added to a module's gate on top of the built-in ones, keyed
    /// by module name.
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            priority: ModuleName::PRIORITY.to_vec(),
            fallback_message: "Sorry, I cannot understand that command.".to_string(),
            extra_keywords: BTreeMap::new(),
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for module in &self.priority {
            if !seen.insert(module) {
                return Err(MarvinError::ConfigError(format!(
                    "module {} appears more than once in router priority",
                    module
                )));
            }
        }
        if self.fallback_message.trim().is_empty() {
            return Err(MarvinError::ConfigError(
                "fallback message must not be empty".to_string(),
            ));
        }
        self.extra_keywords_by_module()?;
        Ok(())
    }

    /// Extra keywords with their module names resolved.
    pub fn extra_keywords_by_module(&self) -> Result<BTreeMap<ModuleName, Vec<String>>> {
        self.extra_keywords
            .iter()
            .map(|(name, words)| {
                let module = name.parse::<ModuleName>().map_err(MarvinError::ConfigError)?;
                Ok((module, words.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Signed at the end of every outgoing message.
    pub sender_name: String,
    pub country_prefix: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            sender_name: "Marvin user".to_string(),
            country_prefix: "+1".to_string(),
        }
    }
}

impl SmsConfig {
    pub fn validate(&self) -> Result<()> {
        let digits = self.country_prefix.strip_prefix('+').unwrap_or("");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(MarvinError::ConfigError(format!(
                "country prefix must look like +<digits>, got {:?}",
                self.country_prefix
            )));
        }
        Ok(())
    }
}

/// Main error types for Marvin operations
#[derive(Debug, thiserror::Error)]
pub enum MarvinError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, MarvinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MarvinConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.router.priority, ModuleName::PRIORITY.to_vec());
        assert_eq!(config.sms.country_prefix, "+1");
    }

    #[test]
    fn duplicate_priority_is_rejected() {
        let mut config = MarvinConfig::default();
        config.router.priority.push(ModuleName::Music);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn unknown_keyword_module_is_rejected() {
        let mut config = MarvinConfig::default();
        config
            .router
            .extra_keywords
            .insert("radio".to_string(), vec!["fm".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unknown module: radio"));
    }

    #[test]
    fn malformed_country_prefix_is_rejected() {
        let mut config = MarvinConfig::default();
        config.sms.country_prefix = "1".to_string();
        assert!(matches!(
            config.validate(),
            Err(MarvinError::ConfigError(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: MarvinConfig = serde_json::from_str(
            r#"{"router": {"priority": ["calendar", "weather"], "extra_keywords": {"stocks": ["shares"]}}}"#,
        )
        .unwrap();
        assert_eq!(
            config.router.priority,
            vec![ModuleName::Calendar, ModuleName::Weather]
        );
        assert_eq!(
            config.router.extra_keywords_by_module().unwrap()[&ModuleName::Stocks],
            vec!["shares".to_string()]
        );
        assert_eq!(config.router.fallback_message, RouterConfig::default().fallback_message);
        assert_eq!(config.sms, SmsConfig::default());
    }
}
