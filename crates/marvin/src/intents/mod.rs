//! Per-module command classifiers.
//!
//! Each submodule owns one ordered [`PatternTable`](crate::pattern::PatternTable)
//! and a classifier type that applies it with the shared lexicon.

pub mod calendar;
pub mod music;
pub mod sms;
pub mod sports;
pub mod stocks;
pub mod weather;
pub mod wiki;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use calendar::{CalendarClassifier, CalendarIntent};
pub use music::{MusicClassifier, MusicIntent, PlaylistRef};
pub use sms::{SmsClassifier, SmsIntent};
pub use sports::{GameQuery, SportsClassifier, SportsIntent};
pub use stocks::{StocksClassifier, StocksIntent};
pub use weather::{WeatherClassifier, WeatherIntent};
pub use wiki::{WikiClassifier, WikiIntent};

use crate::pattern::ExtractionError;

/// Backend modules a command can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleName {
    Music,
    Weather,
    Calendar,
    Sms,
    Stocks,
    Wiki,
    Sports,
}

impl ModuleName {
    /// Default dispatch priority.
    pub const PRIORITY: [ModuleName; 7] = [
        ModuleName::Music,
        ModuleName::Weather,
        ModuleName::Calendar,
        ModuleName::Sms,
        ModuleName::Stocks,
        ModuleName::Wiki,
        ModuleName::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleName::Music => "music",
            ModuleName::Weather => "weather",
            ModuleName::Calendar => "calendar",
            ModuleName::Sms => "sms",
            ModuleName::Stocks => "stocks",
            ModuleName::Wiki => "wiki",
            ModuleName::Sports => "sports",
        }
    }

    /// What the user hears when this module's backend fails mid-command.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ModuleName::Music => "Error executing Spotify command",
            ModuleName::Weather => "Please clarify your weather query.",
            ModuleName::Calendar => "Error reading your calendar",
            ModuleName::Sms => "Failure while sending message",
            ModuleName::Stocks => "Could not look up that stock price",
            ModuleName::Wiki => "Could not find any results for that query",
            ModuleName::Sports => "could not find information about that game at this time",
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ModuleName::PRIORITY
            .into_iter()
            .find(|module| module.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown module: {}", s))
    }
}

/// A module-specific intent with its extracted arguments.
pub trait Intent: fmt::Debug + Clone + Send + Sync + Into<ParsedCommand> {
    /// Label of the rule family that produced this intent, e.g. `"play playlist"`.
    fn label(&self) -> &'static str;
}

/// Turns an utterance into one module's intent, or `None` if it is not that
/// module's command.
pub trait Classifier: Send + Sync {
    type Intent: Intent;

    fn module(&self) -> ModuleName;

    fn classify(&self, utterance: &str) -> std::result::Result<Option<Self::Intent>, ExtractionError>;
}

/// The outcome of classification across all modules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "module", content = "intent", rename_all = "lowercase")]
pub enum ParsedCommand {
    Music(MusicIntent),
    Weather(WeatherIntent),
    Calendar(CalendarIntent),
    Sms(SmsIntent),
    Stocks(StocksIntent),
    Wiki(WikiIntent),
    Sports(SportsIntent),
}

impl ParsedCommand {
    pub fn module(&self) -> ModuleName {
        match self {
            ParsedCommand::Music(_) => ModuleName::Music,
            ParsedCommand::Weather(_) => ModuleName::Weather,
            ParsedCommand::Calendar(_) => ModuleName::Calendar,
            ParsedCommand::Sms(_) => ModuleName::Sms,
            ParsedCommand::Stocks(_) => ModuleName::Stocks,
            ParsedCommand::Wiki(_) => ModuleName::Wiki,
            ParsedCommand::Sports(_) => ModuleName::Sports,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParsedCommand::Music(intent) => intent.label(),
            ParsedCommand::Weather(intent) => intent.label(),
            ParsedCommand::Calendar(intent) => intent.label(),
            ParsedCommand::Sms(intent) => intent.label(),
            ParsedCommand::Stocks(intent) => intent.label(),
            ParsedCommand::Wiki(intent) => intent.label(),
            ParsedCommand::Sports(intent) => intent.label(),
        }
    }
}

macro_rules! impl_into_parsed {
    ($($intent:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$intent> for ParsedCommand {
                fn from(intent: $intent) -> Self {
                    ParsedCommand::$variant(intent)
                }
            }
        )*
    };
}

impl_into_parsed! {
    MusicIntent => Music,
    WeatherIntent => Weather,
    CalendarIntent => Calendar,
    SmsIntent => Sms,
    StocksIntent => Stocks,
    WikiIntent => Wiki,
    SportsIntent => Sports,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names_round_trip() {
        for module in ModuleName::PRIORITY {
            assert_eq!(module.to_string().parse::<ModuleName>(), Ok(module));
        }
        assert_eq!("SMS".parse::<ModuleName>(), Ok(ModuleName::Sms));
        assert!("radio".parse::<ModuleName>().is_err());
    }

    #[test]
    fn parsed_command_serializes_with_module_tag() {
        let command = ParsedCommand::from(StocksIntent::Price {
            ticker: "aapl".to_string(),
        });
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["module"], "stocks");
        assert_eq!(json["intent"]["price"]["ticker"], "aapl");
        assert_eq!(command.label(), "price");
        assert_eq!(command.module(), ModuleName::Stocks);
    }
}
