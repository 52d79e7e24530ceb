//! Weather commands.
//!
//! Locations are free text, so each pattern shape gets its own extractor:
//! the location is sliced between the anchor that introduces it and the
//! fixed suffix (`today`, `now`, `on <day>` ...) that closes the utterance.

use std::sync::Arc;

use chrono::Weekday;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    extract::{after, after_earliest, last_word, split_last, strip_any_suffix, strip_question, AnchorMissing},
    lexicon::{Lexicon, WEEKDAY_ALTERNATION},
    pattern::{ExtractionError, PatternTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIntent {
    CurrentToday,
    CurrentTomorrow,
    ExternalToday { location: String },
    ExternalTomorrow { location: String },
    CurrentSpecific { day: Weekday },
    ExternalSpecific { day: Weekday, location: String },
}

impl Intent for WeatherIntent {
    fn label(&self) -> &'static str {
        match self {
            WeatherIntent::CurrentToday => "current today",
            WeatherIntent::CurrentTomorrow => "current tomorrow",
            WeatherIntent::ExternalToday { .. } => "external today",
            WeatherIntent::ExternalTomorrow { .. } => "external tomorrow",
            WeatherIntent::CurrentSpecific { .. } => "current specific",
            WeatherIntent::ExternalSpecific { .. } => "external specific",
        }
    }
}

type Extracted = Result<WeatherIntent, AnchorMissing>;

const LEAD: &str = r"[a-z' ]*weather ";
const PLACE: &str = r"[a-z' ]+";

fn weekday(name: &str, lexicon: &Lexicon) -> Result<Weekday, AnchorMissing> {
    lexicon
        .weekdays()
        .weekday(name)
        .ok_or_else(|| AnchorMissing::new(WEEKDAY_ALTERNATION))
}

/// Location that runs to the end of the utterance after `anchor`.
fn trailing_location(command: &str, anchor: &str) -> Result<String, AnchorMissing> {
    let command = strip_question(command);
    Ok(after(&command, anchor)?.trim().to_string())
}

/// Location after `weather in ` that is closed by one of `suffixes`.
fn enclosed_location(command: &str, suffixes: &[&str]) -> Result<String, AnchorMissing> {
    let command = strip_question(command);
    let tail = after(&command, "weather in ")?;
    Ok(strip_any_suffix(tail, suffixes).trim().to_string())
}

fn today_in(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalToday {
        location: trailing_location(command, "today in ")?,
    })
}

fn now_in(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalToday {
        location: trailing_location(command, "now in ")?,
    })
}

fn in_then_today(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalToday {
        location: enclosed_location(command, &[" going to be today", " today"])?,
    })
}

fn in_then_now(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalToday {
        location: enclosed_location(command, &[" now"])?,
    })
}

fn tomorrow_in(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalTomorrow {
        location: trailing_location(command, "tomorrow in ")?,
    })
}

fn in_then_tomorrow(command: &str, _: &Lexicon) -> Extracted {
    Ok(WeatherIntent::ExternalTomorrow {
        location: enclosed_location(command, &[" going to be tomorrow", " tomorrow"])?,
    })
}

fn on_day(command: &str, lexicon: &Lexicon) -> Extracted {
    let command = strip_question(command);
    Ok(WeatherIntent::CurrentSpecific {
        day: weekday(last_word(&command), lexicon)?,
    })
}

/// `... on <day> in <location>`
fn on_day_in(command: &str, lexicon: &Lexicon) -> Extracted {
    let command = strip_question(command);
    let anchors: Vec<String> = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
        .iter()
        .map(|day| format!("on {} in ", day))
        .collect();
    let anchor_refs: Vec<&str> = anchors.iter().map(String::as_str).collect();

    let location = after_earliest(&command, &anchor_refs)?;
    let clause = &command[..command.len() - location.len()];
    let day_name = clause
        .trim_end()
        .strip_suffix(" in")
        .map(last_word)
        .ok_or_else(|| AnchorMissing::new(" in "))?;

    Ok(WeatherIntent::ExternalSpecific {
        day: weekday(day_name, lexicon)?,
        location: location.trim().to_string(),
    })
}

/// `... in <location> on <day>`
fn in_on_day(command: &str, lexicon: &Lexicon) -> Extracted {
    let command = strip_question(command);
    let (head, day_name) = split_last(&command, " on ")?;
    let location = after_earliest(head, &["weather in ", "weather going to be in "])?;

    Ok(WeatherIntent::ExternalSpecific {
        day: weekday(day_name.trim(), lexicon)?,
        location: location.trim().to_string(),
    })
}

static WEATHER_TABLE: Lazy<PatternTable<WeatherIntent>> = Lazy::new(|| {
    let day = WEEKDAY_ALTERNATION;
    PatternTable::new(ModuleName::Weather)
        .rule(
            "current today",
            &format!(r"{LEAD}(outside )?(going to be )?today\??"),
            |_, _| Ok(WeatherIntent::CurrentToday),
        )
        .rule(
            "current today",
            &format!(r"{LEAD}(outside )?(now|like)\??"),
            |_, _| Ok(WeatherIntent::CurrentToday),
        )
        .rule(
            "current tomorrow",
            &format!(r"{LEAD}(going to be )?tomorrow\??"),
            |_, _| Ok(WeatherIntent::CurrentTomorrow),
        )
        .rule(
            "external today",
            &format!(r"{LEAD}(going to be )?today in {PLACE}\??"),
            today_in,
        )
        .rule("external today", &format!(r"{LEAD}now in {PLACE}\??"), now_in)
        .rule(
            "external today",
            &format!(r"{LEAD}in {PLACE} (going to be )?today\??"),
            in_then_today,
        )
        .rule(
            "external today",
            &format!(r"{LEAD}in {PLACE} now\??"),
            in_then_now,
        )
        .rule(
            "external tomorrow",
            &format!(r"{LEAD}(going to be )?tomorrow in {PLACE}\??"),
            tomorrow_in,
        )
        .rule(
            "external tomorrow",
            &format!(r"{LEAD}in {PLACE}( going to be)? tomorrow\??"),
            in_then_tomorrow,
        )
        .rule(
            "current specific",
            &format!(r"{LEAD}(going to be )?on {day}\??"),
            on_day,
        )
        .rule(
            "external specific",
            &format!(r"{LEAD}(going to be )?on {day} in {PLACE}\??"),
            on_day_in,
        )
        .rule(
            "external specific",
            &format!(r"{LEAD}(going to be )?in {PLACE} on {day}\??"),
            in_on_day,
        )
});

pub struct WeatherClassifier {
    lexicon: Arc<Lexicon>,
}

impl WeatherClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<WeatherIntent> {
        &WEATHER_TABLE
    }
}

impl Classifier for WeatherClassifier {
    type Intent = WeatherIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Weather
    }

    fn classify(&self, utterance: &str) -> Result<Option<WeatherIntent>, ExtractionError> {
        WEATHER_TABLE.classify(utterance, &self.lexicon)
    }
}

/// Spoken wording for an OpenWeatherMap condition code.
pub fn describe_condition(code: u16) -> Option<&'static str> {
    match code {
        200..=299 => Some("a thunderstorm"),
        300..=399 => Some("drizzling"),
        500..=599 => Some("raining"),
        600..=699 => Some("snowing"),
        800 => Some("clear"),
        801..=899 => Some("cloudy"),
        _ => None,
    }
}

/// Temperatures and condition for one place and day, in Fahrenheit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub place: String,
    pub condition_code: u16,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

impl Forecast {
    pub fn today_sentence(&self) -> String {
        match describe_condition(self.condition_code) {
            Some(condition) => format!(
                "The weather today in {} will be {} with a minimum of {} degrees and a maximum of {} degrees.",
                self.place, condition, self.min_temperature, self.max_temperature
            ),
            None => format!(
                "The weather today in {} will be a minimum of {} degrees and a maximum of {} degrees.",
                self.place, self.min_temperature, self.max_temperature
            ),
        }
    }

    pub fn tomorrow_sentence(&self) -> String {
        match describe_condition(self.condition_code) {
            Some(condition) => format!(
                "The weather tomorrow in {} will be {} and {} degrees.",
                self.place, condition, self.max_temperature
            ),
            None => format!(
                "The weather tomorrow in {} will be {} degrees.",
                self.place, self.max_temperature
            ),
        }
    }
}
