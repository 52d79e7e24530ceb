//! Calendar agenda commands.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    dates::{civilian_time, weekday_of_timestamp, AgendaSpan},
    lexicon::Lexicon,
    pattern::{ExtractionError, PatternTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarIntent {
    TodayEvents,
    TomorrowEvents,
    CurrentWeekEvents,
}

impl CalendarIntent {
    pub fn span(&self) -> AgendaSpan {
        match self {
            CalendarIntent::TodayEvents => AgendaSpan::Today,
            CalendarIntent::TomorrowEvents => AgendaSpan::Tomorrow,
            CalendarIntent::CurrentWeekEvents => AgendaSpan::ThisWeek,
        }
    }
}

impl Intent for CalendarIntent {
    fn label(&self) -> &'static str {
        match self {
            CalendarIntent::TodayEvents => "today events",
            CalendarIntent::TomorrowEvents => "tomorrow events",
            CalendarIntent::CurrentWeekEvents => "current week events",
        }
    }
}

static CALENDAR_TABLE: Lazy<PatternTable<CalendarIntent>> = Lazy::new(|| {
    PatternTable::new(ModuleName::Calendar)
        .rule(
            "today events",
            r"[a-z ']*(calendar|schedule|events)[a-z ']*today\??",
            |_, _| Ok(CalendarIntent::TodayEvents),
        )
        .rule(
            "tomorrow events",
            r"[a-z ']*(calendar|schedule|events)[a-z ']*tomorrow\??",
            |_, _| Ok(CalendarIntent::TomorrowEvents),
        )
        .rule(
            "current week events",
            r"[a-z ']*(calendar|schedule|events)[a-z ']*this week\??",
            |_, _| Ok(CalendarIntent::CurrentWeekEvents),
        )
});

pub struct CalendarClassifier {
    lexicon: Arc<Lexicon>,
}

impl CalendarClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<CalendarIntent> {
        &CALENDAR_TABLE
    }
}

impl Classifier for CalendarClassifier {
    type Intent = CalendarIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Calendar
    }

    fn classify(&self, utterance: &str) -> Result<Option<CalendarIntent>, ExtractionError> {
        CALENDAR_TABLE.classify(utterance, &self.lexicon)
    }
}

/// An event as returned by the calendar service. `start` and `end` hold either
/// an RFC 3339 date-time or, for all-day events, a bare date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: String,
    pub end: String,
}

impl CalendarEvent {
    fn time_range(&self) -> String {
        match (civilian_time(&self.start), civilian_time(&self.end)) {
            (Some(start), Some(end)) => format!("from {} to {}", start, end),
            _ => "all day".to_string(),
        }
    }
}

/// Spoken agenda for the events of one query span.
pub fn format_agenda(span: AgendaSpan, events: &[CalendarEvent], lexicon: &Lexicon) -> String {
    if events.is_empty() {
        return match span {
            AgendaSpan::Today => "No upcoming events today found.",
            AgendaSpan::Tomorrow => "No events found tomorrow.",
            AgendaSpan::ThisWeek => "No events found this week.",
        }
        .to_string();
    }

    let mut response = match span {
        AgendaSpan::Today => "Today's events:\n",
        AgendaSpan::Tomorrow => "Tomorrow's events:\n",
        AgendaSpan::ThisWeek => "This week's events:\n",
    }
    .to_string();

    for event in events {
        let line = match span {
            AgendaSpan::ThisWeek => {
                let day = weekday_of_timestamp(&event.start)
                    .map(|day| capitalize(lexicon.weekdays().name(day)))
                    .unwrap_or_else(|| "Unknown day".to_string());
                format!("On {} {} - {}\n", day, event.time_range(), event.summary)
            }
            _ => format!("{} - {}\n", capitalize(&event.time_range()), event.summary),
        };
        response.push_str(&line);
    }
    response
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
