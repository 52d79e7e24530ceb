//! Date and time helpers shared by the calendar, sports and weather commands.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Most recent occurrence of `target` on or before `today`.
///
/// Weekday references in commands ("the game last tuesday") are historical
/// lookups, so this never resolves into the future.
pub fn most_recent_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;

    if current >= wanted {
        today - Duration::days(current - wanted)
    } else {
        today - Duration::days((current - wanted).rem_euclid(7))
    }
}

/// Converts the `HH:MM` part of an ISO-8601 timestamp to a 12-hour clock.
///
/// Afternoon hours are reduced by twelve (`16:30` -> `4:30 PM`); morning
/// hours keep the digits of the source slice (`09:15` -> `09:15 AM`) and noon
/// stays `12:MM PM`. Returns `None` for a malformed clock or when the
/// timestamp carries no time part, as with all-day calendar events.
pub fn civilian_time(timestamp: &str) -> Option<String> {
    let (_, time) = timestamp.split_once('T')?;
    let clock = time.get(..5)?;
    let (hour, minute) = clock.split_once(':')?;
    let two_digits = |part: &str| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit());
    if !two_digits(hour) || !two_digits(minute) {
        return None;
    }
    let hour_value: u32 = hour.parse().ok()?;
    if hour_value > 23 {
        return None;
    }

    let formatted = if hour_value > 12 {
        format!("{}:{} PM", hour_value - 12, minute)
    } else if hour_value == 12 {
        format!("{}:{} PM", hour, minute)
    } else {
        format!("{}:{} AM", hour, minute)
    };
    Some(formatted)
}

/// Weekday of the date at the start of a `YYYY-MM-DD...` timestamp.
pub fn weekday_of_timestamp(timestamp: &str) -> Option<Weekday> {
    let date = timestamp.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|date| date.weekday())
}

/// Date label used by baseball schedule tables, e.g. `Monday, Jul 30`.
pub fn schedule_index(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

/// Span of days an agenda query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AgendaSpan {
    Today,
    Tomorrow,
    ThisWeek,
}

/// UTC bounds of an agenda query, formatted the way calendar APIs expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub time_min: String,
    pub time_max: String,
}

impl EventWindow {
    pub fn for_span(span: AgendaSpan, today: NaiveDate) -> Self {
        let (start, end) = match span {
            AgendaSpan::Today => (today, today + Duration::days(1)),
            AgendaSpan::Tomorrow => (today + Duration::days(1), today + Duration::days(2)),
            // The week window starts today and covers the following six days.
            AgendaSpan::ThisWeek => (today, today + Duration::days(6)),
        };

        Self {
            time_min: midnight_utc(start),
            time_max: midnight_utc(end),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}
