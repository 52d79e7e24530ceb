//! Canned backend data for dry runs
//!
//! Lets each dry-run handler read out the reply its module would give,
//! rendered from fixed sample data instead of a live service.

use chrono::{Duration, NaiveDate};
use marvin::{
    dates::AgendaSpan,
    intents::{
        calendar::CalendarEvent,
        music::{Playlist, PlaylistCatalog, Volume},
        sports::{GameResult, TeamDirectory},
        weather::Forecast,
    },
};

const PLAYLISTS: [&str; 7] = [
    "Discover Weekly",
    "Release Radar",
    "Morning Run",
    "Focus",
    "Road Trip",
    "Dinner Jazz",
    "Throwbacks",
];

/// Days from today, start and end clock (`None` for all-day), summary.
const EVENTS: [(i64, Option<(&str, &str)>, &str); 4] = [
    (0, Some(("09:15", "10:00")), "Team standup"),
    (0, Some(("16:30", "17:00")), "Dentist"),
    (1, None, "Offsite"),
    (3, Some(("12:00", "13:00")), "Lunch with Sam"),
];

const HOME: &str = "san francisco";
const SEASON_RECORD: (u32, u32) = (60, 40);

pub struct SampleBackend {
    owner: String,
    catalog: PlaylistCatalog,
    volume: Volume,
}

impl SampleBackend {
    pub fn new(owner: &str) -> Self {
        let playlists = PLAYLISTS
            .iter()
            .enumerate()
            .map(|(index, name)| Playlist {
                name: name.to_string(),
                uri: format!("spotify:playlist:sample{}", index + 1),
            })
            .collect();

        Self {
            owner: owner.to_string(),
            catalog: PlaylistCatalog::new(playlists),
            volume: Volume::new(60),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn catalog(&self) -> &PlaylistCatalog {
        &self.catalog
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Forecast for `place`, or for the home location when none is given.
    pub fn forecast(&self, place: Option<&str>) -> Forecast {
        Forecast {
            place: place.unwrap_or(HOME).to_string(),
            condition_code: 801,
            min_temperature: 58.0,
            max_temperature: 71.0,
        }
    }

    /// Sample events falling inside `span`, dated relative to `today`.
    pub fn events(&self, span: AgendaSpan, today: NaiveDate) -> Vec<CalendarEvent> {
        let days = match span {
            AgendaSpan::Today => 0..1,
            AgendaSpan::Tomorrow => 1..2,
            AgendaSpan::ThisWeek => 0..6,
        };

        EVENTS
            .iter()
            .filter(|(offset, _, _)| days.contains(offset))
            .map(|(offset, clock, summary)| {
                let date = (today + Duration::days(*offset))
                    .format("%Y-%m-%d")
                    .to_string();
                let (start, end) = match clock {
                    Some((start, end)) => (
                        format!("{}T{}:00-07:00", date, start),
                        format!("{}T{}:00-07:00", date, end),
                    ),
                    None => (date.clone(), date),
                };
                CalendarEvent {
                    summary: summary.to_string(),
                    start,
                    end,
                }
            })
            .collect()
    }

    /// A made-up but repeatable price for `ticker`.
    pub fn quote(&self, ticker: &str) -> f64 {
        let seed: u32 = ticker.bytes().map(u32::from).sum();
        50.0 + f64::from(seed % 4000) / 16.0
    }

    /// Last game of `team`: a 5 to 3 win over a fixed rival.
    pub fn game(&self, team: &str) -> GameResult {
        let directory = TeamDirectory::standard();
        let rival = if directory.abbreviation(team) == Some("BOS") {
            "NYY"
        } else {
            "BOS"
        };
        GameResult {
            opponent: directory.team(rival).unwrap_or(rival).to_string(),
            runs: 5,
            runs_against: 3,
        }
    }

    pub fn record(&self) -> (u32, u32) {
        SEASON_RECORD
    }
}
