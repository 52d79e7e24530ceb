//! Baseball score and record commands.

use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    dates::most_recent_weekday,
    extract::{
        after, after_earliest, after_last_word, before, last_word, strip_any_suffix,
        strip_question, AnchorMissing,
    },
    lexicon::{Lexicon, WEEKDAY_ALTERNATION},
    pattern::{ExtractionError, PatternTable},
};

/// A team's game on the most recent occurrence of `day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuery {
    pub team: String,
    pub day: Weekday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportsIntent {
    ResultToday { team: String },
    ResultYesterday { team: String },
    ResultSpecific(GameQuery),
    Record { team: String },
}

impl SportsIntent {
    pub fn team(&self) -> &str {
        match self {
            SportsIntent::ResultToday { team }
            | SportsIntent::ResultYesterday { team }
            | SportsIntent::Record { team } => team,
            SportsIntent::ResultSpecific(query) => &query.team,
        }
    }

    /// Date of the game a result query asks about. `None` for season records.
    pub fn game_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            SportsIntent::ResultToday { .. } => Some(today),
            SportsIntent::ResultYesterday { .. } => Some(today - Duration::days(1)),
            SportsIntent::ResultSpecific(query) => Some(most_recent_weekday(today, query.day)),
            SportsIntent::Record { .. } => None,
        }
    }

    /// How the game day is referred to when reading out a result.
    pub fn when(&self, lexicon: &Lexicon) -> Option<String> {
        match self {
            SportsIntent::ResultToday { .. } => Some("today".to_string()),
            SportsIntent::ResultYesterday { .. } => Some("yesterday".to_string()),
            SportsIntent::ResultSpecific(query) => {
                Some(format!("on {}", lexicon.weekdays().name(query.day)))
            }
            SportsIntent::Record { .. } => None,
        }
    }
}

impl Intent for SportsIntent {
    fn label(&self) -> &'static str {
        match self {
            SportsIntent::ResultToday { .. } => "result today",
            SportsIntent::ResultYesterday { .. } => "result yesterday",
            SportsIntent::ResultSpecific(_) => "result specific",
            SportsIntent::Record { .. } => "record",
        }
    }
}

const TEAMS: [(&str, &str); 29] = [
    ("diamondbacks", "ARI"),
    ("braves", "ATL"),
    ("orioles", "BAL"),
    ("red sox", "BOS"),
    ("cubs", "CHC"),
    ("white sox", "CHW"),
    ("indians", "CLE"),
    ("rockies", "COL"),
    ("tigers", "DET"),
    ("marlins", "MIA"),
    ("astros", "HOU"),
    ("royals", "KC"),
    ("angels", "LAA"),
    ("dodgers", "LAD"),
    ("brewers", "MIL"),
    ("twins", "MIN"),
    ("mets", "NYM"),
    ("yankees", "NYY"),
    ("a's", "OAK"),
    ("phillies", "PHI"),
    ("pirates", "PIT"),
    ("mariners", "SEA"),
    ("padres", "SD"),
    ("giants", "SFG"),
    ("cardinals", "STL"),
    ("rays", "TB"),
    ("rangers", "TEX"),
    ("blue jays", "TOR"),
    ("nationals", "WSN"),
];

/// Abbreviations some schedules use in place of the canonical one.
const ABBREVIATION_ALIASES: [(&str, &str); 1] = [("SF", "SFG")];

static TEAM_DIRECTORY: Lazy<TeamDirectory> = Lazy::new(TeamDirectory::new);

/// Baseball team names and their schedule abbreviations.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    by_name: HashMap<&'static str, &'static str>,
    by_abbreviation: HashMap<&'static str, &'static str>,
}

impl TeamDirectory {
    pub fn new() -> Self {
        let by_name: HashMap<_, _> = TEAMS.into_iter().collect();
        let mut by_abbreviation: HashMap<_, _> =
            TEAMS.into_iter().map(|(name, abbrev)| (abbrev, name)).collect();
        for (alias, canonical) in ABBREVIATION_ALIASES {
            if let Some(name) = by_abbreviation.get(canonical).copied() {
                by_abbreviation.insert(alias, name);
            }
        }
        Self {
            by_name,
            by_abbreviation,
        }
    }

    pub fn standard() -> &'static TeamDirectory {
        &TEAM_DIRECTORY
    }

    pub fn abbreviation(&self, team: &str) -> Option<&'static str> {
        self.by_name.get(team.trim()).copied()
    }

    pub fn team(&self, abbreviation: &str) -> Option<&'static str> {
        self.by_abbreviation
            .get(abbreviation.trim().to_uppercase().as_str())
            .copied()
    }

    pub fn is_known(&self, team: &str) -> bool {
        self.abbreviation(team).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// `yankees'` and `yankee's` style possessives reduced to the team name,
/// leaving names such as `a's` alone.
fn normalize_team(raw: &str) -> String {
    let raw = raw.trim();
    if TeamDirectory::standard().is_known(raw) {
        return raw.to_string();
    }
    strip_any_suffix(raw, &["'s", "'"]).to_string()
}

fn game_team(command: &str) -> Result<String, AnchorMissing> {
    let team = after(command, "score of the ")?;
    Ok(normalize_team(before(team, " game")))
}

fn result_today(command: &str, _: &Lexicon) -> Result<SportsIntent, AnchorMissing> {
    Ok(SportsIntent::ResultToday {
        team: game_team(command)?,
    })
}

fn result_yesterday(command: &str, _: &Lexicon) -> Result<SportsIntent, AnchorMissing> {
    Ok(SportsIntent::ResultYesterday {
        team: game_team(command)?,
    })
}

fn result_specific(command: &str, lexicon: &Lexicon) -> Result<SportsIntent, AnchorMissing> {
    let command = strip_question(command);
    let day = lexicon
        .weekdays()
        .weekday(last_word(&command))
        .ok_or_else(|| AnchorMissing::new(WEEKDAY_ALTERNATION))?;
    Ok(SportsIntent::ResultSpecific(GameQuery {
        team: game_team(&command)?,
        day,
    }))
}

fn without_season(team: &str) -> &str {
    strip_any_suffix(team.trim_end(), &[" this year"])
}

fn record_of(command: &str, _: &Lexicon) -> Result<SportsIntent, AnchorMissing> {
    let command = strip_question(command);
    let team = after_earliest(&command, &["record of the ", "record for the "])?;
    Ok(SportsIntent::Record {
        team: normalize_team(without_season(team)),
    })
}

fn team_record(command: &str, _: &Lexicon) -> Result<SportsIntent, AnchorMissing> {
    let command = strip_question(command);
    let clause = strip_any_suffix(&command, &[" record this year", " record"]);
    let team = after_last_word(clause, "the ")?;
    Ok(SportsIntent::Record {
        team: normalize_team(team),
    })
}

static SPORTS_TABLE: Lazy<PatternTable<SportsIntent>> = Lazy::new(|| {
    const LEAD: &str = r"[a-z' ]*score of the [a-z' ]+ game";
    const TEAM: &str = r"[a-z' ]+";

    PatternTable::new(ModuleName::Sports)
        .rule("result today", &format!(r"{LEAD}( today)?\??"), result_today)
        .rule(
            "result yesterday",
            &format!(r"{LEAD} yesterday\??"),
            result_yesterday,
        )
        .rule(
            "result specific",
            &format!(r"{LEAD} (on|last) {WEEKDAY_ALTERNATION}\??"),
            result_specific,
        )
        .rule(
            "record",
            &format!(r"[a-z' ]*record (of|for) the {TEAM}( this year)?\??"),
            record_of,
        )
        .rule(
            "record",
            &format!(r"(?:[a-z' ]* )?the {TEAM} record( this year)?\??"),
            team_record,
        )
});

pub struct SportsClassifier {
    lexicon: Arc<Lexicon>,
}

impl SportsClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<SportsIntent> {
        &SPORTS_TABLE
    }
}

impl Classifier for SportsClassifier {
    type Intent = SportsIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Sports
    }

    fn classify(&self, utterance: &str) -> Result<Option<SportsIntent>, ExtractionError> {
        SPORTS_TABLE.classify(utterance, &self.lexicon)
    }
}

/// Final score of one game, from the asking team's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub opponent: String,
    pub runs: u32,
    pub runs_against: u32,
}

/// e.g. `the yankees beat the red sox on monday, 5 to 3`.
pub fn result_sentence(team: &str, when: &str, result: &GameResult) -> String {
    let outcome = if result.runs > result.runs_against {
        "beat"
    } else {
        "lost to"
    };
    format!(
        "the {} {} the {} {}, {} to {}",
        team, outcome, result.opponent, when, result.runs, result.runs_against
    )
}

/// e.g. `the mets are 60-40 this year`.
pub fn record_sentence(team: &str, wins: u32, losses: u32) -> String {
    format!("the {} are {}-{} this year", team, wins, losses)
}
