//! Shared word tables used by argument extraction.
//!
//! A single [`Lexicon`] is built at startup and handed to every classifier
//! behind an `Arc`; nothing in here is mutated after construction.

use std::collections::HashMap;

use chrono::Weekday;

/// Regex alternation of every weekday name, for use inside command patterns.
pub const WEEKDAY_ALTERNATION: &str =
    "(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";

const UNITS: [(&str, u32); 9] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
];

const TEENS: [(&str, u32); 10] = [
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

// "fourty" is a common misspelling that speech transcripts still produce.
const TENS: [(&str, u32); 5] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fourty", 40),
    ("fifty", 50),
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Spelled-out English numbers from "one" to "fifty nine".
#[derive(Debug, Clone)]
pub struct NumeralLexicon {
    words: HashMap<String, u32>,
}

impl NumeralLexicon {
    pub fn new() -> Self {
        let mut words = HashMap::new();

        for (word, value) in UNITS.iter().chain(TEENS.iter()).chain(TENS.iter()) {
            words.insert(word.to_string(), *value);
        }
        for (tens_word, tens) in TENS {
            for (unit_word, unit) in UNITS {
                words.insert(format!("{} {}", tens_word, unit_word), tens + unit);
            }
        }

        Self { words }
    }

    /// Value of a spelled-out number, e.g. `"twenty one"` -> `21`.
    pub fn value(&self, phrase: &str) -> Option<u32> {
        self.words.get(phrase.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for NumeralLexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Weekday names <-> [`Weekday`], Monday being index 0.
#[derive(Debug, Clone)]
pub struct WeekdayLexicon {
    by_name: HashMap<&'static str, Weekday>,
}

impl WeekdayLexicon {
    pub fn new() -> Self {
        Self {
            by_name: WEEKDAYS.iter().copied().collect(),
        }
    }

    pub fn weekday(&self, name: &str) -> Option<Weekday> {
        self.by_name.get(name.trim()).copied()
    }

    pub fn name(&self, weekday: Weekday) -> &'static str {
        WEEKDAYS[weekday.num_days_from_monday() as usize].0
    }

    pub fn index(&self, weekday: Weekday) -> u32 {
        weekday.num_days_from_monday()
    }

    pub fn from_index(&self, index: u32) -> Option<Weekday> {
        WEEKDAYS.get(index as usize).map(|(_, day)| *day)
    }
}

impl Default for WeekdayLexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the extractors and conversational helpers need to read.
#[derive(Debug, Clone)]
pub struct Lexicon {
    numerals: NumeralLexicon,
    weekdays: WeekdayLexicon,
    positive_words: Vec<&'static str>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self {
            numerals: NumeralLexicon::new(),
            weekdays: WeekdayLexicon::new(),
            positive_words: vec!["yes", "sure", "ok"],
        }
    }

    pub fn numerals(&self) -> &NumeralLexicon {
        &self.numerals
    }

    pub fn weekdays(&self) -> &WeekdayLexicon {
        &self.weekdays
    }

    /// Whether a reply to a yes/no question counts as a confirmation.
    pub fn is_affirmative(&self, reply: &str) -> bool {
        let reply = reply.trim().to_lowercase();
        self.positive_words.iter().any(|word| *word == reply)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numerals_cover_one_through_fifty_nine() {
        let numerals = NumeralLexicon::new();
        assert_eq!(numerals.value("one"), Some(1));
        assert_eq!(numerals.value("three"), Some(3));
        assert_eq!(numerals.value("nineteen"), Some(19));
        assert_eq!(numerals.value("twenty one"), Some(21));
        assert_eq!(numerals.value("forty two"), Some(42));
        assert_eq!(numerals.value("fourty two"), Some(42));
        assert_eq!(numerals.value("fifty nine"), Some(59));
        assert_eq!(numerals.value("sixty"), None);
        assert_eq!(numerals.value("twentyone"), None);

        let mut values: Vec<u32> = numerals.words.values().copied().collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values, (1..=59).collect::<Vec<_>>());
    }

    #[test]
    fn weekday_lookup_is_bidirectional() {
        let weekdays = WeekdayLexicon::new();
        for index in 0..7 {
            let day = weekdays.from_index(index).unwrap();
            assert_eq!(weekdays.index(day), index);
            assert_eq!(weekdays.weekday(weekdays.name(day)), Some(day));
        }
        assert_eq!(weekdays.weekday("monday"), Some(Weekday::Mon));
        assert_eq!(weekdays.weekday("someday"), None);
        assert_eq!(weekdays.from_index(7), None);
    }

    #[test]
    fn confirmation_words() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_affirmative("yes"));
        assert!(lexicon.is_affirmative(" Sure "));
        assert!(!lexicon.is_affirmative("yes please"));
        assert!(!lexicon.is_affirmative("nope"));
    }
}
