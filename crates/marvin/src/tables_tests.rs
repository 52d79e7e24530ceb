use proptest::{
    prop_assert,
    string::string_regex,
    test_runner::{Config, TestRunner},
};

use crate::{
    intents::{
        CalendarClassifier, MusicClassifier, SmsClassifier, SportsClassifier, StocksClassifier,
        WeatherClassifier, WikiClassifier,
    },
    lexicon::Lexicon,
    pattern::PatternTable,
};

const CASES_PER_RULE: u32 = 512;

/// Generates utterances from every rule's own pattern and checks that the
/// table extracts an intent from each one the rule accepts.
fn assert_extraction_total<I>(table: &PatternTable<I>) {
    let lexicon = Lexicon::new();

    for rule in table.rules() {
        let strategy = string_regex(rule.pattern()).unwrap_or_else(|err| {
            panic!("{} rule `{}` cannot generate input: {}", table.module(), rule.label(), err)
        });
        let mut runner = TestRunner::new(Config::with_cases(CASES_PER_RULE));

        let outcome = runner.run(&strategy, |utterance| {
            if rule.is_match(&utterance) {
                let result = table.classify(&utterance, &lexicon);
                prop_assert!(result.is_ok(), "{:?}", result.err());
            }
            Ok(())
        });

        if let Err(failure) = outcome {
            panic!("{} rule `{}`: {}", table.module(), rule.label(), failure);
        }
    }
}

#[test]
fn music_rules_always_extract() {
    assert_extraction_total(MusicClassifier::table());
}

#[test]
fn weather_rules_always_extract() {
    assert_extraction_total(WeatherClassifier::table());
}

#[test]
fn calendar_rules_always_extract() {
    assert_extraction_total(CalendarClassifier::table());
}

#[test]
fn sms_rules_always_extract() {
    assert_extraction_total(SmsClassifier::table());
}

#[test]
fn stocks_rules_always_extract() {
    assert_extraction_total(StocksClassifier::table());
}

#[test]
fn wiki_rules_always_extract() {
    assert_extraction_total(WikiClassifier::table());
}

#[test]
fn sports_rules_always_extract() {
    assert_extraction_total(SportsClassifier::table());
}

#[test]
fn mixed_case_input_extracts_like_lowercase() {
    let lexicon = Lexicon::new();
    assert_eq!(
        MusicClassifier::table().classify("Play Thriller", &lexicon),
        MusicClassifier::table().classify("play thriller", &lexicon)
    );
    assert_eq!(
        WeatherClassifier::table().classify("weather In Boston today", &lexicon),
        WeatherClassifier::table().classify("weather in boston today", &lexicon)
    );
    assert!(WeatherClassifier::table()
        .classify("weather In Boston today", &lexicon)
        .unwrap()
        .is_some());
}
