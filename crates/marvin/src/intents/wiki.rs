//! Encyclopedia lookups.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    extract::{after, before, strip_question, AnchorMissing},
    lexicon::Lexicon,
    pattern::{ExtractionError, PatternTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WikiIntent {
    Search { query: String },
}

impl Intent for WikiIntent {
    fn label(&self) -> &'static str {
        match self {
            WikiIntent::Search { .. } => "search",
        }
    }
}

fn search_terms(command: &str, _: &Lexicon) -> Result<WikiIntent, AnchorMissing> {
    let query = if command.contains("search ") && !command.contains("look up ") {
        after(command, "search ")?
    } else {
        after(command, "look up ")?
    };
    Ok(search(query))
}

fn question_terms(command: &str, _: &Lexicon) -> Result<WikiIntent, AnchorMissing> {
    let query = if command.contains("what is ") {
        after(command, "what is ")?
    } else {
        after(command, "who is ")?
    };
    Ok(search(query))
}

fn search(query: &str) -> WikiIntent {
    WikiIntent::Search {
        query: strip_question(before(query, " on wikipedia")).trim().to_string(),
    }
}

static WIKI_TABLE: Lazy<PatternTable<WikiIntent>> = Lazy::new(|| {
    PatternTable::new(ModuleName::Wiki)
        .rule(
            "search",
            r"[a-z' ]*(search|look up) [a-z'0-9 :]+(on wikipedia)?",
            search_terms,
        )
        .rule(
            "search",
            r"[a-z' ]*(what is|who is) [a-z'0-9 :]+\??",
            question_terms,
        )
});

pub struct WikiClassifier {
    lexicon: Arc<Lexicon>,
}

impl WikiClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<WikiIntent> {
        &WIKI_TABLE
    }
}

impl Classifier for WikiClassifier {
    type Intent = WikiIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Wiki
    }

    fn classify(&self, utterance: &str) -> Result<Option<WikiIntent>, ExtractionError> {
        WIKI_TABLE.classify(utterance, &self.lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(utterance: &str) -> Option<WikiIntent> {
        WikiClassifier::new(Arc::new(Lexicon::new()))
            .classify(utterance)
            .expect("wiki extraction")
    }

    fn search(query: &str) -> Option<WikiIntent> {
        Some(WikiIntent::Search {
            query: query.to_string(),
        })
    }

    #[test]
    fn explicit_searches() {
        assert_eq!(classify("search alan turing"), search("alan turing"));
        assert_eq!(
            classify("look up the eiffel tower on wikipedia"),
            search("the eiffel tower")
        );
        assert_eq!(
            classify("can you search for star wars: a new hope"),
            search("for star wars: a new hope")
        );
    }

    #[test]
    fn look_up_wins_over_search() {
        assert_eq!(
            classify("search engines look up python"),
            search("python")
        );
    }

    #[test]
    fn questions() {
        assert_eq!(classify("what is a quasar?"), search("a quasar"));
        assert_eq!(classify("who is ada lovelace"), search("ada lovelace"));
        assert_eq!(
            classify("tell me who is the president of france?"),
            search("the president of france")
        );
    }

    #[test]
    fn non_questions() {
        assert_eq!(classify("what's up"), None);
        assert_eq!(classify("search"), None);
        assert_eq!(classify(""), None);
    }
}
