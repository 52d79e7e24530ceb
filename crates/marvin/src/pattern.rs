//! Ordered pattern tables.
//!
//! A [`PatternTable`] is a list of [`Rule`]s, each pairing a whole-utterance
//! regex with the extractor that slices its arguments. Rules are tried in
//! declaration order and the first full match wins.

use regex::Regex;
use thiserror::Error;

use crate::{extract::AnchorMissing, intents::ModuleName, lexicon::Lexicon};

/// Pulls a typed intent out of an utterance its rule already matched.
pub type Extractor<I> = fn(&str, &Lexicon) -> std::result::Result<I, AnchorMissing>;

/// A rule matched but its extractor could not find an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{module} rule `{label}` matched {utterance:?} but anchor {anchor:?} is missing")]
pub struct ExtractionError {
    pub module: ModuleName,
    pub label: &'static str,
    pub anchor: String,
    pub utterance: String,
}

/// One intent label, one anchored pattern and its extractor.
pub struct Rule<I> {
    label: &'static str,
    pattern: String,
    regex: Regex,
    extract: Extractor<I>,
}

impl<I> Rule<I> {
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The pattern as declared, without the whole-string anchors.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whole-string match against an already lowercased utterance.
    pub fn is_match(&self, utterance: &str) -> bool {
        self.regex.is_match(utterance)
    }
}

impl<I> std::fmt::Debug for Rule<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("pattern", &self.pattern)
            .finish()
    }
}

#[derive(Debug)]
pub struct PatternTable<I> {
    module: ModuleName,
    rules: Vec<Rule<I>>,
}

impl<I> PatternTable<I> {
    pub fn new(module: ModuleName) -> Self {
        Self {
            module,
            rules: Vec::new(),
        }
    }

    /// Appends a rule. The pattern must consume the whole utterance to match
    /// and is written in lowercase; [`classify`](Self::classify) lowercases
    /// the utterance before matching.
    ///
    /// Panics if `pattern` is not a valid regex; tables are built from
    /// literals at startup.
    pub fn rule(mut self, label: &'static str, pattern: &str, extract: Extractor<I>) -> Self {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored)
            .unwrap_or_else(|err| panic!("invalid {} pattern for `{}`: {}", self.module, label, err));
        self.rules.push(Rule {
            label,
            pattern: pattern.to_string(),
            regex,
            extract,
        });
        self
    }

    pub fn module(&self) -> ModuleName {
        self.module
    }

    pub fn rules(&self) -> &[Rule<I>] {
        &self.rules
    }

    /// Intent labels in declaration order, without repeats.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for rule in &self.rules {
            if !labels.contains(&rule.label) {
                labels.push(rule.label);
            }
        }
        labels
    }

    /// First rule that fully matches `utterance`, with its extracted intent.
    /// Matching and extraction both see the lowercased utterance.
    pub fn classify(
        &self,
        utterance: &str,
        lexicon: &Lexicon,
    ) -> std::result::Result<Option<I>, ExtractionError> {
        let lowered = utterance.to_lowercase();
        let utterance = lowered.as_str();
        let Some(rule) = self.rules.iter().find(|rule| rule.is_match(utterance)) else {
            return Ok(None);
        };

        tracing::trace!(module = %self.module, label = rule.label, "pattern matched");

        match (rule.extract)(utterance, lexicon) {
            Ok(intent) => Ok(Some(intent)),
            Err(missing) => {
                tracing::error!(
                    module = %self.module,
                    label = rule.label,
                    anchor = %missing.anchor,
                    "pattern matched but extractor lost its anchor"
                );
                Err(ExtractionError {
                    module: self.module,
                    label: rule.label,
                    anchor: missing.anchor,
                    utterance: utterance.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::after;

    #[derive(Debug, PartialEq)]
    enum Toy {
        Greet,
        Echo(String),
    }

    fn table() -> PatternTable<Toy> {
        PatternTable::new(ModuleName::Wiki)
            .rule("greet", "(hello|hi)( there)?", |_, _| Ok(Toy::Greet))
            .rule("echo", "[a-z ]*say [a-z ]+", |text, _| {
                Ok(Toy::Echo(after(text, "say ")?.to_string()))
            })
            .rule("broken", "[a-z ]*shout [a-z ]+", |text, _| {
                Ok(Toy::Echo(after(text, "yell ")?.to_string()))
            })
    }

    #[test]
    fn whole_string_match_is_required() {
        let lexicon = Lexicon::new();
        let table = table();
        assert_eq!(table.classify("hello", &lexicon), Ok(Some(Toy::Greet)));
        assert_eq!(table.classify("Hello There", &lexicon), Ok(Some(Toy::Greet)));
        assert_eq!(table.classify("hello world", &lexicon), Ok(None));
        assert_eq!(
            table.classify("Please SAY Good Night", &lexicon),
            Ok(Some(Toy::Echo("good night".to_string())))
        );
        assert_eq!(table.classify("", &lexicon), Ok(None));
    }

    #[test]
    fn first_matching_rule_extracts() {
        let lexicon = Lexicon::new();
        assert_eq!(
            table().classify("please say good night", &lexicon),
            Ok(Some(Toy::Echo("good night".to_string())))
        );
    }

    #[test]
    fn extractor_drift_is_reported() {
        let lexicon = Lexicon::new();
        let err = table().classify("shout loudly", &lexicon).unwrap_err();
        assert_eq!(err.module, ModuleName::Wiki);
        assert_eq!(err.label, "broken");
        assert_eq!(err.anchor, "yell ");
        assert_eq!(err.utterance, "shout loudly");
    }

    #[test]
    fn labels_are_deduplicated_in_order() {
        let table = PatternTable::new(ModuleName::Music)
            .rule("a", "a", |_, _| Ok(()))
            .rule("b", "b", |_, _| Ok(()))
            .rule("a", "aa", |_, _| Ok(()));
        assert_eq!(table.labels(), vec!["a", "b"]);
    }
}
