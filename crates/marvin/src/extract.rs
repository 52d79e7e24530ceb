//! Anchor-based slicing used by the command extractors.
//!
//! Every helper either finds its anchor or reports [`AnchorMissing`]. A
//! pattern that matched guarantees its anchors are present, so an
//! `AnchorMissing` always means a rule's pattern and extractor disagree.

use thiserror::Error;

/// An extractor could not find the literal it slices on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("anchor {anchor:?} not found")]
pub struct AnchorMissing {
    pub anchor: String,
}

impl AnchorMissing {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
        }
    }
}

pub type Slice<'a> = std::result::Result<&'a str, AnchorMissing>;

/// Text after the first occurrence of `anchor`.
pub fn after<'a>(text: &'a str, anchor: &str) -> Slice<'a> {
    text.find(anchor)
        .map(|index| &text[index + anchor.len()..])
        .ok_or_else(|| AnchorMissing::new(anchor))
}

/// Text after whichever of `anchors` occurs first in `text`.
pub fn after_earliest<'a>(text: &'a str, anchors: &[&str]) -> Slice<'a> {
    anchors
        .iter()
        .filter_map(|anchor| text.find(anchor).map(|index| index + anchor.len()))
        .min()
        .map(|end| &text[end..])
        .ok_or_else(|| AnchorMissing::new(anchors.join("|")))
}

/// Text after the last occurrence of `anchor` that starts a word.
pub fn after_last_word<'a>(text: &'a str, anchor: &str) -> Slice<'a> {
    text.match_indices(anchor)
        .filter(|(index, _)| *index == 0 || text[..*index].ends_with(' '))
        .last()
        .map(|(index, _)| &text[index + anchor.len()..])
        .ok_or_else(|| AnchorMissing::new(anchor))
}

/// Text before the first occurrence of `anchor`, or all of it when absent.
pub fn before<'a>(text: &'a str, anchor: &str) -> &'a str {
    text.split_once(anchor).map_or(text, |(head, _)| head)
}

/// Splits at the last occurrence of `anchor`.
pub fn split_last<'a>(text: &'a str, anchor: &str) -> std::result::Result<(&'a str, &'a str), AnchorMissing> {
    text.rsplit_once(anchor)
        .ok_or_else(|| AnchorMissing::new(anchor))
}

/// Drops every `?` from a spoken question.
pub fn strip_question(text: &str) -> String {
    text.replace('?', "")
}

/// Removes the first suffix in `suffixes` that `text` ends with.
pub fn strip_any_suffix<'a>(text: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text)
}

/// Last whitespace separated word.
pub fn last_word(text: &str) -> &str {
    text.trim_end().rsplit(' ').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_takes_remainder() {
        assert_eq!(after("play thriller by mj", "play "), Ok("thriller by mj"));
        assert_eq!(
            after("stop", "play "),
            Err(AnchorMissing::new("play "))
        );
    }

    #[test]
    fn after_earliest_prefers_first_position() {
        let text = "what is the record for the mets of the year";
        assert_eq!(
            after_earliest(text, &["record of the ", "record for the "]),
            Ok("mets of the year")
        );
        assert!(after_earliest("nothing", &["a ", "b "]).is_err());
    }

    #[test]
    fn after_last_word_skips_word_interiors() {
        assert_eq!(after_last_word("bathe the mets", "the "), Ok("mets"));
        assert_eq!(after_last_word("the mets", "the "), Ok("mets"));
        assert!(after_last_word("bathe mets", "the ").is_err());
    }

    #[test]
    fn suffix_and_question_helpers() {
        assert_eq!(strip_question("what is rust?"), "what is rust");
        assert_eq!(
            strip_any_suffix("boston going to be today", &[" going to be today", " today"]),
            "boston"
        );
        assert_eq!(strip_any_suffix("boston", &[" today"]), "boston");
        assert_eq!(before("a on spotify b", " on spotify"), "a");
        assert_eq!(last_word("game on monday"), "monday");
        assert_eq!(
            split_last("in paris on monday", " on "),
            Ok(("in paris", "monday"))
        );
    }
}
