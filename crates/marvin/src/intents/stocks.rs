//! Stock quote commands.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    extract::{after, strip_any_suffix, strip_question, AnchorMissing},
    lexicon::Lexicon,
    pattern::{ExtractionError, PatternTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StocksIntent {
    Price { ticker: String },
}

impl Intent for StocksIntent {
    fn label(&self) -> &'static str {
        match self {
            StocksIntent::Price { .. } => "price",
        }
    }
}

fn ticker(command: &str, _: &Lexicon) -> Result<StocksIntent, AnchorMissing> {
    let command = strip_question(command);
    let ticker = after(&command, "price of ")?;
    let ticker = strip_any_suffix(ticker, &[" today"]);
    let ticker = strip_any_suffix(ticker, &[" stock"]);
    Ok(StocksIntent::Price {
        ticker: ticker.trim().to_string(),
    })
}

static STOCKS_TABLE: Lazy<PatternTable<StocksIntent>> = Lazy::new(|| {
    PatternTable::new(ModuleName::Stocks)
        .rule(
            "price",
            r"[a-z' ]*stock price of [a-z]+( today)?\??",
            ticker,
        )
        .rule(
            "price",
            r"[a-z' ]*price of [a-z]+ stock( today)?\??",
            ticker,
        )
});

pub struct StocksClassifier {
    lexicon: Arc<Lexicon>,
}

impl StocksClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<StocksIntent> {
        &STOCKS_TABLE
    }
}

impl Classifier for StocksClassifier {
    type Intent = StocksIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Stocks
    }

    fn classify(&self, utterance: &str) -> Result<Option<StocksIntent>, ExtractionError> {
        STOCKS_TABLE.classify(utterance, &self.lexicon)
    }
}

/// Spoken quote, rounded to cents.
pub fn price_sentence(ticker: &str, price: f64) -> String {
    format!("The current price of {} is {:.2} dollars.", ticker, price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(utterance: &str) -> Option<StocksIntent> {
        StocksClassifier::new(Arc::new(Lexicon::new()))
            .classify(utterance)
            .expect("stocks extraction")
    }

    fn price(ticker: &str) -> Option<StocksIntent> {
        Some(StocksIntent::Price {
            ticker: ticker.to_string(),
        })
    }

    #[test]
    fn ticker_phrasings() {
        assert_eq!(classify("what is the stock price of aapl"), price("aapl"));
        assert_eq!(classify("stock price of msft today?"), price("msft"));
        assert_eq!(classify("what's the price of goog stock today"), price("goog"));
        assert_eq!(classify("price of tsla stock?"), price("tsla"));
    }

    #[test]
    fn questions_without_a_ticker() {
        assert_eq!(classify("what is the stock price"), None);
        assert_eq!(classify("price of gas today"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn quote_is_rounded_to_cents() {
        assert_eq!(
            price_sentence("aapl", 190.456),
            "The current price of aapl is 190.46 dollars."
        );
        assert_eq!(
            price_sentence("ge", 12.0),
            "The current price of ge is 12.00 dollars."
        );
    }
}
