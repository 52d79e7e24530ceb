//! Text message commands and the compose-and-confirm dialog.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    conversation::Conversation,
    lexicon::Lexicon,
    pattern::{ExtractionError, PatternTable},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsIntent {
    Send,
}

impl Intent for SmsIntent {
    fn label(&self) -> &'static str {
        match self {
            SmsIntent::Send => "send",
        }
    }
}

static SMS_TABLE: Lazy<PatternTable<SmsIntent>> = Lazy::new(|| {
    PatternTable::new(ModuleName::Sms).rule(
        "send",
        r"[a-z' ]*send( | a )(message|text|sms)[a-z' ]*",
        |_, _| Ok(SmsIntent::Send),
    )
});

pub struct SmsClassifier {
    lexicon: Arc<Lexicon>,
}

impl SmsClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<SmsIntent> {
        &SMS_TABLE
    }
}

impl Classifier for SmsClassifier {
    type Intent = SmsIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Sms
    }

    fn classify(&self, utterance: &str) -> Result<Option<SmsIntent>, ExtractionError> {
        SMS_TABLE.classify(utterance, &self.lexicon)
    }
}

/// A confirmed message ready to hand to the SMS gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingSms {
    pub to: String,
    pub body: String,
}

/// Walks the user through choosing a recipient and a message body, asking for
/// confirmation of each before anything is sent.
#[derive(Debug, Clone)]
pub struct SmsComposer {
    suffix: String,
    country_prefix: String,
}

impl SmsComposer {
    pub fn new(sender_name: &str, country_prefix: impl Into<String>) -> Self {
        Self {
            suffix: format!("Sent from Marvin by: {}", sender_name),
            country_prefix: country_prefix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Runs the dialog. Returns `None` if the input closes before both the
    /// number and the message are confirmed.
    pub fn compose(
        &self,
        conversation: &mut dyn Conversation,
        lexicon: &Lexicon,
    ) -> Option<OutgoingSms> {
        conversation.say("To what number?");
        let first_number = normalize_number(&conversation.listen()?);
        let number = confirmed(
            conversation,
            lexicon,
            first_number,
            "Please confirm number",
            "Enter number again please: ",
            normalize_number,
        )?;

        conversation.say("Ready for message");
        let first_draft = conversation.listen()?;
        let message = confirmed(
            conversation,
            lexicon,
            first_draft,
            "Please confirm message",
            "Enter message again please: ",
            |reply| reply.to_string(),
        )?;

        Some(OutgoingSms {
            to: format!("{}{}", self.country_prefix, number),
            body: format!("{}\n{}", message, self.suffix),
        })
    }
}

fn confirmed(
    conversation: &mut dyn Conversation,
    lexicon: &Lexicon,
    mut value: String,
    confirm_prompt: &str,
    retry_prompt: &str,
    normalize: fn(&str) -> String,
) -> Option<String> {
    loop {
        conversation.say(&format!("{}: {}", confirm_prompt, value));
        if lexicon.is_affirmative(&conversation.listen()?) {
            return Some(value);
        }
        conversation.say(retry_prompt);
        value = normalize(&conversation.listen()?);
    }
}

fn normalize_number(reply: &str) -> String {
    reply
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ScriptedConversation;

    fn classify(utterance: &str) -> Option<SmsIntent> {
        SmsClassifier::new(Arc::new(Lexicon::new()))
            .classify(utterance)
            .expect("sms extraction")
    }

    #[test]
    fn send_phrasings() {
        assert_eq!(classify("send a text"), Some(SmsIntent::Send));
        assert_eq!(classify("please send a message to mom"), Some(SmsIntent::Send));
        assert_eq!(classify("send sms"), Some(SmsIntent::Send));
        assert_eq!(classify("text my brother"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn compose_confirms_number_and_message() {
        let lexicon = Lexicon::new();
        let composer = SmsComposer::new("Sam", "+1");
        let mut conversation =
            ScriptedConversation::new(["555-123-4567", "yes", "running late", "sure"]);

        let sms = composer.compose(&mut conversation, &lexicon).unwrap();

        assert_eq!(sms.to, "+15551234567");
        assert_eq!(sms.body, "running late\nSent from Marvin by: Sam");
        assert_eq!(
            conversation.said(),
            &[
                "To what number?".to_string(),
                "Please confirm number: 5551234567".to_string(),
                "Ready for message".to_string(),
                "Please confirm message: running late".to_string(),
            ]
        );
    }

    #[test]
    fn rejected_values_are_asked_again() {
        let lexicon = Lexicon::new();
        let composer = SmsComposer::new("Sam", "+44");
        let mut conversation = ScriptedConversation::new([
            "111",
            "no",
            "222-333",
            "ok",
            "helo",
            "nope",
            "hello",
            "yes",
        ]);

        let sms = composer.compose(&mut conversation, &lexicon).unwrap();

        assert_eq!(sms.to, "+44222333");
        assert_eq!(sms.body, "hello\nSent from Marvin by: Sam");
        assert!(conversation
            .said()
            .contains(&"Enter number again please: ".to_string()));
        assert!(conversation
            .said()
            .contains(&"Enter message again please: ".to_string()));
    }

    #[test]
    fn closed_input_abandons_the_message() {
        let lexicon = Lexicon::new();
        let composer = SmsComposer::new("Sam", "+1");
        let mut conversation = ScriptedConversation::new(["5551234567", "yes"]);
        assert_eq!(composer.compose(&mut conversation, &lexicon), None);
    }
}
