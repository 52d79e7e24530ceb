//! The speaking and listening side of a dispatch.

use std::collections::VecDeque;

/// Output sink and follow-up input source for one command.
///
/// Modules that need more than the original utterance, such as the SMS
/// dialog, ask through [`Conversation::listen`].
pub trait Conversation {
    fn say(&mut self, text: &str);

    /// Next user reply, or `None` once input is closed.
    fn listen(&mut self) -> Option<String>;
}

/// Replays canned replies and records everything said. Used by tests and by
/// dry runs.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConversation {
    replies: VecDeque<String>,
    said: Vec<String>,
}

impl ScriptedConversation {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            said: Vec::new(),
        }
    }

    pub fn said(&self) -> &[String] {
        &self.said
    }

    /// The most recent thing said, if any.
    pub fn last_said(&self) -> Option<&str> {
        self.said.last().map(String::as_str)
    }
}

impl Conversation for ScriptedConversation {
    fn say(&mut self, text: &str) {
        self.said.push(text.to_string());
    }

    fn listen(&mut self) -> Option<String> {
        self.replies.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replies_run_out() {
        let mut conversation = ScriptedConversation::new(["first"]);
        conversation.say("hello");
        assert_eq!(conversation.listen().as_deref(), Some("first"));
        assert_eq!(conversation.listen(), None);
        assert_eq!(conversation.last_said(), Some("hello"));
    }
}
