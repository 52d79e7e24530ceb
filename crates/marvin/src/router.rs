//! Intent Router - Gates an utterance by keyword and dispatches it
//!
//! Every module whose keywords appear in the utterance is offered the command
//! in priority order; the first one that recognises it handles it.

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;

use crate::{
    conversation::Conversation,
    intents::{
        CalendarClassifier, CalendarIntent, Classifier, Intent, ModuleName, MusicClassifier,
        MusicIntent, ParsedCommand, SmsClassifier, SmsIntent, SportsClassifier, SportsIntent,
        StocksClassifier, StocksIntent, WeatherClassifier, WeatherIntent, WikiClassifier,
        WikiIntent,
    },
    lexicon::Lexicon,
    pattern::ExtractionError,
    MarvinError, Result, RouterConfig,
};

/// Failure inside a module's external service call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Input closed before the command finished")]
    ConversationClosed,
}

/// Performs the action for one module's intents.
pub trait IntentHandler<I>: Send + Sync {
    fn handle(
        &self,
        intent: &I,
        conversation: &mut dyn Conversation,
    ) -> std::result::Result<(), BackendError>;
}

/// A dispatch target as seen by the router.
pub trait CommandModule: Send + Sync {
    fn module(&self) -> ModuleName;

    /// Classifies without acting.
    fn parse(&self, command: &str) -> std::result::Result<Option<ParsedCommand>, ExtractionError>;

    /// Classifies and, on a match, runs the action. Returns whether the
    /// command was handled; a failed action still counts.
    fn route_command(&self, command: &str, conversation: &mut dyn Conversation) -> Result<bool>;
}

/// A classifier paired with the handler for its intents.
pub struct ClassifiedModule<C, H> {
    classifier: C,
    handler: H,
}

impl<C, H> ClassifiedModule<C, H>
where
    C: Classifier,
    H: IntentHandler<C::Intent>,
{
    pub fn new(classifier: C, handler: H) -> Self {
        Self {
            classifier,
            handler,
        }
    }
}

impl<C, H> CommandModule for ClassifiedModule<C, H>
where
    C: Classifier,
    H: IntentHandler<C::Intent>,
{
    fn module(&self) -> ModuleName {
        self.classifier.module()
    }

    fn parse(&self, command: &str) -> std::result::Result<Option<ParsedCommand>, ExtractionError> {
        Ok(self.classifier.classify(command)?.map(Into::into))
    }

    fn route_command(&self, command: &str, conversation: &mut dyn Conversation) -> Result<bool> {
        let module = self.module();
        let Some(intent) = self.classifier.classify(command)? else {
            return Ok(false);
        };

        tracing::debug!(%module, label = intent.label(), "dispatching intent");

        if let Err(error) = self.handler.handle(&intent, conversation) {
            tracing::warn!(%module, label = intent.label(), %error, "module action failed");
            conversation.say(module.failure_message());
        }
        Ok(true)
    }
}

const DEFAULT_KEYWORDS: [(ModuleName, &[&str]); 7] = [
    (
        ModuleName::Music,
        &[
            "play", "pause", "stop", "resume", "spotify", "music", "skip", "next", "song",
            "playing", "playlist", "previous", "volume", "sound", "quiet", "loud",
        ],
    ),
    (ModuleName::Weather, &["weather"]),
    (ModuleName::Calendar, &["calendar", "schedule", "events"]),
    (ModuleName::Sms, &["text", "message", "sms"]),
    (
        ModuleName::Wiki,
        &["search", "look up", "what is ", "who is ", "what are ", "who are "],
    ),
    (ModuleName::Sports, &["score", "game", "record"]),
    (ModuleName::Stocks, &["stock"]),
];

/// Cheap pre-filter: a module is only tried when one of its keywords occurs
/// somewhere in the utterance.
#[derive(Debug, Clone)]
pub struct KeywordGate {
    keywords: BTreeMap<ModuleName, Vec<String>>,
}

impl KeywordGate {
    pub fn new() -> Self {
        let keywords = DEFAULT_KEYWORDS
            .into_iter()
            .map(|(module, words)| (module, words.iter().map(|w| w.to_string()).collect()))
            .collect();
        Self { keywords }
    }

    /// Adds configured keywords on top of the defaults.
    pub fn with_extra(mut self, extra: &BTreeMap<ModuleName, Vec<String>>) -> Self {
        for (module, words) in extra {
            let entry = self.keywords.entry(*module).or_default();
            for word in words {
                let word = word.to_lowercase();
                if !word.trim().is_empty() && !entry.contains(&word) {
                    entry.push(word);
                }
            }
        }
        self
    }

    pub fn keywords(&self, module: ModuleName) -> &[String] {
        self.keywords.get(&module).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleName, &[String])> {
        self.keywords
            .iter()
            .map(|(module, words)| (*module, words.as_slice()))
    }

    /// Whether any of `module`'s keywords occurs in the (normalised) command.
    pub fn admits(&self, module: ModuleName, command: &str) -> bool {
        self.keywords(module)
            .iter()
            .any(|keyword| command.contains(keyword.as_str()))
    }

    /// Every module admitted for `command`, in module order.
    pub fn gated(&self, command: &str) -> Vec<ModuleName> {
        self.keywords
            .keys()
            .copied()
            .filter(|module| self.admits(*module, command))
            .collect()
    }
}

impl Default for KeywordGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes free-text commands to the registered modules.
pub struct IntentRouter {
    lexicon: Arc<Lexicon>,
    gate: KeywordGate,
    modules: Vec<Box<dyn CommandModule>>,
    fallback_message: String,
}

impl IntentRouter {
    pub fn builder() -> IntentRouterBuilder {
        IntentRouterBuilder::new()
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn gate(&self) -> &KeywordGate {
        &self.gate
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Registered modules in dispatch order.
    pub fn modules(&self) -> Vec<ModuleName> {
        self.modules.iter().map(|module| module.module()).collect()
    }

    /// Registered modules admitted by the keyword gate, in dispatch order.
    pub fn gated_modules(&self, utterance: &str) -> Vec<ModuleName> {
        let command = normalize(utterance);
        self.admitted(&command).map(|module| module.module()).collect()
    }

    /// The command the first admitting module recognises, without acting on it.
    pub fn classify(
        &self,
        utterance: &str,
    ) -> std::result::Result<Option<ParsedCommand>, ExtractionError> {
        let command = normalize(utterance);
        if command.is_empty() {
            return Ok(None);
        }
        for module in self.admitted(&command) {
            if let Some(parsed) = module.parse(&command)? {
                return Ok(Some(parsed));
            }
        }
        Ok(None)
    }

    /// Dispatches one utterance. Says the fallback message and returns
    /// `Ok(false)` when no module handles it.
    pub fn route(&self, utterance: &str, conversation: &mut dyn Conversation) -> Result<bool> {
        let command = normalize(utterance);

        if !command.is_empty() {
            for module in self.admitted(&command) {
                if module.route_command(&command, conversation)? {
                    tracing::info!(module = %module.module(), "command handled");
                    return Ok(true);
                }
            }
        }

        tracing::info!(command = %command, "no module handled command");
        conversation.say(&self.fallback_message);
        Ok(false)
    }

    fn admitted<'a>(&'a self, command: &'a str) -> impl Iterator<Item = &'a dyn CommandModule> {
        self.modules
            .iter()
            .map(|module| module.as_ref())
            .filter(move |module| self.gate.admits(module.module(), command))
    }
}

fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Assembles an [`IntentRouter`]. Classifiers registered through the
/// per-module methods share the builder's lexicon, so call
/// [`with_lexicon`](Self::with_lexicon) first when supplying one.
pub struct IntentRouterBuilder {
    config: RouterConfig,
    lexicon: Arc<Lexicon>,
    modules: Vec<Box<dyn CommandModule>>,
}

impl IntentRouterBuilder {
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            lexicon: Arc::new(Lexicon::new()),
            modules: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn module(mut self, module: impl CommandModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn music(self, handler: impl IntentHandler<MusicIntent> + 'static) -> Self {
        let classifier = MusicClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn weather(self, handler: impl IntentHandler<WeatherIntent> + 'static) -> Self {
        let classifier = WeatherClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn calendar(self, handler: impl IntentHandler<CalendarIntent> + 'static) -> Self {
        let classifier = CalendarClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn sms(self, handler: impl IntentHandler<SmsIntent> + 'static) -> Self {
        let classifier = SmsClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn stocks(self, handler: impl IntentHandler<StocksIntent> + 'static) -> Self {
        let classifier = StocksClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn wiki(self, handler: impl IntentHandler<WikiIntent> + 'static) -> Self {
        let classifier = WikiClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    pub fn sports(self, handler: impl IntentHandler<SportsIntent> + 'static) -> Self {
        let classifier = SportsClassifier::new(self.lexicon.clone());
        self.module(ClassifiedModule::new(classifier, handler))
    }

    /// Orders the registered modules by the configured priority. Modules left
    /// out of the priority list are not dispatched to.
    pub fn build(self) -> Result<IntentRouter> {
        self.config.validate()?;

        let mut slots: BTreeMap<usize, Box<dyn CommandModule>> = BTreeMap::new();
        for module in self.modules {
            let name = module.module();
            let Some(rank) = self.config.priority.iter().position(|m| *m == name) else {
                tracing::warn!(module = %name, "module missing from router priority; skipped");
                continue;
            };
            if slots.insert(rank, module).is_some() {
                return Err(MarvinError::ConfigError(format!(
                    "module {} registered more than once",
                    name
                )));
            }
        }

        let modules: Vec<_> = slots.into_values().collect();
        tracing::debug!(
            modules = ?modules.iter().map(|m| m.module()).collect::<Vec<_>>(),
            "intent router built"
        );

        let extra_keywords = self.config.extra_keywords_by_module()?;
        Ok(IntentRouter {
            lexicon: self.lexicon,
            gate: KeywordGate::new().with_extra(&extra_keywords),
            modules,
            fallback_message: self.config.fallback_message,
        })
    }
}

impl Default for IntentRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
