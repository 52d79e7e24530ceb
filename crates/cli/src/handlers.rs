//! Dry-run module actions
//!
//! Each handler says which backend call it would make instead of making it.
//! The SMS handler runs the real compose-and-confirm dialog.

use std::sync::Arc;

use chrono::NaiveDate;
use marvin::{
    dates::{schedule_index, EventWindow},
    intents::{
        calendar::format_agenda,
        sms::SmsComposer,
        sports::{record_sentence, result_sentence, TeamDirectory},
        stocks::price_sentence,
    },
    BackendError, CalendarIntent, Conversation, IntentHandler, IntentRouter, Lexicon,
    MarvinConfig, MusicIntent, SmsIntent, SportsIntent, StocksIntent, WeatherIntent, WikiIntent,
};

use crate::samples::SampleBackend;

type HandlerResult = Result<(), BackendError>;

/// Describes the backend call for every module except SMS, then reads out
/// the reply rendered from sample data.
pub struct DryRun {
    today: NaiveDate,
    lexicon: Arc<Lexicon>,
    samples: Arc<SampleBackend>,
}

impl DryRun {
    pub fn new(today: NaiveDate, lexicon: Arc<Lexicon>, samples: Arc<SampleBackend>) -> Self {
        Self {
            today,
            lexicon,
            samples,
        }
    }

    fn weekday(&self, day: chrono::Weekday) -> &'static str {
        self.lexicon.weekdays().name(day)
    }
}

impl IntentHandler<MusicIntent> for DryRun {
    fn handle(&self, intent: &MusicIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let volume = self.samples.volume();
        let action = match intent {
            MusicIntent::Resume => "Would resume playback".to_string(),
            MusicIntent::Pause => "Would pause playback".to_string(),
            MusicIntent::Next => "Would skip to the next track".to_string(),
            MusicIntent::Previous => "Would go back to the previous track".to_string(),
            MusicIntent::PlayPlaylist(reference) => {
                let playlist = self.samples.catalog().resolve(reference).ok_or_else(|| {
                    BackendError::Request(format!("no playlist matches {:?}", reference))
                })?;
                format!("Would play your playlist {} ({})", playlist.name, playlist.uri)
            }
            MusicIntent::Search { query } => {
                format!("Would search Spotify for {:?} and play the first track", query)
            }
            MusicIntent::Current => "Would read out the current track".to_string(),
            MusicIntent::ListPlaylists => {
                conversation.say("Would list your playlists, five at a time");
                self.samples
                    .catalog()
                    .read_out(self.samples.owner(), conversation, &self.lexicon);
                return Ok(());
            }
            MusicIntent::VolumeUp => format!(
                "Would raise the volume from {}% to {}%",
                volume.percent(),
                volume.up().percent()
            ),
            MusicIntent::VolumeDown => format!(
                "Would lower the volume from {}% to {}%",
                volume.percent(),
                volume.down().percent()
            ),
        };
        conversation.say(&action);
        Ok(())
    }
}

impl IntentHandler<WeatherIntent> for DryRun {
    fn handle(&self, intent: &WeatherIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let (when, place) = match intent {
            WeatherIntent::CurrentToday => ("today".to_string(), None),
            WeatherIntent::CurrentTomorrow => ("tomorrow".to_string(), None),
            WeatherIntent::ExternalToday { location } => ("today".to_string(), Some(location)),
            WeatherIntent::ExternalTomorrow { location } => {
                ("tomorrow".to_string(), Some(location))
            }
            WeatherIntent::CurrentSpecific { day } => (format!("on {}", self.weekday(*day)), None),
            WeatherIntent::ExternalSpecific { day, location } => {
                (format!("on {}", self.weekday(*day)), Some(location))
            }
        };
        let place = place.map(String::as_str);
        conversation.say(&format!(
            "Would fetch the forecast for {} {}",
            place.unwrap_or("your current location"),
            when
        ));

        let forecast = self.samples.forecast(place);
        match intent {
            WeatherIntent::CurrentToday | WeatherIntent::ExternalToday { .. } => {
                conversation.say(&forecast.today_sentence())
            }
            WeatherIntent::CurrentTomorrow | WeatherIntent::ExternalTomorrow { .. } => {
                conversation.say(&forecast.tomorrow_sentence())
            }
            _ => {}
        }
        Ok(())
    }
}

impl IntentHandler<CalendarIntent> for DryRun {
    fn handle(&self, intent: &CalendarIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let span = intent.span();
        let window = EventWindow::for_span(span, self.today);
        conversation.say(&format!(
            "Would fetch calendar events from {} to {}",
            window.time_min, window.time_max
        ));

        let events = self.samples.events(span, self.today);
        conversation.say(format_agenda(span, &events, &self.lexicon).trim_end());
        Ok(())
    }
}

impl IntentHandler<StocksIntent> for DryRun {
    fn handle(&self, intent: &StocksIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let StocksIntent::Price { ticker } = intent;
        let ticker = ticker.to_uppercase();
        conversation.say(&format!("Would fetch the latest quote for {}", ticker));
        conversation.say(&price_sentence(&ticker, self.samples.quote(&ticker)));
        Ok(())
    }
}

impl IntentHandler<WikiIntent> for DryRun {
    fn handle(&self, intent: &WikiIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let WikiIntent::Search { query } = intent;
        conversation.say(&format!("Would read the Wikipedia summary for {:?}", query));
        Ok(())
    }
}

impl IntentHandler<SportsIntent> for DryRun {
    fn handle(&self, intent: &SportsIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let team = intent.team();
        let abbreviation = TeamDirectory::standard()
            .abbreviation(team)
            .ok_or_else(|| BackendError::Request(format!("unknown team: {}", team)))?;

        match (intent.game_date(self.today), intent.when(&self.lexicon)) {
            (Some(date), Some(when)) => {
                conversation.say(&format!(
                    "Would look up the {} schedule row {:?} for the {} game {}",
                    abbreviation,
                    schedule_index(date),
                    team,
                    when
                ));
                conversation.say(&result_sentence(team, &when, &self.samples.game(team)));
            }
            _ => {
                conversation.say(&format!(
                    "Would read the season record of the {} ({})",
                    team, abbreviation
                ));
                let (wins, losses) = self.samples.record();
                conversation.say(&record_sentence(team, wins, losses));
            }
        }
        Ok(())
    }
}

/// Runs the SMS dialog and reports the message it would send.
pub struct SmsDialog {
    composer: SmsComposer,
    lexicon: Arc<Lexicon>,
}

impl SmsDialog {
    pub fn new(composer: SmsComposer, lexicon: Arc<Lexicon>) -> Self {
        Self { composer, lexicon }
    }
}

impl IntentHandler<SmsIntent> for SmsDialog {
    fn handle(&self, _: &SmsIntent, conversation: &mut dyn Conversation) -> HandlerResult {
        let sms = self
            .composer
            .compose(conversation, &self.lexicon)
            .ok_or(BackendError::ConversationClosed)?;
        conversation.say(&format!("Would send to {}:\n{}", sms.to, sms.body));
        Ok(())
    }
}

/// A router whose modules describe their actions instead of performing them.
pub fn dry_run_router(config: &MarvinConfig, today: NaiveDate) -> marvin::Result<IntentRouter> {
    let lexicon = Arc::new(Lexicon::new());
    let samples = Arc::new(SampleBackend::new(&config.sms.sender_name));
    let dry_run = || DryRun::new(today, lexicon.clone(), samples.clone());
    let composer = SmsComposer::new(&config.sms.sender_name, config.sms.country_prefix.clone());

    IntentRouter::builder()
        .with_config(config.router.clone())
        .with_lexicon(lexicon.clone())
        .music(dry_run())
        .weather(dry_run())
        .calendar(dry_run())
        .sms(SmsDialog::new(composer, lexicon.clone()))
        .stocks(dry_run())
        .wiki(dry_run())
        .sports(dry_run())
        .build()
}

#[cfg(test)]
mod tests {
    use marvin::{ModuleName, ScriptedConversation};

    use super::*;

    fn router() -> IntentRouter {
        let today = NaiveDate::from_ymd_opt(2018, 8, 1).unwrap();
        dry_run_router(&MarvinConfig::default(), today).unwrap()
    }

    fn reply(utterance: &str) -> String {
        let mut conversation = ScriptedConversation::default();
        router().route(utterance, &mut conversation).unwrap();
        conversation.said().join("\n")
    }

    #[test]
    fn dry_runs_describe_the_backend_call() {
        assert_eq!(
            reply("what was the score of the yankees game on monday"),
            "Would look up the NYY schedule row \"Monday, Jul 30\" for the yankees game on monday\n\
             the yankees beat the red sox on monday, 5 to 3"
        );
        assert_eq!(
            reply("what's on my calendar tomorrow"),
            "Would fetch calendar events from 2018-08-02T00:00:00Z to 2018-08-03T00:00:00Z\n\
             Tomorrow's events:\nAll day - Offsite"
        );
        assert_eq!(
            reply("what is the weather in berlin today"),
            "Would fetch the forecast for berlin today\n\
             The weather today in berlin will be cloudy with a minimum of 58 degrees and a maximum of 71 degrees."
        );
        assert_eq!(
            reply("play playlist three"),
            "Would play your playlist Morning Run (spotify:playlist:sample3)"
        );
    }

    #[test]
    fn replies_render_from_sample_data() {
        assert_eq!(
            reply("tell me the mets record"),
            "Would read the season record of the mets (NYM)\nthe mets are 60-40 this year"
        );
        assert_eq!(
            reply("turn the volume up"),
            "Would raise the volume from 60% to 80%"
        );
        assert_eq!(
            reply("what is the stock price of tesla"),
            format!(
                "Would fetch the latest quote for TESLA\n{}",
                price_sentence("TESLA", SampleBackend::new("Sam").quote("TESLA"))
            )
        );
    }

    #[test]
    fn playlist_listing_pages_until_declined() {
        let mut conversation = ScriptedConversation::new(["no"]);
        assert!(router().route("list my playlists", &mut conversation).unwrap());

        let said = conversation.said();
        assert_eq!(said[1], "Marvin user's playlists:");
        assert_eq!(said[6], "5: Road Trip");
        assert_eq!(said.len(), 8);
        assert_eq!(conversation.last_said(), Some("Continue listing? "));
    }

    #[test]
    fn unmatched_playlist_reports_the_music_failure() {
        assert_eq!(
            reply("play playlist chill"),
            ModuleName::Music.failure_message()
        );
    }

    #[test]
    fn unknown_team_reports_the_sports_failure() {
        assert_eq!(
            reply("what was the score of the knicks game yesterday"),
            ModuleName::Sports.failure_message()
        );
    }

    #[test]
    fn sms_dialog_reports_the_composed_message() {
        let mut conversation = ScriptedConversation::new(["555 123 4567", "yes", "hi", "ok"]);
        assert!(router().route("send a text", &mut conversation).unwrap());
        assert_eq!(
            conversation.last_said(),
            Some("Would send to +15551234567:\nhi\nSent from Marvin by: Marvin user")
        );
    }
}
