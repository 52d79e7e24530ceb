//! Music playback commands.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Classifier, Intent, ModuleName};
use crate::{
    conversation::Conversation,
    extract::{after, after_earliest, before, strip_question, AnchorMissing},
    lexicon::Lexicon,
    pattern::{ExtractionError, PatternTable},
};

/// Which playlist a command refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistRef {
    /// 1-based position in the last playlist listing.
    Index(u32),
    Name(String),
}

impl PlaylistRef {
    /// Spelled-out numbers and digits become an index, anything else a name.
    pub fn from_term(term: &str, lexicon: &Lexicon) -> Self {
        let term = term.trim();
        if let Some(value) = lexicon.numerals().value(term) {
            return PlaylistRef::Index(value);
        }
        match term.parse::<u32>() {
            Ok(index) => PlaylistRef::Index(index),
            Err(_) => PlaylistRef::Name(term.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicIntent {
    Resume,
    Pause,
    Next,
    Previous,
    PlayPlaylist(PlaylistRef),
    Search { query: String },
    Current,
    ListPlaylists,
    VolumeUp,
    VolumeDown,
}

impl Intent for MusicIntent {
    fn label(&self) -> &'static str {
        match self {
            MusicIntent::Resume => "resume",
            MusicIntent::Pause => "pause",
            MusicIntent::Next => "next",
            MusicIntent::Previous => "previous",
            MusicIntent::PlayPlaylist(_) => "play playlist",
            MusicIntent::Search { .. } => "search",
            MusicIntent::Current => "current",
            MusicIntent::ListPlaylists => "list playlist",
            MusicIntent::VolumeUp => "volume up",
            MusicIntent::VolumeDown => "volume down",
        }
    }
}

fn playlist_term(command: &str, lexicon: &Lexicon) -> Result<MusicIntent, AnchorMissing> {
    let term = after_earliest(command, &["playlist ", "playlists "])?;
    Ok(MusicIntent::PlayPlaylist(PlaylistRef::from_term(term, lexicon)))
}

fn search_query(command: &str, _: &Lexicon) -> Result<MusicIntent, AnchorMissing> {
    let query = after(command, "play ")?;
    let query = before(query, " on spotify");
    Ok(MusicIntent::Search {
        query: strip_question(query).replace(" by ", " ").trim().to_string(),
    })
}

static MUSIC_TABLE: Lazy<PatternTable<MusicIntent>> = Lazy::new(|| {
    PatternTable::new(ModuleName::Music)
        .rule(
            "resume",
            r"[a-z ]*(resume|play)( spotify| music| my music)?",
            |_, _| Ok(MusicIntent::Resume),
        )
        .rule(
            "pause",
            r"[a-z ]*(pause|stop)( spotify| music| my music)?",
            |_, _| Ok(MusicIntent::Pause),
        )
        .rule("next", r"[a-z ]*skip[a-z ]*", |_, _| Ok(MusicIntent::Next))
        .rule("next", r"[a-z ]*next( song)?", |_, _| Ok(MusicIntent::Next))
        .rule("previous", r"[a-z ]*previous( song)?", |_, _| {
            Ok(MusicIntent::Previous)
        })
        .rule("previous", r"[a-z ]*song before[a-z ]*", |_, _| {
            Ok(MusicIntent::Previous)
        })
        .rule(
            "play playlist",
            r"[a-z' ]*play[a-z' ]*playlists? [a-z0-9'!][a-z0-9'! ]*",
            playlist_term,
        )
        .rule(
            "search",
            r"[a-z ]*play [a-z' 0-9]+( by [a-z' 0-9]+)?( on spotify)?\??",
            search_query,
        )
        .rule(
            "current",
            r"[a-z' ]*what[a-z' ]+(song|playing|playing now)\??",
            |_, _| Ok(MusicIntent::Current),
        )
        .rule(
            "list playlist",
            r"[a-z' ]*(list|what)[a-z' ]*playlists?[a-z' ]*\??",
            |_, _| Ok(MusicIntent::ListPlaylists),
        )
        .rule(
            "volume up",
            r"[a-z' ]*(volume|sound|song) up[a-z' ]*",
            |_, _| Ok(MusicIntent::VolumeUp),
        )
        .rule("volume up", r"[a-z' ]*loud(er)?[a-z' ]*", |_, _| {
            Ok(MusicIntent::VolumeUp)
        })
        .rule(
            "volume down",
            r"[a-z' ]*(volume|sound|song) down[a-z' ]*",
            |_, _| Ok(MusicIntent::VolumeDown),
        )
        .rule("volume down", r"[a-z' ]*quiet(er)?[a-z' ]*", |_, _| {
            Ok(MusicIntent::VolumeDown)
        })
});

pub struct MusicClassifier {
    lexicon: Arc<Lexicon>,
}

impl MusicClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn table() -> &'static PatternTable<MusicIntent> {
        &MUSIC_TABLE
    }
}

impl Classifier for MusicClassifier {
    type Intent = MusicIntent;

    fn module(&self) -> ModuleName {
        ModuleName::Music
    }

    fn classify(&self, utterance: &str) -> Result<Option<MusicIntent>, ExtractionError> {
        MUSIC_TABLE.classify(utterance, &self.lexicon)
    }
}

/// A playlist as listed by the playback service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub uri: String,
}

/// The user's playlists in listing order, used to resolve [`PlaylistRef`]s.
#[derive(Debug, Clone, Default)]
pub struct PlaylistCatalog {
    playlists: Vec<Playlist>,
}

impl PlaylistCatalog {
    /// Number of playlists read out before asking whether to continue.
    pub const PAGE_SIZE: usize = 5;

    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    pub fn resolve(&self, reference: &PlaylistRef) -> Option<&Playlist> {
        match reference {
            PlaylistRef::Index(index) => {
                let position = (*index as usize).checked_sub(1)?;
                self.playlists.get(position)
            }
            PlaylistRef::Name(name) => self
                .playlists
                .iter()
                .find(|playlist| playlist.name.eq_ignore_ascii_case(name)),
        }
    }

    /// Reads the playlists out in pages of [`Self::PAGE_SIZE`], asking after
    /// each page whether to keep going. Returns how many were read out.
    pub fn read_out(&self, owner: &str, conversation: &mut dyn Conversation, lexicon: &Lexicon) -> usize {
        conversation.say(&format!("{}'s playlists:", owner));

        let mut spoken = 0;
        for (page_number, page) in self.playlists.chunks(Self::PAGE_SIZE).enumerate() {
            for (offset, playlist) in page.iter().enumerate() {
                let position = page_number * Self::PAGE_SIZE + offset + 1;
                conversation.say(&format!("{}: {}", position, playlist.name));
                spoken += 1;
            }
            if spoken == self.playlists.len() {
                break;
            }
            conversation.say("Continue listing? ");
            let keep_going = conversation
                .listen()
                .is_some_and(|reply| lexicon.is_affirmative(&reply));
            if !keep_going {
                break;
            }
        }
        spoken
    }
}

/// Playback volume in percent, moved in fixed steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume(u8);

impl Volume {
    pub const STEP: u8 = 20;
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Self {
        Self(percent.min(Self::MAX))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    pub fn up(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    pub fn down(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ScriptedConversation;

    fn classify(utterance: &str) -> Option<MusicIntent> {
        MusicClassifier::new(Arc::new(Lexicon::new()))
            .classify(utterance)
            .expect("music extraction")
    }

    #[test]
    fn playback_controls() {
        assert_eq!(classify("play"), Some(MusicIntent::Resume));
        assert_eq!(classify("resume my music"), Some(MusicIntent::Resume));
        assert_eq!(classify("please play spotify"), Some(MusicIntent::Resume));
        assert_eq!(classify("stop music"), Some(MusicIntent::Pause));
        assert_eq!(classify("pause"), Some(MusicIntent::Pause));
        assert_eq!(classify("skip this one"), Some(MusicIntent::Next));
        assert_eq!(classify("play the next song"), Some(MusicIntent::Next));
        assert_eq!(classify("previous song"), Some(MusicIntent::Previous));
        assert_eq!(
            classify("play the song before this one"),
            Some(MusicIntent::Previous)
        );
    }

    #[test]
    fn search_query_drops_by_and_service() {
        assert_eq!(
            classify("play thriller by michael jackson"),
            Some(MusicIntent::Search {
                query: "thriller michael jackson".to_string()
            })
        );
        assert_eq!(
            classify("play hey jude by the beatles on spotify"),
            Some(MusicIntent::Search {
                query: "hey jude the beatles".to_string()
            })
        );
        assert_eq!(
            classify("can you play jazz"),
            Some(MusicIntent::Search {
                query: "jazz".to_string()
            })
        );
    }

    #[test]
    fn playlist_by_spoken_number_or_name() {
        assert_eq!(
            classify("play playlist three"),
            Some(MusicIntent::PlayPlaylist(PlaylistRef::Index(3)))
        );
        assert_eq!(
            classify("play playlist twenty one"),
            Some(MusicIntent::PlayPlaylist(PlaylistRef::Index(21)))
        );
        assert_eq!(
            classify("play playlist 4"),
            Some(MusicIntent::PlayPlaylist(PlaylistRef::Index(4)))
        );
        assert_eq!(
            classify("play my playlists road trip"),
            Some(MusicIntent::PlayPlaylist(PlaylistRef::Name(
                "road trip".to_string()
            )))
        );
    }

    #[test]
    fn bare_playlist_falls_back_to_search() {
        assert_eq!(
            classify("play my playlist"),
            Some(MusicIntent::Search {
                query: "my playlist".to_string()
            })
        );
    }

    #[test]
    fn questions_and_volume() {
        assert_eq!(classify("what song is playing"), Some(MusicIntent::Current));
        assert_eq!(classify("what's this song?"), Some(MusicIntent::Current));
        assert_eq!(classify("what is playing now?"), Some(MusicIntent::Current));
        assert_eq!(classify("list my playlists"), Some(MusicIntent::ListPlaylists));
        assert_eq!(
            classify("what playlists do i have"),
            Some(MusicIntent::ListPlaylists)
        );
        assert_eq!(classify("turn the volume up"), Some(MusicIntent::VolumeUp));
        assert_eq!(classify("louder"), Some(MusicIntent::VolumeUp));
        assert_eq!(classify("sound down please"), Some(MusicIntent::VolumeDown));
        assert_eq!(classify("a bit quieter"), Some(MusicIntent::VolumeDown));
    }

    #[test]
    fn unrelated_text_is_not_music() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("what is the weather today"), None);
        assert_eq!(classify("send a text"), None);
        assert_eq!(classify("play thr|ller"), None);
        assert_eq!(classify("turn the volume| up"), None);
    }

    fn catalog(count: usize) -> PlaylistCatalog {
        PlaylistCatalog::new(
            (1..=count)
                .map(|n| Playlist {
                    name: format!("Mix {}", n),
                    uri: format!("spotify:playlist:{}", n),
                })
                .collect(),
        )
    }

    #[test]
    fn catalog_resolves_index_and_name() {
        let catalog = catalog(3);
        assert_eq!(
            catalog.resolve(&PlaylistRef::Index(2)).map(|p| p.uri.as_str()),
            Some("spotify:playlist:2")
        );
        assert_eq!(catalog.resolve(&PlaylistRef::Index(0)), None);
        assert_eq!(catalog.resolve(&PlaylistRef::Index(4)), None);
        assert_eq!(
            catalog
                .resolve(&PlaylistRef::Name("mix 3".to_string()))
                .map(|p| p.name.as_str()),
            Some("Mix 3")
        );
    }

    #[test]
    fn read_out_pages_until_declined() {
        let lexicon = Lexicon::new();
        let mut conversation = ScriptedConversation::new(["yes", "no"]);
        let spoken = catalog(12).read_out("ada", &mut conversation, &lexicon);

        assert_eq!(spoken, 10);
        let said = conversation.said();
        assert_eq!(said[0], "ada's playlists:");
        assert_eq!(said[1], "1: Mix 1");
        assert_eq!(said[6], "Continue listing? ");
        assert_eq!(said[7], "6: Mix 6");
        assert_eq!(said.last().map(String::as_str), Some("Continue listing? "));
    }

    #[test]
    fn read_out_stops_without_prompt_when_exhausted() {
        let lexicon = Lexicon::new();
        let mut conversation = ScriptedConversation::new(Vec::<String>::new());
        assert_eq!(catalog(5).read_out("ada", &mut conversation, &lexicon), 5);
        assert!(!conversation.said().iter().any(|line| line.starts_with("Continue")));
    }

    #[test]
    fn volume_steps_are_clamped() {
        let volume = Volume::default();
        assert_eq!(volume.up().percent(), 100);
        assert_eq!(volume.down().percent(), 80);
        assert_eq!(Volume::new(10).down().percent(), 0);
        assert_eq!(Volume::new(90).up().percent(), 100);
    }
}
