//! Seams to the speech and display collaborators, and the helpers the
//! controller uses to talk through them.

mod channel;

pub use channel::ChannelVoiceInput;

use chess::{Board, ChessMove};
use log::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::error::{AnnounceError, ListenError};
use crate::game::parser::{self, Command};

/// Speech-to-text. Blocks until something was heard or the token is cancelled.
pub trait VoiceInput {
    fn listen(&mut self, cancel: &CancellationToken) -> Result<String, ListenError>;
}

/// Text-to-speech sink.
pub trait Announcer {
    fn announce(&mut self, text: &str) -> Result<(), AnnounceError>;
}

/// Shows the rendered board somewhere.
pub trait BoardDisplay {
    fn show(&mut self, board: &Board, last_move: Option<ChessMove>);
}

/// One result of a recognizer, as fed into a [`ChannelVoiceInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Heard(String),
    Silence,
    NotUnderstood,
    Unavailable,
}

/// Outcome of one listen attempt after recognition errors were handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Command(Command),
    Retry,
    Cancelled,
}

pub struct Frontend<V, A, D> {
    pub voice: V,
    pub announcer: A,
    pub display: D,
}

impl<V, A, D> Frontend<V, A, D>
where
    V: VoiceInput,
    A: Announcer,
    D: BoardDisplay,
{
    pub fn new(voice: V, announcer: A, display: D) -> Self {
        Self {
            voice,
            announcer,
            display,
        }
    }

    /// Speaks `text`; a failing sink is logged and otherwise ignored.
    pub fn say(&mut self, text: &str) {
        info!("say: {}", text);
        if let Err(e) = self.announcer.announce(text) {
            warn!("announcement dropped ({}): {}", e, text);
        }
    }

    /// Listens once and turns recognition failures into spoken feedback.
    /// An unavailable speech service cancels the whole session.
    pub fn hear(&mut self, cancel: &CancellationToken) -> Heard {
        match self.voice.listen(cancel) {
            Ok(text) => {
                let command = parser::parse(&text);
                debug!("heard {:?} -> {:?}", text, command);
                Heard::Command(command)
            }
            Err(ListenError::NotUnderstood) => {
                self.say("Could not understand, please repeat.");
                Heard::Retry
            }
            Err(ListenError::Timeout) => {
                self.say("I did not hear anything, please repeat.");
                Heard::Retry
            }
            Err(ListenError::Unavailable) => {
                self.say("Speech service is unavailable, try again later.");
                cancel.cancel();
                Heard::Cancelled
            }
            Err(ListenError::Cancelled) => Heard::Cancelled,
        }
    }
}
