use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::debug;

use super::{Transcript, VoiceInput};
use crate::cancel::CancellationToken;
use crate::error::ListenError;

/// Voice input fed by a recognizer running elsewhere (the browser, or a
/// stdin reader). Waits in `poll` slices so a quit is seen promptly.
///
/// Silence is reported at most once per `silence_gap`; a recognizer that
/// keeps timing out while nobody speaks is otherwise answered with a
/// reprompt every few seconds.
pub struct ChannelVoiceInput {
    transcripts: Receiver<Transcript>,
    poll: Duration,
    silence_gap: Duration,
    last_silence: Option<Instant>,
}

impl ChannelVoiceInput {
    pub fn new(transcripts: Receiver<Transcript>, poll: Duration) -> Self {
        Self {
            transcripts,
            poll,
            silence_gap: Duration::ZERO,
            last_silence: None,
        }
    }

    pub fn with_silence_gap(mut self, gap: Duration) -> Self {
        self.silence_gap = gap;
        self
    }

    fn report_silence(&mut self) -> bool {
        let now = Instant::now();
        match self.last_silence {
            Some(last) if now.duration_since(last) < self.silence_gap => false,
            _ => {
                self.last_silence = Some(now);
                true
            }
        }
    }
}

impl VoiceInput for ChannelVoiceInput {
    fn listen(&mut self, cancel: &CancellationToken) -> Result<String, ListenError> {
        debug!("listening...");
        loop {
            if cancel.is_cancelled() {
                return Err(ListenError::Cancelled);
            }
            match self.transcripts.recv_timeout(self.poll) {
                Ok(Transcript::Heard(text)) => {
                    self.last_silence = None;
                    return Ok(text);
                }
                Ok(Transcript::Silence) if self.report_silence() => return Err(ListenError::Timeout),
                Ok(Transcript::Silence) => debug!("silence swallowed"),
                Ok(Transcript::NotUnderstood) => return Err(ListenError::NotUnderstood),
                Ok(Transcript::Unavailable) => return Err(ListenError::Unavailable),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(ListenError::Unavailable),
            }
        }
    }
}
