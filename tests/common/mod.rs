#![allow(dead_code)]

use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Duration;

use chess::{Board, ChessMove, Color, Square};
use voice_chess::config::{DestinationRetry, GameMode};
use voice_chess::error::{AnnounceError, ListenError};
use voice_chess::game::controller::ControllerOptions;
use voice_chess::game::strategy::OpponentStrategy;
use voice_chess::voice::{Announcer, BoardDisplay, VoiceInput};
use voice_chess::{CancellationToken, Frontend};

pub fn sq(name: &str) -> Square {
    Square::from_str(name).unwrap()
}

/// Replays canned recognizer results; once they run out it behaves like a quit.
pub struct ScriptedVoice {
    script: VecDeque<Result<String, ListenError>>,
}

impl ScriptedVoice {
    pub fn new(lines: &[&str]) -> Self {
        Self::from_results(lines.iter().map(|line| Ok(line.to_string())).collect())
    }

    pub fn from_results(results: Vec<Result<String, ListenError>>) -> Self {
        Self {
            script: results.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl VoiceInput for ScriptedVoice {
    fn listen(&mut self, cancel: &CancellationToken) -> Result<String, ListenError> {
        if cancel.is_cancelled() {
            return Err(ListenError::Cancelled);
        }
        match self.script.pop_front() {
            Some(result) => result,
            None => {
                cancel.cancel();
                Err(ListenError::Cancelled)
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingAnnouncer {
    pub lines: Vec<String>,
}

impl RecordingAnnouncer {
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn said(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line == text)
    }

    pub fn count(&self, text: &str) -> usize {
        self.lines.iter().filter(|line| *line == text).count()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, text: &str) -> Result<(), AnnounceError> {
        self.lines.push(text.to_string());
        Ok(())
    }
}

/// A speech sink that is never available.
pub struct BrokenAnnouncer;

impl Announcer for BrokenAnnouncer {
    fn announce(&mut self, _text: &str) -> Result<(), AnnounceError> {
        Err(AnnounceError::Sink("audio device missing".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<(Board, Option<ChessMove>)>,
}

impl BoardDisplay for RecordingDisplay {
    fn show(&mut self, board: &Board, last_move: Option<ChessMove>) {
        self.frames.push((*board, last_move));
    }
}

/// Plays a fixed list of moves, legal or not.
pub struct ScriptedStrategy {
    moves: VecDeque<ChessMove>,
}

impl ScriptedStrategy {
    pub fn new(moves: &[(&str, &str)]) -> Self {
        Self {
            moves: moves
                .iter()
                .map(|(from, to)| ChessMove::new(sq(from), sq(to), None))
                .collect(),
        }
    }
}

impl OpponentStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn select_move(&mut self, _board: &Board) -> Option<ChessMove> {
        self.moves.pop_front()
    }
}

pub type TestFrontend = Frontend<ScriptedVoice, RecordingAnnouncer, RecordingDisplay>;

pub fn frontend(lines: &[&str]) -> TestFrontend {
    Frontend::new(
        ScriptedVoice::new(lines),
        RecordingAnnouncer::default(),
        RecordingDisplay::default(),
    )
}

pub fn options(mode: GameMode) -> ControllerOptions {
    ControllerOptions {
        mode,
        human_color: Color::White,
        destination_retry: DestinationRetry::RestartOrigin,
        opponent_delay: Duration::ZERO,
        poll: Duration::from_millis(1),
    }
}

/// Fool's mate as spoken squares: Black mates on move two.
pub const FOOLS_MATE: [&str; 8] = ["f2", "f3", "e7", "e5", "g2", "g4", "d8", "h4"];

/// Both knights out and back: the start position recurs after each round.
pub const KNIGHT_SHUFFLE: [&str; 8] = ["g1", "f3", "g8", "f6", "f3", "g1", "f6", "g8"];

pub fn knight_shuffles(rounds: usize) -> Vec<&'static str> {
    KNIGHT_SHUFFLE.repeat(rounds)
}
