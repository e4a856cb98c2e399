//! Terminal frontend: typed lines stand in for transcripts.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use chess::{Board, ChessMove};
use log::{debug, warn};

use crate::error::AnnounceError;
use crate::render;
use crate::voice::{Announcer, BoardDisplay, Transcript};

/// Reads stdin on a background thread. End of input reports the device as unavailable.
pub fn spawn_stdin_transcriber() -> Receiver<Transcript> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let transcript = match line {
                Ok(text) if text.trim().is_empty() => Transcript::Silence,
                Ok(text) => Transcript::Heard(text),
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    Transcript::Unavailable
                }
            };
            let stop = transcript == Transcript::Unavailable;
            if tx.send(transcript).is_err() || stop {
                return;
            }
        }
        debug!("stdin closed");
        let _ = tx.send(Transcript::Unavailable);
    });
    rx
}

#[derive(Debug, Default)]
pub struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn announce(&mut self, text: &str) -> Result<(), AnnounceError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, ">> {text}").map_err(|e| AnnounceError::Sink(e.to_string()))?;
        stdout.flush().map_err(|e| AnnounceError::Sink(e.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl BoardDisplay for ConsoleDisplay {
    fn show(&mut self, board: &Board, last_move: Option<ChessMove>) {
        let mut stdout = io::stdout().lock();
        let header = match last_move {
            Some(mv) => format!("after {mv}"),
            None => "position".to_string(),
        };
        if let Err(e) = writeln!(stdout, "\n[{header}]\n{}", render::ascii(board)) {
            warn!("failed to print board: {}", e);
        }
    }
}
