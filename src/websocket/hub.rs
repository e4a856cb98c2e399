use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use actix::Addr;
use chess::{Board, ChessMove};
use log::{info, warn};

use crate::cancel::CancellationToken;
use crate::error::AnnounceError;
use crate::game::utils::get_game_status;
use crate::models::{LastMove, ServerMessage, ViewerFrame};
use crate::render;
use crate::voice::{Announcer, BoardDisplay};
use crate::websocket::handler::ViewerSocket;

/// Connected viewer pages. Doubles as the announcer and board display of a
/// web session: speech and board frames are broadcast to every page.
#[derive(Clone, Default)]
pub struct ViewerHub {
    sessions: Arc<Mutex<HashMap<String, Addr<ViewerSocket>>>>,
    last_frame: Arc<Mutex<Option<String>>>,
}

impl ViewerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page and replays the current board to it.
    pub fn register(&self, id: String, addr: Addr<ViewerSocket>) {
        let frame = self
            .last_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(frame) = frame {
            addr.do_send(ViewerFrame(frame));
        }

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id.clone(), addr);
        info!("viewer {} connected, {} active", id, sessions.len());
    }

    pub fn unregister(&self, id: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(id);
        info!("viewer {} disconnected, {} active", id, sessions.len());
    }

    pub fn viewer_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Blocks until at least one page is connected. Returns `false` on cancellation.
    pub fn wait_for_viewer(&self, cancel: &CancellationToken, poll: Duration) -> bool {
        let mut logged = false;
        while self.viewer_count() == 0 {
            if !logged {
                info!("waiting for a viewer to connect");
                logged = true;
            }
            if !cancel.sleep(poll, poll) {
                return false;
            }
        }
        true
    }

    /// Sends `message` to every page; returns how many received it.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let msg_str = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize {} message: {}", message.message_type, e);
                return 0;
            }
        };
        self.broadcast_raw(&msg_str)
    }

    fn broadcast_raw(&self, msg_str: &str) -> usize {
        // Snapshot the addresses so the lock is not held while sending
        let sessions: Vec<Addr<ViewerSocket>> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for addr in &sessions {
            addr.do_send(ViewerFrame(msg_str.to_string()));
        }
        sessions.len()
    }
}

pub fn board_frame(board: &Board, last_move: Option<ChessMove>) -> ServerMessage {
    ServerMessage {
        message_type: "board".to_string(),
        fen: Some(board.to_string()),
        svg: Some(render::svg(board, last_move)),
        last_move: last_move.map(|mv| LastMove {
            from: mv.get_source().to_string(),
            to: mv.get_dest().to_string(),
        }),
        game_status: Some(get_game_status(board)),
        ..ServerMessage::default()
    }
}

impl Announcer for ViewerHub {
    fn announce(&mut self, text: &str) -> Result<(), AnnounceError> {
        match self.broadcast(&ServerMessage::announce(text)) {
            0 => Err(AnnounceError::NoListeners),
            _ => Ok(()),
        }
    }
}

impl BoardDisplay for ViewerHub {
    fn show(&mut self, board: &Board, last_move: Option<ChessMove>) {
        let frame = board_frame(board, last_move);
        let msg_str = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize board frame: {}", e);
                return;
            }
        };
        *self.last_frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(msg_str.clone());
        self.broadcast_raw(&msg_str);
    }
}
