use std::sync::mpsc::Sender;

use crate::cancel::CancellationToken;
use crate::voice::Transcript;
use crate::websocket::ViewerHub;

/// Application state shared between viewer connections
pub struct AppState {
    pub hub: ViewerHub,
    pub transcripts: Sender<Transcript>,
    pub cancel: CancellationToken,
}
