use actix::Message;
use serde::{Deserialize, Serialize};

/// Message sent from a viewer page to the server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message_type: String,
    pub text: Option<String>,
}

/// Message sent from the server to viewer pages
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ServerMessage {
    pub message_type: String,
    pub text: Option<String>,
    pub fen: Option<String>,
    pub svg: Option<String>,
    pub last_move: Option<LastMove>,
    pub game_status: Option<String>,
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn announce(text: &str) -> Self {
        Self {
            message_type: "announce".to_string(),
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            message_type: "error".to_string(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Last move information
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LastMove {
    pub from: String,
    pub to: String,
}

/// Serialized frame pushed to one viewer socket
#[derive(Message)]
#[rtype(result = "()")]
pub struct ViewerFrame(pub String);
