use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, ClientMessage, ServerMessage, ViewerFrame};
use crate::voice::Transcript;

/// WebSocket handler for one viewer page
pub struct ViewerSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

impl Actor for ViewerSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.app_state.hub.register(self.id.clone(), ctx.address());
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.app_state.hub.unregister(&self.id);
        Running::Stop
    }
}

impl Handler<ViewerFrame> for ViewerSocket {
    type Result = ();

    fn handle(&mut self, msg: ViewerFrame, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ViewerSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => self.handle_message(client_msg, ctx),
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        send(ctx, &ServerMessage::error(format!("Invalid message format: {}", e)));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                send(ctx, &ServerMessage::error("Binary messages are not supported"));
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Viewer {} closed: {:?}", self.id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

fn send(ctx: &mut ws::WebsocketContext<ViewerSocket>, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(text) => ctx.text(text),
        Err(e) => warn!("Failed to serialize response: {}", e),
    }
}

impl ViewerSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.message_type.as_str() {
            "transcript" => match msg.text {
                Some(text) => self.forward(Transcript::Heard(text), ctx),
                None => send(ctx, &ServerMessage::error("Transcript requires text")),
            },
            "silence" => self.forward(Transcript::Silence, ctx),
            "not_understood" => self.forward(Transcript::NotUnderstood, ctx),
            "unavailable" => self.forward(Transcript::Unavailable, ctx),
            "quit" => {
                info!("Viewer {} asked to quit", self.id);
                self.app_state.cancel.cancel();
            }
            other => {
                info!("Unknown message type: {}", other);
                send(ctx, &ServerMessage::error(format!("Unknown message type: {}", other)));
            }
        }
    }

    fn forward(&self, transcript: Transcript, ctx: &mut ws::WebsocketContext<Self>) {
        if self.app_state.transcripts.send(transcript).is_err() {
            warn!("Transcript from viewer {} dropped: no game is listening", self.id);
            send(ctx, &ServerMessage::error("No game is listening"));
        }
    }
}

// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New viewer connection: {}", id);

    let socket = ViewerSocket {
        id,
        app_state: app_state.clone(),
    };

    ws::start(socket, &req, stream)
}
