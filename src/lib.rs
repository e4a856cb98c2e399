//! Voice-driven chess: a turn controller that takes spoken square names,
//! validates them against the `chess` rules engine and answers back through
//! speech, playing against a second human or an automated opponent.

pub mod cancel;
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod models;
pub mod render;
pub mod routes;
pub mod voice;
pub mod websocket;

pub use cancel::CancellationToken;
pub use config::Settings;
pub use game::session::{Session, SessionReport};
pub use voice::Frontend;
