use chess::Color;
use log::info;

use crate::cancel::CancellationToken;
use crate::config::GameMode;
use crate::game::parser::Command;
use crate::game::utils::side_name;
use crate::models::Outcome;
use crate::voice::{Announcer, BoardDisplay, Frontend, Heard, VoiceInput};

/// Someone whose consent is needed for another game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    /// Asked through the voice input; `side` is named when two humans share it.
    Voice { side: Option<Color> },
    /// The automated opponent, which always wants another game.
    Automated,
}

pub fn participants(mode: GameMode) -> Vec<Participant> {
    match mode {
        GameMode::Computer => vec![
            Participant::Voice { side: None },
            Participant::Automated,
        ],
        GameMode::Human => vec![
            Participant::Voice {
                side: Some(Color::White),
            },
            Participant::Voice {
                side: Some(Color::Black),
            },
        ],
    }
}

fn ask<V, A, D>(
    frontend: &mut Frontend<V, A, D>,
    side: Option<Color>,
    cancel: &CancellationToken,
) -> bool
where
    V: VoiceInput,
    A: Announcer,
    D: BoardDisplay,
{
    let question = match side {
        Some(color) => format!(
            "{}, would you like to play again? Say yes or no.",
            side_name(color)
        ),
        None => "Would you like to play again? Say yes or no.".to_string(),
    };
    frontend.say(&question);

    loop {
        match frontend.hear(cancel) {
            Heard::Cancelled => return false,
            Heard::Retry => {}
            Heard::Command(Command::Yes) => return true,
            Heard::Command(Command::No) => return false,
            Heard::Command(_) => frontend.say("Please say yes or no."),
        }
    }
}

/// Collects replay intent after a finished game. Only returns `true` when
/// every participant agreed; a game the user quit is never replayed.
pub fn negotiate<V, A, D>(
    frontend: &mut Frontend<V, A, D>,
    outcome: Outcome,
    participants: &[Participant],
    cancel: &CancellationToken,
) -> bool
where
    V: VoiceInput,
    A: Announcer,
    D: BoardDisplay,
{
    if !outcome.allows_rematch() || cancel.is_cancelled() {
        return false;
    }

    for participant in participants {
        let intent = match *participant {
            Participant::Automated => true,
            Participant::Voice { side } => ask(frontend, side, cancel),
        };
        info!("replay intent of {:?}: {}", participant, intent);
        if !intent {
            return false;
        }
    }
    true
}
