use chess::{Color, Piece, Square};
use serde::Serialize;
use uuid::Uuid;

/// Result of evaluating a position, and the history leading to it, right
/// after a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Check,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    /// The same position arose for the fifth time.
    Repetition,
    /// Seventy-five moves by each side without a capture or pawn move.
    SeventyFiveMoves,
    TerminatedByUser,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing | Outcome::Check)
    }

    /// Natural endings (mate or draw) lead into rematch negotiation; a quit does not.
    pub fn allows_rematch(&self) -> bool {
        self.is_terminal() && *self != Outcome::TerminatedByUser
    }
}

/// Whose input drives the current half-move. Always derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Human,
    Opponent,
}

/// Origin square accepted for the side to move, waiting for a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub origin: Square,
    pub piece: Piece,
}

/// States of the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingOrigin,
    AwaitingDestination(PendingMove),
    OpponentMoving,
    GameOver(Outcome),
}

impl Phase {
    pub fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

/// One finished game, as written into the session report.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub status: String,
    pub moves: Vec<String>,
    pub final_fen: String,
    #[serde(skip)]
    pub outcome: Outcome,
}
