use chess::{Board, ChessMove, Color, Piece, Square};
use thiserror::Error;

use crate::game::rules;
use crate::game::utils::{color_to_string, piece_name};
use crate::models::PendingMove;

/// Why the rules turned down a spoken square or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty square")]
    EmptySquare(Square),
    #[error("wrong color")]
    WrongColor { square: Square, piece: Piece, owner: Color },
    #[error("illegal move")]
    IllegalMove { from: Square, to: Square },
}

impl Rejection {
    /// Spoken correction for the player.
    pub fn feedback(&self) -> String {
        match self {
            Rejection::EmptySquare(square) => {
                format!("There is no piece on {square}. Try again.")
            }
            Rejection::WrongColor { square, piece, owner } => format!(
                "The {} on {square} is {}. Try again.",
                piece_name(*piece).to_lowercase(),
                color_to_string(*owner)
            ),
            Rejection::IllegalMove { .. } => "Illegal move. Try again.".to_string(),
        }
    }
}

/// Accepts `square` as an origin when it holds a piece of the side to move.
pub fn validate_origin(board: &Board, square: Square) -> Result<PendingMove, Rejection> {
    match rules::piece_at(board, square) {
        None => Err(Rejection::EmptySquare(square)),
        Some((piece, owner)) if owner != board.side_to_move() => Err(Rejection::WrongColor {
            square,
            piece,
            owner,
        }),
        Some((piece, _)) => Ok(PendingMove {
            origin: square,
            piece,
        }),
    }
}

/// Accepts the move only if it is in the legal set of the current position.
pub fn validate_move(board: &Board, origin: Square, destination: Square) -> Result<ChessMove, Rejection> {
    rules::find_move(board, origin, destination).ok_or(Rejection::IllegalMove {
        from: origin,
        to: destination,
    })
}
