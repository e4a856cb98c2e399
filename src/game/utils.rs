use chess::{Board, BoardStatus, Color, Piece, Square};

use crate::models::Outcome;

/// Lower-case side name, as used inside a spoken sentence
pub fn color_to_string(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// Capitalized side name, as used at the start of a spoken sentence
pub fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

pub fn piece_name(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "Pawn",
        Piece::Knight => "Knight",
        Piece::Bishop => "Bishop",
        Piece::Rook => "Rook",
        Piece::Queen => "Queen",
        Piece::King => "King",
    }
}

/// Get the status of a position as a string for viewers
pub fn get_game_status(board: &Board) -> String {
    match board.status() {
        BoardStatus::Checkmate => match !board.side_to_move() {
            Color::White => "white_wins".to_string(),
            Color::Black => "black_wins".to_string(),
        },
        BoardStatus::Stalemate => "draw".to_string(),
        BoardStatus::Ongoing => {
            if has_insufficient_material(board) {
                "draw".to_string()
            } else if board.checkers().popcnt() > 0 {
                "check".to_string()
            } else if board.side_to_move() == Color::White {
                "white_turn".to_string()
            } else {
                "black_turn".to_string()
            }
        }
    }
}

/// Get the status string recorded for a finished game
pub fn outcome_status(outcome: Outcome) -> String {
    match outcome {
        Outcome::Checkmate { winner: Color::White } => "white_wins".to_string(),
        Outcome::Checkmate { winner: Color::Black } => "black_wins".to_string(),
        Outcome::Stalemate
        | Outcome::InsufficientMaterial
        | Outcome::Repetition
        | Outcome::SeventyFiveMoves => "draw".to_string(),
        Outcome::TerminatedByUser => "terminated".to_string(),
        Outcome::Ongoing | Outcome::Check => "in_progress".to_string(),
    }
}

fn on_light_square(square: Square) -> bool {
    (square.get_file().to_index() + square.get_rank().to_index()) % 2 == 1
}

/// Check if the board has insufficient material for checkmate: bare kings,
/// a single knight or bishop against a bare king, or bishops that all stand
/// on squares of one colour (K+B vs K+B with same-coloured bishops).
pub fn has_insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }
    let knights = board.pieces(Piece::Knight).popcnt();
    let bishops = *board.pieces(Piece::Bishop);
    if knights + bishops.popcnt() <= 1 {
        return true;
    }
    if knights > 0 {
        return false;
    }
    let mut shades = bishops.map(on_light_square);
    match shades.next() {
        Some(first) => shades.all(|shade| shade == first),
        None => true,
    }
}
