//! Thin binding of the `chess` crate as the rules oracle: move generation,
//! move application and position queries, plus SAN for announcements.

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};

use crate::game::utils::has_insufficient_material;
use crate::models::Outcome;

pub fn legal_moves(board: &Board) -> Vec<ChessMove> {
    MoveGen::new_legal(board).collect()
}

pub fn apply(board: &Board, mv: ChessMove) -> Board {
    board.make_move_new(mv)
}

pub fn is_check(board: &Board) -> bool {
    board.checkers().popcnt() > 0
}

pub fn is_checkmate(board: &Board) -> bool {
    board.status() == BoardStatus::Checkmate
}

pub fn piece_at(board: &Board, square: Square) -> Option<(Piece, Color)> {
    match (board.piece_on(square), board.color_on(square)) {
        (Some(piece), Some(color)) => Some((piece, color)),
        _ => None,
    }
}

/// Computes the outcome of the position fresh; nothing is cached.
pub fn evaluate(board: &Board) -> Outcome {
    match board.status() {
        BoardStatus::Checkmate => Outcome::Checkmate {
            winner: !board.side_to_move(),
        },
        BoardStatus::Stalemate => Outcome::Stalemate,
        BoardStatus::Ongoing if has_insufficient_material(board) => Outcome::InsufficientMaterial,
        BoardStatus::Ongoing if is_check(board) => Outcome::Check,
        BoardStatus::Ongoing => Outcome::Ongoing,
    }
}

/// Plies without a capture or pawn move after which the game is drawn.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Occurrences of one position after which the game is drawn.
pub const FIVEFOLD: usize = 5;

/// Positions reached since the last capture or pawn move, and the length of
/// that quiet stretch in plies. Earlier positions can never recur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistory {
    hashes: Vec<u64>,
    halfmove_clock: u32,
}

impl PositionHistory {
    pub fn new(board: &Board) -> Self {
        Self::with_clock(board, 0)
    }

    /// Starts from a position whose quiet stretch is already `halfmove_clock` plies long.
    pub fn with_clock(board: &Board, halfmove_clock: u32) -> Self {
        Self {
            hashes: vec![board.get_hash()],
            halfmove_clock,
        }
    }

    /// Records `mv`, played on `before`, which led to `after`.
    pub fn record(&mut self, before: &Board, mv: ChessMove, after: &Board) {
        let irreversible = before.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || before.piece_on(mv.get_dest()).is_some();
        if irreversible {
            self.hashes.clear();
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.hashes.push(after.get_hash());
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// How often the latest position has occurred.
    pub fn repetitions(&self) -> usize {
        match self.hashes.last() {
            Some(current) => self.hashes.iter().filter(|hash| *hash == current).count(),
            None => 0,
        }
    }
}

/// Reads the halfmove clock field of a FEN string; missing or malformed means zero.
pub fn halfmove_clock_from_fen(fen: &str) -> u32 {
    fen.split_whitespace()
        .nth(4)
        .and_then(|field| field.parse().ok())
        .unwrap_or(0)
}

/// Like `evaluate`, but also ends the game on the seventy-five move rule and
/// on fivefold repetition. Mate and stalemate take precedence.
pub fn evaluate_game(board: &Board, history: &PositionHistory) -> Outcome {
    match evaluate(board) {
        Outcome::Ongoing | Outcome::Check if history.halfmove_clock() >= SEVENTY_FIVE_MOVE_PLIES => {
            Outcome::SeventyFiveMoves
        }
        Outcome::Ongoing | Outcome::Check if history.repetitions() >= FIVEFOLD => Outcome::Repetition,
        outcome => outcome,
    }
}

/// Finds the legal move going from `from` to `to`. A promotion is completed
/// as a queen, since a spoken move only names two squares.
pub fn find_move(board: &Board, from: Square, to: Square) -> Option<ChessMove> {
    let mut candidates = MoveGen::new_legal(board)
        .filter(|mv| mv.get_source() == from && mv.get_dest() == to);
    let first = candidates.next()?;
    if first.get_promotion().is_none() {
        return Some(first);
    }
    std::iter::once(first)
        .chain(candidates)
        .find(|mv| mv.get_promotion() == Some(Piece::Queen))
}

fn piece_letter(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "",
        Piece::Knight => "N",
        Piece::Bishop => "B",
        Piece::Rook => "R",
        Piece::Queen => "Q",
        Piece::King => "K",
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

/// Standard Algebraic Notation of a legal move, in the position before it is played.
pub fn san(board: &Board, mv: ChessMove) -> String {
    let from = mv.get_source();
    let to = mv.get_dest();
    let Some(piece) = board.piece_on(from) else {
        return mv.to_string();
    };

    let file_delta = from.get_file().to_index() as i32 - to.get_file().to_index() as i32;
    let mut out = if piece == Piece::King && file_delta.abs() == 2 {
        let castle = if file_delta < 0 { "O-O" } else { "O-O-O" };
        castle.to_string()
    } else {
        let is_capture = board.piece_on(to).is_some() || (piece == Piece::Pawn && file_delta != 0);
        let mut text = String::from(piece_letter(piece));

        if piece == Piece::Pawn {
            if is_capture {
                text.push(file_char(from));
            }
        } else {
            let rivals: Vec<Square> = MoveGen::new_legal(board)
                .filter(|other| {
                    other.get_dest() == to
                        && other.get_source() != from
                        && board.piece_on(other.get_source()) == Some(piece)
                })
                .map(|other| other.get_source())
                .collect();
            if !rivals.is_empty() {
                if rivals.iter().all(|sq| sq.get_file() != from.get_file()) {
                    text.push(file_char(from));
                } else if rivals.iter().all(|sq| sq.get_rank() != from.get_rank()) {
                    text.push(rank_char(from));
                } else {
                    text.push(file_char(from));
                    text.push(rank_char(from));
                }
            }
        }

        if is_capture {
            text.push('x');
        }
        text.push(file_char(to));
        text.push(rank_char(to));
        if let Some(promotion) = mv.get_promotion() {
            text.push('=');
            text.push_str(piece_letter(promotion));
        }
        text
    };

    let after = board.make_move_new(mv);
    if is_checkmate(&after) {
        out.push('#');
    } else if is_check(&after) {
        out.push('+');
    }
    out
}
