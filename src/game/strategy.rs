//! Move selection for the automated side.

use chess::{Board, ChessMove, Piece};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::config::OpponentKind;
use crate::game::rules;

pub trait OpponentStrategy: Send {
    fn name(&self) -> &'static str;

    /// Picks one move from the legal set of `board`, or `None` when there is none.
    fn select_move(&mut self, board: &Board) -> Option<ChessMove>;
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub fn build_strategy(kind: OpponentKind, seed: Option<u64>) -> Box<dyn OpponentStrategy> {
    match kind {
        OpponentKind::Random => Box::new(RandomStrategy::new(seed)),
        OpponentKind::Greedy => Box::new(GreedyStrategy::new(seed)),
    }
}

/// Uniform choice over the legal moves.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl OpponentStrategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_move(&mut self, board: &Board) -> Option<ChessMove> {
        rules::legal_moves(board).choose(&mut self.rng).copied()
    }
}

fn piece_value(piece: Piece) -> u32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 0,
    }
}

/// Mates when it can, otherwise grabs the most valuable piece, otherwise
/// gives check, otherwise plays at random.
pub struct GreedyStrategy {
    rng: StdRng,
}

impl GreedyStrategy {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: seeded_rng(seed) }
    }
}

impl OpponentStrategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn select_move(&mut self, board: &Board) -> Option<ChessMove> {
        let moves = rules::legal_moves(board);
        if moves.is_empty() {
            return None;
        }

        if let Some(mate) = moves
            .iter()
            .find(|mv| rules::is_checkmate(&rules::apply(board, **mv)))
        {
            return Some(*mate);
        }

        let best_capture = moves
            .iter()
            .filter_map(|mv| board.piece_on(mv.get_dest()).map(|victim| (piece_value(victim), *mv)))
            .max_by_key(|(value, _)| *value);
        if let Some((_, capture)) = best_capture {
            return Some(capture);
        }

        let checks: Vec<ChessMove> = moves
            .iter()
            .copied()
            .filter(|mv| rules::is_check(&rules::apply(board, *mv)))
            .collect();
        if !checks.is_empty() {
            return checks.choose(&mut self.rng).copied();
        }

        moves.choose(&mut self.rng).copied()
    }
}
