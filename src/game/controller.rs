//! The turn state machine. One instance owns the board for a whole game and
//! is the only place moves get applied.
//!
//! Phases move as follows:
//! - `AwaitingOrigin`: listen for a square holding a piece of the side to move.
//!   Bad input is answered with feedback and asked again, without limit.
//! - `AwaitingDestination`: listen for the target square. A legal move is
//!   applied; an illegal one sends the player back to `AwaitingOrigin`
//!   (or keeps the origin, under `DestinationRetry::RepromptDestination`).
//! - `OpponentMoving`: the strategy picks from the legal set and the move is
//!   applied and announced.
//! - `GameOver`: reached on mate, a draw (stalemate, dead position, fivefold
//!   repetition or the seventy-five move rule), or a quit seen at any step.

use std::str::FromStr;
use std::time::Duration;

use chess::{Board, ChessMove, Color};
use log::{error, info};

use crate::cancel::CancellationToken;
use crate::config::{DestinationRetry, GameMode, Settings};
use crate::game::parser::Command;
use crate::game::rules::{self, PositionHistory};
use crate::game::strategy::OpponentStrategy;
use crate::game::utils::{piece_name, side_name};
use crate::game::validator;
use crate::models::{Outcome, PendingMove, Phase, Turn};
use crate::voice::{Announcer, BoardDisplay, Frontend, Heard, VoiceInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub mode: GameMode,
    pub human_color: Color,
    pub destination_retry: DestinationRetry,
    pub opponent_delay: Duration,
    pub poll: Duration,
}

impl From<&Settings> for ControllerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            mode: settings.mode,
            human_color: settings.human_color.color(),
            destination_retry: settings.destination_retry,
            opponent_delay: settings.opponent_delay(),
            poll: settings.poll_interval(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

pub struct TurnController {
    board: Board,
    phase: Phase,
    options: ControllerOptions,
    opponent: Box<dyn OpponentStrategy>,
    cancel: CancellationToken,
    moves: Vec<String>,
    history: PositionHistory,
}

impl TurnController {
    pub fn new(
        options: ControllerOptions,
        opponent: Box<dyn OpponentStrategy>,
        cancel: CancellationToken,
    ) -> Self {
        Self::from_board(Board::default(), options, opponent, cancel)
    }

    /// Starts from an arbitrary legal position instead of the initial one.
    pub fn from_board(
        board: Board,
        options: ControllerOptions,
        opponent: Box<dyn OpponentStrategy>,
        cancel: CancellationToken,
    ) -> Self {
        let mut controller = Self {
            board,
            phase: Phase::AwaitingOrigin,
            options,
            opponent,
            cancel,
            moves: Vec::new(),
            history: PositionHistory::new(&board),
        };
        controller.phase = controller.phase_for_turn();
        controller
    }

    /// Starts from a FEN position, keeping its halfmove clock.
    pub fn from_fen(
        fen: &str,
        options: ControllerOptions,
        opponent: Box<dyn OpponentStrategy>,
        cancel: CancellationToken,
    ) -> Result<Self, chess::Error> {
        let board = Board::from_str(fen)?;
        let mut controller = Self::from_board(board, options, opponent, cancel);
        controller.history = PositionHistory::with_clock(&board, rules::halfmove_clock_from_fen(fen));
        Ok(controller)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// SAN of every move applied in this game, in order.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn turn(&self) -> Turn {
        match self.options.mode {
            GameMode::Human => Turn::Human,
            GameMode::Computer if self.board.side_to_move() == self.options.human_color => Turn::Human,
            GameMode::Computer => Turn::Opponent,
        }
    }

    fn phase_for_turn(&self) -> Phase {
        match self.turn() {
            Turn::Human => Phase::AwaitingOrigin,
            Turn::Opponent => Phase::OpponentMoving,
        }
    }

    /// Back to the initial position for a new game.
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.moves.clear();
        self.history = PositionHistory::new(&self.board);
        self.phase = self.phase_for_turn();
    }

    /// Shows the board and announces the first prompt.
    pub fn start<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        frontend.display.show(&self.board, None);
        let outcome = rules::evaluate_game(&self.board, &self.history);
        if outcome.is_terminal() {
            self.phase = Phase::GameOver(outcome);
            return;
        }
        self.enter(self.phase_for_turn(), frontend);
    }

    /// Plays until the game is over and returns how it ended.
    pub fn play<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>) -> Outcome
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        self.start(frontend);
        loop {
            if let Phase::GameOver(outcome) = self.step(frontend) {
                return outcome;
            }
        }
    }

    /// Runs one transition of the state machine.
    pub fn step<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>) -> Phase
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        if self.cancel.is_cancelled() && !self.phase.is_game_over() {
            self.terminate();
            return self.phase;
        }
        match self.phase {
            Phase::AwaitingOrigin => self.on_origin(frontend),
            Phase::AwaitingDestination(pending) => self.on_destination(pending, frontend),
            Phase::OpponentMoving => self.on_opponent(frontend),
            Phase::GameOver(_) => {}
        }
        self.phase
    }

    fn enter<V, A, D>(&mut self, phase: Phase, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        self.phase = phase;
        match phase {
            Phase::AwaitingOrigin => {
                let prompt = match self.options.mode {
                    GameMode::Computer => "Your turn. Please say the initial square.".to_string(),
                    GameMode::Human => format!(
                        "{} to move. Please say the initial square.",
                        side_name(self.board.side_to_move())
                    ),
                };
                frontend.say(&prompt);
            }
            Phase::AwaitingDestination(pending) => frontend.say(&format!(
                "{} at {}. Now say the final square.",
                piece_name(pending.piece),
                pending.origin
            )),
            Phase::OpponentMoving => frontend.say("Opponent is thinking..."),
            Phase::GameOver(_) => {}
        }
    }

    fn terminate(&mut self) {
        info!("game terminated by user after {} moves", self.moves.len());
        self.phase = Phase::GameOver(Outcome::TerminatedByUser);
    }

    fn on_origin<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        match frontend.hear(&self.cancel) {
            Heard::Cancelled => self.terminate(),
            Heard::Retry => {}
            Heard::Command(Command::Square(square)) => {
                match validator::validate_origin(&self.board, square) {
                    Ok(pending) => self.enter(Phase::AwaitingDestination(pending), frontend),
                    Err(rejection) => {
                        info!("origin {} rejected: {}", square, rejection);
                        frontend.say(&rejection.feedback());
                    }
                }
            }
            Heard::Command(_) => frontend.say("Invalid square, please try again."),
        }
    }

    fn on_destination<V, A, D>(&mut self, pending: PendingMove, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        match frontend.hear(&self.cancel) {
            Heard::Cancelled => self.terminate(),
            Heard::Retry => {}
            Heard::Command(Command::Square(destination)) => {
                match validator::validate_move(&self.board, pending.origin, destination) {
                    Ok(mv) => {
                        self.commit(mv, frontend);
                        self.after_move(frontend);
                    }
                    Err(rejection) => {
                        info!("move {}{} rejected: {}", pending.origin, destination, rejection);
                        frontend.say(&rejection.feedback());
                        match self.options.destination_retry {
                            DestinationRetry::RestartOrigin => self.enter(Phase::AwaitingOrigin, frontend),
                            DestinationRetry::RepromptDestination => frontend.say(&format!(
                                "Say the final square for the {} on {}.",
                                piece_name(pending.piece).to_lowercase(),
                                pending.origin
                            )),
                        }
                    }
                }
            }
            Heard::Command(_) => frontend.say("Invalid square, please try again."),
        }
    }

    fn on_opponent<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        if !self.cancel.sleep(self.options.opponent_delay, self.options.poll) {
            self.terminate();
            return;
        }

        let legal = rules::legal_moves(&self.board);
        let mv = match self.opponent.select_move(&self.board) {
            Some(mv) if legal.contains(&mv) => mv,
            other => {
                error!("{} strategy chose {:?}, which is not legal here", self.opponent.name(), other);
                match legal.first() {
                    Some(mv) => *mv,
                    None => {
                        self.after_move(frontend);
                        return;
                    }
                }
            }
        };

        let san = self.commit(mv, frontend);
        frontend.say(&format!("Opponent moved {san}"));
        self.after_move(frontend);
    }

    /// Applies an already validated move and shows the new position.
    fn commit<V, A, D>(&mut self, mv: ChessMove, frontend: &mut Frontend<V, A, D>) -> String
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        let san = rules::san(&self.board, mv);
        let after = rules::apply(&self.board, mv);
        self.history.record(&self.board, mv, &after);
        self.board = after;
        self.moves.push(san.clone());
        info!("move {}: {} -> {}", self.moves.len(), san, self.board);
        frontend.display.show(&self.board, Some(mv));
        san
    }

    fn after_move<V, A, D>(&mut self, frontend: &mut Frontend<V, A, D>)
    where
        V: VoiceInput,
        A: Announcer,
        D: BoardDisplay,
    {
        let outcome = rules::evaluate_game(&self.board, &self.history);
        match outcome {
            Outcome::Checkmate { winner } => {
                frontend.say("Checkmate!");
                frontend.say(&format!("{} wins.", side_name(winner)));
            }
            Outcome::Stalemate => frontend.say("Stalemate. The game is a draw."),
            Outcome::InsufficientMaterial => frontend.say("Draw by insufficient material."),
            Outcome::Repetition => frontend.say("Draw by fivefold repetition."),
            Outcome::SeventyFiveMoves => frontend.say("Draw by the seventy-five move rule."),
            Outcome::Check => frontend.say("Check!"),
            Outcome::Ongoing | Outcome::TerminatedByUser => {}
        }

        if outcome.is_terminal() {
            info!("game over: {:?}", outcome);
            self.phase = Phase::GameOver(outcome);
        } else {
            self.enter(self.phase_for_turn(), frontend);
        }
    }
}
