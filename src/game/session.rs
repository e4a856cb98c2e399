use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::config::{GameMode, Settings};
use crate::game::controller::{ControllerOptions, TurnController};
use crate::game::rematch::{self, Participant};
use crate::game::strategy::{build_strategy, OpponentStrategy};
use crate::game::utils::{outcome_status, side_name};
use crate::models::GameRecord;
use crate::voice::{Announcer, BoardDisplay, Frontend, VoiceInput};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    pub games: Vec<GameRecord>,
}

/// Games played back to back on one frontend, until nobody wants another.
pub struct Session<V, A, D> {
    frontend: Frontend<V, A, D>,
    controller: TurnController,
    participants: Vec<Participant>,
    cancel: CancellationToken,
}

impl<V, A, D> Session<V, A, D>
where
    V: VoiceInput,
    A: Announcer,
    D: BoardDisplay,
{
    pub fn new(
        frontend: Frontend<V, A, D>,
        options: ControllerOptions,
        opponent: Box<dyn OpponentStrategy>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            frontend,
            participants: rematch::participants(options.mode),
            controller: TurnController::new(options, opponent, cancel.clone()),
            cancel,
        }
    }

    pub fn from_settings(frontend: Frontend<V, A, D>, settings: &Settings, cancel: CancellationToken) -> Self {
        let opponent = build_strategy(settings.opponent, settings.seed);
        info!("opponent strategy: {}", opponent.name());
        Self::new(frontend, ControllerOptions::from(settings), opponent, cancel)
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn frontend(&self) -> &Frontend<V, A, D> {
        &self.frontend
    }

    fn welcome(&self) -> String {
        let options = self.controller.options();
        match options.mode {
            GameMode::Computer => format!(
                "Welcome to Voice Chess! You are playing as {}.",
                side_name(options.human_color)
            ),
            GameMode::Human => "Welcome to Voice Chess! White moves first.".to_string(),
        }
    }

    pub fn run(&mut self) -> SessionReport {
        let welcome = self.welcome();
        self.frontend.say(&welcome);

        let mut report = SessionReport::default();
        loop {
            let outcome = self.controller.play(&mut self.frontend);
            let record = GameRecord {
                id: Uuid::new_v4(),
                status: outcome_status(outcome),
                moves: self.controller.moves().to_vec(),
                final_fen: self.controller.board().to_string(),
                outcome,
            };
            info!("game {} finished: {} after {} moves", record.id, record.status, record.moves.len());
            report.games.push(record);

            if !rematch::negotiate(&mut self.frontend, outcome, &self.participants, &self.cancel) {
                break;
            }
            info!("rematch agreed");
            self.frontend.say("Starting a new game.");
            self.controller.reset();
        }

        if !self.cancel.is_cancelled() {
            self.frontend.say("Game over.");
        }
        report
    }
}
