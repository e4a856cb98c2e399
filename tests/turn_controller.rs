mod common;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chess::{Board, Color, Piece};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voice_chess::config::{DestinationRetry, GameMode};
use voice_chess::error::ListenError;
use voice_chess::game::controller::TurnController;
use voice_chess::game::strategy::RandomStrategy;
use voice_chess::models::{Outcome, PendingMove, Phase};
use voice_chess::voice::{ChannelVoiceInput, Frontend, Transcript};
use voice_chess::CancellationToken;

use common::*;

fn controller(mode: GameMode) -> TurnController {
    TurnController::new(
        options(mode),
        Box::new(RandomStrategy::new(Some(11))),
        CancellationToken::new(),
    )
}

#[test]
fn human_move_then_opponent_reply() {
    let mut frontend = frontend(&["e2", "e4"]);
    let mut game = controller(GameMode::Computer);

    game.start(&mut frontend);
    assert_eq!(game.phase(), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("Your turn. Please say the initial square."));

    assert_eq!(
        game.step(&mut frontend),
        Phase::AwaitingDestination(PendingMove {
            origin: sq("e2"),
            piece: Piece::Pawn
        })
    );
    assert_eq!(frontend.announcer.last(), Some("Pawn at e2. Now say the final square."));

    assert_eq!(game.step(&mut frontend), Phase::OpponentMoving);
    assert_eq!(game.board().side_to_move(), Color::Black);

    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(game.board().side_to_move(), Color::White);
    assert_eq!(game.moves().len(), 2);
    assert_eq!(game.moves()[0], "e4");
    let reply = format!("Opponent moved {}", game.moves()[1]);
    assert!(frontend.announcer.said(&reply));

    // initial position plus one frame per half-move
    assert_eq!(frontend.display.frames.len(), 3);
    assert_eq!(frontend.display.frames[2].0, *game.board());
}

#[test]
fn scripted_reply_is_announced_in_san() {
    let mut frontend = frontend(&["g1", "f3"]);
    let mut game = TurnController::new(
        options(GameMode::Computer),
        Box::new(ScriptedStrategy::new(&[("d7", "d5")])),
        CancellationToken::new(),
    );
    game.start(&mut frontend);
    for _ in 0..3 {
        game.step(&mut frontend);
    }
    assert_eq!(game.moves(), ["Nf3".to_string(), "d5".to_string()]);
    assert!(frontend.announcer.said("Opponent moved d5"));
    assert!(frontend.announcer.said("Opponent is thinking..."));
}

#[test]
fn empty_origin_is_asked_again() {
    let mut frontend = frontend(&["e5"]);
    let mut game = controller(GameMode::Computer);
    game.start(&mut frontend);

    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("There is no piece on e5. Try again."));
    assert_eq!(*game.board(), Board::default());
    assert!(game.moves().is_empty());
}

#[test]
fn opponent_piece_is_not_an_origin() {
    let mut frontend = frontend(&["e7"]);
    let mut game = controller(GameMode::Computer);
    game.start(&mut frontend);

    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("The pawn on e7 is black. Try again."));
}

#[test]
fn words_outside_the_vocabulary_are_retried() {
    let mut frontend = frontend(&["hello", "e9", "yes"]);
    let mut game = controller(GameMode::Computer);
    game.start(&mut frontend);

    for _ in 0..3 {
        assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    }
    assert_eq!(frontend.announcer.count("Invalid square, please try again."), 3);
}

#[test]
fn rejected_destination_starts_the_move_over() {
    let mut frontend = frontend(&["e2", "e5", "e4"]);
    let mut game = controller(GameMode::Computer);
    game.start(&mut frontend);

    game.step(&mut frontend);
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(*game.board(), Board::default());
    let tail: Vec<&str> = frontend.announcer.lines.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(
        tail,
        ["Your turn. Please say the initial square.", "Illegal move. Try again."]
    );

    // "e4" is now heard as a fresh origin, not as the destination of e2
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("There is no piece on e4. Try again."));
    assert!(game.moves().is_empty());
}

#[test]
fn reprompt_variant_keeps_the_origin() {
    let mut frontend = frontend(&["e2", "e5", "e4"]);
    let mut opts = options(GameMode::Human);
    opts.destination_retry = DestinationRetry::RepromptDestination;
    let mut game = TurnController::new(opts, Box::new(RandomStrategy::new(Some(1))), CancellationToken::new());
    game.start(&mut frontend);

    game.step(&mut frontend);
    assert_eq!(
        game.step(&mut frontend),
        Phase::AwaitingDestination(PendingMove {
            origin: sq("e2"),
            piece: Piece::Pawn
        })
    );
    assert_eq!(frontend.announcer.last(), Some("Say the final square for the pawn on e2."));
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(game.moves(), ["e4".to_string()]);
}

#[test]
fn recognition_failures_are_retried() {
    let voice = ScriptedVoice::from_results(vec![
        Err(ListenError::NotUnderstood),
        Err(ListenError::Timeout),
        Ok("E 2".to_string()),
    ]);
    let mut frontend = Frontend::new(voice, RecordingAnnouncer::default(), RecordingDisplay::default());
    let mut game = controller(GameMode::Computer);
    game.start(&mut frontend);

    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("Could not understand, please repeat."));
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("I did not hear anything, please repeat."));
    assert!(matches!(game.step(&mut frontend), Phase::AwaitingDestination(_)));
}

#[test]
fn unavailable_speech_service_ends_the_game() {
    let voice = ScriptedVoice::from_results(vec![Err(ListenError::Unavailable), Ok("e2".to_string())]);
    let mut frontend = Frontend::new(voice, RecordingAnnouncer::default(), RecordingDisplay::default());
    let cancel = CancellationToken::new();
    let mut game = TurnController::new(
        options(GameMode::Computer),
        Box::new(RandomStrategy::new(Some(1))),
        cancel.clone(),
    );

    assert_eq!(game.play(&mut frontend), Outcome::TerminatedByUser);
    assert!(cancel.is_cancelled());
    assert_eq!(frontend.announcer.last(), Some("Speech service is unavailable, try again later."));
    assert_eq!(frontend.voice.remaining(), 1);
}

#[test]
fn check_is_announced_but_play_continues() {
    let mut frontend = frontend(&["e2", "e4", "f7", "f6", "d1", "h5"]);
    let mut game = controller(GameMode::Human);
    game.start(&mut frontend);
    for _ in 0..6 {
        game.step(&mut frontend);
    }

    assert_eq!(game.phase(), Phase::AwaitingOrigin);
    assert_eq!(game.board().side_to_move(), Color::Black);
    assert_eq!(game.moves(), ["e4", "f6", "Qh5+"].map(String::from));
    let tail: Vec<&str> = frontend.announcer.lines.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(tail, ["Black to move. Please say the initial square.", "Check!"]);
}

#[test]
fn checkmate_ends_the_game() {
    let mut frontend = frontend(&FOOLS_MATE);
    let mut game = controller(GameMode::Human);

    let outcome = game.play(&mut frontend);
    assert_eq!(outcome, Outcome::Checkmate { winner: Color::Black });
    assert_eq!(game.phase(), Phase::GameOver(outcome));
    assert_eq!(game.moves().last().map(String::as_str), Some("Qh4#"));
    assert_eq!(frontend.voice.remaining(), 0);
    let tail: Vec<&str> = frontend.announcer.lines.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(tail, ["Black wins.", "Checkmate!"]);
}

#[test]
fn quit_interrupts_a_pending_listen() {
    let (_transcripts, rx) = mpsc::channel::<Transcript>();
    let voice = ChannelVoiceInput::new(rx, Duration::from_millis(10));
    let mut frontend = Frontend::new(voice, RecordingAnnouncer::default(), RecordingDisplay::default());
    let cancel = CancellationToken::new();
    let mut game = TurnController::new(
        options(GameMode::Computer),
        Box::new(RandomStrategy::new(Some(1))),
        cancel.clone(),
    );

    let quitter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
    });
    let started = Instant::now();
    assert_eq!(game.play(&mut frontend), Outcome::TerminatedByUser);
    quitter.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(frontend.announcer.lines, ["Your turn. Please say the initial square."]);
}

#[test]
fn quit_interrupts_the_opponent_delay() {
    let mut frontend = frontend(&[]);
    let cancel = CancellationToken::new();
    let mut opts = options(GameMode::Computer);
    opts.human_color = Color::Black;
    opts.opponent_delay = Duration::from_secs(30);
    let mut game = TurnController::new(opts, Box::new(RandomStrategy::new(Some(1))), cancel.clone());

    let quitter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        cancel.cancel();
    });
    let started = Instant::now();
    assert_eq!(game.play(&mut frontend), Outcome::TerminatedByUser);
    quitter.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(game.moves().is_empty());
}

#[test]
fn computer_opens_when_the_human_plays_black() {
    let mut frontend = frontend(&[]);
    let mut opts = options(GameMode::Computer);
    opts.human_color = Color::Black;
    let mut game = TurnController::new(opts, Box::new(RandomStrategy::new(Some(3))), CancellationToken::new());

    game.start(&mut frontend);
    assert_eq!(game.phase(), Phase::OpponentMoving);
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(game.board().side_to_move(), Color::Black);
    assert_eq!(game.moves().len(), 1);
}

#[test]
fn illegal_strategy_choice_is_replaced() {
    let mut frontend = frontend(&[]);
    let mut opts = options(GameMode::Computer);
    opts.human_color = Color::Black;
    let mut game = TurnController::new(
        opts,
        Box::new(ScriptedStrategy::new(&[("e2", "e5")])),
        CancellationToken::new(),
    );

    game.start(&mut frontend);
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(game.moves().len(), 1);
    assert_eq!(game.board().side_to_move(), Color::Black);
    assert!(game.board().is_sane());
}

#[test]
fn broken_speech_sink_does_not_stop_the_game() {
    let mut frontend = Frontend::new(ScriptedVoice::new(&["e2", "e4"]), BrokenAnnouncer, RecordingDisplay::default());
    let mut game = controller(GameMode::Human);
    game.start(&mut frontend);
    game.step(&mut frontend);
    game.step(&mut frontend);
    assert_eq!(game.moves(), ["e4".to_string()]);
}

#[test]
fn random_speech_never_corrupts_the_board() {
    let mut rng = StdRng::seed_from_u64(2024);
    let words: Vec<String> = (0..600)
        .map(|_| {
            if rng.random_bool(0.05) {
                "banana".to_string()
            } else {
                let file = (b'a' + rng.random_range(0..8u8)) as char;
                let rank = (b'1' + rng.random_range(0..8u8)) as char;
                format!("{file}{rank}")
            }
        })
        .collect();
    let lines: Vec<&str> = words.iter().map(String::as_str).collect();
    let mut frontend = frontend(&lines);
    let mut game = controller(GameMode::Human);
    game.start(&mut frontend);

    let mut applied = 0;
    while !game.phase().is_game_over() {
        game.step(&mut frontend);
        assert!(game.board().is_sane());
        if game.moves().len() != applied {
            applied = game.moves().len();
            let (shown, _) = frontend.display.frames.last().unwrap();
            assert_eq!(shown, game.board());
        }
    }
    assert_eq!(frontend.display.frames.len(), game.moves().len() + 1);
}

fn from_fen(fen: &str, mode: GameMode) -> TurnController {
    TurnController::from_fen(
        fen,
        options(mode),
        Box::new(RandomStrategy::new(Some(5))),
        CancellationToken::new(),
    )
    .unwrap()
}

#[test]
fn fivefold_repetition_is_a_draw() {
    let lines = knight_shuffles(6);
    let mut frontend = frontend(&lines);
    let mut game = controller(GameMode::Human);

    assert_eq!(game.play(&mut frontend), Outcome::Repetition);
    assert_eq!(game.moves().len(), 16);
    assert_eq!(*game.board(), Board::default());
    assert_eq!(frontend.voice.remaining(), 16);
    assert_eq!(frontend.announcer.last(), Some("Draw by fivefold repetition."));
}

#[test]
fn stalemating_move_ends_the_game() {
    let mut frontend = frontend(&["c1", "c7", "a8"]);
    let mut game = from_fen("k7/8/1K6/8/8/8/8/2Q5 w - - 0 1", GameMode::Human);

    assert_eq!(game.play(&mut frontend), Outcome::Stalemate);
    assert_eq!(game.moves(), ["Qc7".to_string()]);
    assert_eq!(frontend.voice.remaining(), 1);
    assert_eq!(frontend.announcer.last(), Some("Stalemate. The game is a draw."));
}

#[test]
fn capturing_the_last_piece_is_a_dead_draw() {
    let mut frontend = frontend(&["e1", "d1"]);
    let mut game = from_fen("4k3/8/8/8/8/8/8/3bK3 w - - 0 1", GameMode::Human);

    assert_eq!(game.play(&mut frontend), Outcome::InsufficientMaterial);
    assert_eq!(game.moves(), ["Kxd1".to_string()]);
    assert_eq!(frontend.announcer.last(), Some("Draw by insufficient material."));
}

#[test]
fn seventy_fifth_quiet_move_is_a_draw() {
    let mut frontend = frontend(&["a1", "a2", "e8"]);
    let mut game = from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 80", GameMode::Human);

    assert_eq!(game.play(&mut frontend), Outcome::SeventyFiveMoves);
    assert_eq!(game.moves(), ["Ra2".to_string()]);
    assert_eq!(frontend.voice.remaining(), 1);
    assert_eq!(frontend.announcer.last(), Some("Draw by the seventy-five move rule."));
}

#[test]
fn a_pawn_move_restarts_the_quiet_count() {
    let mut frontend = frontend(&["a2", "a3"]);
    let mut game = from_fen("4k3/8/8/8/8/8/P7/4K3 w - - 149 80", GameMode::Human);

    game.start(&mut frontend);
    game.step(&mut frontend);
    assert_eq!(game.step(&mut frontend), Phase::AwaitingOrigin);
    assert_eq!(frontend.announcer.last(), Some("Black to move. Please say the initial square."));
}

#[test]
fn quit_interrupts_the_destination_listen() {
    let (transcripts, rx) = mpsc::channel::<Transcript>();
    let voice = ChannelVoiceInput::new(rx, Duration::from_millis(10));
    let mut frontend = Frontend::new(voice, RecordingAnnouncer::default(), RecordingDisplay::default());
    let cancel = CancellationToken::new();
    let mut game = TurnController::new(
        options(GameMode::Computer),
        Box::new(RandomStrategy::new(Some(1))),
        cancel.clone(),
    );
    transcripts.send(Transcript::Heard("e2".to_string())).unwrap();

    let quitter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        cancel.cancel();
    });
    let started = Instant::now();
    assert_eq!(game.play(&mut frontend), Outcome::TerminatedByUser);
    quitter.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(game.moves().is_empty());
    assert_eq!(
        frontend.announcer.lines,
        [
            "Your turn. Please say the initial square.",
            "Pawn at e2. Now say the final square."
        ]
    );
}
