use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;

use voice_chess::config::{
    DestinationRetry, FrontendKind, GameMode, HumanColor, OpponentKind, Settings,
};
use voice_chess::console::{spawn_stdin_transcriber, ConsoleAnnouncer, ConsoleDisplay};
use voice_chess::models::AppState;
use voice_chess::routes;
use voice_chess::voice::ChannelVoiceInput;
use voice_chess::websocket::ViewerHub;
use voice_chess::{CancellationToken, Frontend, Session, SessionReport};

/// Play chess by voice against the computer or a friend.
#[derive(Parser, Debug)]
#[command(name = "voice_chess")]
struct Cli {
    /// Settings file (defaults to ./voice_chess.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use the terminal instead of the browser viewer
    #[arg(long)]
    console: bool,
    /// Address for the viewer page
    #[arg(long)]
    bind: Option<String>,
    #[arg(long, value_enum)]
    mode: Option<GameMode>,
    /// Side played by the human against the computer
    #[arg(long, value_enum)]
    color: Option<HumanColor>,
    #[arg(long, value_enum)]
    opponent: Option<OpponentKind>,
    #[arg(long, value_enum)]
    destination_retry: Option<DestinationRetry>,
    /// Seed for the opponent's random choices
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    opponent_delay_ms: Option<u64>,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if self.console {
            settings.frontend = FrontendKind::Console;
        }
        if let Some(bind) = &self.bind {
            settings.bind_addr = bind.clone();
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(color) = self.color {
            settings.human_color = color;
        }
        if let Some(opponent) = self.opponent {
            settings.opponent = opponent;
        }
        if let Some(retry) = self.destination_retry {
            settings.destination_retry = retry;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(delay) = self.opponent_delay_ms {
            settings.opponent_delay_ms = delay;
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    cli.apply(&mut settings);
    info!("settings: {:?}", settings);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        info!("interrupt received, shutting down");
        interrupt.cancel();
    })
    .context("failed to install Ctrl-C handler")?;

    let report = match settings.frontend {
        FrontendKind::Console => run_console(&settings, cancel),
        FrontendKind::Web => actix_rt::System::new().block_on(run_web(settings, cancel))?,
    };
    info!("session summary: {}", serde_json::to_string(&report)?);
    Ok(())
}

fn run_console(settings: &Settings, cancel: CancellationToken) -> SessionReport {
    let voice = ChannelVoiceInput::new(spawn_stdin_transcriber(), settings.poll_interval())
        .with_silence_gap(settings.silence_gap());
    let frontend = Frontend::new(voice, ConsoleAnnouncer, ConsoleDisplay);
    Session::from_settings(frontend, settings, cancel).run()
}

async fn run_web(settings: Settings, cancel: CancellationToken) -> anyhow::Result<SessionReport> {
    let (transcripts, rx) = mpsc::channel();
    let hub = ViewerHub::new();

    // Create shared application state
    let app_state = web::Data::new(AppState {
        hub: hub.clone(),
        transcripts,
        cancel: cancel.clone(),
    });
    let static_dir = settings.static_dir.clone();

    // Ctrl-C goes through the cancellation token, not the server's own handler
    let server = HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(app_state.clone())
            .configure(move |cfg| routes::configure_routes(cfg, &static_dir))
    })
    .disable_signals()
    .shutdown_timeout(2)
    .bind(&settings.bind_addr)
    .with_context(|| format!("failed to bind {}", settings.bind_addr))?
    .run();
    info!("Open http://{} to play", settings.bind_addr);

    let handle = server.handle();
    let session = thread::spawn(move || {
        let poll = settings.poll_interval();
        let report = if hub.wait_for_viewer(&cancel, poll) {
            let voice = ChannelVoiceInput::new(rx, poll).with_silence_gap(settings.silence_gap());
            let frontend = Frontend::new(voice, hub.clone(), hub);
            Session::from_settings(frontend, &settings, cancel).run()
        } else {
            SessionReport::default()
        };
        futures::executor::block_on(handle.stop(true));
        report
    });

    server.await.context("web server failed")?;
    session
        .join()
        .map_err(|_| anyhow!("session thread panicked"))
}
