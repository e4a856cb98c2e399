use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "voice_chess.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FrontendKind {
    #[default]
    Web,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One human against the automated opponent
    #[default]
    Computer,
    /// Two humans sharing the microphone
    Human,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HumanColor {
    #[default]
    White,
    Black,
}

impl HumanColor {
    pub fn color(self) -> chess::Color {
        match self {
            HumanColor::White => chess::Color::White,
            HumanColor::Black => chess::Color::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    #[default]
    Random,
    Greedy,
}

/// What happens after a spoken destination is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DestinationRetry {
    /// Drop the origin and ask for a whole new move
    #[default]
    RestartOrigin,
    /// Keep the origin and only ask for the destination again
    RepromptDestination,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub frontend: FrontendKind,
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub mode: GameMode,
    pub human_color: HumanColor,
    pub opponent: OpponentKind,
    pub seed: Option<u64>,
    pub destination_retry: DestinationRetry,
    pub opponent_delay_ms: u64,
    pub poll_interval_ms: u64,
    /// Minimum time between two "did not hear anything" reprompts
    pub silence_reprompt_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frontend: FrontendKind::Web,
            bind_addr: "127.0.0.1:8080".into(),
            static_dir: PathBuf::from("./static"),
            mode: GameMode::Computer,
            human_color: HumanColor::White,
            opponent: OpponentKind::Random,
            seed: None,
            destination_retry: DestinationRetry::RestartOrigin,
            opponent_delay_ms: 1500,
            poll_interval_ms: 100,
            silence_reprompt_ms: 10_000,
        }
    }
}

fn parse_enum<T: ValueEnum>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    T::from_str(&value.replace('_', "-"), true).map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

impl Settings {
    /// Defaults, then the TOML file, then `VOICE_CHESS_*` environment variables.
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("VOICE_CHESS_FRONTEND") {
            self.frontend = parse_enum("frontend", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("VOICE_CHESS_STATIC_DIR") {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("VOICE_CHESS_MODE") {
            self.mode = parse_enum("mode", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_HUMAN_COLOR") {
            self.human_color = parse_enum("human_color", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_OPPONENT") {
            self.opponent = parse_enum("opponent", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_SEED") {
            self.seed = Some(parse_number("seed", &v)?);
        }
        if let Some(v) = lookup("VOICE_CHESS_DESTINATION_RETRY") {
            self.destination_retry = parse_enum("destination_retry", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_OPPONENT_DELAY_MS") {
            self.opponent_delay_ms = parse_number("opponent_delay_ms", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_number("poll_interval_ms", &v)?;
        }
        if let Some(v) = lookup("VOICE_CHESS_SILENCE_REPROMPT_MS") {
            self.silence_reprompt_ms = parse_number("silence_reprompt_ms", &v)?;
        }
        Ok(())
    }

    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    pub fn silence_gap(&self) -> Duration {
        Duration::from_millis(self.silence_reprompt_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
