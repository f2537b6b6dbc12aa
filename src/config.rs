//! Server configuration.
//!
//! Values come from CLI overrides first, then environment variables (a `.env`
//! file is loaded by the binary), then built-in defaults.

use crate::game::validate;
use crate::GameError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WIDTH: i32 = 10;
pub const DEFAULT_HEIGHT: i32 = 10;
pub const DEFAULT_MINES: i32 = 10;

/// Parameters of every newly started game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub mines: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mines: DEFAULT_MINES,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        validate(self.width, self.height, self.mines)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub board: BoardConfig,
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub mines: Option<i32>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting board defaults could not start a game.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match overrides.host {
            Some(host) => host,
            None => parse_var(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
        };
        let port = match overrides.port {
            Some(port) => port,
            None => parse_var(&lookup, "PORT", DEFAULT_PORT)?,
        };

        let board = BoardConfig {
            width: pick(overrides.width, &lookup, "GAME_WIDTH", DEFAULT_WIDTH)?,
            height: pick(overrides.height, &lookup, "GAME_HEIGHT", DEFAULT_HEIGHT)?,
            mines: pick(overrides.mines, &lookup, "GAME_MINES", DEFAULT_MINES)?,
        };
        board.validate().map_err(ConfigError::InvalidBoard)?;

        Ok(ServerConfig {
            bind: SocketAddr::new(host, port),
            board,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid game defaults: {0}")]
    InvalidBoard(GameError),
}

fn pick<F>(value: Option<i32>, lookup: &F, key: &str, default: i32) -> Result<i32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Some(value) => Ok(value),
        None => parse_var(lookup, key, default),
    }
}

/// Parse a variable if it is set and non-empty, else fall back to `default`.
fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("{raw:?}: {e}"),
        }),
    }
}
