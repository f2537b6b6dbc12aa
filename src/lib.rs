pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod position;
pub mod registry;
pub mod render;
pub mod server;

pub use board::{Cell, Minefield};
pub use config::{BoardConfig, ConfigError, ConfigOverrides, ServerConfig};
pub use error::{GameError, RegistryError};
pub use game::{Action, CellState, Game, GameState};
pub use position::Position;
pub use registry::GameRegistry;
