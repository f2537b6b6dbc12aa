use thiserror::Error;

/// Errors returned by the game engine.
///
/// `InvalidCoordinates` covers both an out-of-range cell and a move made after
/// the game has already ended.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("size of the board should be positive")]
    InvalidBoardSize,
    #[error("count of mines should be positive and less than board size")]
    InvalidMineNumber,
    #[error("coords should be positive and less than board size")]
    InvalidCoordinates,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("game not found for player {0}")]
    GameNotFound(String),
}
