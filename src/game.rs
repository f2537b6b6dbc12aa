use crate::board::index;
use crate::{Cell, GameError, Minefield, Position};
use ndarray::{Array2, Zip};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// What the player has done to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Covered,
    Opened,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Open,
    Flag,
    Unflag,
}

/// One player's game: an immutable minefield plus the mutable overlay on top.
///
/// The engine does no locking. Callers must not run two mutating calls on the
/// same game at once.
#[derive(Debug, Clone)]
pub struct Game {
    minefield: Minefield,
    overlay: Array2<CellState>,
    state: GameState,
    player: String,
}

impl Game {
    pub fn new(
        width: i32,
        height: i32,
        mines_count: i32,
        player: impl Into<String>,
    ) -> Result<Self, GameError> {
        Self::with_rng(width, height, mines_count, player, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        mines_count: i32,
        player: impl Into<String>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        validate(width, height, mines_count)?;

        let minefield = Minefield::generate(
            width as usize,
            height as usize,
            mines_count as usize,
            rng,
        );
        Ok(Self::from_minefield(minefield, player))
    }

    /// Starts a game over an already built minefield.
    pub fn from_minefield(minefield: Minefield, player: impl Into<String>) -> Self {
        let (width, height) = minefield.dimensions();
        Self {
            minefield,
            overlay: Array2::default((height, width)),
            state: GameState::Playing,
            player: player.into(),
        }
    }

    pub fn perform_action(&mut self, pos: Position, action: Action) -> Result<(), GameError> {
        match action {
            Action::Open => self.open_cell(pos),
            Action::Flag => self.flag_cell(pos),
            Action::Unflag => self.unflag_cell(pos),
        }
    }

    /// Opens a cell, flood-filling across zero-count cells.
    ///
    /// Opening a cell that is already opened or flagged is a no-op.
    pub fn open_cell(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;

        let mut to_open = vec![pos];
        while let Some(current) = to_open.pop() {
            let state = &mut self.overlay[index(current)];
            if *state != CellState::Covered {
                continue;
            }
            *state = CellState::Opened;

            match self.minefield.get(current) {
                Some(Cell::Mine) => {
                    debug!(player = %self.player, x = current.x, y = current.y, "mine opened");
                    self.state = GameState::Lost;
                    return Ok(());
                }
                Some(Cell::Clear(0)) => {
                    to_open.extend(self.minefield.neighbors(current));
                }
                _ => {}
            }
        }

        self.check_win();
        Ok(())
    }

    /// Marks a cell as flagged whatever its current state, opened cells included.
    pub fn flag_cell(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;
        self.overlay[index(pos)] = CellState::Flagged;
        Ok(())
    }

    /// Marks a cell as covered whatever its current state. Unflagging an
    /// opened cell covers it again.
    pub fn unflag_cell(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;
        self.overlay[index(pos)] = CellState::Covered;
        Ok(())
    }

    fn check_move(&self, pos: Position) -> Result<(), GameError> {
        if !self.minefield.contains(pos) || self.state != GameState::Playing {
            return Err(GameError::InvalidCoordinates);
        }
        Ok(())
    }

    fn check_win(&mut self) {
        let cleared = Zip::from(&self.overlay)
            .and(self.minefield.cells())
            .all(|state, cell| *state != CellState::Covered || *cell == Cell::Mine);

        if cleared {
            debug!(player = %self.player, "all safe cells cleared");
            self.state = GameState::Won;
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn width(&self) -> usize {
        self.minefield.width()
    }

    pub fn height(&self) -> usize {
        self.minefield.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.minefield.dimensions()
    }

    pub fn cell_state(&self, pos: Position) -> Option<CellState> {
        if self.minefield.contains(pos) {
            Some(self.overlay[index(pos)])
        } else {
            None
        }
    }

    pub fn opened_count(&self) -> usize {
        self.count(CellState::Opened)
    }

    pub fn flagged_count(&self) -> usize {
        self.count(CellState::Flagged)
    }

    fn count(&self, wanted: CellState) -> usize {
        self.overlay.iter().filter(|&&state| state == wanted).count()
    }
}

/// Checks game parameters before anything is generated.
pub fn validate(width: i32, height: i32, mines_count: i32) -> Result<(), GameError> {
    if width <= 0 || height <= 0 {
        return Err(GameError::InvalidBoardSize);
    }
    let cells = i64::from(width) * i64::from(height);
    if mines_count <= 0 || i64::from(mines_count) >= cells {
        return Err(GameError::InvalidMineNumber);
    }
    Ok(())
}
