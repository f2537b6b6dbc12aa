use crate::{BoardConfig, Game, GameError, RegistryError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;
use uuid::Uuid;

/// In-memory map from player id to that player's game.
///
/// Every access goes through one lock, and the closure given to
/// [`GameRegistry::with_game`] runs while it is held. So at most one call is
/// touching any game at a time, which is all the engine asks of its callers.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: Mutex<HashMap<String, Game>>,
    defaults: BoardConfig,
}

impl GameRegistry {
    pub fn new(defaults: BoardConfig) -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
            defaults,
        }
    }

    pub fn defaults(&self) -> BoardConfig {
        self.defaults
    }

    /// Creates a game with the default board under a fresh player id.
    pub fn start_game(&self) -> Result<String, GameError> {
        let player = Uuid::new_v4().to_string();
        let BoardConfig {
            width,
            height,
            mines,
        } = self.defaults;
        let game = Game::new(width, height, mines, player.clone())?;

        self.lock().insert(player.clone(), game);
        info!(player = %player, width, height, mines, "new game started");
        Ok(player)
    }

    /// Registers an existing game under its own player id, replacing any
    /// previous game of that player.
    pub fn insert(&self, game: Game) {
        self.lock().insert(game.player().to_string(), game);
    }

    pub fn remove(&self, player: &str) -> Option<Game> {
        self.lock().remove(player)
    }

    /// Runs `f` on the player's game with the registry locked.
    pub fn with_game<T>(
        &self,
        player: &str,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Result<T, RegistryError> {
        let mut games = self.lock();
        let game = games
            .get_mut(player)
            .ok_or_else(|| RegistryError::GameNotFound(player.to_string()))?;
        Ok(f(game))
    }

    pub fn contains(&self, player: &str) -> bool {
        self.lock().contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a game half-updated in a way
    // other players care about, so keep serving.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Game>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
