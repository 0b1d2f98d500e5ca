//! Server state management
//!
//! Registry of active games plus the store they persist into.

use hexchess_core::{Game, GameError, GameStore, MemoryStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// A game shared between its two sockets and the HTTP handlers
pub type SharedGame = Arc<Mutex<Game>>;

/// Lock a game, recovering it if a handler panicked while holding it
pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Server-wide shared state
pub struct ServerState {
    games: RwLock<HashMap<String, SharedGame>>,
    store: Arc<dyn GameStore>,
}

impl ServerState {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn GameStore> {
        Arc::clone(&self.store)
    }

    /// Register a fresh game from the starting position
    pub fn create_game(&self) -> SharedGame {
        self.insert(Game::new())
    }

    pub fn create_game_with_id(&self, id: &str) -> SharedGame {
        self.insert(Game::with_id(id))
    }

    fn insert(&self, game: Game) -> SharedGame {
        let game = game.with_store(self.store());
        game.save();

        let id = game.id().to_string();
        let shared = Arc::new(Mutex::new(game));
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::clone(&shared));

        tracing::info!(game = %id, "game created");
        shared
    }

    pub fn get(&self, id: &str) -> Option<SharedGame> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Active game by id, reloading it from the store when it is not in
    /// memory. Finished games are handed out but not re-registered.
    pub fn get_or_load(&self, id: &str) -> Result<SharedGame, GameError> {
        if let Some(game) = self.get(id) {
            return Ok(game);
        }

        let game = Game::load(id, self.store())?;
        if game.is_finished() {
            return Ok(Arc::new(Mutex::new(game)));
        }

        tracing::info!(game = %id, "game reloaded from storage");
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let shared = games
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(game)));
        Ok(Arc::clone(shared))
    }

    /// Playable game under a fixed id. A missing or finished record is
    /// replaced by a fresh game.
    pub fn seed_game(&self, id: &str) -> SharedGame {
        match self.get_or_load(id) {
            Ok(game) if !lock_game(&game).is_finished() => game,
            _ => self.create_game_with_id(id),
        }
    }

    /// Drop a game from the registry; its record stays in the store
    pub fn remove(&self, id: &str) {
        let removed = self
            .games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            tracing::info!(game = %id, "game removed from registry");
        }
    }

    pub fn active_games(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
