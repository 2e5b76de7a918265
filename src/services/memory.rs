use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

use crate::{
    game::Game,
    models::{Difficulty, GameType},
    services::lock,
};

/// Handle to a live game. Callers outside the registry lock still serialize
/// on the game's own mutex, so two requests for the same game never interleave.
pub type SharedGame = Arc<Mutex<Game>>;

/// Registry of all live games, keyed by game id
#[derive(Default)]
pub struct MemoryService {
    games: Mutex<HashMap<String, SharedGame>>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game of the given type, generate its challenge and register it
    pub fn create_game(&self, game_type: GameType, difficulty: Difficulty) -> String {
        let mut games = lock(&self.games);

        let game_id = Self::generate_game_id();
        let mut game = Game::new(game_type, difficulty);
        game.generate();
        games.insert(game_id.clone(), Arc::new(Mutex::new(game)));

        tracing::info!(
            "Created {} game {} ({})",
            game_type.as_str(),
            game_id,
            difficulty.as_str()
        );

        game_id
    }

    pub fn get_game(&self, game_id: &str) -> Option<SharedGame> {
        lock(&self.games).get(game_id).cloned()
    }

    /// Drop the registry's reference. Handles already given out stay valid
    /// until their holders release them. Returns whether the game existed.
    pub fn remove_game(&self, game_id: &str) -> bool {
        let removed = lock(&self.games).remove(game_id).is_some();
        if removed {
            tracing::debug!("Removed game {}", game_id);
        }
        removed
    }

    /// Drop every game, returning how many were registered
    pub fn cleanup(&self) -> usize {
        let mut games = lock(&self.games);
        let count = games.len();
        games.clear();
        count
    }

    pub fn len(&self) -> usize {
        lock(&self.games).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn generate_game_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_create_and_fetch() {
        let service = MemoryService::new();
        let id = service.create_game(GameType::Sequence, Difficulty::Easy);

        let game = service.get_game(&id).expect("game should be registered");
        let game = lock(&game);
        assert_eq!(game.game_type(), GameType::Sequence);
        assert_eq!(game.difficulty(), Difficulty::Easy);
        // Challenge is generated on creation
        assert_eq!(game.sequence().len(), 4);
    }

    #[test]
    fn test_unknown_game() {
        let service = MemoryService::new();
        assert!(service.get_game("missing").is_none());
        assert!(!service.remove_game("missing"));
    }

    #[test]
    fn test_remove_keeps_outstanding_handles_alive() {
        let service = MemoryService::new();
        let id = service.create_game(GameType::Pairs, Difficulty::Easy);
        let handle = service.get_game(&id).unwrap();

        assert!(service.remove_game(&id));
        assert!(service.get_game(&id).is_none());

        // The caller's handle still works after removal
        let mut game = lock(&handle);
        let cards = game.as_cards_mut().unwrap();
        assert!(cards.flip_card(0).is_ok());
    }

    #[test]
    fn test_cleanup_drops_everything() {
        let service = MemoryService::new();
        service.create_game(GameType::Sequence, Difficulty::Easy);
        service.create_game(GameType::Numbers, Difficulty::Medium);
        service.create_game(GameType::Pairs, Difficulty::Hard);

        assert_eq!(service.len(), 3);
        assert_eq!(service.cleanup(), 3);
        assert!(service.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let service = MemoryService::new();
        let ids: std::collections::HashSet<String> = (0..200)
            .map(|_| service.create_game(GameType::Sequence, Difficulty::Easy))
            .collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(service.len(), 200);
    }

    #[test]
    fn test_concurrent_flips_on_one_game_are_serialized() {
        let service = Arc::new(MemoryService::new());
        let id = service.create_game(GameType::Pairs, Difficulty::Hard);

        let handles: Vec<_> = (0..16)
            .map(|card_id| {
                let service = Arc::clone(&service);
                let id = id.clone();
                thread::spawn(move || {
                    let game = service.get_game(&id).unwrap();
                    let mut game = lock(&game);
                    game.as_cards_mut().unwrap().flip_card(card_id).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        // Never more than two unresolved flips, however the threads race
        assert_eq!(successes, 2);
        let game = service.get_game(&id).unwrap();
        let game = lock(&game);
        let cards = game.as_cards().unwrap();
        assert_eq!(cards.cards().iter().filter(|c| c.flipped).count(), 2);
    }
}
