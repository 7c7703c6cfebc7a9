use alloc::string::String;
use hashbrown::HashMap;

use crate::*;

/// Key the current game is saved under.
pub const STORAGE_KEY: &str = "Mathionary";

/// String store the game is persisted to, e.g. browser local storage or a directory of files.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StorageError>;

    fn remove(&mut self, key: &str);
}

/// Store that lives as long as the process, for tests and hosts without storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> core::result::Result<(), StorageError> {
        self.entries.insert(key.into(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl GameSession {
    /// Writes the game to `store`. Failures are logged, the game goes on unsaved.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let json = match self.snapshot().to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("Could not serialize game: {}", err);
                return;
            }
        };
        if let Err(err) = store.set(STORAGE_KEY, json) {
            log::error!("Could not save game: {}", err);
        }
    }

    /// Restores the saved game, or starts a new one when nothing usable is stored.
    pub fn load_or_new<S: KeyValueStore + ?Sized>(store: &S, config: SessionConfig) -> Result<Self> {
        if let Some(json) = store.get(STORAGE_KEY) {
            match Self::restore(&json, config.clone()) {
                Ok(session) => return Ok(session),
                Err(err) => log::warn!("Discarding saved game: {}", err),
            }
        }
        Self::new(config)
    }

    fn restore(json: &str, config: SessionConfig) -> core::result::Result<Self, SnapshotError> {
        let snapshot = GameSnapshot::from_json(json)?;
        let mut session = Self::from_snapshot(&snapshot, config)?;
        session.settle_level()?;
        log::info!("Restored level {} game", session.level());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: String) -> core::result::Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove(&mut self, _key: &str) {}
    }

    fn config() -> SessionConfig {
        SessionConfig::new(5).with_operator(Operator::Multiply)
    }

    #[test]
    fn memory_store_keeps_values() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1".to_string()).unwrap();
        store.set("a", "2".to_string()).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn saved_game_is_restored() {
        let mut store = MemoryStore::new();
        let mut session = GameSession::new(config()).unwrap();
        let tile = session.reveal_solutions()[0].x.index();
        session.click(tile).unwrap();
        session.save(&mut store);

        let restored = GameSession::load_or_new(&store, SessionConfig::new(9)).unwrap();

        assert_eq!(restored.operator(), Operator::Multiply);
        assert_eq!(restored.deck(), session.deck());
        assert_eq!(restored.question(), session.question());
        assert_eq!(restored.snapshot(), session.snapshot());
    }

    #[test]
    fn bad_save_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"version": 1}"#.to_string()).unwrap();

        let session = GameSession::load_or_new(&store, config()).unwrap();

        assert_eq!(session.level(), 1);
        assert_eq!(session.progress().used, 0);
    }

    #[test]
    fn nothing_saved_starts_fresh() {
        let session = GameSession::load_or_new(&ReadOnlyStore, config()).unwrap();

        assert_eq!(session.operator(), Operator::Multiply);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn failed_write_is_not_fatal() {
        let session = GameSession::new(config()).unwrap();

        session.save(&mut ReadOnlyStore);
    }

    #[test]
    fn exhausted_save_at_top_level_loads() {
        let json = r#"{
            "version": 1,
            "operation": "addition",
            "level": 4294967295,
            "question": { "answer": 5, "answersNeeded": 2 },
            "user": { "answer": null },
            "answers": [
                { "index": 0, "answer": 2, "selected": false, "used": true, "completes": false },
                { "index": 1, "answer": 3, "selected": false, "used": false, "completes": false }
            ]
        }"#;
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, json.to_string()).unwrap();

        let session = GameSession::load_or_new(&store, config()).unwrap();

        assert_eq!(session.level(), u32::MAX);
        assert_eq!(session.operator(), Operator::Add);
        assert_eq!(session.progress().used, 0);
    }

    #[test]
    fn exhausted_save_moves_to_next_level() {
        let json = r#"{
            "version": 1,
            "operation": "multiplication",
            "level": 3,
            "question": { "answer": 6, "answersNeeded": 2 },
            "user": { "answer": null },
            "answers": [
                { "index": 0, "answer": 2, "selected": false, "used": true, "completes": false },
                { "index": 1, "answer": 3, "selected": false, "used": false, "completes": false }
            ]
        }"#;
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, json.to_string()).unwrap();

        let session = GameSession::load_or_new(&store, config()).unwrap();

        assert_eq!(session.level(), 4);
        assert_eq!(session.deck().len(), usize::from(SMALL_DECK_SIZE));
        assert_eq!(session.progress().used, 0);
    }
}
