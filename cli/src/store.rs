use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use mathionary_core::{KeyValueStore, StorageError};

/// Keeps every key as `<key>.json` inside one directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Could not read {}: {}", self.path(key).display(), err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(self.path(key), value))
            .map_err(|err| StorageError::Write(err.to_string()))
    }

    fn remove(&mut self, key: &str) {
        match fs::remove_file(self.path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => log::warn!("Could not remove {}: {}", self.path(key).display(), err),
        }
    }
}
