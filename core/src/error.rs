use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile index")]
    InvalidIndex,
    #[error("Tile value must be a single digit")]
    InvalidTileValue,
    #[error("Tile was already used, it cannot be selected")]
    TileUsed,
    #[error("No pair of available tiles can form a question")]
    NoValidQuestion,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown math operation")]
pub struct UnknownOperator;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Saved game is not valid JSON or misses a field: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Saved game carries no schema version")]
    MissingVersion,
    #[error("Saved game has unsupported schema version {0}")]
    UnsupportedVersion(u32),
    #[error("Saved game is inconsistent: {0}")]
    Inconsistent(&'static str),
    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,
    #[error("Could not write to storage: {0}")]
    Write(String),
}
