//! Centralized error types for the simulation.
//!
//! Build-time failures (level parsing, graph construction, asset lookup) are
//! returned as values and abort the operation entirely, so a partially built
//! level is never observed. Per-frame invariant violations are programmer
//! errors and panic instead.

use std::io;

use crate::map::graph::NodeId;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("Pathfinding error: {0}")]
    Path(#[from] PathError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while turning level text into a graph and entity collections.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LevelError {
    #[error("Level has no rows")]
    Empty,

    #[error("Row {row} has length {found}, expected {expected}")]
    IrregularRow { row: usize, expected: usize, found: usize },

    #[error("Level is {width}x{height}, must be at least {minimum}x{minimum}")]
    TooSmall { width: usize, height: usize, minimum: usize },

    #[error("Level has no start marker")]
    MissingStart,

    #[error("Expected {expected} cells for a {width}x{height} grid, found {found}")]
    CellCountMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by graph queries and searches.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("No passable node found after {attempts} attempts")]
    RandomPointExhausted { attempts: u32 },

    #[error("Node not found in graph: {0}")]
    NodeNotFound(NodeId),
}

/// Errors raised while fetching external resources such as level text.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset {name} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Errors raised by high-score persistence.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid high score name: {0:?}")]
    InvalidName(String),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
