//! Error types for Gridshot.

use thiserror::Error;

use crate::ids::MapId;

/// Errors raised while parsing a map layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// Layout has no rows or no columns
    #[error("Map layout is empty")]
    Empty,

    /// A row's width differs from the first row
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// Row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        actual: usize,
    },

    /// A character is neither floor nor a wall digit
    #[error("Invalid tile {found:?} at row {row}, column {col}")]
    InvalidTile {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Offending character
        found: char,
    },
}

/// Errors raised while building a level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// No layout is registered for the map id
    #[error("Unknown map: {0}")]
    UnknownMap(MapId),

    /// The layout failed to parse
    #[error("Invalid layout: {0}")]
    Map(#[from] MapError),

    /// A spawn point lies inside a wall
    #[error("Spawn point at cell ({x}, {y}) is blocked")]
    SpawnBlocked {
        /// Cell column
        x: i32,
        /// Cell row
        y: i32,
    },
}

/// Errors raised by high-score storage.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed file contents
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}
