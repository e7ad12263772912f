use thiserror::Error;

/// Faults raised while constructing a [Grid](crate::grid::Grid). A grid that failed to build
/// cannot be searched, so these are surfaced to the caller immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("cell spacing must be finite and positive, got {0}")]
    InvalidSpacing(f32),
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {tile:?} at ({x}, {y})")]
    UnknownTile { tile: char, x: usize, y: usize },
}
