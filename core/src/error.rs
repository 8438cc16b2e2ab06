use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid dimensions, a board needs at least one axis and every axis at least one cell")]
    InvalidDimensions,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Duplicate bomb coordinates")]
    DuplicateBomb,
}

pub type Result<T> = core::result::Result<T, GameError>;
