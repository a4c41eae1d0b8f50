use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size and frame divider must be non-zero")]
    InvalidSize,
    #[error("Win level must be between 1 and 31")]
    InvalidWinLevel,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board is full, no empty cell to spawn a tile in")]
    BoardFull,
}

pub type Result<T> = core::result::Result<T, GameError>;
