use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("rows and columns must each be between 2 and 6, got {rows}x{columns}")]
    InvalidDimensions { rows: u32, columns: u32 },

    #[error("the number of cards (rows x columns) must be even, got {rows}x{columns}")]
    OddCardCount { rows: u32, columns: u32 },

    #[error("round duration must be at least one second")]
    InvalidDuration,

    #[error("elapsed time {elapsed}s exceeds the round total {total}s")]
    ElapsedBeyondTotal { elapsed: u32, total: u32 },

    #[error("no active round")]
    NoActiveRound,

    #[error("no resumable saved round for {username}")]
    NoSavedRound { username: String },

    #[error("saved round is not usable: {reason}")]
    CorruptRecord { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
