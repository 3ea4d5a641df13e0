use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid early window: {start}..={end} (hours must satisfy start <= end <= 23)")]
    InvalidEarlyWindow { start: u32, end: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
