use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FiberError>;

#[derive(Error, Debug)]
pub enum FiberError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid internal key: {0}")]
    InvalidKey(String),

    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Contract registry not found at {}", .0.display())]
    RegistryUnavailable(PathBuf),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Partition {} not found at {}", .index, .path.display())]
    PartitionUnavailable { index: usize, path: PathBuf },

    #[error("Invalid contract status: {0}")]
    InvalidStatus(String),
}
