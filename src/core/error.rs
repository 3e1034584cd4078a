use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Inexistent record: {0}")]
    NotFound(String),
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("git backend error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Adapter error: {0}")]
    Adapter(String),
}
