use thiserror::Error;

/// Result type local to tinypool-mem.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A constructor or request argument violated its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lease was used after it handed its value back.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Config(#[from] tinypool_core::Error),
}
