use std::path::PathBuf;

use thiserror::Error;

pub type FdResult<T> = Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to read map file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid hex address '{0}'")]
    InvalidAddress(String),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Unknown lookup strategy '{0}'")]
    UnknownStrategy(String),
    #[error("Insufficient arguments")]
    InsufficientArguments,
    #[error("Too many arguments")]
    TooManyArguments,
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Ron(#[from] ron::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
