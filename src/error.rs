use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("url too short")]
    TooShort,

    #[error("url missing scheme")]
    MissingScheme,

    #[error("not a gopher url: {0}")]
    NotGopher(String),

    #[error("url missing host")]
    MissingHost,

    #[error("port is not a number")]
    PortNotANumber,

    #[error("fragment before query")]
    FragmentBeforeQuery,

    #[error("out of memory growing input buffer: {0}")]
    OutOfMemory(String),

    #[error("line longer than {0} bytes without terminator")]
    LineTooLong(usize),
}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Error::OutOfMemory(value.to_string())
    }
}
