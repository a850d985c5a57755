use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of input: {0:?}")]
    UnexpectedEof(Needed),
    #[error("constraint error: {0}")]
    ConstraintError(String),
    #[error("utf8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

/// how many more bytes the failed read would have required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needed {
    Unknown,
    Size(usize),
}
