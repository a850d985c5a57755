use bytes_cursor::Needed;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of event payload: {0:?}")]
    UnexpectedEof(Needed),
    #[error("corrupt event: {0}")]
    CorruptEvent(String),
    #[error("unknown column type: 0x{0:02x}")]
    UnknownColumnType(u8),
    #[error("no table map for table id {0}")]
    MissingTableMap(u64),
    #[error("parse bigdecimal error: {0}")]
    ParseBigDecimalError(#[from] bigdecimal::ParseBigDecimalError),
}

impl From<bytes_cursor::Error> for Error {
    fn from(err: bytes_cursor::Error) -> Self {
        match err {
            bytes_cursor::Error::UnexpectedEof(needed) => Error::UnexpectedEof(needed),
            bytes_cursor::Error::ConstraintError(msg) => Error::CorruptEvent(msg),
            bytes_cursor::Error::Utf8Error(err) => Error::CorruptEvent(err.to_string()),
        }
    }
}
