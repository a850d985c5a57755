use std::io;
use std::sync::Arc;
use thiserror::Error;

/// errors surfaced through the queue; clonable so a latched error can be
/// handed to every subsequent pop
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    #[error("decode error: {0}")]
    Decode(Arc<rowlog_core::Error>),
    #[error("source error: {0}")]
    Source(Arc<io::Error>),
    #[error("binlog stream cancelled")]
    Cancelled,
    #[error("binlog stream closed")]
    Closed,
}
