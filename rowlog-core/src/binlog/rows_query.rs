use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};

/// original statement text of the following row events, present when the
/// server runs with binlog_rows_query_log_events enabled
#[derive(Debug, Clone)]
pub struct RowsQueryData {
    pub query: String,
}

impl ReadFromBytes for RowsQueryData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        // one length byte precedes the text but the text runs to the end
        // of the event anyway
        input.skip(1)?;
        let query = String::from_utf8_lossy(input.read_remaining().as_ref()).into_owned();
        Ok(RowsQueryData { query })
    }
}
