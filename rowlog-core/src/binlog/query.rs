use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};
use smol_str::SmolStr;

/// statement-based replication event, also emitted around row events as
/// BEGIN/COMMIT markers and for DDL
#[derive(Debug, Clone)]
pub struct QueryData {
    pub thread_id: u32,
    pub execution_time: u32,
    pub error_code: u16,
    /// opaque status variable block, not interpreted here
    pub status_vars: Bytes,
    pub database: SmolStr,
    pub query: String,
}

/// layout: thread_id 4, execution_time 4, database_len 1, error_code 2,
/// status_vars_len 2, status_vars, database, one NUL, query to the end
impl ReadFromBytes for QueryData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let thread_id = input.read_le_u32()?;
        let execution_time = input.read_le_u32()?;
        let database_len = input.read_u8()? as usize;
        let error_code = input.read_le_u16()?;
        let status_vars_len = input.read_le_u16()? as usize;
        let status_vars = input.read_len(status_vars_len)?;
        let database_raw = input.read_len(database_len)?;
        let database = SmolStr::new(String::from_utf8_lossy(database_raw.as_ref()));
        input.skip(1)?;
        let query = String::from_utf8_lossy(input.read_remaining().as_ref()).into_owned();
        Ok(QueryData {
            thread_id,
            execution_time,
            error_code,
            status_vars,
            database,
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_layout() {
        let mut body = Vec::new();
        body.extend_from_slice(&7u32.to_le_bytes());
        body.extend_from_slice(&1u32.to_le_bytes());
        body.push(4); // database_len
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&3u16.to_le_bytes());
        body.extend_from_slice(&[0xaa, 0xbb, 0xcc]); // status vars
        body.extend_from_slice(b"test");
        body.push(0);
        body.extend_from_slice(b"BEGIN");

        let data = QueryData::read_from(&mut Bytes::from(body)).unwrap();
        assert_eq!(7, data.thread_id);
        assert_eq!(1, data.execution_time);
        assert_eq!(0, data.error_code);
        assert_eq!(&[0xaa, 0xbb, 0xcc][..], data.status_vars.as_ref());
        assert_eq!("test", data.database);
        assert_eq!("BEGIN", data.query);
    }
}
