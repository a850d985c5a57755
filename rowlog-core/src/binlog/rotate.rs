use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};

/// announces the next binlog file and the position to resume from
#[derive(Debug, Clone)]
pub struct RotateData {
    pub position: u64,
    pub next_log_name: String,
}

impl ReadFromBytes for RotateData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let position = input.read_le_u64()?;
        let next_log_name = String::from_utf8_lossy(input.read_remaining().as_ref()).into_owned();
        Ok(RotateData {
            position,
            next_log_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate() {
        let mut body = 4u64.to_le_bytes().to_vec();
        body.extend_from_slice(b"mysql-bin.000042");
        let data = RotateData::read_from(&mut Bytes::from(body)).unwrap();
        assert_eq!(4, data.position);
        assert_eq!("mysql-bin.000042", data.next_log_name);
    }
}
