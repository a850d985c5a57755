use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};

/// transaction commit marker
#[derive(Debug, Clone)]
pub struct XidData {
    pub transaction_id: u64,
}

impl ReadFromBytes for XidData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let transaction_id = input.read_le_u64()?;
        Ok(XidData { transaction_id })
    }
}
