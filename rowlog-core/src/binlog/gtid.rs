use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};
use uuid::Uuid;

/// global transaction identifier announcement preceding a transaction
///
/// the same layout serves GtidEvent and AnonymousGtidEvent; later server
/// versions append logical timestamps which this decoder leaves unread.
#[derive(Debug, Clone)]
pub struct GtidData {
    pub commit_flag: u8,
    /// source server UUID, raw
    pub sid: [u8; 16],
    /// transaction sequence number within the source
    pub gno: u64,
}

impl GtidData {
    /// canonical "uuid:gno" rendering
    pub fn gtid(&self) -> String {
        format!("{}:{}", Uuid::from_bytes(self.sid).to_hyphenated(), self.gno)
    }
}

impl ReadFromBytes for GtidData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let commit_flag = input.read_u8()?;
        let raw_sid = input.read_len(16)?;
        let mut sid = [0u8; 16];
        sid.copy_from_slice(raw_sid.as_ref());
        let gno = input.read_le_u64()?;
        Ok(GtidData {
            commit_flag,
            sid,
            gno,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gtid_rendering() {
        let mut body = vec![0u8];
        body.extend_from_slice(&[
            0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc,
            0xde, 0xf0,
        ]);
        body.extend_from_slice(&9u64.to_le_bytes());
        let data = GtidData::read_from(&mut Bytes::from(body)).unwrap();
        assert_eq!("12345678-9abc-def0-1234-56789abcdef0:9", data.gtid());
        assert_eq!(0, data.commit_flag);
    }
}
