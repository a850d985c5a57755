use super::{LogEventType, LogEventTypeCode};
use bitflags::bitflags;
use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};

pub const EVENT_HEADER_LEN: usize = 19;

bitflags! {
    pub struct EventHeaderFlags: u16 {
        const BINLOG_IN_USE            = 0x0001;
        const FORCED_ROTATE            = 0x0002;
        const THREAD_SPECIFIC          = 0x0004;
        const SUPPRESS_USE             = 0x0008;
        const UPDATE_TABLE_MAP_VERSION = 0x0010;
        const ARTIFICIAL               = 0x0020;
        const RELAY_LOG                = 0x0040;
        const IGNORABLE                = 0x0080;
        const NO_FILTER                = 0x0100;
        const MTS_ISOLATE              = 0x0200;
    }
}

/// common 19-byte event header
///
/// timestamp 0:4, type_code 4:1, server_id 5:4, event_size 9:4,
/// next_log_pos 13:4, flags 17:2
#[derive(Debug, Clone)]
pub struct EventHeader {
    pub timestamp: u32,
    pub type_code: LogEventTypeCode,
    pub server_id: u32,
    /// total size of the event including this header
    pub event_size: u32,
    pub next_log_pos: u32,
    pub flags: EventHeaderFlags,
}

impl EventHeader {
    pub fn event_type(&self) -> LogEventType {
        LogEventType::from(self.type_code)
    }

    /// body length, always event_size - 19
    pub fn data_len(&self) -> u32 {
        self.event_size - EVENT_HEADER_LEN as u32
    }
}

impl ReadFromBytes for EventHeader {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let timestamp = input.read_le_u32()?;
        let type_code = input.read_u8()?;
        let server_id = input.read_le_u32()?;
        let event_size = input.read_le_u32()?;
        let next_log_pos = input.read_le_u32()?;
        let flags = input.read_le_u16()?;
        Ok(EventHeader {
            timestamp,
            type_code: LogEventTypeCode(type_code),
            server_id,
            event_size,
            next_log_pos,
            flags: EventHeaderFlags::from_bits_truncate(flags),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&0x5a00_0000u32.to_le_bytes());
        raw.push(0x0f);
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&120u32.to_le_bytes());
        raw.extend_from_slice(&120u32.to_le_bytes());
        raw.extend_from_slice(&0u16.to_le_bytes());
        assert_eq!(EVENT_HEADER_LEN, raw.len());

        let mut input = Bytes::from(raw);
        let header = EventHeader::read_from(&mut input).unwrap();
        assert_eq!(0x5a00_0000, header.timestamp);
        assert_eq!(LogEventType::FormatDescriptionEvent, header.event_type());
        assert_eq!(1, header.server_id);
        assert_eq!(120, header.event_size);
        assert_eq!(120, header.next_log_pos);
        assert_eq!(101, header.data_len());
        assert!(header.flags.is_empty());
    }

    #[test]
    fn test_header_too_short() {
        let mut input = Bytes::from_static(&[0u8; 10]);
        assert!(EventHeader::read_from(&mut input).is_err());
    }
}
