//! format description event
//!
//! first event of every binlog session; announces the server version, the
//! post-header length table and, from 5.6.1 on, the checksum algorithm
//! applied to every following event.
use crate::version::{MysqlVersion, CHECKSUM_VERSION};
use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes, Result};

pub const CHECKSUM_ALG_NONE: u8 = 0;
pub const CHECKSUM_ALG_CRC32: u8 = 1;

#[derive(Debug, Clone)]
pub struct FormatDescriptionData {
    pub binlog_version: u16,
    pub server_version: String,
    pub create_timestamp: u32,
    pub header_length: u8,
    /// index i holds the post-header length of event type i + 1
    pub post_header_lengths: Vec<u8>,
    /// 0 = none, 1 = CRC32; anything else is treated as none
    pub checksum_alg: u8,
}

impl FormatDescriptionData {
    pub fn crc32_enabled(&self) -> bool {
        self.checksum_alg == CHECKSUM_ALG_CRC32
    }
}

/// layout: binlog_version 2, server_version 50 (NUL padded),
/// create_timestamp 4, header_length 1, post header lengths to the end.
/// on servers >= 5.6.1 the last 5 bytes are the checksum algorithm byte
/// followed by this event's own CRC32; older servers have neither.
impl ReadFromBytes for FormatDescriptionData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let binlog_version = input.read_le_u16()?;
        let raw_version = input.read_len(50)?;
        let end = raw_version
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(raw_version.len());
        let server_version = String::from_utf8_lossy(&raw_version[..end]).into_owned();
        let create_timestamp = input.read_le_u32()?;
        let header_length = input.read_u8()?;
        let mut checksum_alg = CHECKSUM_ALG_NONE;
        if MysqlVersion::parse(&server_version) >= CHECKSUM_VERSION {
            let checksum_part = input.trim_right(5)?;
            checksum_alg = checksum_part[0];
        }
        let post_header_lengths = Vec::from(input.read_remaining().as_ref());
        Ok(FormatDescriptionData {
            binlog_version,
            server_version,
            create_timestamp,
            header_length,
            post_header_lengths,
            checksum_alg,
        })
    }
}
