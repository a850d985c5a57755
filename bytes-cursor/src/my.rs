//! MySQL length-encoded primitives
//!
//! reference: https://dev.mysql.com/doc/internals/en/integer.html
use crate::error::{Error, Needed, Result};
use crate::read::ReadBytesExt;
use bytes::{Buf, Bytes};

/// read MySQL encoded types
pub trait ReadMyEnc {
    fn read_len_enc_int(&mut self) -> Result<LenEncInt>;

    fn read_len_enc_str(&mut self) -> Result<LenEncStr>;
}

impl ReadMyEnc for Bytes {
    fn read_len_enc_int(&mut self) -> Result<LenEncInt> {
        let len = self.read_u8()?;
        match len {
            0xfb => Ok(LenEncInt::Null),
            0xfc => {
                let n = self.read_le_u16()?;
                Ok(LenEncInt::Len3(n))
            }
            0xfd => {
                let n = self.read_le_u24()?;
                Ok(LenEncInt::Len4(n))
            }
            0xfe => {
                let n = self.read_le_u64()?;
                Ok(LenEncInt::Len9(n))
            }
            0xff => Ok(LenEncInt::Err),
            _ => Ok(LenEncInt::Len1(len)),
        }
    }

    fn read_len_enc_str(&mut self) -> Result<LenEncStr> {
        let lei = self.read_len_enc_int()?;
        match lei {
            LenEncInt::Err => Ok(LenEncStr::Err),
            LenEncInt::Null => Ok(LenEncStr::Null),
            _ => {
                // unwrap is safe: the two valueless variants are handled above
                let len = lei.to_u64().unwrap() as usize;
                if self.remaining() < len {
                    return Err(Error::UnexpectedEof(Needed::Size(len - self.remaining())));
                }
                Ok(LenEncStr::Bytes(self.split_to(len)))
            }
        }
    }
}

/// MySQL length-encoded integer
#[derive(Debug, Clone, PartialEq)]
pub enum LenEncInt {
    Null,
    Err,
    Len1(u8),
    Len3(u16),
    Len4(u32),
    Len9(u64),
}

impl LenEncInt {
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            LenEncInt::Len1(n) => Some(*n as u64),
            LenEncInt::Len3(n) => Some(*n as u64),
            LenEncInt::Len4(n) => Some(*n as u64),
            LenEncInt::Len9(n) => Some(*n),
            _ => None,
        }
    }
}

/// MySQL length-encoded string
#[derive(Debug, Clone, PartialEq)]
pub enum LenEncStr {
    Null,
    Err,
    Bytes(Bytes),
}

impl LenEncStr {
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(bs) => Some(bs),
            _ => None,
        }
    }
}
