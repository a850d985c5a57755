use crate::error::{Error, Needed, Result};
use bytes::{Buf, Bytes};

/// checked reads off the front of a `Bytes` handle
///
/// all little-endian unless the method name says otherwise. the binlog
/// grammar mixes byte orders freely (packed decimals and the V2 temporal
/// types are big-endian inside an otherwise little-endian stream), so
/// both directions are first-class here.
pub trait ReadBytesExt {
    fn read_u8(&mut self) -> Result<u8>;
    fn read_le_u16(&mut self) -> Result<u16>;
    fn read_le_u24(&mut self) -> Result<u32>;
    fn read_le_u32(&mut self) -> Result<u32>;
    fn read_le_u48(&mut self) -> Result<u64>;
    fn read_le_u64(&mut self) -> Result<u64>;
    fn read_be_u16(&mut self) -> Result<u16>;
    fn read_be_u24(&mut self) -> Result<u32>;
    fn read_be_u32(&mut self) -> Result<u32>;

    /// read `len` (0..=8) bytes as a little-endian integer widened to u64
    fn read_le_uint(&mut self, len: usize) -> Result<u64>;

    /// read `len` (0..=8) bytes as a big-endian integer widened to u64
    fn read_be_uint(&mut self, len: usize) -> Result<u64>;

    fn read_le_f32(&mut self) -> Result<f32>;
    fn read_le_f64(&mut self) -> Result<f64>;

    /// detach the next `len` bytes
    fn read_len(&mut self, len: usize) -> Result<Bytes>;

    /// detach everything up to the end
    fn read_remaining(&mut self) -> Bytes;

    /// advance without looking
    fn skip(&mut self, len: usize) -> Result<()>;

    /// detach the *last* `len` bytes, shortening the logical end.
    /// used to excise trailing checksums before body parsing.
    fn trim_right(&mut self, len: usize) -> Result<Bytes>;
}

#[inline]
fn ensure(input: &Bytes, len: usize) -> Result<()> {
    if input.remaining() < len {
        return Err(Error::UnexpectedEof(Needed::Size(len - input.remaining())));
    }
    Ok(())
}

impl ReadBytesExt for Bytes {
    fn read_u8(&mut self) -> Result<u8> {
        ensure(self, 1)?;
        Ok(self.get_u8())
    }

    fn read_le_u16(&mut self) -> Result<u16> {
        ensure(self, 2)?;
        Ok(self.get_u16_le())
    }

    fn read_le_u24(&mut self) -> Result<u32> {
        self.read_le_uint(3).map(|n| n as u32)
    }

    fn read_le_u32(&mut self) -> Result<u32> {
        ensure(self, 4)?;
        Ok(self.get_u32_le())
    }

    fn read_le_u48(&mut self) -> Result<u64> {
        self.read_le_uint(6)
    }

    fn read_le_u64(&mut self) -> Result<u64> {
        ensure(self, 8)?;
        Ok(self.get_u64_le())
    }

    fn read_be_u16(&mut self) -> Result<u16> {
        ensure(self, 2)?;
        Ok(self.get_u16())
    }

    fn read_be_u24(&mut self) -> Result<u32> {
        self.read_be_uint(3).map(|n| n as u32)
    }

    fn read_be_u32(&mut self) -> Result<u32> {
        ensure(self, 4)?;
        Ok(self.get_u32())
    }

    fn read_le_uint(&mut self, len: usize) -> Result<u64> {
        if len > 8 {
            return Err(Error::ConstraintError(format!(
                "integer width out of range: {}",
                len
            )));
        }
        ensure(self, len)?;
        let mut n = 0u64;
        for i in 0..len {
            n |= (self[i] as u64) << (8 * i);
        }
        self.advance(len);
        Ok(n)
    }

    fn read_be_uint(&mut self, len: usize) -> Result<u64> {
        if len > 8 {
            return Err(Error::ConstraintError(format!(
                "integer width out of range: {}",
                len
            )));
        }
        ensure(self, len)?;
        let mut n = 0u64;
        for i in 0..len {
            n = (n << 8) | self[i] as u64;
        }
        self.advance(len);
        Ok(n)
    }

    fn read_le_f32(&mut self) -> Result<f32> {
        self.read_le_u32().map(f32::from_bits)
    }

    fn read_le_f64(&mut self) -> Result<f64> {
        self.read_le_u64().map(f64::from_bits)
    }

    fn read_len(&mut self, len: usize) -> Result<Bytes> {
        ensure(self, len)?;
        Ok(self.split_to(len))
    }

    fn read_remaining(&mut self) -> Bytes {
        self.split_to(self.len())
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        ensure(self, len)?;
        self.advance(len);
        Ok(())
    }

    fn trim_right(&mut self, len: usize) -> Result<Bytes> {
        ensure(self, len)?;
        Ok(self.split_off(self.len() - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_widths() -> Result<()> {
        let mut bs = Bytes::from_static(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(0x0201, bs.read_le_u16()?);
        assert_eq!(0x030405, bs.read_be_uint(3)?);
        assert_eq!(0x080706, bs.read_le_u24()?);
        assert!(bs.read_u8().is_err());
        Ok(())
    }

    #[test]
    fn test_uint_widths() -> Result<()> {
        let mut bs = Bytes::from_static(&[0x1a, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(26, bs.read_le_uint(6)?);
        assert!(bs.is_empty());

        let mut bs = Bytes::from_static(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(0x0102030405, bs.read_be_uint(5)?);

        let mut bs = Bytes::from_static(&[0u8; 16]);
        assert!(matches!(
            bs.read_le_uint(9),
            Err(Error::ConstraintError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_zero_width_uint() -> Result<()> {
        let mut bs = Bytes::new();
        assert_eq!(0, bs.read_le_uint(0)?);
        assert_eq!(0, bs.read_be_uint(0)?);
        Ok(())
    }

    #[test]
    fn test_floats() -> Result<()> {
        let mut bs = Bytes::copy_from_slice(&1.5f32.to_le_bytes());
        assert_eq!(1.5, bs.read_le_f32()?);
        let mut bs = Bytes::copy_from_slice(&(-2.25f64).to_le_bytes());
        assert_eq!(-2.25, bs.read_le_f64()?);
        Ok(())
    }

    #[test]
    fn test_trim_right() -> Result<()> {
        let mut bs = Bytes::from_static(b"payloadCRC4");
        let tail = bs.trim_right(4)?;
        assert_eq!(b"CRC4", tail.as_ref());
        assert_eq!(b"payload", bs.as_ref());

        let fail = bs.trim_right(100);
        assert!(matches!(fail, Err(Error::UnexpectedEof(_))));
        Ok(())
    }

    #[test]
    fn test_skip_and_remaining() -> Result<()> {
        let mut bs = Bytes::from_static(b"abcdef");
        bs.skip(2)?;
        assert_eq!(b"cdef", bs.read_remaining().as_ref());
        assert!(bs.is_empty());
        assert!(bs.skip(1).is_err());
        Ok(())
    }

    #[test]
    fn test_eof_reports_needed() {
        let mut bs = Bytes::from_static(&[0x01]);
        match bs.read_le_u32() {
            Err(Error::UnexpectedEof(Needed::Size(n))) => assert_eq!(3, n),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
