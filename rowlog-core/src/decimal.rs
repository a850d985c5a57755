//! MySQL packed decimal decoding
//!
//! the binlog stores DECIMAL columns in the compact big-endian form
//! produced by decimal2bin: digits are grouped in base-1e9 words of 4
//! bytes, with shorter head/tail fragments for digit counts that are not
//! a multiple of 9. the sign lives in the top bit of the first byte and a
//! negative value has every byte one's-complemented.
//!
//! reference: https://github.com/mysql/mysql-server/blob/5.7/strings/decimal.c
use bigdecimal::BigDecimal;
use bytes::Bytes;
use bytes_cursor::{Error, ReadBytesExt};
use std::fmt;

const DIG_PER_DEC: usize = 9;
const DIG_TO_BYTES: [usize; 10] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 4];

#[derive(Debug, Clone, PartialEq)]
pub struct MyDecimal {
    /// decimal digits before the point
    pub intg: u8,
    /// decimal digits after the point
    pub frac: u8,
    pub negative: bool,
    // base-1e9 fragments in order: compressed head (if intg % 9 > 0),
    // full integral groups, full fractional groups, compressed tail
    // (if frac % 9 > 0, unscaled)
    buf: Vec<u32>,
}

impl MyDecimal {
    /// read one packed decimal of the given precision and scale
    pub fn read_from(input: &mut Bytes, precision: u8, scale: u8) -> bytes_cursor::Result<Self> {
        if scale > precision {
            return Err(Error::ConstraintError(format!(
                "decimal scale {} exceeds precision {}",
                scale, precision
            )));
        }
        let intg = (precision - scale) as usize;
        let frac = scale as usize;
        let intg0 = intg / DIG_PER_DEC;
        let frac0 = frac / DIG_PER_DEC;
        let intg0x = intg % DIG_PER_DEC;
        let frac0x = frac % DIG_PER_DEC;
        let bin_size = DIG_TO_BYTES[intg0x] + intg0 * 4 + frac0 * 4 + DIG_TO_BYTES[frac0x];
        let mut data = input.read_len(bin_size)?.to_vec();
        if data.is_empty() {
            return Ok(MyDecimal {
                intg: intg as u8,
                frac: frac as u8,
                negative: false,
                buf: vec![],
            });
        }
        // sign bit cleared means negative, and a negative value is stored
        // with every byte complemented
        let negative = data[0] & 0x80 == 0;
        if negative {
            for b in data.iter_mut() {
                *b ^= 0xff;
            }
        }
        data[0] ^= 0x80;

        let mut buf = Vec::with_capacity(intg0 + frac0 + 2);
        let mut pos = 0;
        let head = DIG_TO_BYTES[intg0x];
        if head > 0 {
            buf.push(be_fragment(&data[pos..pos + head]));
            pos += head;
        }
        for _ in 0..intg0 + frac0 {
            buf.push(be_fragment(&data[pos..pos + 4]));
            pos += 4;
        }
        let tail = DIG_TO_BYTES[frac0x];
        if tail > 0 {
            buf.push(be_fragment(&data[pos..pos + tail]));
        }
        Ok(MyDecimal {
            intg: intg as u8,
            frac: frac as u8,
            negative,
            buf,
        })
    }

    /// lossy conversion kept for callers that want a plain number; the
    /// rendered string is exact, a float of a decimal above 15 digits is
    /// not
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// lossless conversion
    pub fn to_bigdecimal(&self) -> crate::error::Result<BigDecimal> {
        Ok(self.to_string().parse()?)
    }
}

fn be_fragment(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

impl fmt::Display for MyDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.buf.is_empty() {
            return write!(f, "0");
        }
        let intg = self.intg as usize;
        let frac = self.frac as usize;
        let intg0 = intg / DIG_PER_DEC;
        let intg0x = intg % DIG_PER_DEC;
        let frac0 = frac / DIG_PER_DEC;
        let frac0x = frac % DIG_PER_DEC;

        if self.negative {
            write!(f, "-")?;
        }
        let n_intg = intg0 + if intg0x > 0 { 1 } else { 0 };
        // skip leading all-zero groups, print the first significant group
        // unpadded and the rest zero-padded to 9 digits
        let mut printed = false;
        for (k, &g) in self.buf[..n_intg].iter().enumerate() {
            if !printed {
                if g == 0 && k + 1 < n_intg {
                    continue;
                }
                write!(f, "{}", g)?;
                printed = true;
            } else {
                write!(f, "{:09}", g)?;
            }
        }
        if !printed {
            write!(f, "0")?;
        }
        if frac == 0 {
            return Ok(());
        }
        write!(f, ".")?;
        let mut i = n_intg;
        for _ in 0..frac0 {
            write!(f, "{:09}", self.buf[i])?;
            i += 1;
        }
        if frac0x > 0 {
            write!(f, "{:0width$}", self.buf[i], width = frac0x)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_decimal_positive() {
        // 1234.56 as DECIMAL(10,2)
        let mut bs = Bytes::from(vec![0x80, 0x00, 0x04, 0xd2, 0x38]);
        let d = MyDecimal::read_from(&mut bs, 10, 2).unwrap();
        assert!(!d.negative);
        assert_eq!("1234.56", d.to_string());
        assert!(bs.is_empty());
    }

    #[test]
    fn test_read_decimal_negative() {
        // -1234.56 as DECIMAL(10,2): positive image with all bytes complemented
        let mut bs = Bytes::from(vec![0x7f, 0xff, 0xfb, 0x2d, 0xc7]);
        let d = MyDecimal::read_from(&mut bs, 10, 2).unwrap();
        assert!(d.negative);
        assert_eq!("-1234.56", d.to_string());
    }

    #[test]
    fn test_read_decimal_multi_fragment() {
        // 1234567890.1234 as DECIMAL(14,4): head 1 byte, one full integral
        // group, 2-byte fractional tail
        let mut bs = Bytes::from(vec![0x81, 0x0d, 0xfb, 0x38, 0xd2, 0x04, 0xd2]);
        let d = MyDecimal::read_from(&mut bs, 14, 4).unwrap();
        assert!(!d.negative);
        assert_eq!("1234567890.1234", d.to_string());
    }

    #[test]
    fn test_read_decimal_fraction_only() {
        // 0.50 as DECIMAL(2,2): a single tail byte carrying the sign bit
        let mut bs = Bytes::from(vec![0xb2]);
        let d = MyDecimal::read_from(&mut bs, 2, 2).unwrap();
        assert_eq!("0.50", d.to_string());
    }

    #[test]
    fn test_read_decimal_no_fraction() {
        // 42 as DECIMAL(4,0): no trailing dot in the rendering
        let mut bs = Bytes::from(vec![0x80, 0x2a]);
        let d = MyDecimal::read_from(&mut bs, 4, 0).unwrap();
        assert_eq!("42", d.to_string());
    }

    #[test]
    fn test_scale_exceeds_precision() {
        let mut bs = Bytes::from(vec![0x80, 0x00]);
        assert!(MyDecimal::read_from(&mut bs, 2, 5).is_err());
    }

    #[test]
    fn test_conversions() {
        let mut bs = Bytes::from(vec![0x80, 0x00, 0x04, 0xd2, 0x38]);
        let d = MyDecimal::read_from(&mut bs, 10, 2).unwrap();
        assert_eq!(1234.56, d.to_f64());
        assert_eq!("1234.56".parse::<BigDecimal>().unwrap(), d.to_bigdecimal().unwrap());
    }
}
