//! column types, table map metadata and row value decoding
//!
//! the complete type list is defined in
//! https://github.com/mysql/mysql-server/blob/5.7/libbinlogevents/export/binary_log_types.h
//! the binlog only ever announces a subset of it in table map events:
//! every character type arrives as VARCHAR/VAR_STRING/STRING (with
//! ENUM/SET/BIT hidden inside STRING metadata), every blob as BLOB, and
//! the second-generation temporal types carry their fractional-second
//! precision in the metadata byte.
use crate::decimal::MyDecimal;
use crate::error::{Error, Result};
use bytes::Bytes;
use bytes_cursor::ReadBytesExt;
use std::convert::TryFrom;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Decimal,
    Tiny,
    Short,
    Long,
    Float,
    Double,
    Null,
    Timestamp,
    LongLong,
    Int24,
    Date,
    Time,
    DateTime,
    Year,
    NewDate,
    Varchar,
    Bit,
    TimestampV2,
    DateTimeV2,
    TimeV2,
    Json,
    NewDecimal,
    Enum,
    Set,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Blob,
    VarString,
    String,
    Geometry,
}

impl TryFrom<u8> for ColumnType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        let ct = match code {
            0x00 => ColumnType::Decimal,
            0x01 => ColumnType::Tiny,
            0x02 => ColumnType::Short,
            0x03 => ColumnType::Long,
            0x04 => ColumnType::Float,
            0x05 => ColumnType::Double,
            0x06 => ColumnType::Null,
            0x07 => ColumnType::Timestamp,
            0x08 => ColumnType::LongLong,
            0x09 => ColumnType::Int24,
            0x0a => ColumnType::Date,
            0x0b => ColumnType::Time,
            0x0c => ColumnType::DateTime,
            0x0d => ColumnType::Year,
            0x0e => ColumnType::NewDate,
            0x0f => ColumnType::Varchar,
            0x10 => ColumnType::Bit,
            0x11 => ColumnType::TimestampV2,
            0x12 => ColumnType::DateTimeV2,
            0x13 => ColumnType::TimeV2,
            0xf5 => ColumnType::Json,
            0xf6 => ColumnType::NewDecimal,
            0xf7 => ColumnType::Enum,
            0xf8 => ColumnType::Set,
            0xf9 => ColumnType::TinyBlob,
            0xfa => ColumnType::MediumBlob,
            0xfb => ColumnType::LongBlob,
            0xfc => ColumnType::Blob,
            0xfd => ColumnType::VarString,
            0xfe => ColumnType::String,
            0xff => ColumnType::Geometry,
            _ => return Err(Error::UnknownColumnType(code)),
        };
        Ok(ct)
    }
}

impl ColumnType {
    pub fn code(self) -> u8 {
        match self {
            ColumnType::Decimal => 0x00,
            ColumnType::Tiny => 0x01,
            ColumnType::Short => 0x02,
            ColumnType::Long => 0x03,
            ColumnType::Float => 0x04,
            ColumnType::Double => 0x05,
            ColumnType::Null => 0x06,
            ColumnType::Timestamp => 0x07,
            ColumnType::LongLong => 0x08,
            ColumnType::Int24 => 0x09,
            ColumnType::Date => 0x0a,
            ColumnType::Time => 0x0b,
            ColumnType::DateTime => 0x0c,
            ColumnType::Year => 0x0d,
            ColumnType::NewDate => 0x0e,
            ColumnType::Varchar => 0x0f,
            ColumnType::Bit => 0x10,
            ColumnType::TimestampV2 => 0x11,
            ColumnType::DateTimeV2 => 0x12,
            ColumnType::TimeV2 => 0x13,
            ColumnType::Json => 0xf5,
            ColumnType::NewDecimal => 0xf6,
            ColumnType::Enum => 0xf7,
            ColumnType::Set => 0xf8,
            ColumnType::TinyBlob => 0xf9,
            ColumnType::MediumBlob => 0xfa,
            ColumnType::LongBlob => 0xfb,
            ColumnType::Blob => 0xfc,
            ColumnType::VarString => 0xfd,
            ColumnType::String => 0xfe,
            ColumnType::Geometry => 0xff,
        }
    }
}

/// decode the table map metadata block into one u16 slot per column
///
/// the per-type layout is irregular on purpose: VARCHAR and BIT store
/// their two metadata bytes little-endian while STRING and NEW_DECIMAL
/// store theirs big-endian. unknown type codes consume nothing and leave
/// a zero slot, matching the server's forward compatibility behavior.
pub fn parse_column_meta(column_types: &[u8], block: &mut Bytes) -> bytes_cursor::Result<Vec<u16>> {
    let mut meta = Vec::with_capacity(column_types.len());
    for &code in column_types {
        let m = match ColumnType::try_from(code).ok() {
            Some(ColumnType::Float)
            | Some(ColumnType::Double)
            | Some(ColumnType::Blob)
            | Some(ColumnType::Json)
            | Some(ColumnType::Geometry) => block.read_u8()? as u16,
            Some(ColumnType::Bit) | Some(ColumnType::Varchar) | Some(ColumnType::VarString) => {
                block.read_le_u16()?
            }
            Some(ColumnType::String) | Some(ColumnType::NewDecimal) => block.read_be_u16()?,
            Some(ColumnType::TimestampV2)
            | Some(ColumnType::DateTimeV2)
            | Some(ColumnType::TimeV2) => block.read_u8()? as u16,
            _ => 0,
        };
        meta.push(m);
    }
    Ok(meta)
}

/// one decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Int(i64),
    /// unsigned BIGINT whose value does not fit an i64
    UInt(u64),
    Float(f32),
    Double(f64),
    Decimal(MyDecimal),
    /// "YYYY-MM-DD"
    Date(String),
    /// "[-]HH:MM:SS[.ffffff]"
    Time(String),
    /// "YYYY-MM-DD HH:MM:SS[.ffffff]"
    DateTime(String),
    /// unix epoch nanoseconds
    Timestamp(i64),
    Text(String),
    Blob(Bytes),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Int(v) => write!(f, "{}", v),
            ColumnValue::UInt(v) => write!(f, "{}", v),
            ColumnValue::Float(v) => write!(f, "{}", v),
            ColumnValue::Double(v) => write!(f, "{}", v),
            ColumnValue::Decimal(v) => write!(f, "{}", v),
            ColumnValue::Date(v) | ColumnValue::Time(v) | ColumnValue::DateTime(v) => {
                write!(f, "{}", v)
            }
            ColumnValue::Timestamp(v) => write!(f, "{}", v),
            ColumnValue::Text(v) => write!(f, "{}", v),
            ColumnValue::Blob(v) => {
                write!(f, "0x")?;
                for b in v.as_ref() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// decode a single cell of a row image
///
/// `column_type` and `meta` come from the announcing table map, the
/// `unsigned` flag from the injected signedness lookup (the binlog itself
/// does not record signedness).
pub fn decode_value(
    input: &mut Bytes,
    column_type: u8,
    meta: u16,
    unsigned: bool,
) -> Result<ColumnValue> {
    let mut code = column_type;
    let mut length = (meta & 0xff) as usize;
    // STRING metadata packs a real type and a length; ENUM, SET and BIT
    // columns hide behind it
    if code == ColumnType::String.code() {
        if meta >= 256 {
            let real = (meta >> 8) as u8;
            if real & 0x30 != 0x30 {
                length = (meta as usize & 0xff) | ((((real & 0x30) ^ 0x30) as usize) << 4);
                code = real | 0x30;
            } else {
                length = (meta & 0xff) as usize;
                code = real;
            }
        } else {
            length = meta as usize;
        }
    }

    let value = match ColumnType::try_from(code)? {
        ColumnType::Tiny => {
            let b = input.read_u8()?;
            if unsigned {
                ColumnValue::Int(b as i64)
            } else {
                ColumnValue::Int(b as i8 as i64)
            }
        }
        ColumnType::Short => {
            let v = input.read_le_u16()?;
            if unsigned {
                ColumnValue::Int(v as i64)
            } else {
                ColumnValue::Int(v as i16 as i64)
            }
        }
        ColumnType::Int24 => {
            let v = input.read_le_u24()?;
            if unsigned {
                ColumnValue::Int(v as i64)
            } else if v >= 0x80_0000 {
                ColumnValue::Int(v as i64 - 0x100_0000)
            } else {
                ColumnValue::Int(v as i64)
            }
        }
        ColumnType::Long => {
            let v = input.read_le_u32()?;
            if unsigned {
                ColumnValue::Int(v as i64)
            } else {
                ColumnValue::Int(v as i32 as i64)
            }
        }
        ColumnType::LongLong => {
            let v = input.read_le_u64()?;
            if unsigned {
                if v > i64::MAX as u64 {
                    ColumnValue::UInt(v)
                } else {
                    ColumnValue::Int(v as i64)
                }
            } else {
                ColumnValue::Int(v as i64)
            }
        }
        ColumnType::Float => ColumnValue::Float(input.read_le_f32()?),
        ColumnType::Double => ColumnValue::Double(input.read_le_f64()?),
        ColumnType::NewDecimal => {
            let precision = (meta >> 8) as u8;
            let scale = (meta & 0xff) as u8;
            ColumnValue::Decimal(MyDecimal::read_from(input, precision, scale)?)
        }
        ColumnType::Year => {
            let b = input.read_u8()?;
            ColumnValue::Int(1900 + b as i64)
        }
        ColumnType::Date => {
            let v = input.read_le_uint(3)?;
            ColumnValue::Date(format!(
                "{:04}-{:02}-{:02}",
                v >> 9,
                (v >> 5) & 0x0f,
                v & 0x1f
            ))
        }
        ColumnType::Time => {
            // decimal HHMMSS; the legacy 3-byte encoding has no sign bit,
            // emitted as unsigned
            let v = input.read_le_uint(3)?;
            ColumnValue::Time(format!(
                "{:02}:{:02}:{:02}",
                v / 10000,
                (v % 10000) / 100,
                v % 100
            ))
        }
        ColumnType::TimeV2 => ColumnValue::Time(decode_time2(input, meta as usize)?),
        ColumnType::DateTime => {
            // decimal YYYYMMDDhhmmss
            let v = input.read_le_u64()?;
            let d = v / 1_000_000;
            let t = v % 1_000_000;
            ColumnValue::DateTime(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                d / 10000,
                (d % 10000) / 100,
                d % 100,
                t / 10000,
                (t % 10000) / 100,
                t % 100
            ))
        }
        ColumnType::DateTimeV2 => ColumnValue::DateTime(decode_datetime2(input, meta as usize)?),
        ColumnType::Timestamp => {
            let sec = input.read_le_u32()?;
            ColumnValue::Timestamp(sec as i64 * 1_000_000_000)
        }
        ColumnType::TimestampV2 => {
            let sec = input.read_be_u32()?;
            let micros = read_fractional_seconds(input, meta as usize, false)?;
            ColumnValue::Timestamp(sec as i64 * 1_000_000_000 + micros * 1_000)
        }
        ColumnType::Varchar | ColumnType::VarString => read_string(input, meta as usize)?,
        ColumnType::String => read_string(input, length)?,
        ColumnType::Enum => {
            if length != 1 && length != 2 {
                return Err(Error::CorruptEvent(format!(
                    "invalid ENUM pack length: {}",
                    length
                )));
            }
            ColumnValue::Int(input.read_le_uint(length)? as i64)
        }
        ColumnType::Set => {
            if length > 8 {
                return Err(Error::CorruptEvent(format!(
                    "invalid SET pack length: {}",
                    length
                )));
            }
            ColumnValue::Int(input.read_le_uint(length)? as i64)
        }
        ColumnType::Bit => {
            let bits = (meta >> 8) as usize * 8 + (meta & 0xff) as usize;
            let len = (bits + 7) / 8;
            if len > 8 {
                return Err(Error::CorruptEvent(format!(
                    "invalid BIT pack length: {}",
                    len
                )));
            }
            ColumnValue::Int(input.read_be_uint(len)? as i64)
        }
        ColumnType::Blob | ColumnType::Geometry => {
            // geometry is stored as a blob in the binlog
            let len_len = meta as usize;
            if len_len == 0 || len_len > 4 {
                return Err(Error::CorruptEvent(format!(
                    "invalid BLOB length width: {}",
                    len_len
                )));
            }
            let n = input.read_le_uint(len_len)? as usize;
            ColumnValue::Blob(input.read_len(n)?)
        }
        ColumnType::Json => {
            // the JSON binary format has its own substantial grammar and
            // is not decoded; the bytes are consumed so the rest of the
            // row stays parseable
            let len_len = meta as usize;
            if len_len == 0 || len_len > 4 {
                return Err(Error::CorruptEvent(format!(
                    "invalid JSON length width: {}",
                    len_len
                )));
            }
            let n = input.read_le_uint(len_len)? as usize;
            input.skip(n)?;
            log::warn!("JSON column decoding not implemented, value emitted as NULL");
            ColumnValue::Null
        }
        ColumnType::Null => ColumnValue::Null,
        // present in the type table but never emitted inside row images
        ct @ ColumnType::Decimal
        | ct @ ColumnType::NewDate
        | ct @ ColumnType::TinyBlob
        | ct @ ColumnType::MediumBlob
        | ct @ ColumnType::LongBlob => return Err(Error::UnknownColumnType(ct.code())),
    };
    Ok(value)
}

fn read_string(input: &mut Bytes, max_len: usize) -> Result<ColumnValue> {
    let len = if max_len < 256 {
        input.read_u8()? as usize
    } else {
        input.read_le_u16()? as usize
    };
    let bs = input.read_len(len)?;
    Ok(ColumnValue::Text(
        String::from_utf8_lossy(bs.as_ref()).into_owned(),
    ))
}

/// fractional seconds of the three V2 temporal types, always scaled to
/// microseconds: `(dec + 1) / 2` big-endian bytes, multiplied by
/// 100^(3 - byte_len). a negative TIME_V2 stores its fraction biased by
/// 0x100^byte_len.
fn read_fractional_seconds(input: &mut Bytes, dec: usize, negative: bool) -> Result<i64> {
    if dec > 6 {
        return Err(Error::CorruptEvent(format!(
            "invalid fractional second precision: {}",
            dec
        )));
    }
    let len = (dec + 1) / 2;
    if len == 0 {
        return Ok(0);
    }
    let mut frac = input.read_be_uint(len)? as i64;
    if frac != 0 {
        if negative {
            frac -= 1i64 << (8 * len);
        }
        frac *= 100i64.pow((3 - len) as u32);
    }
    Ok(frac)
}

fn append_fraction(base: String, micros: i64, dec: usize) -> String {
    if dec == 0 {
        return base;
    }
    let digits = format!("{:06}", micros);
    format!("{}.{}", base, &digits[..dec])
}

/// TIME(N) second-generation encoding, 3 big-endian bytes biased by
/// 0x800000 plus fractional storage:
///
///   1 bit  sign      (1 = positive)
///   1 bit  reserved
///  10 bits hour      (0-838)
///   6 bits minute
///   6 bits second
fn decode_time2(input: &mut Bytes, dec: usize) -> Result<String> {
    let mut t = input.read_be_uint(3)? as i64 - 0x80_0000;
    let negative = t < 0;
    let mut frac = read_fractional_seconds(input, dec, negative)?;
    let mut sign = "";
    if negative {
        if frac != 0 {
            t += 1;
        }
        t = (t << 24) + frac;
        t = -t;
        frac = t % (1 << 24);
        t >>= 24;
        sign = "-";
    }
    let hour = (t >> 12) & 0x3ff;
    let minute = (t >> 6) & 0x3f;
    let second = t & 0x3f;
    Ok(append_fraction(
        format!("{}{:02}:{:02}:{:02}", sign, hour, minute, second),
        frac,
        dec,
    ))
}

/// DATETIME(N) second-generation encoding, 5 big-endian bytes plus
/// fractional storage:
///
///   1 bit  sign            (always 1 in practice)
///  17 bits year*13+month
///   5 bits day
///   5 bits hour
///   6 bits minute
///   6 bits second
fn decode_datetime2(input: &mut Bytes, dec: usize) -> Result<String> {
    let dt = input.read_be_uint(5)?;
    let frac = read_fractional_seconds(input, dec, false)?;
    let ym = (dt >> 22) & 0x1ffff;
    let year = ym / 13;
    let month = ym % 13;
    let day = (dt >> 17) & 0x1f;
    let hour = (dt >> 12) & 0x1f;
    let minute = (dt >> 6) & 0x3f;
    let second = dt & 0x3f;
    Ok(append_fraction(
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        ),
        frac,
        dec,
    ))
}
