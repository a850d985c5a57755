use crate::col::parse_column_meta;
use bytes::Bytes;
use bytes_cursor::my::ReadMyEnc;
use bytes_cursor::{Error, ReadBytesExt, ReadFromBytes, Result};
use smol_str::SmolStr;

/// schema announcement binding a table id to its column layout
///
/// row events reference a table solely by id; the decoder caches these
/// and the server re-announces a table whenever its id binding changes.
#[derive(Debug, Clone)]
pub struct TableMapData {
    /// 6 bytes on the wire, zero-extended
    pub table_id: u64,
    pub flags: u16,
    pub database: SmolStr,
    pub table_name: SmolStr,
    pub column_count: usize,
    /// one type byte per column
    pub column_types: Bytes,
    /// one decoded metadata word per column
    pub column_meta: Vec<u16>,
    /// bit i set means column i is nullable
    pub column_nullability: Bytes,
}

impl ReadFromBytes for TableMapData {
    fn read_from(input: &mut Bytes) -> Result<Self> {
        let table_id = input.read_le_u48()?;
        let flags = input.read_le_u16()?;

        let database_len = input.read_u8()? as usize;
        let database = name(input.read_len(database_len)?);
        input.skip(1)?;

        let table_len = input.read_u8()? as usize;
        let table_name = name(input.read_len(table_len)?);
        input.skip(1)?;

        let column_count = input
            .read_len_enc_int()?
            .to_u64()
            .ok_or_else(|| Error::ConstraintError("invalid column count".to_owned()))?
            as usize;
        let column_types = input.read_len(column_count)?;

        let mut meta_block = input
            .read_len_enc_str()?
            .into_bytes()
            .ok_or_else(|| Error::ConstraintError("invalid column metadata block".to_owned()))?;
        let column_meta = parse_column_meta(column_types.as_ref(), &mut meta_block)?;

        let column_nullability = input.read_remaining();
        if column_nullability.len() != (column_count + 7) / 8 {
            return Err(Error::ConstraintError(format!(
                "nullability bitmap length {} does not match {} columns",
                column_nullability.len(),
                column_count
            )));
        }
        Ok(TableMapData {
            table_id,
            flags,
            database,
            table_name,
            column_count,
            column_types,
            column_meta,
            column_nullability,
        })
    }
}

fn name(raw: Bytes) -> SmolStr {
    SmolStr::new(String::from_utf8_lossy(raw.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_map_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&[0x1a, 0x00, 0x00, 0x00, 0x00, 0x00]); // table_id = 26
        body.extend_from_slice(&[0x01, 0x00]); // flags
        body.push(4);
        body.extend_from_slice(b"test");
        body.push(0);
        body.push(3);
        body.extend_from_slice(b"tbl");
        body.push(0);
        body.push(2); // column count
        body.extend_from_slice(&[0x02, 0x0f]); // SHORT, VARCHAR
        body.extend_from_slice(&[0x02, 0x14, 0x00]); // metadata: VARCHAR max len 20
        body.push(0b10); // only column 1 nullable
        body
    }

    #[test]
    fn test_table_map() {
        let mut input = Bytes::from(table_map_body());
        let data = TableMapData::read_from(&mut input).unwrap();
        assert_eq!(26, data.table_id);
        assert_eq!("test", data.database);
        assert_eq!("tbl", data.table_name);
        assert_eq!(2, data.column_count);
        assert_eq!(&[0x02, 0x0f][..], data.column_types.as_ref());
        assert_eq!(vec![0, 20], data.column_meta);
        assert_eq!(&[0b10][..], data.column_nullability.as_ref());
        assert!(input.is_empty());
    }

    #[test]
    fn test_nullability_length_mismatch() {
        let mut body = table_map_body();
        body.push(0); // extra trailing byte
        let err = TableMapData::read_from(&mut Bytes::from(body)).unwrap_err();
        assert!(matches!(err, Error::ConstraintError(_)));
    }

    #[test]
    fn test_meta_and_types_cover_all_columns() {
        let mut input = Bytes::from(table_map_body());
        let data = TableMapData::read_from(&mut input).unwrap();
        assert_eq!(data.column_count, data.column_types.len());
        assert_eq!(data.column_count, data.column_meta.len());
        assert_eq!(
            (data.column_count + 7) / 8,
            data.column_nullability.len()
        );
    }
}
