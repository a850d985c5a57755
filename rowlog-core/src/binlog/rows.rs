//! row image decoding for the v2 write/update/delete events
use super::table_map::TableMapData;
use crate::bitmap;
use crate::col::{self, ColumnValue};
use crate::error::{Error, Result};
use crate::signedness::SignednessProvider;
use bytes::{Buf, Bytes};
use bytes_cursor::my::ReadMyEnc;
use bytes_cursor::ReadBytesExt;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowsKind {
    Write,
    Update,
    Delete,
}

/// one decoded row image; length always equals the popcount of the bitmap
/// it was keyed on, with NULL cells marked explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<ColumnValue>);

/// decoded body of a WriteRows/UpdateRows/DeleteRows v2 event
///
/// update events store rows as before/after pairs in order: rows[0] is
/// the first before-image, rows[1] its after-image, and so on.
#[derive(Debug, Clone)]
pub struct RowsData {
    pub table_id: u64,
    pub flags: u16,
    pub extra_data: Bytes,
    pub column_count: usize,
    pub included_columns: Bytes,
    /// update events only; keys the after-images
    pub updated_columns: Option<Bytes>,
    /// copy of the announcing table map so the event owns its schema
    pub table: TableMapData,
    pub rows: Vec<Row>,
}

impl RowsData {
    pub(crate) fn read_from<S: SignednessProvider>(
        input: &mut Bytes,
        kind: RowsKind,
        tables: &HashMap<u64, TableMapData>,
        signedness: &S,
    ) -> Result<RowsData> {
        let table_id = input.read_le_u48()?;
        let flags = input.read_le_u16()?;
        let extra_data_len = input.read_le_u16()? as usize;
        if extra_data_len < 2 {
            return Err(Error::CorruptEvent(format!(
                "invalid rows extra data length: {}",
                extra_data_len
            )));
        }
        // the length field counts itself
        let extra_data = input.read_len(extra_data_len - 2)?;

        let column_count = input
            .read_len_enc_int()?
            .to_u64()
            .ok_or_else(|| Error::CorruptEvent("invalid rows column count".to_owned()))?
            as usize;
        let bitmap_len = (column_count + 7) / 8;
        let included_columns = input.read_len(bitmap_len)?;
        let updated_columns = if kind == RowsKind::Update {
            Some(input.read_len(bitmap_len)?)
        } else {
            None
        };

        let table = tables
            .get(&table_id)
            .cloned()
            .ok_or(Error::MissingTableMap(table_id))?;
        if column_count > table.column_count {
            return Err(Error::CorruptEvent(format!(
                "row event has {} columns but table map announced {}",
                column_count, table.column_count
            )));
        }
        let unsigned = signedness.unsigned_flags(&table.database, &table.table_name);

        let mut rows = Vec::new();
        while input.has_remaining() {
            rows.push(read_row(
                input,
                &table,
                column_count,
                included_columns.as_ref(),
                unsigned,
            )?);
            if let Some(updated) = &updated_columns {
                rows.push(read_row(
                    input,
                    &table,
                    column_count,
                    updated.as_ref(),
                    unsigned,
                )?);
            }
        }
        Ok(RowsData {
            table_id,
            flags,
            extra_data,
            column_count,
            included_columns,
            updated_columns,
            table,
            rows,
        })
    }
}

/// the per-row null bitmap is indexed by rank among *included* columns,
/// not by column position
fn read_row(
    input: &mut Bytes,
    table: &TableMapData,
    column_count: usize,
    included: &[u8],
    unsigned: Option<&[bool]>,
) -> Result<Row> {
    let included_count = bitmap::count_set(included, column_count);
    let null_bitmap = input.read_len((included_count + 7) / 8)?;
    let mut values = Vec::with_capacity(included_count);
    let mut rank = 0;
    for i in 0..column_count {
        if !bitmap::index(included, i) {
            continue;
        }
        if bitmap::index(null_bitmap.as_ref(), rank) {
            values.push(ColumnValue::Null);
        } else {
            let uns = unsigned.map_or(false, |flags| flags.get(i).copied().unwrap_or(false));
            values.push(col::decode_value(
                input,
                table.column_types[i],
                table.column_meta[i],
                uns,
            )?);
        }
        rank += 1;
    }
    Ok(Row(values))
}
