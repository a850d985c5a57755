//! stateful event dispatch
use super::fde::FormatDescriptionData;
use super::gtid::GtidData;
use super::header::EventHeader;
use super::query::QueryData;
use super::rotate::RotateData;
use super::rows::{RowsData, RowsKind};
use super::rows_query::RowsQueryData;
use super::table_map::TableMapData;
use super::xid::XidData;
use super::{Event, LogEventType, RawEvent, UnsupportedData};
use crate::error::{Error, Result};
use crate::signedness::{AllSigned, SignednessProvider};
use bytes::Bytes;
use bytes_cursor::{ReadBytesExt, ReadFromBytes};
use std::collections::HashMap;

/// decodes one event payload at a time, carrying the cross-event state
/// the grammar requires: the latched format description (checksum
/// policy) and the table map cache row events resolve against.
///
/// single stream, single instance; decode runs to completion and state
/// is only updated when a parse succeeds.
pub struct EventDecoder<S: SignednessProvider = AllSigned> {
    format: Option<FormatDescriptionData>,
    tables: HashMap<u64, TableMapData>,
    signedness: S,
}

impl EventDecoder<AllSigned> {
    pub fn new() -> Self {
        EventDecoder::with_signedness(AllSigned)
    }
}

impl Default for EventDecoder<AllSigned> {
    fn default() -> Self {
        EventDecoder::new()
    }
}

impl<S: SignednessProvider> EventDecoder<S> {
    /// decoder with an injected per-column signedness lookup
    pub fn with_signedness(signedness: S) -> Self {
        EventDecoder {
            format: None,
            tables: HashMap::new(),
            signedness,
        }
    }

    /// the latched format description, if one has been seen
    pub fn format(&self) -> Option<&FormatDescriptionData> {
        self.format.as_ref()
    }

    /// cached table map for a table id
    pub fn table(&self, table_id: u64) -> Option<&TableMapData> {
        self.tables.get(&table_id)
    }

    /// decode one complete event payload (header + body) as shipped by
    /// the replication protocol
    pub fn decode(&mut self, payload: Bytes) -> Result<Event> {
        let total = payload.len();
        let mut input = payload;
        let header = EventHeader::read_from(&mut input)?;
        if header.event_size as usize != total {
            return Err(Error::CorruptEvent(format!(
                "header event size {} does not match received {} bytes",
                header.event_size, total
            )));
        }

        let event_type = header.event_type();
        // every checksummed event carries a trailing CRC32 which is not
        // part of the body grammar; the format description event handles
        // its own tail inside its parser instead
        if event_type != LogEventType::FormatDescriptionEvent {
            if let Some(format) = &self.format {
                if format.crc32_enabled() {
                    input.trim_right(4)?;
                }
            }
        }

        let event = match event_type {
            LogEventType::FormatDescriptionEvent => {
                let data = FormatDescriptionData::read_from(&mut input)?;
                if data.checksum_alg > 1 {
                    log::warn!(
                        "unknown checksum algorithm {}, treating events as unchecksummed",
                        data.checksum_alg
                    );
                }
                self.format = Some(data.clone());
                Event::FormatDescription(RawEvent { header, data })
            }
            LogEventType::RotateEvent => {
                let data = RotateData::read_from(&mut input)?;
                Event::Rotate(RawEvent { header, data })
            }
            LogEventType::QueryEvent => {
                let data = QueryData::read_from(&mut input)?;
                Event::Query(RawEvent { header, data })
            }
            LogEventType::XidEvent => {
                let data = XidData::read_from(&mut input)?;
                Event::Xid(RawEvent { header, data })
            }
            LogEventType::RowsQueryLogEvent => {
                let data = RowsQueryData::read_from(&mut input)?;
                Event::RowsQuery(RawEvent { header, data })
            }
            LogEventType::GtidLogEvent => {
                let data = GtidData::read_from(&mut input)?;
                Event::Gtid(RawEvent { header, data })
            }
            LogEventType::AnonymousGtidLogEvent => {
                let data = GtidData::read_from(&mut input)?;
                Event::AnonymousGtid(RawEvent { header, data })
            }
            LogEventType::TableMapEvent => {
                let data = TableMapData::read_from(&mut input)?;
                self.tables.insert(data.table_id, data.clone());
                Event::TableMap(RawEvent { header, data })
            }
            LogEventType::WriteRowsEventV2 => {
                let data =
                    RowsData::read_from(&mut input, RowsKind::Write, &self.tables, &self.signedness)?;
                Event::WriteRows(RawEvent { header, data })
            }
            LogEventType::UpdateRowsEventV2 => {
                let data =
                    RowsData::read_from(&mut input, RowsKind::Update, &self.tables, &self.signedness)?;
                Event::UpdateRows(RawEvent { header, data })
            }
            LogEventType::DeleteRowsEventV2 => {
                let data =
                    RowsData::read_from(&mut input, RowsKind::Delete, &self.tables, &self.signedness)?;
                Event::DeleteRows(RawEvent { header, data })
            }
            _ => Event::Unsupported(RawEvent {
                header,
                data: UnsupportedData {
                    data: input.read_remaining(),
                },
            }),
        };
        Ok(event)
    }
}
