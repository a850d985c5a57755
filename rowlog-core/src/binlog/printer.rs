//! human-readable event dumps
use super::rows::RowsData;
use super::{Event, EventHeader, LogEventType, RawEvent, UnsupportedData};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

impl Event {
    /// write a diagnostic dump of this event, one line per field
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        print_header(self.header(), out)?;
        match self {
            Event::FormatDescription(e) => {
                writeln!(out, "Binlog version: {}", e.data.binlog_version)?;
                writeln!(out, "Server version: {}", e.data.server_version)?;
                writeln!(out, "Checksum algorithm: {}", e.data.checksum_alg)?;
                writeln!(out, "Event post header lengths:")?;
                for (i, len) in e.data.post_header_lengths.iter().enumerate() {
                    writeln!(out, "\t{}: {}", LogEventType::from(i as u8 + 1), len)?;
                }
            }
            Event::Rotate(e) => {
                writeln!(out, "Position: {}", e.data.position)?;
                writeln!(out, "Next log name: {}", e.data.next_log_name)?;
            }
            Event::Query(e) => {
                writeln!(out, "Thread ID: {}", e.data.thread_id)?;
                writeln!(out, "Execution time: {}", e.data.execution_time)?;
                writeln!(out, "Error code: {}", e.data.error_code)?;
                writeln!(out, "Database: {}", e.data.database)?;
                writeln!(out, "Query: {}", e.data.query)?;
            }
            Event::Xid(e) => {
                writeln!(out, "TransactionID: {}", e.data.transaction_id)?;
            }
            Event::RowsQuery(e) => {
                writeln!(out, "Query: {}", e.data.query)?;
            }
            Event::Gtid(e) | Event::AnonymousGtid(e) => {
                writeln!(out, "Commit flag: {}", e.data.commit_flag)?;
                writeln!(out, "GTID: {}", e.data.gtid())?;
            }
            Event::TableMap(e) => {
                writeln!(out, "TableID: {}", e.data.table_id)?;
                writeln!(out, "Flags: {}", e.data.flags)?;
                writeln!(out, "Database: {}", e.data.database)?;
                writeln!(out, "Table: {}", e.data.table_name)?;
                writeln!(out, "Column count: {}", e.data.column_count)?;
                writeln!(out, "Column types: {:?}", e.data.column_types.as_ref())?;
                writeln!(out, "Column meta: {:?}", e.data.column_meta)?;
                writeln!(
                    out,
                    "Column nullability: {:?}",
                    e.data.column_nullability.as_ref()
                )?;
            }
            Event::WriteRows(e) | Event::UpdateRows(e) | Event::DeleteRows(e) => {
                print_rows(e, out)?;
            }
            Event::Unsupported(e) => {
                print_unsupported(e, out)?;
            }
        }
        writeln!(out)
    }
}

fn print_header<W: Write>(header: &EventHeader, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== {} ===", header.event_type())?;
    match DateTime::<Utc>::from_timestamp(header.timestamp as i64, 0) {
        Some(ts) => writeln!(out, "Date: {}", ts.format("%Y-%m-%d %H:%M:%S"))?,
        None => writeln!(out, "Date: {}", header.timestamp)?,
    }
    writeln!(out, "Log position: {}", header.next_log_pos)?;
    writeln!(out, "Event size: {}", header.data_len())
}

fn print_rows<W: Write>(e: &RawEvent<RowsData>, out: &mut W) -> io::Result<()> {
    writeln!(out, "TableID: {}", e.data.table_id)?;
    writeln!(
        out,
        "Table: {}.{}",
        e.data.table.database, e.data.table.table_name
    )?;
    writeln!(out, "Flags: {}", e.data.flags)?;
    writeln!(out, "Column count: {}", e.data.column_count)?;
    writeln!(out, "Columns: {:?}", e.data.included_columns.as_ref())?;
    writeln!(out, "Rows:")?;
    for row in &e.data.rows {
        write!(out, "\t[")?;
        for (i, value) in row.0.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}", value)?;
        }
        writeln!(out, "]")?;
    }
    Ok(())
}

fn print_unsupported<W: Write>(e: &RawEvent<UnsupportedData>, out: &mut W) -> io::Result<()> {
    writeln!(out, "Data:")?;
    hex_dump(e.data.data.as_ref(), out)
}

fn hex_dump<W: Write>(data: &[u8], out: &mut W) -> io::Result<()> {
    for (i, chunk) in data.chunks(16).enumerate() {
        write!(out, "{:08x}  ", i * 16)?;
        for j in 0..16 {
            match chunk.get(j) {
                Some(b) => write!(out, "{:02x} ", b)?,
                None => write!(out, "   ")?,
            }
        }
        write!(out, " |")?;
        for &b in chunk {
            let c = if (0x20..0x7f).contains(&b) {
                b as char
            } else {
                '.'
            };
            write!(out, "{}", c)?;
        }
        writeln!(out, "|")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{LogEventTypeCode, XidData};
    use super::*;
    use crate::binlog::EventHeaderFlags;

    fn header(type_code: u8) -> EventHeader {
        EventHeader {
            timestamp: 0,
            type_code: LogEventTypeCode(type_code),
            server_id: 1,
            event_size: 31,
            next_log_pos: 154,
            flags: EventHeaderFlags::empty(),
        }
    }

    #[test]
    fn test_xid_dump_is_reproducible() {
        let event = Event::Xid(RawEvent {
            header: header(16),
            data: XidData { transaction_id: 77 },
        });
        let mut out = Vec::new();
        event.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            "=== XidEvent ===\n\
             Date: 1970-01-01 00:00:00\n\
             Log position: 154\n\
             Event size: 12\n\
             TransactionID: 77\n\n",
            text
        );
    }

    #[test]
    fn test_unsupported_dump_hex() {
        let event = Event::Unsupported(RawEvent {
            header: header(3),
            data: UnsupportedData {
                data: bytes::Bytes::from_static(b"binlog!"),
            },
        });
        let mut out = Vec::new();
        event.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("=== StopEvent ==="));
        assert!(text.contains("00000000  62 69 6e 6c 6f 67 21"));
        assert!(text.contains("|binlog!|"));
    }
}
