//! binlog event grammar
//!
//! every event is a 19-byte common header followed by a type-specific
//! body. the decoder recognizes the full documented type byte space and
//! semantically decodes the kinds a row-replication client needs; the
//! rest are retained raw as [`UnsupportedData`].
mod decoder;
mod fde;
mod gtid;
mod header;
mod printer;
mod query;
mod rotate;
mod rows;
mod rows_query;
mod table_map;
mod xid;

pub use decoder::EventDecoder;
pub use fde::FormatDescriptionData;
pub use gtid::GtidData;
pub use header::{EventHeader, EventHeaderFlags, EVENT_HEADER_LEN};
pub use query::QueryData;
pub use rotate::RotateData;
pub use rows::{Row, RowsData};
pub use rows_query::RowsQueryData;
pub use table_map::TableMapData;
pub use xid::XidData;

use bytes::Bytes;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEventType {
    Unknown,
    StartEventV3,
    QueryEvent,
    StopEvent,
    RotateEvent,
    IntvarEvent,
    LoadEvent,
    SlaveEvent,
    CreateFileEvent,
    AppendBlockEvent,
    ExecLoadEvent,
    DeleteFileEvent,
    NewLoadEvent,
    RandEvent,
    UserVarEvent,
    FormatDescriptionEvent,
    XidEvent,
    BeginLoadQueryEvent,
    ExecuteLoadQueryEvent,
    TableMapEvent,
    WriteRowsEventV0,
    UpdateRowsEventV0,
    DeleteRowsEventV0,
    WriteRowsEventV1,
    UpdateRowsEventV1,
    DeleteRowsEventV1,
    IncidentEvent,
    HeartbeatLogEvent,
    IgnorableLogEvent,
    RowsQueryLogEvent,
    WriteRowsEventV2,
    UpdateRowsEventV2,
    DeleteRowsEventV2,
    GtidLogEvent,
    AnonymousGtidLogEvent,
    PreviousGtidsLogEvent,
    TransactionContextEvent,
    ViewChangeEvent,
    XaPrepareLogEvent,
    Invalid,
}

/// raw event type byte as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEventTypeCode(pub u8);

impl From<u8> for LogEventType {
    fn from(code: u8) -> LogEventType {
        match code {
            0 => LogEventType::Unknown,
            1 => LogEventType::StartEventV3,
            2 => LogEventType::QueryEvent,
            3 => LogEventType::StopEvent,
            4 => LogEventType::RotateEvent,
            5 => LogEventType::IntvarEvent,
            6 => LogEventType::LoadEvent,
            7 => LogEventType::SlaveEvent,
            8 => LogEventType::CreateFileEvent,
            9 => LogEventType::AppendBlockEvent,
            10 => LogEventType::ExecLoadEvent,
            11 => LogEventType::DeleteFileEvent,
            12 => LogEventType::NewLoadEvent,
            13 => LogEventType::RandEvent,
            14 => LogEventType::UserVarEvent,
            15 => LogEventType::FormatDescriptionEvent,
            16 => LogEventType::XidEvent,
            17 => LogEventType::BeginLoadQueryEvent,
            18 => LogEventType::ExecuteLoadQueryEvent,
            19 => LogEventType::TableMapEvent,
            // 20..=22 are the pre-GA row events of 5.1.0 ~ 5.1.17
            20 => LogEventType::WriteRowsEventV0,
            21 => LogEventType::UpdateRowsEventV0,
            22 => LogEventType::DeleteRowsEventV0,
            // 23..=25 were emitted by 5.1.18 ~ 5.6.x
            23 => LogEventType::WriteRowsEventV1,
            24 => LogEventType::UpdateRowsEventV1,
            25 => LogEventType::DeleteRowsEventV1,
            26 => LogEventType::IncidentEvent,
            27 => LogEventType::HeartbeatLogEvent,
            28 => LogEventType::IgnorableLogEvent,
            29 => LogEventType::RowsQueryLogEvent,
            // 30..=32 are current since 5.6
            30 => LogEventType::WriteRowsEventV2,
            31 => LogEventType::UpdateRowsEventV2,
            32 => LogEventType::DeleteRowsEventV2,
            33 => LogEventType::GtidLogEvent,
            34 => LogEventType::AnonymousGtidLogEvent,
            35 => LogEventType::PreviousGtidsLogEvent,
            36 => LogEventType::TransactionContextEvent,
            37 => LogEventType::ViewChangeEvent,
            38 => LogEventType::XaPrepareLogEvent,
            _ => LogEventType::Invalid,
        }
    }
}

impl From<LogEventTypeCode> for LogEventType {
    fn from(code: LogEventTypeCode) -> LogEventType {
        LogEventType::from(code.0)
    }
}

impl fmt::Display for LogEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogEventType::Unknown => "UnknownEvent",
            LogEventType::StartEventV3 => "StartEventV3",
            LogEventType::QueryEvent => "QueryEvent",
            LogEventType::StopEvent => "StopEvent",
            LogEventType::RotateEvent => "RotateEvent",
            LogEventType::IntvarEvent => "IntvarEvent",
            LogEventType::LoadEvent => "LoadEvent",
            LogEventType::SlaveEvent => "SlaveEvent",
            LogEventType::CreateFileEvent => "CreateFileEvent",
            LogEventType::AppendBlockEvent => "AppendBlockEvent",
            LogEventType::ExecLoadEvent => "ExecLoadEvent",
            LogEventType::DeleteFileEvent => "DeleteFileEvent",
            LogEventType::NewLoadEvent => "NewLoadEvent",
            LogEventType::RandEvent => "RandEvent",
            LogEventType::UserVarEvent => "UserVarEvent",
            LogEventType::FormatDescriptionEvent => "FormatDescriptionEvent",
            LogEventType::XidEvent => "XidEvent",
            LogEventType::BeginLoadQueryEvent => "BeginLoadQueryEvent",
            LogEventType::ExecuteLoadQueryEvent => "ExecuteLoadQueryEvent",
            LogEventType::TableMapEvent => "TableMapEvent",
            LogEventType::WriteRowsEventV0 => "WriteRowsEventV0",
            LogEventType::UpdateRowsEventV0 => "UpdateRowsEventV0",
            LogEventType::DeleteRowsEventV0 => "DeleteRowsEventV0",
            LogEventType::WriteRowsEventV1 => "WriteRowsEventV1",
            LogEventType::UpdateRowsEventV1 => "UpdateRowsEventV1",
            LogEventType::DeleteRowsEventV1 => "DeleteRowsEventV1",
            LogEventType::IncidentEvent => "IncidentEvent",
            LogEventType::HeartbeatLogEvent => "HeartbeatEvent",
            LogEventType::IgnorableLogEvent => "IgnorableEvent",
            LogEventType::RowsQueryLogEvent => "RowsQueryEvent",
            LogEventType::WriteRowsEventV2 => "WriteRowsEventV2",
            LogEventType::UpdateRowsEventV2 => "UpdateRowsEventV2",
            LogEventType::DeleteRowsEventV2 => "DeleteRowsEventV2",
            LogEventType::GtidLogEvent => "GtidEvent",
            LogEventType::AnonymousGtidLogEvent => "AnonymousGtidEvent",
            LogEventType::PreviousGtidsLogEvent => "PreviousGtidsEvent",
            LogEventType::TransactionContextEvent => "TransactionContextEvent",
            LogEventType::ViewChangeEvent => "ViewChangeEvent",
            LogEventType::XaPrepareLogEvent => "XaPrepareLogEvent",
            LogEventType::Invalid => "InvalidEvent",
        };
        f.write_str(name)
    }
}

/// header plus type-specific body
#[derive(Debug, Clone)]
pub struct RawEvent<D> {
    pub header: EventHeader,
    pub data: D,
}

/// body of an event kind this crate does not decode, kept for diagnostics
#[derive(Debug, Clone)]
pub struct UnsupportedData {
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub enum Event {
    FormatDescription(RawEvent<FormatDescriptionData>),
    Rotate(RawEvent<RotateData>),
    Query(RawEvent<QueryData>),
    Xid(RawEvent<XidData>),
    RowsQuery(RawEvent<RowsQueryData>),
    Gtid(RawEvent<GtidData>),
    AnonymousGtid(RawEvent<GtidData>),
    TableMap(RawEvent<TableMapData>),
    WriteRows(RawEvent<RowsData>),
    UpdateRows(RawEvent<RowsData>),
    DeleteRows(RawEvent<RowsData>),
    Unsupported(RawEvent<UnsupportedData>),
}

impl Event {
    pub fn header(&self) -> &EventHeader {
        match self {
            Event::FormatDescription(e) => &e.header,
            Event::Rotate(e) => &e.header,
            Event::Query(e) => &e.header,
            Event::Xid(e) => &e.header,
            Event::RowsQuery(e) => &e.header,
            Event::Gtid(e) => &e.header,
            Event::AnonymousGtid(e) => &e.header,
            Event::TableMap(e) => &e.header,
            Event::WriteRows(e) => &e.header,
            Event::UpdateRows(e) => &e.header,
            Event::DeleteRows(e) => &e.header,
            Event::Unsupported(e) => &e.header,
        }
    }
}
