//! MySQL binlog event parsing and row value decoding
//!
//! consumes complete event payloads (19-byte header plus body) as shipped
//! by a replication master and yields typed events. row events resolve
//! their schema through the table map cache maintained by
//! [`EventDecoder`]; column values come out as plain scalars, strings,
//! exact decimal strings and formatted date/time strings.
//!
//! packet transport, handshake and the information_schema signedness
//! query are out of scope; see [`signedness`] for the injection seam.
pub mod binlog;
pub mod col;
pub mod decimal;
pub mod error;
pub mod signedness;
pub mod version;

mod bitmap;

pub use crate::binlog::{Event, EventDecoder};
pub use crate::error::{Error, Result};
