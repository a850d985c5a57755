//! essential byte-level parsing on top of bytes::Bytes
//!
//! a `Bytes` handle already behaves like a forward-only cursor: reads
//! split bytes off the front and the handle shrinks as parsing advances.
//! this crate adds checked fixed-width reads, the odd integer widths the
//! MySQL binlog is fond of (3, 5 and 6 byte integers), and the MySQL
//! length-encoded primitives.
pub mod error;
pub mod my;
mod read;

pub use error::{Error, Needed, Result};
pub use read::ReadBytesExt;

use bytes::Bytes;

/// read an object off the front of the input
pub trait ReadFromBytes: Sized {
    fn read_from(input: &mut Bytes) -> Result<Self>;
}
