//! the concurrency boundary around the decoder
//!
//! the decoder itself is synchronous and single-threaded; concurrency
//! lives here. an I/O task feeds event payloads through [`relay`] into an
//! [`EventSink`], consumers pull typed events from the matching
//! [`EventQueue`]. the queue is the sole synchronization point: it is
//! bounded (backpressure), it latches the first error it sees, and its
//! pop honors cooperative cancellation.
//!
//! everything here is executor-agnostic, built on `futures` channels.
mod cancel;
mod error;
mod pump;
mod queue;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use error::StreamError;
pub use pump::relay;
pub use queue::{event_queue, EventQueue, EventSink};
