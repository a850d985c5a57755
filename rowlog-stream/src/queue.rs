use crate::cancel::CancelToken;
use crate::error::StreamError;
use futures::channel::mpsc;
use futures::{select, SinkExt, StreamExt};
use rowlog_core::Event;

/// create the two halves of a bounded event hand-off
///
/// `capacity` bounds the number of decoded events buffered ahead of the
/// consumer and is the backpressure mechanism for the producing task.
pub fn event_queue(capacity: usize) -> (EventSink, EventQueue) {
    let (event_tx, event_rx) = mpsc::channel(capacity);
    let (error_tx, error_rx) = mpsc::unbounded();
    (
        EventSink {
            events: event_tx,
            errors: error_tx,
        },
        EventQueue {
            events: event_rx,
            errors: error_rx,
            latched: None,
        },
    )
}

/// producer half: at most one task pushes decoded events here
pub struct EventSink {
    events: mpsc::Sender<Event>,
    errors: mpsc::UnboundedSender<StreamError>,
}

impl EventSink {
    /// deliver one event, waiting for queue space; returns false once the
    /// consumer half is gone
    pub async fn publish(&mut self, event: Event) -> bool {
        self.events.send(event).await.is_ok()
    }

    /// report a terminal error; the consumer latches it
    pub fn fail(&self, error: StreamError) {
        let _ = self.errors.unbounded_send(error);
    }
}

/// consumer half
pub struct EventQueue {
    events: mpsc::Receiver<Event>,
    errors: mpsc::UnboundedReceiver<StreamError>,
    latched: Option<StreamError>,
}

impl EventQueue {
    /// wait for the next event
    ///
    /// resolves with an event when one is buffered, with the latched
    /// error once the producer has reported one (every later pop returns
    /// that same error), or with `Cancelled` when the token fires.
    /// cancellation does not discard events already queued; a later pop
    /// with a live token still drains them.
    pub async fn pop(&mut self, cancel: &CancelToken) -> Result<Event, StreamError> {
        if let Some(error) = &self.latched {
            return Err(error.clone());
        }
        let mut cancelled = cancel.cancelled();
        loop {
            select! {
                event = self.events.next() => return match event {
                    Some(event) => Ok(event),
                    None => {
                        // producer dropped; prefer an error it reported
                        // on the way out over a bare close
                        let error = match self.errors.try_next() {
                            Ok(Some(error)) => error,
                            _ => StreamError::Closed,
                        };
                        self.latched = Some(error.clone());
                        Err(error)
                    }
                },
                error = self.errors.next() => {
                    if let Some(error) = error {
                        self.latched = Some(error.clone());
                        return Err(error);
                    }
                    // error channel closed without carrying an error;
                    // keep draining events (the terminated stream is
                    // skipped by later select rounds)
                }
                _ = cancelled => return Err(StreamError::Cancelled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancel_pair;
    use futures::executor::block_on;
    use futures::FutureExt;
    use rowlog_core::binlog::{
        Event, EventHeader, EventHeaderFlags, LogEventTypeCode, RawEvent, XidData,
    };
    use std::io;
    use std::sync::Arc;

    fn xid_event(transaction_id: u64) -> Event {
        Event::Xid(RawEvent {
            header: EventHeader {
                timestamp: 0,
                type_code: LogEventTypeCode(16),
                server_id: 1,
                event_size: 31,
                next_log_pos: 0,
                flags: EventHeaderFlags::empty(),
            },
            data: XidData { transaction_id },
        })
    }

    fn transaction_id(event: Event) -> u64 {
        match event {
            Event::Xid(e) => e.data.transaction_id,
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_pop_in_publish_order() {
        block_on(async {
            let (mut sink, mut queue) = event_queue(4);
            let (_handle, token) = cancel_pair();
            assert!(sink.publish(xid_event(1)).await);
            assert!(sink.publish(xid_event(2)).await);
            assert_eq!(1, transaction_id(queue.pop(&token).await.unwrap()));
            assert_eq!(2, transaction_id(queue.pop(&token).await.unwrap()));
        });
    }

    #[test]
    fn test_error_is_sticky() {
        block_on(async {
            let (sink, mut queue) = event_queue(4);
            let (_handle, token) = cancel_pair();
            sink.fail(StreamError::Source(Arc::new(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "gone",
            ))));
            assert!(matches!(
                queue.pop(&token).await,
                Err(StreamError::Source(_))
            ));
            // the error channel is drained but the latch keeps returning it
            assert!(matches!(
                queue.pop(&token).await,
                Err(StreamError::Source(_))
            ));
        });
    }

    #[test]
    fn test_cancellation_leaves_queue_intact() {
        block_on(async {
            let (mut sink, mut queue) = event_queue(4);
            let (cancelled_handle, cancelled_token) = cancel_pair();
            cancelled_handle.cancel();
            assert!(matches!(
                queue.pop(&cancelled_token).await,
                Err(StreamError::Cancelled)
            ));
            assert!(sink.publish(xid_event(7)).await);
            let (_handle, token) = cancel_pair();
            assert_eq!(7, transaction_id(queue.pop(&token).await.unwrap()));
        });
    }

    #[test]
    fn test_closed_when_producer_drops() {
        block_on(async {
            let (sink, mut queue) = event_queue(4);
            let (_handle, token) = cancel_pair();
            drop(sink);
            assert!(matches!(queue.pop(&token).await, Err(StreamError::Closed)));
        });
    }

    #[test]
    fn test_bounded_capacity_backpressure() {
        block_on(async {
            let (mut sink, mut queue) = event_queue(1);
            let (_handle, token) = cancel_pair();
            let mut accepted = 0u64;
            while let Some(ok) = sink.publish(xid_event(accepted)).now_or_never() {
                assert!(ok);
                accepted += 1;
                assert!(accepted < 64, "queue accepted events without bound");
            }
            assert!(accepted >= 1);
            // draining one slot unblocks the producer
            queue.pop(&token).await.unwrap();
            assert!(sink.publish(xid_event(accepted)).now_or_never().is_some());
        });
    }
}
