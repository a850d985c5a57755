use crate::error::StreamError;
use crate::queue::EventSink;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use rowlog_core::signedness::SignednessProvider;
use rowlog_core::EventDecoder;
use std::io;
use std::sync::Arc;

/// drive a decoder from a payload source into an event sink
///
/// `payloads` yields complete event payloads (header plus body) exactly
/// as extracted from the replication packet stream. the relay stops on
/// the first source or decode error after reporting it through the sink's
/// error channel, and stops silently once the consumer side is gone or
/// the source ends.
pub async fn relay<St, S>(mut payloads: St, mut decoder: EventDecoder<S>, mut sink: EventSink)
where
    St: Stream<Item = io::Result<Bytes>> + Unpin,
    S: SignednessProvider,
{
    while let Some(item) = payloads.next().await {
        match item {
            Ok(payload) => match decoder.decode(payload) {
                Ok(event) => {
                    if !sink.publish(event).await {
                        log::debug!("event consumer dropped, stopping relay");
                        return;
                    }
                }
                Err(error) => {
                    log::warn!("stopping relay on decode error: {}", error);
                    sink.fail(StreamError::Decode(Arc::new(error)));
                    return;
                }
            },
            Err(error) => {
                log::warn!("stopping relay on source error: {}", error);
                sink.fail(StreamError::Source(Arc::new(error)));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancel_pair;
    use crate::queue::event_queue;
    use futures::executor::block_on;
    use futures::stream;
    use rowlog_core::binlog::{Event, EVENT_HEADER_LEN};

    fn xid_payload(transaction_id: u64) -> Bytes {
        let body = transaction_id.to_le_bytes();
        let event_size = (EVENT_HEADER_LEN + body.len()) as u32;
        let mut raw = Vec::new();
        raw.extend_from_slice(&0u32.to_le_bytes());
        raw.push(16);
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&event_size.to_le_bytes());
        raw.extend_from_slice(&event_size.to_le_bytes());
        raw.extend_from_slice(&0u16.to_le_bytes());
        raw.extend_from_slice(&body);
        Bytes::from(raw)
    }

    #[test]
    fn test_relay_decodes_and_publishes() {
        block_on(async {
            let (sink, mut queue) = event_queue(8);
            let (_handle, token) = cancel_pair();
            let payloads = stream::iter(vec![Ok(xid_payload(1)), Ok(xid_payload(2))]);
            relay(payloads, EventDecoder::new(), sink).await;

            match queue.pop(&token).await.unwrap() {
                Event::Xid(e) => assert_eq!(1, e.data.transaction_id),
                other => panic!("unexpected event: {:?}", other),
            }
            match queue.pop(&token).await.unwrap() {
                Event::Xid(e) => assert_eq!(2, e.data.transaction_id),
                other => panic!("unexpected event: {:?}", other),
            }
            assert!(matches!(queue.pop(&token).await, Err(StreamError::Closed)));
        });
    }

    #[test]
    fn test_relay_latches_decode_error() {
        block_on(async {
            let (sink, mut queue) = event_queue(8);
            let (_handle, token) = cancel_pair();
            // event size field disagrees with the actual payload length
            let mut corrupt = xid_payload(1).to_vec();
            corrupt.pop();
            let payloads = stream::iter(vec![Ok(Bytes::from(corrupt))]);
            relay(payloads, EventDecoder::new(), sink).await;
            assert!(matches!(
                queue.pop(&token).await,
                Err(StreamError::Decode(_))
            ));
        });
    }

    #[test]
    fn test_relay_propagates_source_error() {
        block_on(async {
            let (sink, mut queue) = event_queue(8);
            let (_handle, token) = cancel_pair();
            let payloads = stream::iter(vec![
                Ok(xid_payload(1)),
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection lost")),
            ]);
            relay(payloads, EventDecoder::new(), sink).await;
            // the value and the error race like two channel reads; the
            // error may win the first pop, but it must surface and latch
            match queue.pop(&token).await {
                Ok(_) => assert!(matches!(
                    queue.pop(&token).await,
                    Err(StreamError::Source(_))
                )),
                Err(StreamError::Source(_)) => {}
                other => panic!("unexpected pop result: {:?}", other),
            }
            assert!(matches!(
                queue.pop(&token).await,
                Err(StreamError::Source(_))
            ));
        });
    }
}
