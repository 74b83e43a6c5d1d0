//! SSE broadcaster for the change feed.
//!
//! Implements the core `AppEventEmitter` port so services can publish
//! changes that are streamed to every open page.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use savaeat_core::{AppEvent, AppEventEmitter};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

/// Events buffered per subscriber before a slow client starts missing them.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of `AppEvent`s to SSE subscribers.
#[derive(Debug, Clone)]
pub struct SseBroadcaster {
    sender: broadcast::Sender<AppEvent>,
}

impl SseBroadcaster {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Open an SSE stream for one client.
    ///
    /// Each frame carries the event name (`rating:changed`, ...) and the
    /// JSON-encoded event. A `ping` comment goes out every 30 seconds.
    pub fn subscribe(
        self: Arc<Self>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let receiver = self.sender.subscribe();
        let stream = BroadcastStream::new(receiver).filter_map(|result| match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().event(event.event_name()).data(json))),
                Err(e) => {
                    tracing::warn!(target: "savaeat.sse", error = %e, "failed to serialize event");
                    None
                }
            },
            Err(e) => {
                // Lagged receivers skip ahead.
                tracing::debug!(target: "savaeat.sse", error = %e, "subscriber lagged");
                None
            }
        });

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("ping"),
        )
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl AppEventEmitter for SseBroadcaster {
    fn emit(&self, event: AppEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savaeat_core::RatingAggregate;

    #[test]
    fn test_broadcaster_creation() {
        let broadcaster = SseBroadcaster::with_defaults();
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let broadcaster = SseBroadcaster::with_defaults();
        AppEventEmitter::emit(&broadcaster, AppEvent::vendor_updated("v1"));
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let broadcaster = SseBroadcaster::with_defaults();
        let mut receiver = broadcaster.sender.subscribe();

        AppEventEmitter::emit(
            &broadcaster,
            AppEvent::rating_changed("v1", RatingAggregate::new(4.5, 2)),
        );

        match receiver.recv().await.unwrap() {
            AppEvent::RatingChanged {
                vendor_id,
                ratings_count,
                ..
            } => {
                assert_eq!(vendor_id, "v1");
                assert_eq!(ratings_count, 2);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_boxed_clone_shares_channel() {
        let broadcaster = SseBroadcaster::with_defaults();
        let mut receiver = broadcaster.sender.subscribe();

        let boxed = broadcaster.clone_box();
        boxed.emit(AppEvent::client_updated("c1"));

        assert!(matches!(
            receiver.recv().await.unwrap(),
            AppEvent::ClientUpdated { ref client_id } if client_id == "c1"
        ));
    }
}
