//! Event emitter trait for change notifications.
//!
//! Implementations handle transport details (broadcast channel for SSE, or
//! nothing at all in tests and tools).

use crate::events::AppEvent;

/// Trait for emitting application events.
///
/// Keeps channel types out of the service signatures.
///
/// # Implementations
///
/// - `NoopEmitter` - tests and contexts without listeners
/// - `SseBroadcaster` in `savaeat-axum`
pub trait AppEventEmitter: Send + Sync {
    /// Emit an application event. Must not block.
    fn emit(&self, event: AppEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn AppEventEmitter>;
}

/// Discards every event.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl AppEventEmitter for NoopEmitter {
    fn emit(&self, _event: AppEvent) {}

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}
