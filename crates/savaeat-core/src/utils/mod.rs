//! Shared helpers.

pub mod keyed_lock;
pub mod validation;

pub use keyed_lock::{KeyGuard, KeyedLocks};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
