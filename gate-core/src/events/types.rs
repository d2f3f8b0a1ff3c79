//! Event type definitions.

use serde::{Deserialize, Serialize};

use crate::utils::clock::unix_ms;

/// Well-known topics published on the [`EventBus`](super::EventBus).
///
/// Topics are plain strings so host code can define its own alongside
/// these; ordering is only guaranteed within a single topic.
pub mod topic {
    /// The subscribe action completed.
    pub const SUBSCRIBE: &str = "flow:subscribe";
    /// The like action completed.
    pub const LIKE: &str = "flow:like";
    /// The comment action completed.
    pub const COMMENT: &str = "flow:comment";
    /// Verification reached 100%.
    pub const VERIFY: &str = "flow:verify";
    /// The flow reached the unlocked step; payload carries the full
    /// final snapshot.
    pub const COMPLETE: &str = "flow:complete";
    /// Fired after every flow state mutation with the new snapshot.
    pub const STATE_CHANGED: &str = "state:changed";
    /// Fired once after bootstrap wiring finishes.
    pub const APP_READY: &str = "app:ready";
}

/// Payload attached to every published event.
///
/// Every event carries at minimum its publication timestamp; richer events
/// (state changes, completion) put a JSON document in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Publication time, unix milliseconds.
    pub at_ms: i64,
    /// Event-specific data; `Null` for timestamp-only events.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventPayload {
    /// A payload carrying only the current timestamp.
    pub fn timestamp_only() -> Self {
        Self {
            at_ms: unix_ms(),
            data: serde_json::Value::Null,
        }
    }

    /// A payload carrying the current timestamp and `data`.
    pub fn with_data(data: serde_json::Value) -> Self {
        Self {
            at_ms: unix_ms(),
            data,
        }
    }
}

/// A user action forwarded from the host into the flow controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Subscribe,
    Like,
    Comment,
    Reset,
}

/// A scroll position sample from the host viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// Vertical scroll offset in pixels.
    pub y: f64,
}

/// Regions whose visibility the host observes for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewRegion {
    /// The hero-stats container holding the numeric counters.
    HeroStats,
}

/// A visibility sample for an observed region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilitySample {
    pub region: ViewRegion,
    /// Fraction of the region currently visible, in `0.0..=1.0`.
    pub ratio: f64,
}
