//! Event system: the pub/sub bus, well-known topics, and the typed
//! channels that feed the processors.
//!
//! Two kinds of events coexist here:
//!
//! 1. **Domain events** published on the [`EventBus`] under the topics in
//!    [`topic`], consumable by host code (analytics taps, download
//!    reveal hooks). Delivery is synchronous, in registration order, with
//!    per-handler fault isolation.
//! 2. **Processor inputs** ([`UiAction`], [`ScrollSample`],
//!    [`VisibilitySample`]) carried over tokio mpsc channels from the host
//!    into the processor run loops.

pub mod bus;
pub mod channels;
pub mod types;

pub use bus::{EventBus, SubscriptionId};
pub use channels::{
    DEFAULT_CHANNEL_BUFFER, ScrollSampleReceiver, ScrollSampleSender, UiActionReceiver,
    UiActionSender, VisibilityReceiver, VisibilitySender, scroll_sample_channel,
    ui_action_channel, visibility_channel,
};
pub use types::{EventPayload, ScrollSample, UiAction, ViewRegion, VisibilitySample, topic};
