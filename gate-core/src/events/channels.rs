//! Channel factories for processor inputs.

use super::types::{ScrollSample, UiAction, VisibilitySample};
use tokio::sync::mpsc;

/// Default buffer size for processor input channels.
///
/// Large enough to absorb input bursts (rapid clicks, scroll storms)
/// while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for UiAction events.
pub type UiActionSender = mpsc::Sender<UiAction>;
/// Receiver handle for UiAction events.
pub type UiActionReceiver = mpsc::Receiver<UiAction>;

/// Sender handle for ScrollSample events.
pub type ScrollSampleSender = mpsc::Sender<ScrollSample>;
/// Receiver handle for ScrollSample events.
pub type ScrollSampleReceiver = mpsc::Receiver<ScrollSample>;

/// Sender handle for VisibilitySample events.
pub type VisibilitySender = mpsc::Sender<VisibilitySample>;
/// Receiver handle for VisibilitySample events.
pub type VisibilityReceiver = mpsc::Receiver<VisibilitySample>;

/// Create a new UiAction channel.
///
/// The receiver end belongs to the flow controller run loop; senders can
/// be cloned freely by the host.
pub fn ui_action_channel() -> (UiActionSender, UiActionReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new ScrollSample channel.
pub fn scroll_sample_channel() -> (ScrollSampleSender, ScrollSampleReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new VisibilitySample channel.
pub fn visibility_channel() -> (VisibilitySender, VisibilityReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
