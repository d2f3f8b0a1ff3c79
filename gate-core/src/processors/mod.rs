//! Event processors.
//!
//! - `FlowController`: receives `UiAction`, drives the unlock state machine
//! - `ToastProcessor`: receives `ToastRequest`, presents toasts serially
//! - `ScrollWatcher`: receives scroll/visibility samples, toggles scroll
//!   visuals and runs the one-shot counter animation

pub mod flow_controller;
pub mod scroll_watcher;
pub mod toast_queue;

pub use flow_controller::{FlowController, FlowLinks, FlowTimings};
pub use scroll_watcher::ScrollWatcher;
pub use toast_queue::{Notifier, ToastProcessor, ToastRequest, ToastTicket, ToastTimings};
