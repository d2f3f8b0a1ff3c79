//! Headless engine for the multi-step unlock-gate flow.
//!
//! The gate reveals a download step only after a sequence of engagement
//! actions (subscribe, then like + comment, then a simulated verification
//! delay). Everything here is host-agnostic: visuals go through the
//! [`gate_ui::UiSurface`] trait, external links through
//! [`gate_ui::LinkOpener`], and hosts drive the engine by sending
//! [`events::UiAction`]s into the [`processors::FlowController`] run loop.
//!
//! # Processors
//!
//! - [`processors::FlowController`]: the step/completion state machine
//! - [`processors::ToastProcessor`]: serialized toast presentation
//! - [`processors::ScrollWatcher`]: throttled scroll reactions and the
//!   one-shot stat counter animation
//!
//! All processors follow the same shape: injected receivers, a
//! `watch::Receiver<bool>` shutdown signal, and a `run()` loop draining
//! events with shutdown at highest priority.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod entities;
pub mod events;
pub mod processors;
pub mod storage;
pub mod utils;
