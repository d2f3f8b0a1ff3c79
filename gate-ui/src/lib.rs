//! UI contract for the gate unlock-flow engine.
//!
//! The engine in `gate-core` is headless: every visual mutation goes through
//! the [`UiSurface`] trait and every external-link side effect goes through
//! [`LinkOpener`]. Hosts (a browser bridge, a terminal demo, a test harness)
//! implement these traits; the engine never touches a concrete UI directly.
//!
//! The `mock` feature ships recording implementations of both traits for
//! assertions in tests.

pub mod links;
pub mod surface;
pub mod toast;

#[cfg(feature = "mock")]
pub mod mock;

pub use links::{LinkError, LinkOpener, open_with_fallback};
pub use surface::{ActionButton, CounterId, EngageItem, StatCounter, StepId, UiSurface};
pub use toast::Severity;
