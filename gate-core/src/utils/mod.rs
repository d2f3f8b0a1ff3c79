//! Small shared utilities.

pub mod clock;
pub mod throttle;

pub use clock::unix_ms;
pub use throttle::Throttle;
