//! Domain state types owned by the flow engine.

mod flow_state;

pub use flow_state::{Completion, FlowSnapshot, FlowStep};
