//! Flow state snapshot types.
//!
//! The [`FlowController`](crate::processors::FlowController) exclusively owns
//! the live state; everything else (event payloads, hooks, hosts) sees only
//! immutable [`FlowSnapshot`] values taken after each mutation.

use gate_ui::StepId;
use serde::{Deserialize, Serialize};

/// The four steps of the unlock gate.
///
/// The step only ever advances forward, or returns to `Subscribe` via an
/// explicit reset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Step 1: waiting for the subscribe action.
    #[default]
    Subscribe,
    /// Step 2: waiting for both like and comment, in any order.
    Engage,
    /// Step 3: simulated verification in progress.
    Verifying,
    /// Step 4: the download step is revealed. Terminal until reset.
    Unlocked,
}

impl FlowStep {
    /// One-based step index.
    pub fn index(self) -> u8 {
        match self {
            FlowStep::Subscribe => 1,
            FlowStep::Engage => 2,
            FlowStep::Verifying => 3,
            FlowStep::Unlocked => 4,
        }
    }
}

impl From<FlowStep> for StepId {
    fn from(step: FlowStep) -> Self {
        match step {
            FlowStep::Subscribe => StepId::Step1,
            FlowStep::Engage => StepId::Step2,
            FlowStep::Verifying => StepId::Step3,
            FlowStep::Unlocked => StepId::Step4,
        }
    }
}

/// Which engagement actions have completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub subscribe: bool,
    pub like: bool,
    pub comment: bool,
}

impl Completion {
    /// The joint condition gating the engage step: both like and comment.
    pub fn engaged(self) -> bool {
        self.like && self.comment
    }
}

/// An immutable snapshot of the flow state.
///
/// Timestamps are unix milliseconds. `completed_at_ms` is only set once the
/// flow reaches [`FlowStep::Unlocked`] and is cleared by a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub step: FlowStep,
    pub completed: Completion,
    pub started_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
}
