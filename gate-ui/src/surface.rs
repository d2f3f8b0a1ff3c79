//! The surface trait: every visual the engine can touch.
//!
//! The engine treats all visuals as optional. An implementation backed by a
//! real document must tolerate missing elements by silently skipping the
//! update; the state machine never depends on a visual having been applied,
//! so these methods are infallible by contract.

use compact_str::CompactString;

use crate::toast::Severity;

/// Identifier of a per-step container (`step1`..`step4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Step1,
    Step2,
    Step3,
    Step4,
}

impl StepId {
    /// One-based index matching the container naming scheme.
    pub fn index(self) -> u8 {
        match self {
            StepId::Step1 => 1,
            StepId::Step2 => 2,
            StepId::Step3 => 3,
            StepId::Step4 => 4,
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step{}", self.index())
    }
}

/// The three engagement action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionButton {
    Subscribe,
    Like,
    Comment,
}

/// Progress-item rows shown during the engage step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngageItem {
    Like,
    Comment,
}

/// Identifier of a numeric stat counter element.
pub type CounterId = CompactString;

/// A numeric stat counter with its declared final value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounter {
    pub id: CounterId,
    pub target: u64,
}

impl StatCounter {
    pub fn new(id: impl Into<CounterId>, target: u64) -> Self {
        Self {
            id: id.into(),
            target,
        }
    }
}

/// Visual mutations the engine can request from its host.
pub trait UiSurface: Send + Sync {
    /// Make the given step container the active one.
    fn show_step(&self, step: StepId);

    /// Toggle an action button between its initial and "done" visual state
    /// (disabled, completed class, done label).
    fn set_action_done(&self, action: ActionButton, done: bool);

    /// Toggle an engage progress-item row between pending and done.
    fn set_engage_status(&self, item: EngageItem, done: bool);

    /// Set the verification progress bar fill, as a percentage in `0..=100`.
    fn set_verify_progress(&self, percent: f64);

    /// Write the toast message text and severity styling.
    fn render_toast(&self, message: &str, severity: Severity);

    /// Toggle toast visibility (the show/hide animation classes).
    fn set_toast_visible(&self, visible: bool);

    /// Toggle the navbar elevation shadow.
    fn set_navbar_elevated(&self, elevated: bool);

    /// Toggle the back-to-top affordance.
    fn set_back_to_top_visible(&self, visible: bool);

    /// The stat counters present on this surface, with their target values.
    fn stat_counters(&self) -> Vec<StatCounter>;

    /// Update the displayed value of one stat counter.
    fn set_stat_counter(&self, id: &CounterId, value: u64);
}
