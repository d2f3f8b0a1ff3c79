//! Recording implementations of the surface traits for tests.

use std::sync::Mutex;

use url::Url;

use crate::links::{LinkError, LinkOpener};
use crate::surface::{ActionButton, CounterId, EngageItem, StatCounter, StepId, UiSurface};
use crate::toast::Severity;

/// One recorded [`UiSurface`] call, in invocation order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ShowStep(StepId),
    ActionDone(ActionButton, bool),
    EngageStatus(EngageItem, bool),
    VerifyProgress(f64),
    RenderToast(String, Severity),
    ToastVisible(bool),
    NavbarElevated(bool),
    BackToTopVisible(bool),
    StatCounter(CounterId, u64),
}

/// A surface that records every call for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    counters: Vec<StatCounter>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording surface that reports the given stat counters.
    pub fn with_counters(counters: Vec<StatCounter>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            counters,
        }
    }

    /// Snapshot of all recorded calls so far.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_matching(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.lock().iter().filter(|c| pred(c)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SurfaceCall>> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn push(&self, call: SurfaceCall) {
        self.lock().push(call);
    }
}

impl UiSurface for RecordingSurface {
    fn show_step(&self, step: StepId) {
        self.push(SurfaceCall::ShowStep(step));
    }

    fn set_action_done(&self, action: ActionButton, done: bool) {
        self.push(SurfaceCall::ActionDone(action, done));
    }

    fn set_engage_status(&self, item: EngageItem, done: bool) {
        self.push(SurfaceCall::EngageStatus(item, done));
    }

    fn set_verify_progress(&self, percent: f64) {
        self.push(SurfaceCall::VerifyProgress(percent));
    }

    fn render_toast(&self, message: &str, severity: Severity) {
        self.push(SurfaceCall::RenderToast(message.to_owned(), severity));
    }

    fn set_toast_visible(&self, visible: bool) {
        self.push(SurfaceCall::ToastVisible(visible));
    }

    fn set_navbar_elevated(&self, elevated: bool) {
        self.push(SurfaceCall::NavbarElevated(elevated));
    }

    fn set_back_to_top_visible(&self, visible: bool) {
        self.push(SurfaceCall::BackToTopVisible(visible));
    }

    fn stat_counters(&self) -> Vec<StatCounter> {
        self.counters.clone()
    }

    fn set_stat_counter(&self, id: &CounterId, value: u64) {
        self.push(SurfaceCall::StatCounter(id.clone(), value));
    }
}

/// A link opener that records every request and can simulate a blocked
/// new-context request.
#[derive(Debug, Default)]
pub struct RecordingLinkOpener {
    block_new_context: bool,
    opened: Mutex<Vec<Url>>,
    navigated: Mutex<Vec<Url>>,
}

impl RecordingLinkOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// An opener that refuses every new-context request, as a popup
    /// blocker would.
    pub fn blocked() -> Self {
        Self {
            block_new_context: true,
            ..Self::default()
        }
    }

    /// URLs successfully opened in a new context, in order.
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// URLs navigated to in the current context, in order.
    pub fn navigated(&self) -> Vec<Url> {
        self.navigated
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl LinkOpener for RecordingLinkOpener {
    fn open_new_context(&self, url: &Url) -> Result<(), LinkError> {
        if self.block_new_context {
            return Err(LinkError::Blocked);
        }
        self.opened
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.clone());
        Ok(())
    }

    fn navigate_current(&self, url: &Url) {
        self.navigated
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.clone());
    }
}
