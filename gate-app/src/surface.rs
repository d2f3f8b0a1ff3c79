//! Terminal implementations of the UI contract.
//!
//! The terminal has no real document, so "visuals" are printed lines.
//! Missing-element tolerance is trivial here: every element exists as a
//! line of output.

use std::io::Write;
use std::sync::Mutex;

use gate_ui::{
    ActionButton, CounterId, EngageItem, LinkError, LinkOpener, Severity, StatCounter, StepId,
    UiSurface,
};
use url::Url;

use crate::config::StatConfig;

/// A [`UiSurface`] that renders to stdout.
pub struct TerminalSurface {
    counters: Vec<StatCounter>,
    /// Message of the currently rendered toast, shown when it turns visible.
    pending_toast: Mutex<Option<(String, Severity)>>,
}

impl TerminalSurface {
    pub fn new(stats: &[StatConfig]) -> Self {
        Self {
            counters: stats
                .iter()
                .map(|s| StatCounter::new(s.id.as_str(), s.target))
                .collect(),
            pending_toast: Mutex::new(None),
        }
    }

    fn line(&self, text: &str) {
        println!("{text}");
    }

    /// Same-line update for animated values (progress bar, counters).
    fn inline(&self, text: &str) {
        print!("\r{text}");
        let _ = std::io::stdout().flush();
    }
}

impl UiSurface for TerminalSurface {
    fn show_step(&self, step: StepId) {
        self.line(&format!("=== {} is now active ===", step));
    }

    fn set_action_done(&self, action: ActionButton, done: bool) {
        let label = match (action, done) {
            (ActionButton::Subscribe, true) => "Subscribed ✓",
            (ActionButton::Subscribe, false) => "Subscribe Now",
            (ActionButton::Like, true) => "Liked ✓",
            (ActionButton::Like, false) => "Like Video",
            (ActionButton::Comment, true) => "Commented ✓",
            (ActionButton::Comment, false) => "Comment Video",
        };
        self.line(&format!("[button] {label}"));
    }

    fn set_engage_status(&self, item: EngageItem, done: bool) {
        let name = match item {
            EngageItem::Like => "like",
            EngageItem::Comment => "comment",
        };
        let status = if done { "completed" } else { "pending" };
        self.line(&format!("[progress] {name}: {status}"));
    }

    fn set_verify_progress(&self, percent: f64) {
        self.inline(&format!("[verify] {percent:>5.1}%"));
        if percent >= 100.0 {
            println!();
        }
    }

    fn render_toast(&self, message: &str, severity: Severity) {
        *self
            .pending_toast
            .lock()
            .unwrap_or_else(|p| p.into_inner()) = Some((message.to_owned(), severity));
    }

    fn set_toast_visible(&self, visible: bool) {
        if !visible {
            return;
        }
        if let Some((message, severity)) = self
            .pending_toast
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
        {
            self.line(&format!("[toast:{severity}] {message}"));
        }
    }

    fn set_navbar_elevated(&self, elevated: bool) {
        self.line(&format!(
            "[navbar] shadow {}",
            if elevated { "on" } else { "off" }
        ));
    }

    fn set_back_to_top_visible(&self, visible: bool) {
        self.line(&format!(
            "[back-to-top] {}",
            if visible { "shown" } else { "hidden" }
        ));
    }

    fn stat_counters(&self) -> Vec<StatCounter> {
        self.counters.clone()
    }

    fn set_stat_counter(&self, id: &CounterId, value: u64) {
        self.inline(&format!("[stats] {id}: {value}        "));
    }
}

/// A [`LinkOpener`] that logs instead of opening a browser.
pub struct ConsoleLinkOpener {
    simulate_popup_block: bool,
}

impl ConsoleLinkOpener {
    pub fn new(simulate_popup_block: bool) -> Self {
        Self {
            simulate_popup_block,
        }
    }
}

impl LinkOpener for ConsoleLinkOpener {
    fn open_new_context(&self, url: &Url) -> Result<(), LinkError> {
        if self.simulate_popup_block {
            return Err(LinkError::Blocked);
        }
        println!("[link] opening {url} in a new tab");
        Ok(())
    }

    fn navigate_current(&self, url: &Url) {
        println!("[link] navigating this tab to {url}");
    }
}
