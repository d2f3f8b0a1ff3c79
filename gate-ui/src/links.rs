//! External link opening with popup-block fallback.

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors from attempting to open a new browsing context.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The host refused to open a new context (popup blocked).
    #[error("new browsing context blocked")]
    Blocked,
    /// Any other host-side failure.
    #[error("failed to open link: {0}")]
    Host(String),
}

/// Opens external links on behalf of the engine.
///
/// Link opening is fire-and-forget: the engine never waits on the outcome
/// of the navigation itself, only on whether a new context could be opened.
pub trait LinkOpener: Send + Sync {
    /// Request a new browsing context (tab/window) for `url`.
    fn open_new_context(&self, url: &Url) -> Result<(), LinkError>;

    /// Navigate the current context to `url`. Cannot fail from the
    /// engine's point of view.
    fn navigate_current(&self, url: &Url);
}

/// Open `url` in a new context, falling back to same-context navigation
/// when the new context is refused.
///
/// The flow proceeds optimistically either way; callers must not treat the
/// fallback as an error path.
pub fn open_with_fallback(opener: &dyn LinkOpener, url: &Url) {
    if let Err(e) = opener.open_new_context(url) {
        warn!(url = %url, error = %e, "new context refused, navigating current context");
        opener.navigate_current(url);
    }
}
