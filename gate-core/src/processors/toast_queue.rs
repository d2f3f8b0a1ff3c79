//! ToastProcessor: strictly sequential toast presentation.
//!
//! Toast requests go through an unbounded FIFO channel into a single
//! consumer task. Being the only consumer is what enforces the display
//! invariant: at most one toast is ever visible, and bursts of `notify`
//! calls come out as non-overlapping display windows in submission order.

use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use gate_ui::{Severity, UiSurface};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

/// Timing of one toast display cycle.
#[derive(Debug, Clone, Copy)]
pub struct ToastTimings {
    /// Delay between rendering and the visible state, so the entrance
    /// transition can attach.
    pub entrance: Duration,
    /// How long the toast stays visible.
    pub display: Duration,
    /// Delay after hiding before the cycle counts as finished.
    pub exit: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            entrance: Duration::from_millis(50),
            display: Duration::from_millis(3450),
            exit: Duration::from_millis(300),
        }
    }
}

/// A queued toast display request.
#[derive(Debug)]
pub struct ToastRequest {
    pub message: CompactString,
    pub severity: Severity,
    done: oneshot::Sender<()>,
}

/// Resolves when the corresponding toast has fully finished its cycle.
#[derive(Debug)]
pub struct ToastTicket(oneshot::Receiver<()>);

impl ToastTicket {
    /// Wait for the display cycle to finish. Also resolves if the
    /// processor shuts down before presenting this toast.
    pub async fn finished(self) {
        let _ = self.0.await;
    }
}

/// Cloneable handle for enqueueing toasts.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<ToastRequest>,
}

impl Notifier {
    /// Create a notifier and the receiver end for a [`ToastProcessor`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ToastRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue a toast. Returns a ticket resolving when this specific
    /// toast finishes its display cycle.
    pub fn notify(&self, message: impl Into<CompactString>, severity: Severity) -> ToastTicket {
        let (done, ticket) = oneshot::channel();
        let request = ToastRequest {
            message: message.into(),
            severity,
            done,
        };
        if self.tx.send(request).is_err() {
            // Processor gone; the dropped `done` resolves the ticket.
            debug!("toast dropped, processor not running");
        }
        ToastTicket(ticket)
    }
}

/// Single consumer draining the toast queue.
pub struct ToastProcessor {
    rx: mpsc::UnboundedReceiver<ToastRequest>,
    surface: Arc<dyn UiSurface>,
    timings: ToastTimings,
}

impl ToastProcessor {
    pub fn new(rx: mpsc::UnboundedReceiver<ToastRequest>, surface: Arc<dyn UiSurface>) -> Self {
        Self::with_timings(rx, surface, ToastTimings::default())
    }

    pub fn with_timings(
        rx: mpsc::UnboundedReceiver<ToastRequest>,
        surface: Arc<dyn UiSurface>,
        timings: ToastTimings,
    ) -> Self {
        Self {
            rx,
            surface,
            timings,
        }
    }

    /// Run until shutdown is signaled or every notifier is dropped.
    ///
    /// Shutdown is observed between toasts; a toast already being
    /// presented finishes its cycle first.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("ToastProcessor started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("ToastProcessor received shutdown signal");
                        break;
                    }
                }

                next = self.rx.recv() => {
                    match next {
                        Some(request) => self.present(request).await,
                        None => {
                            info!("toast channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("ToastProcessor shutdown complete");
    }

    async fn present(&self, request: ToastRequest) {
        debug!(message = %request.message, severity = %request.severity, "presenting toast");

        self.surface.render_toast(&request.message, request.severity);
        tokio::time::sleep(self.timings.entrance).await;
        self.surface.set_toast_visible(true);
        tokio::time::sleep(self.timings.display).await;
        self.surface.set_toast_visible(false);
        tokio::time::sleep(self.timings.exit).await;

        let _ = request.done.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_ui::mock::{RecordingSurface, SurfaceCall};
    use tokio::sync::watch;

    fn spawn_processor(surface: Arc<RecordingSurface>) -> (Notifier, watch::Sender<bool>) {
        let (notifier, rx) = Notifier::channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let processor = ToastProcessor::new(rx, surface);
        tokio::spawn(processor.run(shutdown_rx));
        (notifier, shutdown_tx)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_three_presents_sequential_windows_in_order() {
        let surface = Arc::new(RecordingSurface::new());
        let (notifier, _shutdown) = spawn_processor(Arc::clone(&surface));

        let t1 = notifier.notify("first", Severity::Info);
        let t2 = notifier.notify("second", Severity::Success);
        let t3 = notifier.notify("third", Severity::Error);

        t1.finished().await;
        t2.finished().await;
        t3.finished().await;

        let calls = surface.calls();
        let expected = vec![
            SurfaceCall::RenderToast("first".into(), Severity::Info),
            SurfaceCall::ToastVisible(true),
            SurfaceCall::ToastVisible(false),
            SurfaceCall::RenderToast("second".into(), Severity::Success),
            SurfaceCall::ToastVisible(true),
            SurfaceCall::ToastVisible(false),
            SurfaceCall::RenderToast("third".into(), Severity::Error),
            SurfaceCall::ToastVisible(true),
            SurfaceCall::ToastVisible(false),
        ];
        assert_eq!(calls, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn ticket_resolves_only_after_full_cycle() {
        let surface = Arc::new(RecordingSurface::new());
        let (notifier, _shutdown) = spawn_processor(Arc::clone(&surface));

        let start = tokio::time::Instant::now();
        notifier.notify("hello", Severity::Info).finished().await;
        let timings = ToastTimings::default();

        assert!(start.elapsed() >= timings.entrance + timings.display + timings.exit);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_processor() {
        let surface = Arc::new(RecordingSurface::new());
        let (notifier, shutdown_tx) = spawn_processor(Arc::clone(&surface));

        notifier.notify("before", Severity::Info).finished().await;
        shutdown_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Toasts enqueued after shutdown are never presented; the ticket
        // still resolves because the request is dropped.
        notifier.notify("after", Severity::Info).finished().await;
        assert_eq!(
            surface.count_matching(|c| matches!(c, SurfaceCall::RenderToast(m, _) if m == "after")),
            0
        );
    }
}
