//! Startup wiring: builds the bus, the processors, and the channels they
//! talk over, then spawns the processor run loops.

use std::sync::Arc;
use std::time::Instant;

use gate_core::events::{
    EventBus, EventPayload, ScrollSampleSender, UiActionSender, VisibilitySender, scroll_sample_channel,
    topic, ui_action_channel, visibility_channel,
};
use gate_core::processors::{
    FlowController, FlowLinks, Notifier, ScrollWatcher, ToastProcessor,
};
use gate_ui::{LinkOpener, UiSurface};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::FileConfig;

/// Handles to everything the console loop and shutdown path need.
pub struct AppHandles {
    pub bus: Arc<EventBus>,
    pub notifier: Notifier,
    pub flow: FlowController,
    pub action_tx: UiActionSender,
    pub scroll_tx: ScrollSampleSender,
    pub visibility_tx: VisibilitySender,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl AppHandles {
    /// Signal shutdown and wait for every processor to finish.
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(true).is_err() {
            warn!("all shutdown receivers already dropped");
        }
        for (name, task) in self.tasks {
            if let Err(e) = task.await {
                error!(task = name, error = %e, "processor task failed");
            }
        }
    }
}

/// Wire up the full engine against the given surface and link opener.
///
/// Everything is constructed here and nowhere else; processors receive
/// their collaborators explicitly instead of reaching for globals.
pub fn wire(
    surface: Arc<dyn UiSurface>,
    opener: Arc<dyn LinkOpener>,
    config: &FileConfig,
) -> AppHandles {
    let started = Instant::now();
    install_panic_hook();

    let bus = Arc::new(EventBus::new());
    attach_analytics(&bus);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (action_tx, action_rx) = ui_action_channel();
    let (scroll_tx, scroll_rx) = scroll_sample_channel();
    let (visibility_tx, visibility_rx) = visibility_channel();

    let (notifier, toast_rx) = Notifier::channel();
    let toasts = ToastProcessor::new(toast_rx, Arc::clone(&surface));

    let flow = FlowController::with_timings(
        Arc::clone(&bus),
        notifier.clone(),
        Arc::clone(&surface),
        opener,
        FlowLinks {
            channel: config.links.channel.clone(),
            video: config.links.video.clone(),
        },
        config.timings.to_flow_timings(),
    );
    flow.set_unlocked_hook(|snapshot| {
        info!(completed_at_ms = ?snapshot.completed_at_ms, "content unlocked");
    });

    let watcher = ScrollWatcher::new(Arc::clone(&surface));

    let tasks: Vec<(&'static str, JoinHandle<()>)> = vec![
        ("toasts", tokio::spawn(toasts.run(shutdown_rx.clone()))),
        (
            "flow",
            tokio::spawn(flow.clone().run(action_rx, shutdown_rx.clone())),
        ),
        (
            "scroll",
            tokio::spawn(watcher.run(scroll_rx, visibility_rx, shutdown_rx)),
        ),
    ];

    flow.init();
    bus.publish(topic::APP_READY, &EventPayload::timestamp_only());
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "wiring complete");

    AppHandles {
        bus,
        notifier,
        flow,
        action_tx,
        scroll_tx,
        visibility_tx,
        shutdown_tx,
        tasks,
    }
}

/// Log engagement milestones as they happen.
fn attach_analytics(bus: &EventBus) {
    for t in [
        topic::SUBSCRIBE,
        topic::LIKE,
        topic::COMMENT,
        topic::VERIFY,
        topic::COMPLETE,
    ] {
        bus.subscribe(t, move |payload| {
            info!(topic = t, at_ms = payload.at_ms, "milestone");
            Ok(())
        });
    }
}

/// Route panics through tracing so they land in the same output as
/// everything else.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("panic: {info}");
        default_hook(info);
    }));
}
