//! FlowController: the unlock-gate state machine.
//!
//! The controller is responsible for:
//! - Receiving `UiAction`s and applying the step/completion transitions
//! - Opening the external engagement links (with popup-block fallback)
//! - Driving the simulated verification progress animation
//! - Publishing domain events and `state:changed` snapshots on the bus
//! - Requesting toasts through the [`Notifier`]
//!
//! Actions are serialized by the run loop, so transition delays simply
//! suspend the loop; only the verification animation runs as a separate
//! task, and its handle is held so `reset` can cancel it explicitly.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use gate_ui::{ActionButton, EngageItem, LinkOpener, Severity, UiSurface, open_with_fallback};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

use super::toast_queue::Notifier;
use crate::entities::{Completion, FlowSnapshot, FlowStep};
use crate::events::channels::UiActionReceiver;
use crate::events::types::{EventPayload, UiAction, topic};
use crate::events::bus::EventBus;
use crate::utils::clock::unix_ms;

const TOAST_SUBSCRIBED: &str = "Thanks for subscribing to the channel!";
const TOAST_LIKED: &str = "Thanks for liking the video!";
const TOAST_COMMENTED: &str = "Thanks for commenting!";
const TOAST_VERIFYING: &str = "Verifying your engagement...";
const TOAST_VERIFIED: &str = "Verification complete!";
const TOAST_RESET: &str = "Flow has been reset";

/// Timing constants of the flow, injectable for tests.
#[derive(Debug, Clone, Copy)]
pub struct FlowTimings {
    /// Delay between subscribe completing and the engage step revealing.
    pub reveal_engage: Duration,
    /// Delay between the joint engage condition and the verifying step.
    pub engage_to_verify: Duration,
    /// Interval between verification progress increments.
    pub verify_tick: Duration,
    /// Hold after progress reaches 100 before unlocking.
    pub verify_hold: Duration,
    /// Upper bound (exclusive) of one random progress increment.
    pub max_increment: f64,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            reveal_engage: Duration::from_millis(1200),
            engage_to_verify: Duration::from_millis(800),
            verify_tick: Duration::from_millis(500),
            verify_hold: Duration::from_millis(800),
            max_increment: 25.0,
        }
    }
}

/// The two configured external link targets.
#[derive(Debug, Clone)]
pub struct FlowLinks {
    /// Channel subscribe link, opened by the subscribe action.
    pub channel: Url,
    /// Video link, opened by the like and comment actions.
    pub video: Url,
}

/// Hook invoked when the flow enters the unlocked step.
type UnlockedHook = Box<dyn Fn(&FlowSnapshot) + Send + Sync>;

/// Live state. Only the controller touches this; everyone else gets
/// [`FlowSnapshot`] copies.
#[derive(Debug, Default)]
struct FlowState {
    step: FlowStep,
    completed: Completion,
    started_at_ms: Option<i64>,
    completed_at_ms: Option<i64>,
    /// Latch so the engage joint condition fires its transition once.
    engage_advanced: bool,
}

struct FlowShared {
    state: Mutex<FlowState>,
    verify_task: Mutex<Option<JoinHandle<()>>>,
    unlocked_hook: Mutex<Option<UnlockedHook>>,
    bus: Arc<EventBus>,
    notifier: Notifier,
    surface: Arc<dyn UiSurface>,
    opener: Arc<dyn LinkOpener>,
    links: FlowLinks,
    timings: FlowTimings,
}

/// The unlock-gate state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FlowController {
    shared: Arc<FlowShared>,
}

impl FlowController {
    pub fn new(
        bus: Arc<EventBus>,
        notifier: Notifier,
        surface: Arc<dyn UiSurface>,
        opener: Arc<dyn LinkOpener>,
        links: FlowLinks,
    ) -> Self {
        Self::with_timings(bus, notifier, surface, opener, links, FlowTimings::default())
    }

    pub fn with_timings(
        bus: Arc<EventBus>,
        notifier: Notifier,
        surface: Arc<dyn UiSurface>,
        opener: Arc<dyn LinkOpener>,
        links: FlowLinks,
        timings: FlowTimings,
    ) -> Self {
        Self {
            shared: Arc::new(FlowShared {
                state: Mutex::new(FlowState::default()),
                verify_task: Mutex::new(None),
                unlocked_hook: Mutex::new(None),
                bus,
                notifier,
                surface,
                opener,
                links,
                timings,
            }),
        }
    }

    /// Stamp the start time and present the first step.
    pub fn init(&self) {
        {
            let mut state = self.lock_state();
            state.started_at_ms = Some(unix_ms());
        }
        self.shared.surface.show_step(FlowStep::Subscribe.into());
        self.publish_state();
        info!("flow initialized");
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> FlowSnapshot {
        let state = self.lock_state();
        FlowSnapshot {
            step: state.step,
            completed: state.completed,
            started_at_ms: state.started_at_ms,
            completed_at_ms: state.completed_at_ms,
        }
    }

    /// Install the hook run when the flow unlocks (e.g. revealing the
    /// actual download link). Replaces any previous hook.
    pub fn set_unlocked_hook(&self, hook: impl Fn(&FlowSnapshot) + Send + Sync + 'static) {
        *lock_ignore_poison(&self.shared.unlocked_hook) = Some(Box::new(hook));
    }

    /// Run the controller, dispatching actions until shutdown.
    pub async fn run(self, mut action_rx: UiActionReceiver, mut shutdown_rx: watch::Receiver<bool>) {
        info!("FlowController started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("FlowController received shutdown signal");
                        break;
                    }
                }

                action = action_rx.recv() => {
                    match action {
                        Some(UiAction::Subscribe) => self.on_subscribe().await,
                        Some(UiAction::Like) => self.on_like().await,
                        Some(UiAction::Comment) => self.on_comment().await,
                        Some(UiAction::Reset) => self.reset(),
                        None => {
                            info!("action channel closed");
                            break;
                        }
                    }
                }
            }
        }

        self.cancel_verification();
        info!("FlowController shutdown complete");
    }

    /// Handle the subscribe action: open the channel link, complete the
    /// flag, then reveal the engage step after a short delay.
    pub async fn on_subscribe(&self) {
        if self.lock_state().completed.subscribe {
            debug!("subscribe already completed");
            return;
        }

        debug!("handling subscribe action");
        open_with_fallback(self.shared.opener.as_ref(), &self.shared.links.channel);

        self.lock_state().completed.subscribe = true;
        self.shared
            .surface
            .set_action_done(ActionButton::Subscribe, true);
        self.shared
            .notifier
            .notify(TOAST_SUBSCRIBED, Severity::Success);
        self.shared
            .bus
            .publish(topic::SUBSCRIBE, &EventPayload::timestamp_only());
        self.publish_state();

        tokio::time::sleep(self.shared.timings.reveal_engage).await;
        self.enter_step(FlowStep::Engage);
    }

    /// Handle the like action.
    pub async fn on_like(&self) {
        self.engage(EngageItem::Like).await;
    }

    /// Handle the comment action.
    pub async fn on_comment(&self) {
        self.engage(EngageItem::Comment).await;
    }

    /// Return to the initial state from anywhere, cancelling any in-flight
    /// verification animation.
    pub fn reset(&self) {
        self.cancel_verification();

        {
            let mut state = self.lock_state();
            *state = FlowState {
                started_at_ms: Some(unix_ms()),
                ..FlowState::default()
            };
        }

        let surface = &self.shared.surface;
        surface.set_action_done(ActionButton::Subscribe, false);
        surface.set_action_done(ActionButton::Like, false);
        surface.set_action_done(ActionButton::Comment, false);
        surface.set_engage_status(EngageItem::Like, false);
        surface.set_engage_status(EngageItem::Comment, false);
        surface.set_verify_progress(0.0);
        surface.show_step(FlowStep::Subscribe.into());

        self.shared
            .notifier
            .notify(TOAST_RESET, Severity::Info);
        self.publish_state();
        info!("flow reset");
    }

    // -- Private helpers ----------------------------------------------------

    /// Shared body of the like and comment actions, which are symmetric
    /// up to their flag, affordances, and event topic.
    async fn engage(&self, item: EngageItem) {
        let (button, toast, event_topic) = match item {
            EngageItem::Like => (ActionButton::Like, TOAST_LIKED, topic::LIKE),
            EngageItem::Comment => (ActionButton::Comment, TOAST_COMMENTED, topic::COMMENT),
        };

        {
            let state = self.lock_state();
            let already = match item {
                EngageItem::Like => state.completed.like,
                EngageItem::Comment => state.completed.comment,
            };
            if already {
                debug!(item = ?item, "engage action already completed");
                return;
            }
        }

        debug!(item = ?item, "handling engage action");
        open_with_fallback(self.shared.opener.as_ref(), &self.shared.links.video);

        {
            let mut state = self.lock_state();
            match item {
                EngageItem::Like => state.completed.like = true,
                EngageItem::Comment => state.completed.comment = true,
            }
        }
        self.shared.surface.set_action_done(button, true);
        self.shared.surface.set_engage_status(item, true);
        self.shared.notifier.notify(toast, Severity::Success);
        self.shared
            .bus
            .publish(event_topic, &EventPayload::timestamp_only());
        self.publish_state();

        self.check_engage_complete().await;
    }

    /// Fire the engage-to-verify transition exactly once, when both the
    /// like and comment flags are set.
    async fn check_engage_complete(&self) {
        let fire = {
            let mut state = self.lock_state();
            if state.completed.engaged() && !state.engage_advanced {
                state.engage_advanced = true;
                true
            } else {
                false
            }
        };
        if !fire {
            return;
        }

        tokio::time::sleep(self.shared.timings.engage_to_verify).await;
        self.shared
            .notifier
            .notify(TOAST_VERIFYING, Severity::Info);
        self.enter_step(FlowStep::Verifying);
    }

    /// Move to `step` and run its entry action.
    fn enter_step(&self, step: FlowStep) {
        self.lock_state().step = step;
        self.shared.surface.show_step(step.into());
        self.publish_state();
        info!(step = step.index(), "entered step");

        match step {
            FlowStep::Verifying => self.start_verification(),
            FlowStep::Unlocked => self.run_unlocked_hook(),
            FlowStep::Subscribe | FlowStep::Engage => {}
        }
    }

    /// Spawn the simulated verification animation and retain its handle
    /// so a reset can cancel a stale tick before it mutates anything.
    fn start_verification(&self) {
        let ctrl = self.clone();
        let timings = self.shared.timings;

        let handle = tokio::spawn(async move {
            let mut progress: f64 = 0.0;
            while progress < 100.0 {
                tokio::time::sleep(timings.verify_tick).await;
                let increment = rand::random_range(0.0..timings.max_increment);
                progress = (progress + increment).min(100.0);
                ctrl.shared.surface.set_verify_progress(progress);
            }

            tokio::time::sleep(timings.verify_hold).await;
            ctrl.finish_verification();
        });

        if let Some(previous) = lock_ignore_poison(&self.shared.verify_task).replace(handle) {
            previous.abort();
        }
    }

    fn finish_verification(&self) {
        self.shared
            .notifier
            .notify(TOAST_VERIFIED, Severity::Success);
        self.shared
            .bus
            .publish(topic::VERIFY, &EventPayload::timestamp_only());
        self.lock_state().completed_at_ms = Some(unix_ms());
        self.enter_step(FlowStep::Unlocked);

        let snapshot = self.snapshot();
        self.shared
            .bus
            .publish(topic::COMPLETE, &EventPayload::with_data(snapshot_json(&snapshot)));
    }

    fn run_unlocked_hook(&self) {
        let snapshot = self.snapshot();
        if let Some(hook) = lock_ignore_poison(&self.shared.unlocked_hook).as_ref() {
            hook(&snapshot);
        }
    }

    fn cancel_verification(&self) {
        if let Some(handle) = lock_ignore_poison(&self.shared.verify_task).take() {
            handle.abort();
            debug!("cancelled in-flight verification");
        }
    }

    fn publish_state(&self) {
        let snapshot = self.snapshot();
        self.shared
            .bus
            .publish(topic::STATE_CHANGED, &EventPayload::with_data(snapshot_json(&snapshot)));
    }

    fn lock_state(&self) -> MutexGuard<'_, FlowState> {
        lock_ignore_poison(&self.shared.state)
    }
}

fn snapshot_json(snapshot: &FlowSnapshot) -> serde_json::Value {
    match serde_json::to_value(snapshot) {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "failed to encode flow snapshot");
            serde_json::Value::Null
        }
    }
}

fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::toast_queue::ToastRequest;
    use gate_ui::StepId;
    use gate_ui::mock::{RecordingLinkOpener, RecordingSurface, SurfaceCall};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct Fixture {
        ctrl: FlowController,
        bus: Arc<EventBus>,
        surface: Arc<RecordingSurface>,
        opener: Arc<RecordingLinkOpener>,
        toasts: mpsc::UnboundedReceiver<ToastRequest>,
    }

    fn links() -> FlowLinks {
        FlowLinks {
            channel: Url::parse("https://example.com/channel").unwrap(),
            video: Url::parse("https://example.com/video").unwrap(),
        }
    }

    fn fixture_with_opener(opener: RecordingLinkOpener) -> Fixture {
        let bus = Arc::new(EventBus::new());
        let surface = Arc::new(RecordingSurface::new());
        let opener = Arc::new(opener);
        let (notifier, toasts) = Notifier::channel();
        let ctrl = FlowController::new(
            Arc::clone(&bus),
            notifier,
            Arc::clone(&surface) as Arc<dyn UiSurface>,
            Arc::clone(&opener) as Arc<dyn LinkOpener>,
            links(),
        );
        ctrl.init();
        Fixture {
            ctrl,
            bus,
            surface,
            opener,
            toasts,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_opener(RecordingLinkOpener::new())
    }

    fn drain_toasts(rx: &mut mpsc::UnboundedReceiver<ToastRequest>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(req) = rx.try_recv() {
            out.push(req.message.to_string());
        }
        out
    }

    /// Wait until `flag` is set, bounded so a broken flow fails the test
    /// instead of hanging.
    async fn wait_for(flag: &AtomicBool) {
        for _ in 0..10_000 {
            if flag.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("condition not reached in time");
    }

    fn count_step3_reveals(surface: &RecordingSurface) -> usize {
        surface.count_matching(|c| matches!(c, SurfaceCall::ShowStep(StepId::Step3)))
    }

    #[tokio::test(start_paused = true)]
    async fn like_then_comment_enters_verification_once() {
        let f = fixture();
        f.ctrl.on_subscribe().await;

        f.ctrl.on_like().await;
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Engage);
        f.ctrl.on_comment().await;

        assert!(f.ctrl.snapshot().step >= FlowStep::Verifying);
        assert_eq!(count_step3_reveals(&f.surface), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn comment_then_like_enters_verification_once() {
        let f = fixture();
        f.ctrl.on_subscribe().await;

        f.ctrl.on_comment().await;
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Engage);
        f.ctrl.on_like().await;

        assert!(f.ctrl.snapshot().step >= FlowStep::Verifying);
        assert_eq!(count_step3_reveals(&f.surface), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_engage_actions_cannot_refire_the_transition() {
        let f = fixture();
        f.ctrl.on_subscribe().await;
        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;
        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;

        assert_eq!(count_step3_reveals(&f.surface), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn like_twice_is_observably_like_once() {
        let mut f = fixture();
        f.ctrl.on_subscribe().await;
        drain_toasts(&mut f.toasts);

        let like_events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&like_events);
        f.bus.subscribe(topic::LIKE, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        f.ctrl.on_like().await;
        f.ctrl.on_like().await;

        assert_eq!(like_events.load(Ordering::SeqCst), 1);
        assert_eq!(drain_toasts(&mut f.toasts), vec![TOAST_LIKED.to_string()]);
        // One channel open from subscribe, one video open from like.
        assert_eq!(f.opener.opened().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_twice_is_observably_subscribe_once() {
        let mut f = fixture();

        let subs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&subs);
        f.bus.subscribe(topic::SUBSCRIBE, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        f.ctrl.on_subscribe().await;
        f.ctrl.on_subscribe().await;

        assert_eq!(subs.load(Ordering::SeqCst), 1);
        assert_eq!(f.opener.opened().len(), 1);
        assert_eq!(
            drain_toasts(&mut f.toasts),
            vec![TOAST_SUBSCRIBED.to_string()]
        );
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Engage);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_popup_falls_back_and_flow_proceeds() {
        let f = fixture_with_opener(RecordingLinkOpener::blocked());

        f.ctrl.on_subscribe().await;

        assert!(f.opener.opened().is_empty());
        assert_eq!(f.opener.navigated(), vec![links().channel]);
        let snap = f.ctrl.snapshot();
        assert!(snap.completed.subscribe);
        assert_eq!(snap.step, FlowStep::Engage);
    }

    #[tokio::test(start_paused = true)]
    async fn verification_progress_never_overshoots_and_ends_at_100() {
        let f = fixture();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        f.bus.subscribe_once(topic::COMPLETE, move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        f.ctrl.on_subscribe().await;
        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;
        wait_for(&done).await;

        let progress: Vec<f64> = f
            .surface
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::VerifyProgress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert!(!progress.is_empty());
        assert!(progress.iter().all(|p| *p <= 100.0));
        assert_eq!(*progress.last().unwrap(), 100.0);
        // Monotonic: the bar only fills.
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn full_flow_reaches_unlocked_with_completion_stamp() {
        let f = fixture();

        let snap = f.ctrl.snapshot();
        assert_eq!(snap.step, FlowStep::Subscribe);
        assert_eq!(snap.completed, Completion::default());

        let done = Arc::new(AtomicBool::new(false));
        let complete_payload = Arc::new(Mutex::new(None));
        let flag = Arc::clone(&done);
        let slot = Arc::clone(&complete_payload);
        f.bus.subscribe_once(topic::COMPLETE, move |payload| {
            *slot.lock().unwrap() = Some(payload.clone());
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let hook_ran = Arc::new(AtomicBool::new(false));
        let hook_flag = Arc::clone(&hook_ran);
        f.ctrl.set_unlocked_hook(move |snapshot| {
            assert_eq!(snapshot.step, FlowStep::Unlocked);
            hook_flag.store(true, Ordering::SeqCst);
        });

        f.ctrl.on_subscribe().await;
        assert!(f.ctrl.snapshot().completed.subscribe);
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Engage);

        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;
        wait_for(&done).await;

        let snap = f.ctrl.snapshot();
        assert_eq!(snap.step, FlowStep::Unlocked);
        assert!(snap.completed.subscribe && snap.completed.like && snap.completed.comment);
        assert!(snap.completed_at_ms.unwrap() >= snap.started_at_ms.unwrap());
        assert!(hook_ran.load(Ordering::SeqCst));

        // The COMPLETE payload carries the full final snapshot.
        let payload = complete_payload.lock().unwrap().take().unwrap();
        let carried: FlowSnapshot = serde_json::from_value(payload.data).unwrap();
        assert_eq!(carried, snap);
        assert!(payload.at_ms > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_verification_cancels_the_timer() {
        let f = fixture();
        f.ctrl.on_subscribe().await;
        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Verifying);

        f.ctrl.reset();
        let progress_calls = f
            .surface
            .count_matching(|c| matches!(c, SurfaceCall::VerifyProgress(_)));

        // Give a stale tick every chance to fire... it must not.
        tokio::time::sleep(Duration::from_secs(60)).await;
        let after = f
            .surface
            .count_matching(|c| matches!(c, SurfaceCall::VerifyProgress(_)));
        assert_eq!(progress_calls, after);
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Subscribe);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_from_unlocked_matches_a_fresh_flow() {
        let mut f = fixture();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        f.bus.subscribe_once(topic::COMPLETE, move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        f.ctrl.on_subscribe().await;
        f.ctrl.on_like().await;
        f.ctrl.on_comment().await;
        wait_for(&done).await;
        drain_toasts(&mut f.toasts);

        f.ctrl.reset();

        let snap = f.ctrl.snapshot();
        assert_eq!(snap.step, FlowStep::Subscribe);
        assert_eq!(snap.completed, Completion::default());
        assert_eq!(snap.completed_at_ms, None);
        assert!(snap.started_at_ms.is_some());
        assert_eq!(drain_toasts(&mut f.toasts), vec![TOAST_RESET.to_string()]);

        // Affordances are back to their initial state.
        assert_eq!(
            f.surface
                .calls()
                .last(),
            Some(&SurfaceCall::ShowStep(StepId::Step1))
        );

        // The flow can be completed again after the reset.
        f.ctrl.on_subscribe().await;
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Engage);
    }

    #[tokio::test(start_paused = true)]
    async fn state_changed_fires_on_every_mutation() {
        let f = fixture();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        f.bus.subscribe(topic::STATE_CHANGED, move |payload| {
            assert!(payload.data.is_object());
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        // Flag set + step transition each publish one change.
        f.ctrl.on_subscribe().await;
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_dispatches_actions_and_honors_shutdown() {
        let f = fixture();
        let (action_tx, action_rx) = crate::events::ui_action_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let ctrl = f.ctrl.clone();
        let task = tokio::spawn(ctrl.run(action_rx, shutdown_rx));

        action_tx.send(UiAction::Subscribe).await.unwrap();
        action_tx.send(UiAction::Like).await.unwrap();
        action_tx.send(UiAction::Comment).await.unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        f.bus.subscribe_once(topic::COMPLETE, move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        wait_for(&done).await;
        assert_eq!(f.ctrl.snapshot().step, FlowStep::Unlocked);

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
