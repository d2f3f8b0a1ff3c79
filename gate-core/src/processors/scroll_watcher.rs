//! ScrollWatcher: throttled scroll reactions and the one-shot counter
//! animation.
//!
//! The watcher is responsible for:
//! - Receiving `ScrollSample`s, throttled to one applied sample per
//!   interval, and toggling the navbar shadow / back-to-top affordance
//!   across their pixel thresholds
//! - Receiving `VisibilitySample`s and, the first time the hero-stats
//!   region is at least half visible, running the stat counter animation;
//!   the trigger then detaches and the animation never repeats

use std::sync::Arc;
use std::time::Duration;

use gate_ui::{StatCounter, UiSurface};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::events::channels::{ScrollSampleReceiver, VisibilityReceiver};
use crate::events::types::{ScrollSample, ViewRegion, VisibilitySample};
use crate::utils::throttle::Throttle;

/// Scroll offset past which the navbar gets its elevation shadow.
pub const NAVBAR_ELEVATION_PX: f64 = 10.0;
/// Scroll offset past which the back-to-top affordance appears.
pub const BACK_TO_TOP_PX: f64 = 300.0;
/// Minimum spacing between applied scroll samples.
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(100);
/// Visibility ratio that triggers the stat counter animation.
pub const STATS_VISIBLE_RATIO: f64 = 0.5;
/// Interval between counter animation steps.
pub const COUNTER_TICK: Duration = Duration::from_millis(20);
/// A counter covers its target in this many steps (rounded up).
pub const COUNTER_STEPS: u64 = 50;

/// Watches scroll position and region visibility on behalf of the host.
pub struct ScrollWatcher {
    surface: Arc<dyn UiSurface>,
    throttle: Throttle,
    navbar_elevated: bool,
    back_to_top_visible: bool,
    stats_animated: bool,
    counter_task: Option<JoinHandle<()>>,
}

impl ScrollWatcher {
    pub fn new(surface: Arc<dyn UiSurface>) -> Self {
        Self {
            surface,
            throttle: Throttle::new(SCROLL_THROTTLE),
            navbar_elevated: false,
            back_to_top_visible: false,
            stats_animated: false,
            counter_task: None,
        }
    }

    /// Run until shutdown is signaled or both input channels close.
    pub async fn run(
        mut self,
        mut scroll_rx: ScrollSampleReceiver,
        mut visibility_rx: VisibilityReceiver,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!("ScrollWatcher started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("ScrollWatcher received shutdown signal");
                        break;
                    }
                }

                Some(sample) = scroll_rx.recv() => {
                    self.on_scroll(sample);
                }

                Some(sample) = visibility_rx.recv() => {
                    self.on_visibility(sample);
                }

                else => {
                    info!("scroll input channels closed");
                    break;
                }
            }
        }

        if let Some(task) = self.counter_task.take() {
            task.abort();
        }
        info!("ScrollWatcher shutdown complete");
    }

    /// Apply one scroll sample, if it clears the throttle window.
    fn on_scroll(&mut self, sample: ScrollSample) {
        if !self.throttle.allow() {
            return;
        }

        let elevated = sample.y > NAVBAR_ELEVATION_PX;
        if elevated != self.navbar_elevated {
            self.navbar_elevated = elevated;
            self.surface.set_navbar_elevated(elevated);
        }

        let back_to_top = sample.y > BACK_TO_TOP_PX;
        if back_to_top != self.back_to_top_visible {
            self.back_to_top_visible = back_to_top;
            self.surface.set_back_to_top_visible(back_to_top);
        }
    }

    /// React to a visibility sample; the stats trigger is one-shot.
    fn on_visibility(&mut self, sample: VisibilitySample) {
        match sample.region {
            ViewRegion::HeroStats => {
                if self.stats_animated || sample.ratio < STATS_VISIBLE_RATIO {
                    return;
                }
                self.stats_animated = true;
                debug!(ratio = sample.ratio, "hero stats visible, starting counters");

                let surface = Arc::clone(&self.surface);
                self.counter_task = Some(tokio::spawn(animate_counters(surface)));
            }
        }
    }
}

/// Count every stat element up from zero to its declared target.
///
/// Each counter advances by `ceil(target / COUNTER_STEPS)` per tick and
/// clamps exactly to its target, so the displayed value never overshoots.
async fn animate_counters(surface: Arc<dyn UiSurface>) {
    let counters: Vec<StatCounter> = surface.stat_counters();
    let mut rows: Vec<(StatCounter, u64)> = counters.into_iter().map(|c| (c, 0)).collect();

    // Counters with a zero target are already done.
    for (counter, current) in &rows {
        if counter.target == 0 {
            surface.set_stat_counter(&counter.id, *current);
        }
    }

    while rows.iter().any(|(c, current)| *current < c.target) {
        tokio::time::sleep(COUNTER_TICK).await;
        for (counter, current) in &mut rows {
            if *current >= counter.target {
                continue;
            }
            let increment = counter.target.div_ceil(COUNTER_STEPS);
            *current = (*current + increment).min(counter.target);
            surface.set_stat_counter(&counter.id, *current);
        }
    }
}
