// Cycle stream - Timer-driven and manual panel cycles over a shared controller
use crate::application::panel_controller::PanelController;
use crate::domain::dashboard::PanelSnapshot;
use futures::stream::Stream;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;

/// One lock guards the whole cycle, so readers never observe an append
/// without its evaluation and statistics.
pub type SharedPanel = Arc<Mutex<PanelController>>;

const MIN_PERIOD: Duration = Duration::from_millis(1);

pub fn shared(panel: PanelController) -> SharedPanel {
    Arc::new(Mutex::new(panel))
}

/// Runs one cycle and snapshots the result under the same lock.
/// `None` when the cycle was skipped.
///
/// The cycle runs on the blocking pool since a live transport may sit in a
/// device read indefinitely. Dropping the returned future abandons the wait,
/// not the cycle: it still completes and releases the lock on its own.
pub async fn run_cycle(panel: &SharedPanel) -> Option<PanelSnapshot> {
    let mut guard = panel.clone().lock_owned().await;
    let cycle = tokio::task::spawn_blocking(move || {
        guard.process_cycle()?;
        Some(guard.snapshot())
    });

    match cycle.await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Panel cycle failed: {}", e);
            None
        }
    }
}

/// Auto-update: a cycle every `period`, yielding a snapshot per completed
/// cycle. Skipped cycles yield nothing. The first cycle runs after one period.
pub fn auto_update(panel: SharedPanel, period: Duration) -> impl Stream<Item = PanelSnapshot> + Send {
    let period = period.max(MIN_PERIOD);
    let mut timer = interval_at(Instant::now() + period, period);
    // Slow transports stretch the cadence instead of causing a burst
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(timer);

    tracing::debug!(period_ms = period.as_millis() as u64, "Auto-update started");

    async_stream::stream! {
        while ticks.next().await.is_some() {
            if let Some(snapshot) = run_cycle(&panel).await {
                yield snapshot;
            }
        }
    }
}
