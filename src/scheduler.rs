use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;
use crate::config::MIN_SWEEP_INTERVAL;
use crate::engine::Engine;
use crate::store::TenderStore;

/// Run the status sweep every `every`, starting immediately.
///
/// Ticks run one after another on a single task, so a slow sweep never overlaps the
/// next one; ticks missed while it ran are skipped. Periods shorter than
/// [`MIN_SWEEP_INTERVAL`] are raised to it.
pub fn spawn_status_sweeper<S, C>(engine: Arc<Engine<S, C>>, every: Duration) -> JoinHandle<()>
where
    S: TenderStore,
    C: Clock,
{
    if every < MIN_SWEEP_INTERVAL {
        tracing::warn!(?every, "status sweep interval too short, using {MIN_SWEEP_INTERVAL:?}");
    }
    let every = every.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let now = engine.clock().now();
            if let Err(e) = engine.run_status_sweep(now).await {
                tracing::error!("status sweep failed: {e}");
            }
        }
    })
}
