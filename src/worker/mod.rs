// Background task exports
pub mod dispatch;
pub mod refresh;

pub use dispatch::dispatch_messages;
pub use refresh::{refresh_buddies, refresh_requests, run_buddy_refresh, run_request_refresh};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::core::{matcher, NotifiedRequests, SnapshotCell};
use crate::models::{AvailableBuddy, HelpRequest};
use crate::services::PushProvider;

/// State shared between the refresh loops and the matcher loop.
pub struct WorkerState {
    pub buddies: SnapshotCell<AvailableBuddy>,
    pub requests: SnapshotCell<HelpRequest>,
    pub notified: NotifiedRequests,
}

impl WorkerState {
    pub fn new(buddies: Vec<AvailableBuddy>, requests: Vec<HelpRequest>) -> Self {
        Self {
            buddies: SnapshotCell::new(buddies),
            requests: SnapshotCell::new(requests),
            notified: NotifiedRequests::new(),
        }
    }
}

impl Default for WorkerState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Run one matcher tick: evaluate the current snapshots, record every
/// evaluated request in the notified set, and hand the resulting messages
/// to the dispatcher. Returns the number of delivery tickets received.
///
/// The dispatch is awaited before returning, so a slow provider simply
/// delays the next tick; two ticks never run concurrently.
pub async fn run_match_tick<P>(state: &WorkerState, provider: &P) -> usize
where
    P: PushProvider + ?Sized,
{
    let requests = state.requests.load().await;
    let buddies = state.buddies.load().await;
    let notified = state.notified.snapshot().await;

    let report = matcher::evaluate(&requests, &buddies, &notified, |token| {
        provider.is_valid_token(token)
    });

    info!(
        "Analyzing requests. {} waiting to be pushed.",
        report.evaluated.len()
    );

    for request_id in &report.evaluated {
        state.notified.mark(*request_id).await;
    }

    dispatch_messages(provider, report.messages).await
}

/// The matcher loop. Ticks every `period`; each tick runs to completion
/// (including its dispatch) before the next one is scheduled, with overruns
/// delaying subsequent ticks rather than bursting.
pub async fn run_match_loop<P>(state: Arc<WorkerState>, provider: Arc<P>, period: Duration)
where
    P: PushProvider + ?Sized,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately; consume it so the loop waits a
    // full period before the first evaluation.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        run_match_tick(state.as_ref(), provider.as_ref()).await;
    }
}
