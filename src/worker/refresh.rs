use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error};

use crate::services::RequestStore;
use crate::worker::WorkerState;

/// Fetch the buddy list once and swap it into the snapshot. On failure the
/// previous snapshot is retained and the error is logged.
pub async fn refresh_buddies<S>(store: &S, state: &WorkerState)
where
    S: RequestStore + ?Sized,
{
    match store.buddies_with_push_tokens().await {
        Ok(buddies) => {
            debug!("Refreshing buddy list. {} available.", buddies.len());
            state.buddies.replace(buddies).await;
        }
        Err(e) => error!("Buddy refresh failed, keeping previous snapshot: {}", e),
    }
}

/// Fetch the unfulfilled request list once and swap it into the snapshot.
pub async fn refresh_requests<S>(store: &S, state: &WorkerState)
where
    S: RequestStore + ?Sized,
{
    match store.unfulfilled_requests().await {
        Ok(requests) => {
            debug!("Refreshing unfulfilled requests list. {} open.", requests.len());
            state.requests.replace(requests).await;
        }
        Err(e) => error!("Request refresh failed, keeping previous snapshot: {}", e),
    }
}

/// Periodic buddy refresh. Each fetch runs to completion before the next
/// tick is awaited; an overrun delays subsequent ticks instead of stacking
/// concurrent fetches.
pub async fn run_buddy_refresh<S>(store: Arc<S>, state: Arc<WorkerState>, period: Duration)
where
    S: RequestStore + ?Sized,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The initial snapshot was fetched at startup; skip the immediate tick.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        refresh_buddies(store.as_ref(), state.as_ref()).await;
    }
}

/// Periodic unfulfilled-request refresh, independent of the buddy refresh.
pub async fn run_request_refresh<S>(store: Arc<S>, state: Arc<WorkerState>, period: Duration)
where
    S: RequestStore + ?Sized,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    ticker.tick().await;

    loop {
        ticker.tick().await;
        refresh_requests(store.as_ref(), state.as_ref()).await;
    }
}
