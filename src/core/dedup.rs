use std::collections::HashSet;
use tokio::sync::Mutex;

/// Request ids that have already been through a notification round.
///
/// All access funnels through one mutex so no reader can observe a
/// half-inserted state. The set only grows: a request marked here is never
/// re-evaluated, even if no buddy was eligible when it was marked (the
/// request simply ages out of the unfulfilled snapshot externally).
#[derive(Debug, Default)]
pub struct NotifiedRequests {
    inner: Mutex<HashSet<i32>>,
}

impl NotifiedRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a request has been evaluated. Returns `false` if it was
    /// already marked.
    pub async fn mark(&self, request_id: i32) -> bool {
        self.inner.lock().await.insert(request_id)
    }

    pub async fn contains(&self, request_id: i32) -> bool {
        self.inner.lock().await.contains(&request_id)
    }

    /// Point-in-time copy of the set, used to compute the waiting list for
    /// one matcher tick. The matcher is the sole mutator, so the copy stays
    /// accurate for the duration of the tick.
    pub async fn snapshot(&self) -> HashSet<i32> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
