use std::sync::Arc;
use tokio::sync::RwLock;

/// Atomically replaceable handle on an immutable, point-in-time collection.
///
/// One refresher task owns the write side and swaps in whole collections;
/// any number of readers `load` the current snapshot. A reader always gets
/// a fully-formed `Arc<Vec<T>>`, never a partially-updated collection,
/// and keeps it alive for the duration of its tick even if the refresher
/// replaces the snapshot underneath it.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    inner: RwLock<Arc<Vec<T>>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            inner: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Get the current snapshot.
    pub async fn load(&self) -> Arc<Vec<T>> {
        Arc::clone(&*self.inner.read().await)
    }

    /// Replace the snapshot with a fresh collection.
    pub async fn replace(&self, next: Vec<T>) {
        *self.inner.write().await = Arc::new(next);
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_swaps_whole_collection() {
        tokio_test::block_on(async {
            let cell = SnapshotCell::new(vec![1, 2, 3]);
            assert_eq!(*cell.load().await, vec![1, 2, 3]);

            cell.replace(vec![4]).await;
            assert_eq!(*cell.load().await, vec![4]);
        });
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_replace() {
        tokio_test::block_on(async {
            let cell = SnapshotCell::new(vec!["a"]);
            let held = cell.load().await;

            cell.replace(vec!["b"]).await;

            // The reader's copy is unaffected by the swap.
            assert_eq!(*held, vec!["a"]);
            assert_eq!(*cell.load().await, vec!["b"]);
        });
    }
}
