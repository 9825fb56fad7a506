//! Outbound snapshot queue
//!
//! A FIFO between the command stream, which enqueues a snapshot on every
//! send, and the drain timer, which hands at most one snapshot per tick to
//! the sender. Producers never block and nothing is coalesced.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::builder::Snapshot;

/// Shared handle to an unbounded snapshot FIFO. Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct SnapshotQueue {
    inner: Arc<Mutex<VecDeque<Snapshot>>>,
}

impl SnapshotQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Snapshot>> {
        // push/pop never leave the deque half-updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a snapshot; returns the number now pending
    pub fn enqueue(&self, snapshot: Snapshot) -> usize {
        let mut queue = self.lock();
        queue.push_back(snapshot);
        log::debug!("Snapshot queued, {} pending", queue.len());
        queue.len()
    }

    /// Take the oldest snapshot, if any
    pub fn drain(&self) -> Option<Snapshot> {
        self.lock().pop_front()
    }

    /// Number of pending snapshots
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Color, DVec3};
    use crate::voxel::Scene;
    use crate::voxel::scene::NO_TEXTURE;
    use time::OffsetDateTime;

    fn snapshot_with_boxes(n: usize) -> Snapshot {
        let mut scene = Scene::new();
        for i in 0..n {
            scene.place_box(DVec3::new(i as f64, 0.0, 0.0), Color::BLACK, NO_TEXTURE);
        }
        Snapshot::capture("1000", &scene, OffsetDateTime::UNIX_EPOCH).unwrap()
    }

    #[test]
    fn test_drain_empty_yields_nothing() {
        let queue = SnapshotQueue::new();
        assert!(queue.drain().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_order_one_per_drain() {
        let queue = SnapshotQueue::new();
        assert_eq!(queue.enqueue(snapshot_with_boxes(1)), 1);
        assert_eq!(queue.enqueue(snapshot_with_boxes(2)), 2);
        assert_eq!(queue.enqueue(snapshot_with_boxes(3)), 3);

        assert_eq!(queue.drain().unwrap().boxes().len(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain().unwrap().boxes().len(), 2);
        assert_eq!(queue.drain().unwrap().boxes().len(), 3);
        assert!(queue.drain().is_none());
    }

    #[test]
    fn test_clones_share_queue() {
        let producer = SnapshotQueue::new();
        let consumer = producer.clone();
        producer.enqueue(snapshot_with_boxes(4));
        assert_eq!(consumer.drain().unwrap().boxes().len(), 4);
        assert!(producer.is_empty());
    }

    #[test]
    fn test_producer_and_consumer_threads() {
        let queue = SnapshotQueue::new();
        let producer = queue.clone();
        let handle = std::thread::spawn(move || {
            for i in 1..=20 {
                producer.enqueue(snapshot_with_boxes(i));
            }
        });

        let mut seen = Vec::new();
        while seen.len() < 20 {
            if let Some(s) = queue.drain() {
                seen.push(s.boxes().len());
            } else {
                std::thread::yield_now();
            }
        }
        handle.join().unwrap();
        assert_eq!(seen, (1..=20).collect::<Vec<_>>());
    }
}
