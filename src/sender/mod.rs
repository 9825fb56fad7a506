//! Delivery of queued snapshots.
//!
//! The engine never transmits anything itself. A [`DrainTimer`] pops at most
//! one snapshot per tick and awaits the injected [`SnapshotSender`] before the
//! next tick can fire, so one producer never has two sends in flight.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use voxelamming_link::RoomClient;

use crate::core::types::Result;
use crate::snapshot::{Snapshot, SnapshotQueue};

/// Something that can transmit a snapshot to the room's renderer
pub trait SnapshotSender: Send + 'static {
    fn send(&mut self, snapshot: &Snapshot) -> impl Future<Output = Result<()>> + Send;
}

impl SnapshotSender for RoomClient {
    async fn send(&mut self, snapshot: &Snapshot) -> Result<()> {
        let payload = snapshot.to_json()?;
        self.deliver(snapshot.room(), &payload).await?;
        Ok(())
    }
}

/// Hands `(room, payload)` pairs to an in-process consumer
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<(String, String)>,
}

impl ChannelSender {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SnapshotSender for ChannelSender {
    async fn send(&mut self, snapshot: &Snapshot) -> Result<()> {
        let payload = snapshot.to_json()?;
        self.tx
            .send((snapshot.room().to_string(), payload))
            .map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "snapshot receiver dropped")
            })?;
        Ok(())
    }
}

/// Pop one snapshot and send it.
///
/// Returns `None` when the queue was empty. A failed send is logged and the
/// snapshot is dropped; retrying is the sender's business.
pub async fn drain_once<S: SnapshotSender>(
    queue: &SnapshotQueue,
    sender: &mut S,
) -> Option<Result<()>> {
    let snapshot = queue.drain()?;
    let result = sender.send(&snapshot).await;
    match &result {
        Ok(()) => log::debug!(
            "Delivered snapshot for room {} ({} boxes), {} still queued",
            snapshot.room(),
            snapshot.boxes().len(),
            queue.len()
        ),
        Err(e) => log::warn!("Failed to deliver snapshot for room {}: {}", snapshot.room(), e),
    }
    Some(result)
}

/// Background task draining a queue on a fixed period.
/// Keep this alive to keep the timer running.
pub struct DrainTimer {
    handle: tokio::task::JoinHandle<()>,
}

impl DrainTimer {
    /// Start draining `queue` into `sender` every `period`.
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: SnapshotSender>(queue: SnapshotQueue, mut sender: S, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A slow send pushes the schedule back instead of bursting afterwards
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            log::info!("Drain timer started, period {:?}", period);

            loop {
                ticker.tick().await;
                drain_once(&queue, &mut sender).await;
            }
        });

        Self { handle }
    }

    /// Stop the timer. Snapshots still queued stay in the queue.
    pub fn stop(self) {
        self.handle.abort();
    }
}
