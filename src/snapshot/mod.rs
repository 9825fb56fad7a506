//! Snapshots of the scene and the outbound queue that holds them until a
//! sender picks them up.

pub mod builder;
pub mod queue;

pub use builder::{build_snapshot, Snapshot};
pub use queue::SnapshotQueue;
