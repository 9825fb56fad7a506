//! Voxelamming - turtle and box commands voxelized into snapshots for a
//! remote renderer

pub mod core;
pub mod voxel;
pub mod turtle;
pub mod snapshot;
pub mod session;
pub mod sender;
