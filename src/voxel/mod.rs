//! Voxel data: coordinate quantization, line rasterization, and the box scene

pub mod quantize;
pub mod raster;
pub mod scene;

pub use quantize::QuantizeMode;
pub use raster::{rasterize, LineVoxels};
pub use scene::{FrameBox, MAX_COORDINATE, Light, LightType, Scene, Sentence, Shape, VoxelBox};
