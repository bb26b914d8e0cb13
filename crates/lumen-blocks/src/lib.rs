//! Voxel type registry and the light-related properties read from it.
#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod props;
pub mod registry;

pub use color::Rgb;
pub use props::{OPAQUE_ABSORPTION, VoxelProperties, VoxelProps};
pub use registry::{BlockRegistry, BlockType};
