use lumen_world::{ChunkCoord, ChunkDims};

use crate::Channel;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LightingError {
    #[error("invalid light volume dimensions {sx}x{sy}x{sz}")]
    InvalidDimensions { sx: usize, sy: usize, sz: usize },
    #[error("local position ({x}, {y}, {z}) is outside the chunk")]
    OutOfBounds { x: usize, y: usize, z: usize },
    #[error("{channel:?} buffer has {actual} bytes, expected {expected}")]
    ChannelLength {
        channel: Channel,
        expected: usize,
        actual: usize,
    },
    #[error("chunk dims {actual:?} do not match {expected:?}")]
    DimsMismatch {
        expected: ChunkDims,
        actual: ChunkDims,
    },
    #[error("no voxel data for chunk {0}")]
    MissingVoxels(ChunkCoord),
}

impl LightingError {
    pub(crate) fn invalid_dims(dims: ChunkDims) -> Self {
        LightingError::InvalidDimensions {
            sx: dims.sx,
            sy: dims.sy,
            sz: dims.sz,
        }
    }
}
