use std::collections::HashMap;

use crate::{AIR, ChunkCoord, ChunkDims, VoxelBuf, VoxelId, VoxelSource};

/// Voxel source backed by whole chunk buffers held in memory. Stands in for
/// the terrain collaborator in tools and tests.
#[derive(Clone, Debug)]
pub struct MemoryWorld {
    dims: ChunkDims,
    chunks: HashMap<ChunkCoord, VoxelBuf>,
}

impl MemoryWorld {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            chunks: HashMap::new(),
        }
    }

    /// Adds or replaces a chunk. Buffers whose dims differ from the world's
    /// are resized to fit.
    pub fn insert_chunk(&mut self, buf: VoxelBuf) -> Option<VoxelBuf> {
        let buf = if buf.dims == self.dims {
            buf
        } else {
            VoxelBuf::from_voxels(buf.coord, self.dims, buf.voxels)
        };
        self.chunks.insert(buf.coord, buf)
    }

    /// Sets one voxel and returns the chunk it landed in, or `None` when the
    /// chunk is not loaded or `wy` is out of range.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, id: VoxelId) -> Option<ChunkCoord> {
        let (coord, lx, ly, lz) = self.dims.to_local(wx, wy, wz)?;
        let buf = self.chunks.get_mut(&coord)?;
        buf.set_local(lx, ly, lz, id);
        Some(coord)
    }
}

impl VoxelSource for MemoryWorld {
    fn dims(&self) -> ChunkDims {
        self.dims
    }

    fn block_id(&self, wx: i32, wy: i32, wz: i32) -> VoxelId {
        let Some((coord, lx, ly, lz)) = self.dims.to_local(wx, wy, wz) else {
            return AIR;
        };
        self.chunks
            .get(&coord)
            .map(|buf| buf.get_local(lx, ly, lz))
            .unwrap_or(AIR)
    }

    fn snapshot_chunk(&self, coord: ChunkCoord) -> Option<VoxelBuf> {
        self.chunks.get(&coord).cloned()
    }
}
