//! Chunk coordinates, voxel buffers, and the world-facing voxel source.
#![forbid(unsafe_code)]

mod chunk_coord;
mod dims;
mod memory;
mod voxel_buf;

pub use chunk_coord::{ChunkCoord, ParseChunkCoordError, Side};
pub use dims::ChunkDims;
pub use memory::MemoryWorld;
pub use voxel_buf::VoxelBuf;

/// Registry key of a voxel type. `AIR` is always id 0.
pub type VoxelId = u16;

pub const AIR: VoxelId = 0;

/// Read access to the voxels of the world, scoped to whatever chunks the
/// caller currently has loaded.
pub trait VoxelSource {
    fn dims(&self) -> ChunkDims;

    /// Voxel at a world position. Positions the source knows nothing about
    /// read as air.
    fn block_id(&self, wx: i32, wy: i32, wz: i32) -> VoxelId;

    /// Copy of one chunk's voxels. The default samples `block_id` for every
    /// cell; sources that store whole chunks should override it.
    fn snapshot_chunk(&self, coord: ChunkCoord) -> Option<VoxelBuf> {
        let dims = self.dims();
        let (ox, oz) = dims.origin(coord);
        let mut buf = VoxelBuf::filled(coord, dims, AIR);
        for z in 0..dims.sz {
            for y in 0..dims.sy {
                for x in 0..dims.sx {
                    let (wx, wz) = (ox.wrapping_add(x as i32), oz.wrapping_add(z as i32));
                    let id = self.block_id(wx, y as i32, wz);
                    buf.set_local(x, y, z, id);
                }
            }
        }
        Some(buf)
    }
}

#[cfg(test)]
mod tests;
