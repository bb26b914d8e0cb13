use crate::{AIR, ChunkCoord, ChunkDims, VoxelId};

/// Dense voxel ids of one chunk in canonical index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelBuf {
    pub coord: ChunkCoord,
    pub dims: ChunkDims,
    pub voxels: Vec<VoxelId>,
}

impl VoxelBuf {
    pub fn filled(coord: ChunkCoord, dims: ChunkDims, id: VoxelId) -> Self {
        let len = dims.volume().unwrap_or(0);
        Self {
            coord,
            dims,
            voxels: vec![id; len],
        }
    }

    /// Wraps an existing id buffer, padding with air or truncating so the
    /// length always matches `dims`.
    pub fn from_voxels(coord: ChunkCoord, dims: ChunkDims, voxels: Vec<VoxelId>) -> Self {
        let mut v = voxels;
        let expect = dims.volume().unwrap_or(0);
        if v.len() != expect {
            v.resize(expect, AIR);
        }
        Self {
            coord,
            dims,
            voxels: v,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        self.dims.index(x, y, z)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> VoxelId {
        self.voxels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: VoxelId) {
        let i = self.idx(x, y, z);
        self.voxels[i] = id;
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (ox, oz) = self.dims.origin(self.coord);
        let (dx, dz) = (i64::from(wx) - i64::from(ox), i64::from(wz) - i64::from(oz));
        wy >= 0
            && wy < self.dims.sy as i32
            && (0..self.dims.sx as i64).contains(&dx)
            && (0..self.dims.sz as i64).contains(&dz)
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelId> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (ox, oz) = self.dims.origin(self.coord);
        Some(self.get_local((wx - ox) as usize, wy as usize, (wz - oz) as usize))
    }

    /// Fills every cell with `y` in `[y0, y1)` across the whole chunk.
    pub fn fill_layers(&mut self, y0: usize, y1: usize, id: VoxelId) {
        let y1 = y1.min(self.dims.sy);
        for z in 0..self.dims.sz {
            for y in y0..y1 {
                for x in 0..self.dims.sx {
                    self.set_local(x, y, z, id);
                }
            }
        }
    }
}
