use serde::{Deserialize, Serialize};

use crate::{ChunkCoord, Side};

/// Extent of one chunk in voxels.
///
/// Dense per-chunk buffers are laid out with `x` fastest, then `y`, then `z`:
/// `index = x + y*sx + z*sx*sy`. Each z-slab is therefore a contiguous run of
/// `sx*sy` cells. Buffers are handed across threads verbatim, so this order is
/// part of the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl ChunkDims {
    pub const REFERENCE: ChunkDims = ChunkDims::new(24, 256, 24);

    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    /// Number of cells, or `None` when a dimension is zero or the product
    /// overflows.
    pub fn volume(self) -> Option<usize> {
        if self.sx == 0 || self.sy == 0 || self.sz == 0 {
            return None;
        }
        self.sx.checked_mul(self.sy)?.checked_mul(self.sz)
    }

    #[inline]
    pub fn slab_len(self) -> usize {
        self.sx * self.sy
    }

    #[inline]
    pub fn index(self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.sx + z * self.sx * self.sy
    }

    /// Like `index`, but rejects coordinates outside the chunk.
    #[inline]
    pub fn checked_index(self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.sx && y < self.sy && z < self.sz {
            Some(self.index(x, y, z))
        } else {
            None
        }
    }

    /// World-space `(x, z)` of the chunk's local origin. World positions are
    /// `i32`; chunks whose origin lies past that range wrap around.
    #[inline]
    pub fn origin(self, coord: ChunkCoord) -> (i32, i32) {
        (
            coord.x.wrapping_mul(self.sx as i32),
            coord.z.wrapping_mul(self.sz as i32),
        )
    }

    #[inline]
    pub fn chunk_of(self, wx: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::new(wx.div_euclid(self.sx as i32), wz.div_euclid(self.sz as i32))
    }

    /// Splits a world position into its chunk and local cell. `None` when
    /// `wy` is outside the world's vertical extent.
    #[inline]
    pub fn to_local(self, wx: i32, wy: i32, wz: i32) -> Option<(ChunkCoord, usize, usize, usize)> {
        if wy < 0 || wy >= self.sy as i32 {
            return None;
        }
        let lx = wx.rem_euclid(self.sx as i32) as usize;
        let lz = wz.rem_euclid(self.sz as i32) as usize;
        Some((self.chunk_of(wx, wz), lx, wy as usize, lz))
    }

    /// Local `(x, z)` cells of the face on `side`, in z-then-x scan order.
    pub fn face_cells(self, side: Side) -> impl Iterator<Item = (usize, usize)> {
        let (sx, sz) = (self.sx, self.sz);
        let (fixed_x, fixed_z) = match side {
            Side::NegX => (Some(0), None),
            Side::PosX => (Some(sx - 1), None),
            Side::NegZ => (None, Some(0)),
            Side::PosZ => (None, Some(sz - 1)),
        };
        let len = if fixed_x.is_some() { sz } else { sx };
        (0..len).map(move |i| match (fixed_x, fixed_z) {
            (Some(x), _) => (x, i),
            (_, Some(z)) => (i, z),
            _ => (i, i),
        })
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::REFERENCE
    }
}
