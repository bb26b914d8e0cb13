use lumen_world::{ChunkCoord, ChunkDims, Side, VoxelBuf, VoxelId, VoxelSource};

/// Voxels of one chunk plus whichever of its four orthogonal neighbors are
/// available. Propagation only reads voxels through this view, so light never
/// enters a chunk that is not part of it.
#[derive(Clone, Debug)]
pub struct VoxelNeighborhood {
    center: VoxelBuf,
    neighbors: [Option<VoxelBuf>; 4],
}

impl VoxelNeighborhood {
    pub fn new(center: VoxelBuf) -> Self {
        Self {
            center,
            neighbors: [None, None, None, None],
        }
    }

    /// Snapshots the chunk from `source`, plus each orthogonal neighbor that
    /// `include` accepts.
    pub fn from_source<S, F>(source: &S, coord: ChunkCoord, include: F) -> Option<Self>
    where
        S: VoxelSource + ?Sized,
        F: Fn(ChunkCoord) -> bool,
    {
        let mut hood = Self::new(source.snapshot_chunk(coord)?);
        for (_, n) in coord.neighbors() {
            if !include(n) {
                continue;
            }
            if let Some(buf) = source.snapshot_chunk(n) {
                hood.insert_neighbor(buf);
            }
        }
        Some(hood)
    }

    /// Adds a neighbor buffer. Returns false (and drops it) when the buffer is
    /// not orthogonally adjacent or its dims differ from the center's.
    pub fn insert_neighbor(&mut self, buf: VoxelBuf) -> bool {
        if buf.dims != self.center.dims {
            return false;
        }
        let Some(side) = side_between(self.center.coord, buf.coord) else {
            return false;
        };
        self.neighbors[side.index()] = Some(buf);
        true
    }

    pub fn with_neighbor(mut self, buf: VoxelBuf) -> Self {
        self.insert_neighbor(buf);
        self
    }

    #[inline]
    pub fn center(&self) -> &VoxelBuf {
        &self.center
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.center.coord
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.center.dims
    }

    pub fn neighbor(&self, side: Side) -> Option<&VoxelBuf> {
        self.neighbors[side.index()].as_ref()
    }

    /// The buffer for `coord` if it is the center or a present neighbor.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&VoxelBuf> {
        if coord == self.center.coord {
            return Some(&self.center);
        }
        side_between(self.center.coord, coord).and_then(|side| self.neighbor(side))
    }

    /// Voxel at a world position, `None` outside the covered chunks or the
    /// world's height.
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelId> {
        let (coord, lx, ly, lz) = self.dims().to_local(wx, wy, wz)?;
        self.chunk(coord).map(|buf| buf.get_local(lx, ly, lz))
    }

    pub fn into_parts(self) -> (VoxelBuf, Vec<VoxelBuf>) {
        (self.center, self.neighbors.into_iter().flatten().collect())
    }
}

fn side_between(from: ChunkCoord, to: ChunkCoord) -> Option<Side> {
    Side::ALL.into_iter().find(|side| from.neighbor(*side) == to)
}
