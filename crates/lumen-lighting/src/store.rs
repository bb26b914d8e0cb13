use hashbrown::HashMap;
use lumen_world::{ChunkCoord, ChunkDims, Side};

use crate::{LightValue, LightVolume, LightingError};

/// Result of looking a chunk up in `LightStorage`. A chunk with no computed
/// light is a normal transient state while the world streams in, so it is a
/// variant rather than an error.
#[derive(Clone, Copy, Debug)]
pub enum NeighborLight<'a> {
    Loaded(&'a LightVolume),
    Unloaded,
}

impl<'a> NeighborLight<'a> {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, NeighborLight::Loaded(_))
    }

    #[inline]
    pub fn loaded(self) -> Option<&'a LightVolume> {
        match self {
            NeighborLight::Loaded(v) => Some(v),
            NeighborLight::Unloaded => None,
        }
    }
}

/// Light volumes of every chunk that has completed at least one lighting run.
#[derive(Clone, Debug)]
pub struct LightStorage {
    dims: ChunkDims,
    volumes: HashMap<ChunkCoord, LightVolume>,
}

impl LightStorage {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            volumes: HashMap::new(),
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn get(&self, coord: ChunkCoord) -> NeighborLight<'_> {
        match self.volumes.get(&coord) {
            Some(v) => NeighborLight::Loaded(v),
            None => NeighborLight::Unloaded,
        }
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut LightVolume> {
        self.volumes.get_mut(&coord)
    }

    /// Stores `volume` for `coord`, returning the volume it replaced.
    pub fn insert(
        &mut self,
        coord: ChunkCoord,
        volume: LightVolume,
    ) -> Result<Option<LightVolume>, LightingError> {
        if volume.dims() != self.dims {
            return Err(LightingError::DimsMismatch {
                expected: self.dims,
                actual: volume.dims(),
            });
        }
        Ok(self.volumes.insert(coord, volume))
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<LightVolume> {
        self.volumes.remove(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.volumes.contains_key(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.volumes.keys().copied()
    }

    /// Light at a world position, `None` if the chunk has no volume or `wy`
    /// is outside the world.
    pub fn light_at(&self, wx: i32, wy: i32, wz: i32) -> Option<LightValue> {
        let (coord, x, y, z) = self.dims.to_local(wx, wy, wz)?;
        self.volumes.get(&coord)?.get(x, y, z)
    }

    /// Whether storing `new` for `coord` would change the block light on its
    /// `side` face. A chunk with no stored volume counts as dark.
    pub fn face_changed(&self, coord: ChunkCoord, new: &LightVolume, side: Side) -> bool {
        match self.volumes.get(&coord) {
            Some(old) if old.dims() == new.dims() => !old.face_block(side).eq(new.face_block(side)),
            _ => new.face_has_block_light(side),
        }
    }

    /// Whether storing `new` for `coord` would lower block light anywhere on
    /// its `side` face, on any channel. A chunk with no stored volume never
    /// dims.
    pub fn face_dimmed(&self, coord: ChunkCoord, new: &LightVolume, side: Side) -> bool {
        match self.volumes.get(&coord) {
            Some(old) if old.dims() == new.dims() => old
                .face_block(side)
                .zip(new.face_block(side))
                .any(|(was, now)| was.exceeds_any(now)),
            _ => false,
        }
    }
}
