use lumen_blocks::VoxelProperties;
use lumen_world::ChunkDims;

use crate::{
    LightStorage, LightVolume, LightingError, PropagationPass, PropagationStats, SkyLightPass,
    VoxelNeighborhood,
};

/// Runs the sky pass and then the propagation pass on one chunk.
///
/// Holds only the chunk dims; every run starts from a fresh volume, so the
/// output depends on nothing but the voxels and the neighbor light passed in.
#[derive(Clone, Copy, Debug)]
pub struct LightingPipeline {
    dims: ChunkDims,
    sky: SkyLightPass,
    propagate: PropagationPass,
}

impl LightingPipeline {
    pub fn new(dims: ChunkDims) -> Result<Self, LightingError> {
        if dims.volume().is_none() {
            return Err(LightingError::invalid_dims(dims));
        }
        Ok(Self {
            dims,
            sky: SkyLightPass,
            propagate: PropagationPass,
        })
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Computes light for `hood`'s center chunk. Loaded neighbors in `storage`
    /// seed the borders and receive any light that spills into them.
    pub fn run<P: VoxelProperties + ?Sized>(
        &self,
        hood: &VoxelNeighborhood,
        props: &P,
        storage: &mut LightStorage,
    ) -> Result<(LightVolume, PropagationStats), LightingError> {
        if hood.dims() != self.dims {
            return Err(LightingError::DimsMismatch {
                expected: self.dims,
                actual: hood.dims(),
            });
        }
        let mut volume = LightVolume::new(self.dims)?;
        self.sky.run(hood.center(), props, &mut volume)?;
        let stats = self.propagate.run(hood, props, &mut volume, storage)?;
        Ok((volume, stats))
    }
}
