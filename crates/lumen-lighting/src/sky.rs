use lumen_blocks::{Rgb, VoxelProperties};
use lumen_world::{AIR, VoxelBuf, VoxelId};

use crate::{Channel, LightVolume, LightingError};

/// Top-down sky occlusion. Each column is lit at full level until the first
/// voxel that blocks sky light; that voxel and everything below it stay dark.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkyLightPass;

impl SkyLightPass {
    pub fn run<P: VoxelProperties + ?Sized>(
        &self,
        voxels: &VoxelBuf,
        props: &P,
        volume: &mut LightVolume,
    ) -> Result<(), LightingError> {
        let dims = volume.dims();
        if voxels.dims != dims {
            return Err(LightingError::DimsMismatch {
                expected: dims,
                actual: voxels.dims,
            });
        }
        let (sx, sy) = (dims.sx, dims.sy);
        let slab = dims.slab_len();
        let blocks_sky = |id: VoxelId| id != AIR && props.lookup(id).blocks_skylight;

        // Runs inline on the calling unit; one z-slab at a time.
        let slabs = volume
            .channel_mut(Channel::SkyR)
            .chunks_mut(slab)
            .zip(voxels.voxels.chunks(slab));
        for (sky, ids) in slabs {
            for x in 0..sx {
                let mut level = Rgb::MAX_LEVEL;
                for y in (0..sy).rev() {
                    let i = x + y * sx;
                    if level > 0 && blocks_sky(ids[i]) {
                        level = 0;
                    }
                    sky[i] = level;
                }
            }
        }

        let [r, g, b, ..] = volume.channels_mut();
        g.copy_from_slice(r);
        b.copy_from_slice(r);
        volume.clear_block();
        Ok(())
    }
}
