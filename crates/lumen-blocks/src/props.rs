use lumen_world::VoxelId;

use crate::Rgb;

/// Absorption at or above which a voxel stops block light entirely.
pub const OPAQUE_ABSORPTION: u8 = 15;

/// What the lighting passes need to know about one voxel type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelProps {
    pub emissive: Option<Rgb>,
    pub absorption: u8,
    pub blocks_skylight: bool,
}

impl VoxelProps {
    pub const AIR: VoxelProps = VoxelProps {
        emissive: None,
        absorption: 0,
        blocks_skylight: false,
    };

    pub const OPAQUE: VoxelProps = VoxelProps {
        emissive: None,
        absorption: OPAQUE_ABSORPTION,
        blocks_skylight: true,
    };

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.absorption >= OPAQUE_ABSORPTION
    }

    /// Emitted color when it is non-zero.
    #[inline]
    pub fn emission(&self) -> Option<Rgb> {
        self.emissive.filter(|c| !c.is_zero())
    }
}

/// Lookup seam between the lighting passes and the block registry.
pub trait VoxelProperties: Send + Sync {
    fn lookup(&self, id: VoxelId) -> VoxelProps;
}
