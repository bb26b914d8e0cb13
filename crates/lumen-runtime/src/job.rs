use std::time::Instant;

use lumen_blocks::VoxelProperties;
use lumen_lighting::{
    LightStorage, LightVolume, LightingError, LightingPipeline, PropagationStats,
    VoxelNeighborhood,
};
use lumen_world::{ChunkCoord, ChunkDims, VoxelBuf, VoxelId};

/// Everything a unit needs to light one chunk, as owned buffers. Nothing in
/// it aliases coordinator state.
#[derive(Clone, Debug)]
pub struct LightingRequest {
    pub coord: ChunkCoord,
    pub dims: ChunkDims,
    /// Voxel ids for the target and up to four orthogonal neighbors, in
    /// canonical index order.
    pub voxels: Vec<(ChunkCoord, Vec<VoxelId>)>,
    /// Raw light planes of neighbors that already have light.
    pub neighbor_light: Vec<(ChunkCoord, [Vec<u8>; 6])>,
}

impl LightingRequest {
    /// Captures the target's neighborhood and the neighbor volumes present in
    /// `storage`.
    pub fn capture(hood: &VoxelNeighborhood, storage: &LightStorage) -> Self {
        let coord = hood.coord();
        let mut voxels = vec![(coord, hood.center().voxels.clone())];
        let mut neighbor_light = Vec::new();
        for (side, n) in coord.neighbors() {
            if let Some(buf) = hood.neighbor(side) {
                voxels.push((n, buf.voxels.clone()));
            }
            if let Some(vol) = storage.get(n).loaded() {
                neighbor_light.push((n, vol.channels().clone()));
            }
        }
        Self {
            coord,
            dims: hood.dims(),
            voxels,
            neighbor_light,
        }
    }

    /// Rebuilds the neighborhood and a scratch storage holding the neighbor
    /// volumes.
    pub fn into_parts(self) -> Result<(VoxelNeighborhood, LightStorage), LightingError> {
        let LightingRequest {
            coord,
            dims,
            voxels,
            neighbor_light,
        } = self;
        let mut center = None;
        let mut neighbors = Vec::new();
        for (c, ids) in voxels {
            let buf = VoxelBuf::from_voxels(c, dims, ids);
            if c == coord {
                center = Some(buf);
            } else {
                neighbors.push(buf);
            }
        }
        let mut hood = VoxelNeighborhood::new(center.ok_or(LightingError::MissingVoxels(coord))?);
        for buf in neighbors {
            hood.insert_neighbor(buf);
        }
        let mut storage = LightStorage::new(dims);
        for (c, channels) in neighbor_light {
            if c != coord {
                storage.insert(c, LightVolume::from_channels(dims, channels)?)?;
            }
        }
        Ok((hood, storage))
    }
}

/// Light computed for one chunk, as raw planes ready to rehydrate.
#[derive(Clone, Debug)]
pub struct LightingResult {
    pub coord: ChunkCoord,
    pub channels: [Vec<u8>; 6],
    pub stats: PropagationStats,
    pub t_light_ms: u32,
}

impl LightingResult {
    pub fn into_volume(self, dims: ChunkDims) -> Result<LightVolume, LightingError> {
        LightVolume::from_channels(dims, self.channels)
    }
}

/// Work a lighting unit can be asked to do.
#[derive(Clone, Debug)]
pub enum LightingJob {
    Compute(LightingRequest),
}

impl LightingJob {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            LightingJob::Compute(req) => req.coord,
        }
    }
}

#[derive(Clone, Debug)]
pub enum LightingOutcome {
    Computed(LightingResult),
}

/// Unit-side entry point: runs the pipeline for one job.
pub fn execute<P: VoxelProperties + ?Sized>(
    job: LightingJob,
    props: &P,
) -> Result<LightingOutcome, LightingError> {
    match job {
        LightingJob::Compute(req) => {
            let t0 = Instant::now();
            let coord = req.coord;
            let pipeline = LightingPipeline::new(req.dims)?;
            let (hood, mut storage) = req.into_parts()?;
            let (volume, stats) = pipeline.run(&hood, props, &mut storage)?;
            let t_light_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
            Ok(LightingOutcome::Computed(LightingResult {
                coord,
                channels: volume.into_channels(),
                stats,
                t_light_ms,
            }))
        }
    }
}
