use std::collections::VecDeque;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::trace;
use lumen_blocks::{Rgb, VoxelProperties};
use lumen_world::{ChunkCoord, ChunkDims, Side, VoxelId};

use crate::{LightStorage, LightVolume, LightingError, NeighborLight, VoxelNeighborhood};

type WorldPos = (i32, i32, i32);

const STEPS: [WorldPos; 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Counters from one propagation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Lit cells on loaded neighbor faces enqueued as sources.
    pub border_sources: usize,
    pub emitters: usize,
    pub expanded: usize,
    /// Queue entries skipped because a brighter level was already expanded.
    pub stale_skipped: usize,
    /// Edges that would have crossed into a chunk without voxels or light.
    pub dropped_unloaded: usize,
}

/// Breadth-first colored block-light flood fill.
///
/// Light attenuates by exactly one level per axis step on every channel.
/// Sources are the chunk's own emitters plus lit cells on the faces of loaded
/// neighbors; light reaching a loaded neighbor is written into that
/// neighbor's volume in `storage` and may flow back in through it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropagationPass;

impl PropagationPass {
    pub fn run<P: VoxelProperties + ?Sized>(
        &self,
        hood: &VoxelNeighborhood,
        props: &P,
        volume: &mut LightVolume,
        storage: &mut LightStorage,
    ) -> Result<PropagationStats, LightingError> {
        for actual in [hood.dims(), storage.dims()] {
            if actual != volume.dims() {
                return Err(LightingError::DimsMismatch {
                    expected: volume.dims(),
                    actual,
                });
            }
        }
        let mut fill = Flood {
            hood,
            props,
            dims: hood.dims(),
            target: hood.coord(),
            volume,
            storage,
            queue: VecDeque::new(),
            expanded: HashMap::new(),
            stats: PropagationStats::default(),
        };
        fill.seed_borders();
        fill.seed_emitters();
        fill.drain();
        let stats = fill.stats;
        trace!(
            target: "lighting",
            "flood {}: {} border sources, {} emitters, {} expanded, {} dropped at unloaded chunks",
            hood.coord(),
            stats.border_sources,
            stats.emitters,
            stats.expanded,
            stats.dropped_unloaded
        );
        Ok(stats)
    }
}

enum Relax {
    Unchanged,
    Unloaded,
    /// Lit but opaque: the cell keeps the light and does not pass it on.
    Absorbed,
    Enqueue(Rgb),
}

struct Flood<'a, P: ?Sized> {
    hood: &'a VoxelNeighborhood,
    props: &'a P,
    dims: ChunkDims,
    target: ChunkCoord,
    volume: &'a mut LightVolume,
    storage: &'a mut LightStorage,
    queue: VecDeque<(WorldPos, Rgb)>,
    // Highest level each position has been expanded at.
    expanded: HashMap<WorldPos, Rgb>,
    stats: PropagationStats,
}

impl<P: VoxelProperties + ?Sized> Flood<'_, P> {
    /// Opaque cells only spread light they emit themselves.
    #[inline]
    fn spreads(&self, id: VoxelId) -> bool {
        let p = self.props.lookup(id);
        !p.is_opaque() || p.emission().is_some()
    }

    fn seed_borders(&mut self) {
        let dims = self.dims;
        let hood = self.hood;
        for side in Side::ALL {
            let coord = self.target.neighbor(side);
            let Some(voxels) = hood.chunk(coord) else {
                continue;
            };
            let NeighborLight::Loaded(light) = self.storage.get(coord) else {
                continue;
            };
            let (ox, oz) = dims.origin(coord);
            for (x, z) in dims.face_cells(side.opposite()) {
                for y in 0..dims.sy {
                    let c = light.block_at_index(dims.index(x, y, z));
                    if c.is_zero() || !self.spreads(voxels.get_local(x, y, z)) {
                        continue;
                    }
                    let pos = (ox.wrapping_add(x as i32), y as i32, oz.wrapping_add(z as i32));
                    self.queue.push_back((pos, c));
                    self.stats.border_sources += 1;
                }
            }
        }
    }

    fn seed_emitters(&mut self) {
        let dims = self.dims;
        let (ox, oz) = dims.origin(self.target);
        let slab = dims.slab_len();
        for (i, &id) in self.hood.center().voxels.iter().enumerate() {
            let Some(emit) = self.props.lookup(id).emission() else {
                continue;
            };
            let lit = self.volume.block_at_index(i).max(emit.clamped());
            self.volume.set_block_at_index(i, lit);
            let (x, y, z) = (i % dims.sx, (i % slab) / dims.sx, i / slab);
            let pos = (ox.wrapping_add(x as i32), y as i32, oz.wrapping_add(z as i32));
            self.queue.push_back((pos, lit));
            self.stats.emitters += 1;
        }
    }

    fn drain(&mut self) {
        let sy = self.dims.sy as i32;
        while let Some((pos, level)) = self.queue.pop_front() {
            match self.expanded.entry(pos) {
                Entry::Occupied(mut e) => {
                    if level.dominated_by(*e.get()) {
                        self.stats.stale_skipped += 1;
                        continue;
                    }
                    let best = e.get().max(level);
                    e.insert(best);
                }
                Entry::Vacant(e) => {
                    e.insert(level);
                }
            }
            self.stats.expanded += 1;

            let next = level.attenuated();
            if next.is_zero() {
                continue;
            }
            for (dx, dy, dz) in STEPS {
                let npos = (pos.0.wrapping_add(dx), pos.1 + dy, pos.2.wrapping_add(dz));
                if npos.1 < 0 || npos.1 >= sy {
                    continue;
                }
                match self.relax(npos, next) {
                    Relax::Enqueue(lit) => self.queue.push_back((npos, lit)),
                    Relax::Unloaded => self.stats.dropped_unloaded += 1,
                    Relax::Absorbed | Relax::Unchanged => {}
                }
            }
        }
    }

    /// Raises the stored block light at `pos` to at least `light`.
    fn relax(&mut self, pos: WorldPos, light: Rgb) -> Relax {
        let Some((coord, x, y, z)) = self.dims.to_local(pos.0, pos.1, pos.2) else {
            return Relax::Unchanged;
        };
        let hood = self.hood;
        let Some(voxels) = hood.chunk(coord) else {
            return Relax::Unloaded;
        };
        let id = voxels.get_local(x, y, z);
        let volume: &mut LightVolume = if coord == self.target {
            &mut *self.volume
        } else {
            match self.storage.get_mut(coord) {
                Some(v) => v,
                None => return Relax::Unloaded,
            }
        };
        let i = self.dims.index(x, y, z);
        let current = volume.block_at_index(i);
        if !light.exceeds_any(current) {
            return Relax::Unchanged;
        }
        let lit = current.max(light);
        volume.set_block_at_index(i, lit);
        if self.props.lookup(id).is_opaque() {
            Relax::Absorbed
        } else {
            Relax::Enqueue(lit)
        }
    }
}
