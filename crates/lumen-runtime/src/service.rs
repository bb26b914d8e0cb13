use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use hashbrown::{HashMap, HashSet};
use log::{debug, error, trace, warn};
use lumen_blocks::{Rgb, VoxelProperties};
use lumen_lighting::{LightStorage, LightValue, LightingError, VoxelNeighborhood};
use lumen_world::{ChunkCoord, ChunkDims, Side, VoxelSource};

use crate::{
    JobCause, LightingEvent, LightingJob, LightingOutcome, LightingRequest, LightingResult,
    RuntimeConfig, ServiceError, TaskError, TaskHandle, TaskId, TaskPool, execute,
};

/// Running totals kept by a `LightingService`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub submitted: u64,
    pub completed: u64,
    /// Requests folded into the replay of a job already in flight.
    pub collapsed: u64,
    pub replayed: u64,
    pub retried: u64,
    pub failed: u64,
    /// Results dropped because their chunk unloaded while in flight.
    pub discarded: u64,
    pub border_refreshes: u64,
}

struct InFlight {
    handle: TaskHandle<LightingOutcome>,
    cause: JobCause,
    attempts: u32,
    replay: Option<JobCause>,
}

/// Turns world events into lighting jobs and merges their results.
///
/// Owned by the interactive thread. Jobs run on the task pool against copies
/// of the voxels and neighbor light; storage is only written here, one
/// completion at a time. At most one job per chunk is in flight; further
/// requests collapse into a single replay submitted once it lands.
pub struct LightingService {
    config: RuntimeConfig,
    dims: ChunkDims,
    storage: LightStorage,
    pool: TaskPool<LightingJob, LightingOutcome>,
    loaded: HashSet<ChunkCoord>,
    inflight: HashMap<ChunkCoord, InFlight>,
    subscribers: Vec<Sender<LightingEvent>>,
    stats: ServiceStats,
}

impl LightingService {
    pub fn new(
        config: RuntimeConfig,
        props: Arc<dyn VoxelProperties>,
    ) -> Result<Self, ServiceError> {
        let dims = config.dims();
        if dims.volume().is_none() {
            return Err(LightingError::InvalidDimensions {
                sx: dims.sx,
                sy: dims.sy,
                sz: dims.sz,
            }
            .into());
        }
        let pool = TaskPool::new(config.workers, &config.thread_name_prefix, move |job| {
            execute(job, props.as_ref())
        })?;
        debug!(
            target: "lighting",
            "lighting service up: {}x{}x{} chunks, {} workers",
            dims.sx, dims.sy, dims.sz, config.workers
        );
        Ok(Self {
            config,
            dims,
            storage: LightStorage::new(dims),
            pool,
            loaded: HashSet::new(),
            inflight: HashMap::new(),
            subscribers: Vec::new(),
            stats: ServiceStats::default(),
        })
    }

    pub fn on_chunk_generated<W: VoxelSource + ?Sized>(&mut self, world: &W, coord: ChunkCoord) {
        self.loaded.insert(coord);
        self.request(world, coord, JobCause::Generated);
    }

    /// Relights the chunk holding the edited voxel; its loaded neighbors are
    /// refreshed once that job lands.
    pub fn on_block_changed<W: VoxelSource + ?Sized>(&mut self, world: &W, wx: i32, wy: i32, wz: i32) {
        let Some((coord, ..)) = self.dims.to_local(wx, wy, wz) else {
            return;
        };
        if !self.loaded.contains(&coord) {
            trace!(target: "lighting", "edit at ({wx},{wy},{wz}) in unloaded chunk {coord}");
            return;
        }
        self.request(world, coord, JobCause::Edit);
    }

    pub fn on_chunk_unloaded(&mut self, coord: ChunkCoord) {
        self.loaded.remove(&coord);
        self.storage.remove(coord);
        if let Some(flight) = self.inflight.get_mut(&coord) {
            flight.replay = None;
        }
    }

    pub fn subscribe(&mut self) -> Receiver<LightingEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Merges every finished job without blocking. Returns how many resolved.
    pub fn pump<W: VoxelSource + ?Sized>(&mut self, world: &W) -> usize {
        self.pool.poll();
        self.collect(world)
    }

    /// Blocks until no job is in flight or `timeout` passes.
    pub fn run_until_idle<W: VoxelSource + ?Sized>(
        &mut self,
        world: &W,
        timeout: Duration,
    ) -> Result<usize, ServiceError> {
        let deadline = Instant::now() + timeout;
        let mut resolved = self.pump(world);
        while !self.inflight.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return Err(TaskError::Timeout.into());
            }
            match self.pool.poll_blocking(deadline - now) {
                Ok(_) | Err(TaskError::Timeout) => {}
                Err(e) => return Err(e.into()),
            }
            resolved += self.collect(world);
        }
        Ok(resolved)
    }

    fn request<W: VoxelSource + ?Sized>(&mut self, world: &W, coord: ChunkCoord, cause: JobCause) {
        if let Some(flight) = self.inflight.get_mut(&coord) {
            let merged = flight.replay.map_or(cause, |c| c.max(cause));
            flight.replay = Some(merged);
            self.stats.collapsed += 1;
            trace!(target: "lighting", "chunk {coord} busy, {cause:?} folded into {merged:?} replay");
            return;
        }
        self.submit(world, coord, cause, 0);
    }

    fn submit<W: VoxelSource + ?Sized>(
        &mut self,
        world: &W,
        coord: ChunkCoord,
        cause: JobCause,
        attempts: u32,
    ) {
        let loaded = &self.loaded;
        let Some(hood) = VoxelNeighborhood::from_source(world, coord, |n| loaded.contains(&n)) else {
            warn!(target: "lighting", "no voxels for chunk {coord}, skipping {cause:?} job");
            return;
        };
        let request = LightingRequest::capture(&hood, &self.storage);
        let handle = self.pool.submit(LightingJob::Compute(request));
        trace!(target: "lighting", "chunk {coord} submitted as task {} ({cause:?})", handle.id());
        self.inflight.insert(
            coord,
            InFlight {
                handle,
                cause,
                attempts,
                replay: None,
            },
        );
        self.stats.submitted += 1;
    }

    fn collect<W: VoxelSource + ?Sized>(&mut self, world: &W) -> usize {
        let mut finished: Vec<(TaskId, ChunkCoord, Result<LightingOutcome, TaskError>)> = self
            .inflight
            .iter()
            .filter_map(|(coord, f)| f.handle.try_take().map(|r| (f.handle.id(), *coord, r)))
            .collect();
        finished.sort_unstable_by_key(|(id, ..)| *id);
        let n = finished.len();
        for (_, coord, result) in finished {
            if let Some(flight) = self.inflight.remove(&coord) {
                self.finish(world, coord, flight, result);
            }
        }
        n
    }

    fn finish<W: VoxelSource + ?Sized>(
        &mut self,
        world: &W,
        coord: ChunkCoord,
        flight: InFlight,
        result: Result<LightingOutcome, TaskError>,
    ) {
        let InFlight {
            cause,
            attempts,
            replay,
            ..
        } = flight;
        match result {
            Ok(LightingOutcome::Computed(res)) => self.merge(world, cause, res),
            Err(TaskError::WorkerFault(msg))
                if attempts < self.config.max_retries && self.loaded.contains(&coord) =>
            {
                warn!(
                    target: "lighting",
                    "chunk {coord} job faulted ({msg}), retry {}/{}",
                    attempts + 1,
                    self.config.max_retries
                );
                self.stats.retried += 1;
                self.submit(world, coord, cause, attempts + 1);
                if let Some(retry) = self.inflight.get_mut(&coord) {
                    retry.replay = replay;
                }
                return;
            }
            Err(err) => self.fail(coord, err.to_string()),
        }
        if let Some(next) = replay {
            if self.loaded.contains(&coord) {
                self.stats.replayed += 1;
                trace!(target: "lighting", "replaying chunk {coord} ({next:?})");
                self.submit(world, coord, next, 0);
            }
        }
    }

    fn fail(&mut self, coord: ChunkCoord, error: String) {
        if !self.loaded.contains(&coord) {
            self.stats.discarded += 1;
            return;
        }
        error!(target: "lighting", "giving up on chunk {coord}: {error}");
        self.stats.failed += 1;
        self.broadcast(LightingEvent::Failed { coord, error });
    }

    fn merge<W: VoxelSource + ?Sized>(&mut self, world: &W, cause: JobCause, res: LightingResult) {
        let coord = res.coord;
        if !self.loaded.contains(&coord) {
            self.stats.discarded += 1;
            debug!(target: "lighting", "chunk {coord} unloaded while in flight, result dropped");
            return;
        }
        let (stats, t_light_ms) = (res.stats, res.t_light_ms);
        let volume = match res.into_volume(self.dims) {
            Ok(v) => v,
            Err(e) => return self.fail(coord, e.to_string()),
        };
        let mut changed: Vec<Side> = Vec::new();
        let mut dimmed: Vec<Side> = Vec::new();
        for side in Side::ALL {
            if self.storage.face_changed(coord, &volume, side) {
                changed.push(side);
                if self.storage.face_dimmed(coord, &volume, side) {
                    dimmed.push(side);
                }
            }
        }
        if let Err(e) = self.storage.insert(coord, volume) {
            return self.fail(coord, e.to_string());
        }
        self.stats.completed += 1;
        debug!(
            target: "lighting",
            "chunk {coord} lit in {t_light_ms}ms ({cause:?}): emitters={} border_sources={} expanded={} stale={} dropped={}",
            stats.emitters,
            stats.border_sources,
            stats.expanded,
            stats.stale_skipped,
            stats.dropped_unloaded
        );
        self.broadcast(LightingEvent::Ready(coord));

        // Light travels at most 14 cells past a face, so refreshes stop at the
        // direct neighbors. A refresh passes on only when it darkened a shared
        // face: stale light bounced between two chunks loses a level per hop
        // and the chain ends once it is gone.
        let refresh: Vec<ChunkCoord> = match cause {
            JobCause::Edit => coord.neighbors().map(|(_, n)| n).to_vec(),
            JobCause::Generated => changed.iter().map(|side| coord.neighbor(*side)).collect(),
            JobCause::BorderRefresh => dimmed.iter().map(|side| coord.neighbor(*side)).collect(),
        };
        for n in refresh {
            if self.loaded.contains(&n) {
                self.stats.border_refreshes += 1;
                self.request(world, n, JobCause::BorderRefresh);
            }
        }
    }

    fn broadcast(&mut self, event: LightingEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Combined light at a world position; full bright while the chunk has
    /// no light yet.
    pub fn combined_light(&self, wx: i32, wy: i32, wz: i32) -> Rgb {
        self.light_at(wx, wy, wz)
            .map(LightValue::combined)
            .unwrap_or(Rgb::FULL)
    }

    pub fn light_at(&self, wx: i32, wy: i32, wz: i32) -> Option<LightValue> {
        self.storage.light_at(wx, wy, wz)
    }

    pub fn normalized_light(&self, wx: i32, wy: i32, wz: i32) -> [f32; 3] {
        self.light_at(wx, wy, wz)
            .unwrap_or(LightValue::FULL_BRIGHT)
            .normalized(self.config.min_ambient)
    }

    #[inline]
    pub fn is_ready(&self, coord: ChunkCoord) -> bool {
        self.storage.contains(coord)
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains(&coord)
    }

    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    /// `(busy units, total units)` of the task pool.
    pub fn utilization(&self) -> (usize, usize) {
        self.pool.utilization()
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    pub fn storage(&self) -> &LightStorage {
        &self.storage
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}
