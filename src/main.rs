//! Lights a flat demo world on the background pool, edits a voxel next to a
//! chunk border, and reports timings and sampled light.
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};
use lumen_blocks::BlockRegistry;
use lumen_runtime::{LightingEvent, LightingService, RuntimeConfig};
use lumen_world::{ChunkCoord, ChunkDims, MemoryWorld, VoxelBuf, VoxelId};

#[derive(Parser, Debug)]
#[command(name = "lumen", about = "Chunked voxel lighting demo")]
struct Args {
    /// Runtime config (TOML). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Block palette (TOML). The bundled palette when omitted.
    #[arg(long)]
    blocks: Option<PathBuf>,

    /// Chunks generated in each direction around the origin chunk
    #[arg(long, default_value_t = 2)]
    radius: i32,

    /// Overrides the configured worker count
    #[arg(long)]
    workers: Option<usize>,

    /// Height of the stone floor
    #[arg(long, default_value_t = 64)]
    ground: usize,

    /// Seconds to wait for the pool to drain
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Log filter, e.g. `debug` or `lighting=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = &args.log_level {
        logger.parse_filters(filter);
    }
    logger.init();
    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load_from_path(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    let registry = match &args.blocks {
        Some(path) => BlockRegistry::load_from_path(path)?,
        None => BlockRegistry::builtin()?,
    };
    let stone = block_id(&registry, "stone")?;
    let glowstone = block_id(&registry, "glowstone")?;
    let torch = block_id(&registry, "torch")?;
    info!("loaded {} block types", registry.len());

    let dims = config.dims();
    let ground = args.ground.min(dims.sy.saturating_sub(1));
    let radius = args.radius.max(0);
    let coords: Vec<ChunkCoord> = (-radius..=radius)
        .flat_map(|x| (-radius..=radius).map(move |z| ChunkCoord::new(x, z)))
        .collect();
    let mut world = MemoryWorld::new(dims);
    for &coord in &coords {
        world.insert_chunk(flat_chunk(coord, dims, ground, stone, glowstone));
    }

    let timeout = Duration::from_secs(args.timeout_secs);
    let mut service = LightingService::new(config, Arc::new(registry))?;
    let events = service.subscribe();

    let t0 = Instant::now();
    for &coord in &coords {
        service.on_chunk_generated(&world, coord);
    }
    let resolved = service.run_until_idle(&world, timeout)?;
    info!(
        "lit {} chunks ({resolved} jobs) in {}ms",
        coords.len(),
        elapsed_ms(t0)
    );

    let (wx, wy, wz) = (dims.sx as i32 - 1, ground as i32, 2);
    if world.set_block(wx, wy, wz, torch).is_none() {
        return Err(format!("cannot edit ({wx},{wy},{wz})").into());
    }
    let t1 = Instant::now();
    service.on_block_changed(&world, wx, wy, wz);
    let resolved = service.run_until_idle(&world, timeout)?;
    info!(
        "torch at ({wx},{wy},{wz}) relit in {}ms ({resolved} jobs)",
        elapsed_ms(t1)
    );

    let mut ready = 0usize;
    for event in events.try_iter() {
        match event {
            LightingEvent::Ready(_) => ready += 1,
            LightingEvent::Failed { coord, error } => warn!("chunk {coord} failed: {error}"),
        }
    }
    let (busy, units) = service.utilization();
    info!("{ready} ready events, {busy}/{units} units busy, {:?}", service.stats());
    for dx in -2..=3 {
        let x = wx + dx;
        match service.light_at(x, wy, wz) {
            Some(v) => info!("light at ({x},{wy},{wz}): sky {:?} block {:?}", v.sky, v.block),
            None => info!("light at ({x},{wy},{wz}): not computed"),
        }
    }
    Ok(())
}

fn block_id(registry: &BlockRegistry, name: &str) -> Result<VoxelId, Box<dyn Error>> {
    registry
        .id_by_name(name)
        .ok_or_else(|| format!("palette has no '{name}' block").into())
}

fn flat_chunk(
    coord: ChunkCoord,
    dims: ChunkDims,
    ground: usize,
    floor: VoxelId,
    lamp: VoxelId,
) -> VoxelBuf {
    let mut buf = VoxelBuf::filled(coord, dims, lumen_world::AIR);
    buf.fill_layers(0, ground, floor);
    // One lamp per chunk on the floor, under a short stone overhang.
    let (x, z) = (dims.sx / 2, dims.sz / 2);
    buf.set_local(x, ground, z, lamp);
    if ground + 3 < dims.sy {
        for dx in x.saturating_sub(1)..(x + 2).min(dims.sx) {
            buf.set_local(dx, ground + 3, z, floor);
        }
    }
    buf
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}
