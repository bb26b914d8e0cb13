use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lumen_blocks::BlockRegistry;
use lumen_lighting::{LightStorage, LightingPipeline, VoxelNeighborhood};
use lumen_world::{AIR, ChunkCoord, ChunkDims, VoxelBuf};

fn load_registry() -> BlockRegistry {
    BlockRegistry::builtin().unwrap()
}

fn flat_chunk(reg: &BlockRegistry, coord: ChunkCoord, dims: ChunkDims) -> VoxelBuf {
    let stone = reg.id_by_name("stone").unwrap();
    let glow = reg.id_by_name("glowstone").unwrap();
    let mut buf = VoxelBuf::filled(coord, dims, AIR);
    buf.fill_layers(0, 64, stone);
    for (x, z) in [(3, 3), (12, 12), (20, 6), (6, 20)] {
        buf.set_local(x, 64, z, glow);
    }
    buf
}

fn bench_pipeline_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("lighting_pipeline");
    let reg = load_registry();
    let dims = ChunkDims::REFERENCE;
    let pipeline = LightingPipeline::new(dims).unwrap();
    let center = ChunkCoord::new(0, 0);

    let alone = VoxelNeighborhood::new(flat_chunk(&reg, center, dims));
    group.bench_function("flat_24x256x24_isolated", |b| {
        b.iter(|| {
            let mut storage = LightStorage::new(dims);
            black_box(pipeline.run(&alone, &reg, &mut storage).unwrap());
        })
    });

    let mut storage = LightStorage::new(dims);
    let mut hood = VoxelNeighborhood::new(flat_chunk(&reg, center, dims));
    for (_, n) in center.neighbors() {
        let buf = flat_chunk(&reg, n, dims);
        let (vol, _) = pipeline
            .run(&VoxelNeighborhood::new(buf.clone()), &reg, &mut LightStorage::new(dims))
            .unwrap();
        storage.insert(n, vol).unwrap();
        hood.insert_neighbor(buf);
    }
    group.bench_function("flat_24x256x24_with_neighbors", |b| {
        b.iter(|| {
            let mut scratch = storage.clone();
            black_box(pipeline.run(&hood, &reg, &mut scratch).unwrap());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline_reference);
criterion_main!(benches);
