use lumen_world::{ChunkCoord, ChunkDims, VoxelBuf};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // Packed key and string form both reproduce the coordinate
    #[test]
    fn coord_encodings_are_lossless(x in any::<i32>(), z in any::<i32>()) {
        let c = ChunkCoord::new(x, z);
        prop_assert_eq!(ChunkCoord::from_key(c.key()), c);
        prop_assert_eq!(c.to_string().parse::<ChunkCoord>().unwrap(), c);
    }

    // Distinct coordinates never share a key
    #[test]
    fn keys_are_injective(a in (any::<i32>(), any::<i32>()), b in (any::<i32>(), any::<i32>())) {
        let (ca, cb) = (ChunkCoord::from(a), ChunkCoord::from(b));
        prop_assert_eq!(ca == cb, ca.key() == cb.key());
    }

    // idx maps each (x,y,z) within bounds to unique in-range indices
    #[test]
    fn idx_is_unique_and_in_range(sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let expect = dims.volume().unwrap();
        let mut seen = vec![false; expect];
        for z in 0..sz { for y in 0..sy { for x in 0..sx {
            let i = dims.index(x, y, z);
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // Splitting a world position and re-assembling it gives it back
    #[test]
    fn to_local_round_trips(wx in small_i32(), wz in small_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let wy = (sy - 1) as i32;
        let (coord, lx, ly, lz) = dims.to_local(wx, wy, wz).unwrap();
        let (ox, oz) = dims.origin(coord);
        prop_assert_eq!(ox + lx as i32, wx);
        prop_assert_eq!(ly as i32, wy);
        prop_assert_eq!(oz + lz as i32, wz);
    }

    // contains_world agrees with get_world and with chunk_of
    #[test]
    fn contains_world_matches_chunk_of(cx in -1000i32..1000, cz in -1000i32..1000, wx in small_i32(), wz in small_i32(), sx in dim(), sy in dim(), sz in dim()) {
        let dims = ChunkDims::new(sx, sy, sz);
        let coord = ChunkCoord::new(cx, cz);
        let buf = VoxelBuf::filled(coord, dims, 0);
        let inside = buf.contains_world(wx, 0, wz);
        prop_assert_eq!(inside, dims.chunk_of(wx, wz) == coord);
        prop_assert_eq!(inside, buf.get_world(wx, 0, wz).is_some());
    }
}
