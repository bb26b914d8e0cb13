use super::*;

#[test]
fn chunk_of_handles_negative_world_coords() {
    let dims = ChunkDims::REFERENCE;
    assert_eq!(dims.chunk_of(0, 0), ChunkCoord::new(0, 0));
    assert_eq!(dims.chunk_of(23, 23), ChunkCoord::new(0, 0));
    assert_eq!(dims.chunk_of(24, -1), ChunkCoord::new(1, -1));
    assert_eq!(dims.chunk_of(-24, -25), ChunkCoord::new(-1, -2));
}

#[test]
fn to_local_rejects_out_of_range_heights() {
    let dims = ChunkDims::REFERENCE;
    assert!(dims.to_local(0, -1, 0).is_none());
    assert!(dims.to_local(0, 256, 0).is_none());
    assert_eq!(
        dims.to_local(-1, 10, 25),
        Some((ChunkCoord::new(-1, 1), 23, 10, 1))
    );
}

#[test]
fn index_follows_x_then_y_then_z() {
    let dims = ChunkDims::new(4, 3, 2);
    assert_eq!(dims.index(1, 0, 0), 1);
    assert_eq!(dims.index(0, 1, 0), 4);
    assert_eq!(dims.index(0, 0, 1), 12);
    assert_eq!(dims.checked_index(4, 0, 0), None);
    assert_eq!(dims.checked_index(3, 2, 1), Some(23));
}

#[test]
fn zero_or_overflowing_dims_have_no_volume() {
    assert_eq!(ChunkDims::new(0, 256, 24).volume(), None);
    assert_eq!(ChunkDims::new(usize::MAX, 2, 1).volume(), None);
    assert_eq!(ChunkDims::REFERENCE.volume(), Some(24 * 256 * 24));
}

#[test]
fn face_cells_cover_one_edge() {
    let dims = ChunkDims::new(3, 1, 2);
    let pos_x: Vec<_> = dims.face_cells(Side::PosX).collect();
    assert_eq!(pos_x, vec![(2, 0), (2, 1)]);
    let neg_z: Vec<_> = dims.face_cells(Side::NegZ).collect();
    assert_eq!(neg_z, vec![(0, 0), (1, 0), (2, 0)]);
}

#[test]
fn coord_string_encoding() {
    let c = ChunkCoord::new(-3, 17);
    assert_eq!(c.to_string(), "-3,17");
    assert_eq!("-3,17".parse::<ChunkCoord>(), Ok(c));
    assert_eq!(" 4 , -2 ".parse::<ChunkCoord>(), Ok(ChunkCoord::new(4, -2)));
    assert!("4;2".parse::<ChunkCoord>().is_err());
    assert!("x,2".parse::<ChunkCoord>().is_err());
}

#[test]
fn sides_are_symmetric() {
    let c = ChunkCoord::new(5, -5);
    for (side, n) in c.neighbors() {
        assert_eq!(n.neighbor(side.opposite()), c);
    }
    for (i, side) in Side::ALL.iter().enumerate() {
        assert_eq!(side.index(), i);
    }
}

#[test]
fn memory_world_reads_and_writes_across_chunks() {
    let dims = ChunkDims::new(4, 8, 4);
    let mut world = MemoryWorld::new(dims);
    world.insert_chunk(VoxelBuf::filled(ChunkCoord::new(0, 0), dims, AIR));
    world.insert_chunk(VoxelBuf::filled(ChunkCoord::new(-1, 0), dims, AIR));

    assert_eq!(world.set_block(-1, 3, 2, 7), Some(ChunkCoord::new(-1, 0)));
    assert_eq!(world.block_id(-1, 3, 2), 7);
    assert_eq!(world.block_id(0, 3, 2), AIR);
    // Unloaded chunk and out-of-range height.
    assert_eq!(world.set_block(9, 3, 2, 7), None);
    assert_eq!(world.set_block(0, 8, 0, 7), None);

    let snap = world.snapshot_chunk(ChunkCoord::new(-1, 0)).unwrap();
    assert_eq!(snap.get_world(-1, 3, 2), Some(7));
    assert_eq!(snap.get_world(0, 3, 2), None);
}

#[test]
fn default_snapshot_samples_block_id() {
    struct Stripes(ChunkDims);
    impl VoxelSource for Stripes {
        fn dims(&self) -> ChunkDims {
            self.0
        }
        fn block_id(&self, _wx: i32, wy: i32, _wz: i32) -> VoxelId {
            if wy % 2 == 0 { 1 } else { AIR }
        }
    }
    let dims = ChunkDims::new(2, 4, 2);
    let buf = Stripes(dims).snapshot_chunk(ChunkCoord::new(3, 3)).unwrap();
    assert_eq!(buf.get_local(1, 0, 1), 1);
    assert_eq!(buf.get_local(1, 1, 1), AIR);
    assert_eq!(buf.voxels.len(), 16);
}

#[test]
fn fill_layers_clamps_to_height() {
    let dims = ChunkDims::new(2, 4, 2);
    let mut buf = VoxelBuf::filled(ChunkCoord::default(), dims, AIR);
    buf.fill_layers(2, 99, 3);
    assert_eq!(buf.get_local(0, 1, 0), AIR);
    assert_eq!(buf.get_local(1, 3, 1), 3);
    assert_eq!(buf.voxels.iter().filter(|v| **v == 3).count(), 8);
}

#[test]
fn extreme_coords_wrap_instead_of_overflowing() {
    let edge = ChunkCoord::new(i32::MAX, i32::MIN);
    assert_eq!(edge.neighbor(Side::PosX), ChunkCoord::new(i32::MIN, i32::MIN));
    assert_eq!(edge.neighbor(Side::NegZ), ChunkCoord::new(i32::MAX, i32::MAX));
    let far = ChunkCoord::from_key(edge.key());
    assert_eq!(far, edge);

    let dims = ChunkDims::REFERENCE;
    let (ox, oz) = dims.origin(far);
    let buf = VoxelBuf::filled(far, dims, 5);
    assert_eq!(buf.get_world(ox, 0, oz), Some(5));
    assert_eq!(buf.get_world(ox.wrapping_sub(1), 0, oz), None);
}
