use proptest::prelude::*;
use voxmesh_chunk::{CHUNK_SIZE, CHUNK_VOLUME, VoxelChunk, VoxelType};

#[derive(Clone, Debug)]
enum Op {
    Set(usize, usize, usize, u8),
    Fill(u8),
    Clear,
    Replace(u8, u8),
}

fn local() -> impl Strategy<Value = usize> {
    0usize..CHUNK_SIZE
}

// Small value range so EMPTY/SOLID/SURFACE collide often
fn value() -> impl Strategy<Value = u8> {
    0u8..4
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (local(), local(), local(), value()).prop_map(|(x, y, z, v)| Op::Set(x, y, z, v)),
        1 => value().prop_map(Op::Fill),
        1 => Just(Op::Clear),
        1 => (value(), value()).prop_map(|(a, b)| Op::Replace(a, b)),
    ]
}

fn brute_count(c: &VoxelChunk) -> usize {
    c.as_bytes().iter().filter(|&&b| b != 0).count()
}

proptest! {
    // Counter always matches the number of non-empty cells
    #[test]
    fn count_matches_contents(ops in prop::collection::vec(op(), 0..200)) {
        let mut c = VoxelChunk::new();
        for op in ops {
            match op {
                Op::Set(x, y, z, v) => c.set(x, y, z, VoxelType(v)),
                Op::Fill(v) => c.fill(VoxelType(v)),
                Op::Clear => c.clear(),
                Op::Replace(a, b) => { c.replace(VoxelType(a), VoxelType(b)); }
            }
            prop_assert_eq!(c.non_empty_count(), brute_count(&c));
            prop_assert_eq!(c.is_empty(), c.non_empty_count() == 0);
        }
    }

    // idx maps each local coordinate to a unique in-range index and back
    #[test]
    fn idx_roundtrips(x in local(), y in local(), z in local()) {
        let i = VoxelChunk::idx(x, y, z);
        prop_assert!(i < CHUNK_VOLUME);
        prop_assert_eq!(i, x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE);
        prop_assert_eq!(VoxelChunk::coords(i), (x, y, z));
    }

    // iter_non_empty yields exactly the non-empty cells in ascending index order
    #[test]
    fn iteration_matches_get(cells in prop::collection::vec((local(), local(), local(), value()), 0..64)) {
        let mut c = VoxelChunk::new();
        for (x, y, z, v) in cells {
            c.set(x, y, z, VoxelType(v));
        }
        let items: Vec<_> = c.iter_non_empty().collect();
        prop_assert_eq!(items.len(), c.non_empty_count());
        let mut last = None;
        for (x, y, z, v) in items {
            prop_assert_eq!(c.get(x, y, z), v);
            prop_assert!(v.is_occupied());
            let i = VoxelChunk::idx(x, y, z);
            if let Some(prev) = last {
                prop_assert!(i > prev);
            }
            last = Some(i);
        }
    }

    // Payload round-trip reproduces data and count
    #[test]
    fn payload_roundtrip(cells in prop::collection::vec((local(), local(), local(), value()), 0..64)) {
        let mut c = VoxelChunk::new();
        for (x, y, z, v) in cells {
            c.set(x, y, z, VoxelType(v));
        }
        let p = c.to_payload();
        prop_assert_eq!(p.voxels.len(), CHUNK_VOLUME);
        let back = VoxelChunk::from_payload(&p).unwrap();
        prop_assert_eq!(back.non_empty_count(), c.non_empty_count());
        prop_assert_eq!(back.as_bytes(), c.as_bytes());
        let raw = VoxelChunk::from_bytes(c.as_bytes()).unwrap();
        prop_assert_eq!(raw, c);
    }
}
