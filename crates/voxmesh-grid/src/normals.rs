use hashbrown::HashMap;
use voxmesh_geom::Vec3;

use crate::VoxelPos;

/// Per-voxel surface normals. Each voxel keeps an insertion-ordered list so
/// that differently oriented faces sharing a voxel stay distinct.
#[derive(Clone, Debug, Default)]
pub struct SurfaceNormals {
    map: HashMap<VoxelPos, Vec<Vec3>>,
}

impl SurfaceNormals {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn first(&self, v: VoxelPos) -> Option<Vec3> {
        self.map.get(&v).and_then(|l| l.first().copied())
    }

    #[inline]
    pub fn all(&self, v: VoxelPos) -> &[Vec3] {
        self.map.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn contains(&self, v: VoxelPos) -> bool {
        self.map.get(&v).is_some_and(|l| !l.is_empty())
    }

    pub fn push(&mut self, v: VoxelPos, n: Vec3) {
        self.map.entry(v).or_default().push(n);
    }

    /// Replaces the list for `v`. An empty list removes the entry.
    pub fn replace(&mut self, v: VoxelPos, normals: Vec<Vec3>) {
        if normals.is_empty() {
            self.map.remove(&v);
        } else {
            self.map.insert(v, normals);
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of voxels carrying at least one normal.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.map.len()
    }

    /// Total number of stored normals across all voxels.
    pub fn entry_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Voxels with normals, sorted by coordinate.
    pub fn voxels(&self) -> Vec<VoxelPos> {
        let mut out: Vec<VoxelPos> = self.map.keys().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoxelPos, &[Vec3])> {
        self.map.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
