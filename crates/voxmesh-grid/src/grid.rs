use hashbrown::HashMap;
use voxmesh_chunk::{CHUNK_SIZE, VoxelChunk, VoxelType};
use voxmesh_geom::{Aabb, Vec3};

use crate::key::{ChunkKey, split_voxel};
use crate::mapper::CoordinateMapper;
use crate::normals::SurfaceNormals;
use crate::{GridError, VoxelPos};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStats {
    pub chunks: usize,
    pub empty_chunks: usize,
    pub voxels: usize,
    pub normal_voxels: usize,
    pub normal_entries: usize,
}

/// Sparse chunked voxel grid.
///
/// Chunks live in an arena (`chunks`, with `keys` in lockstep) and are found
/// through `index`. A chunk exists once any write touched it and stays even
/// when its count drops back to zero; only [`VoxelGrid::clear`] and
/// [`VoxelGrid::prune_empty_chunks`] remove entries.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    mapper: CoordinateMapper,
    chunks: Vec<VoxelChunk>,
    keys: Vec<ChunkKey>,
    index: HashMap<ChunkKey, usize>,
    normals: SurfaceNormals,
}

impl VoxelGrid {
    pub fn new(cell_size: f64, origin: Vec3) -> Result<Self, GridError> {
        Ok(Self::with_mapper(CoordinateMapper::new(cell_size, origin)?))
    }

    pub fn with_mapper(mapper: CoordinateMapper) -> Self {
        Self {
            mapper,
            chunks: Vec::new(),
            keys: Vec::new(),
            index: HashMap::new(),
            normals: SurfaceNormals::new(),
        }
    }

    #[inline]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.mapper.cell_size()
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.mapper.origin()
    }

    #[inline]
    pub fn world_to_voxel(&self, p: Vec3) -> VoxelPos {
        self.mapper.world_to_voxel(p)
    }

    #[inline]
    pub fn try_world_to_voxel(&self, p: Vec3) -> Option<VoxelPos> {
        self.mapper.try_world_to_voxel(p)
    }

    #[inline]
    pub fn voxel_to_world(&self, v: VoxelPos) -> Vec3 {
        self.mapper.voxel_to_world(v)
    }

    #[inline]
    pub fn voxel_center(&self, v: VoxelPos) -> Vec3 {
        self.mapper.voxel_center(v)
    }

    #[inline]
    pub fn chunk_key(&self, v: VoxelPos) -> ChunkKey {
        ChunkKey::of_voxel(v.0, v.1, v.2)
    }

    // --- chunk index ---

    /// Existing chunk for `key`, or a fresh all-EMPTY one. Keys outside
    /// [`ChunkKey::MIN`]..=[`ChunkKey::MAX`] own no `i32` voxel and are
    /// rejected.
    pub fn get_or_create_chunk(&mut self, key: ChunkKey) -> Result<&mut VoxelChunk, GridError> {
        if !key.in_range() {
            return Err(GridError::KeyOutOfRange(key));
        }
        let slot = self.slot(key);
        Ok(&mut self.chunks[slot])
    }

    // Arena slot for `key`, allocating on first use.
    fn slot(&mut self, key: ChunkKey) -> usize {
        match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.chunks.len();
                self.chunks.push(VoxelChunk::new());
                self.keys.push(key);
                self.index.insert(key, i);
                i
            }
        }
    }

    #[inline]
    pub fn chunk(&self, key: ChunkKey) -> Option<&VoxelChunk> {
        self.index.get(&key).map(|&i| &self.chunks[i])
    }

    #[inline]
    pub fn chunk_mut(&mut self, key: ChunkKey) -> Option<&mut VoxelChunk> {
        self.index.get(&key).map(|&i| &mut self.chunks[i])
    }

    #[inline]
    pub fn has_chunk(&self, key: ChunkKey) -> bool {
        self.index.contains_key(&key)
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// All chunk keys, sorted.
    pub fn chunk_keys(&self) -> Vec<ChunkKey> {
        let mut keys = self.keys.clone();
        keys.sort_unstable();
        keys
    }

    /// Chunks in arena order.
    pub fn iter_chunks(&self) -> impl Iterator<Item = (ChunkKey, &VoxelChunk)> {
        self.keys.iter().copied().zip(self.chunks.iter())
    }

    // --- voxel access ---

    /// Reads a voxel. Missing chunks read as EMPTY and are not allocated.
    #[inline]
    pub fn get(&self, v: VoxelPos) -> VoxelType {
        let (key, (lx, ly, lz)) = split_voxel(v.0, v.1, v.2);
        match self.chunk(key) {
            Some(c) => c.get(lx, ly, lz),
            None => VoxelType::EMPTY,
        }
    }

    #[inline]
    pub fn set(&mut self, v: VoxelPos, value: VoxelType) {
        let (key, (lx, ly, lz)) = split_voxel(v.0, v.1, v.2);
        let slot = self.slot(key);
        self.chunks[slot].set(lx, ly, lz, value);
    }

    /// Writes `value` into every voxel of the inclusive box `min..=max`.
    pub fn set_box(&mut self, min: VoxelPos, max: VoxelPos, value: VoxelType) {
        for z in min.2..=max.2 {
            for y in min.1..=max.1 {
                for x in min.0..=max.0 {
                    self.set((x, y, z), value);
                }
            }
        }
    }

    pub fn voxel_count(&self) -> usize {
        self.chunks.iter().map(VoxelChunk::non_empty_count).sum()
    }

    pub fn count_by_type(&self, ty: VoxelType) -> usize {
        self.chunks.iter().map(|c| c.count_of(ty)).sum()
    }

    /// Global coordinates of every stored voxel equal to `ty`, sorted.
    pub fn voxels_of_type(&self, ty: VoxelType) -> Vec<VoxelPos> {
        let mut out = Vec::new();
        for (key, chunk) in self.iter_chunks() {
            if ty.is_occupied() && chunk.is_empty() {
                continue;
            }
            let (bx, by, bz) = key.base_voxel();
            for (i, &b) in chunk.as_bytes().iter().enumerate() {
                if b == ty.raw() {
                    let (x, y, z) = VoxelChunk::coords(i);
                    out.push((bx + x as i32, by + y as i32, bz + z as i32));
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Drops every chunk and every stored normal.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.keys.clear();
        self.index.clear();
        self.normals.clear();
    }

    /// Resets every voxel of type `ty` to EMPTY. Chunks are kept even when
    /// they end up empty. Returns the number of voxels reset.
    pub fn clear_by_type(&mut self, ty: VoxelType) -> usize {
        if ty.is_empty() {
            return 0;
        }
        self.chunks
            .iter_mut()
            .map(|c| c.replace(ty, VoxelType::EMPTY))
            .sum()
    }

    /// Removes chunks whose count is zero. Returns how many were removed.
    pub fn prune_empty_chunks(&mut self) -> usize {
        let mut removed = 0;
        let mut i = self.chunks.len();
        while i > 0 {
            i -= 1;
            if !self.chunks[i].is_empty() {
                continue;
            }
            let key = self.keys[i];
            self.chunks.swap_remove(i);
            self.keys.swap_remove(i);
            self.index.remove(&key);
            if i < self.keys.len() {
                self.index.insert(self.keys[i], i);
            }
            removed += 1;
        }
        if removed > 0 {
            log::debug!("pruned {} empty chunk(s)", removed);
        }
        removed
    }

    // --- bounds ---

    /// Inclusive bounding box of all chunk keys.
    pub fn chunk_bounds(&self) -> Option<(ChunkKey, ChunkKey)> {
        let (first, rest) = self.keys.split_first()?;
        let mut lo = *first;
        let mut hi = *first;
        for k in rest {
            lo = lo.min(*k);
            hi = hi.max(*k);
        }
        Some((lo, hi))
    }

    /// Inclusive voxel box covered by all chunks.
    pub fn voxel_bounds(&self) -> Option<(VoxelPos, VoxelPos)> {
        let (lo, hi) = self.chunk_bounds()?;
        let n = CHUNK_SIZE as i32;
        let min = lo.base_voxel();
        let (hx, hy, hz) = hi.base_voxel();
        Some((min, (hx + (n - 1), hy + (n - 1), hz + (n - 1))))
    }

    /// World-space box covered by all chunks.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let (min, max) = self.voxel_bounds()?;
        Some(self.mapper.voxel_box_to_world(min, max))
    }

    /// Tight inclusive box around non-empty voxels.
    pub fn occupied_voxel_bounds(&self) -> Option<(VoxelPos, VoxelPos)> {
        let mut out: Option<(VoxelPos, VoxelPos)> = None;
        for (key, chunk) in self.iter_chunks() {
            if chunk.is_empty() {
                continue;
            }
            let (bx, by, bz) = key.base_voxel();
            for (x, y, z, _) in chunk.iter_non_empty() {
                let v = (bx + x as i32, by + y as i32, bz + z as i32);
                out = Some(match out {
                    None => (v, v),
                    Some((lo, hi)) => (
                        (lo.0.min(v.0), lo.1.min(v.1), lo.2.min(v.2)),
                        (hi.0.max(v.0), hi.1.max(v.1), hi.2.max(v.2)),
                    ),
                });
            }
        }
        out
    }

    // --- surface normals ---

    #[inline]
    pub fn normals(&self) -> &SurfaceNormals {
        &self.normals
    }

    #[inline]
    pub fn get_surface_normal(&self, v: VoxelPos) -> Option<Vec3> {
        self.normals.first(v)
    }

    #[inline]
    pub fn get_surface_normals(&self, v: VoxelPos) -> &[Vec3] {
        self.normals.all(v)
    }

    #[inline]
    pub fn has_surface_normal(&self, v: VoxelPos) -> bool {
        self.normals.contains(v)
    }

    pub fn add_surface_normal(&mut self, v: VoxelPos, n: Vec3) {
        self.normals.push(v, n);
    }

    pub fn set_surface_normals(&mut self, v: VoxelPos, normals: Vec<Vec3>) {
        self.normals.replace(v, normals);
    }

    pub fn clear_surface_normals(&mut self) {
        self.normals.clear();
    }

    #[inline]
    pub fn surface_normal_count(&self) -> usize {
        self.normals.voxel_count()
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            chunks: self.chunks.len(),
            empty_chunks: self.chunks.iter().filter(|c| c.is_empty()).count(),
            voxels: self.voxel_count(),
            normal_voxels: self.normals.voxel_count(),
            normal_entries: self.normals.entry_count(),
        }
    }

    // Used by payload restore; keys must be unique.
    pub(crate) fn insert_chunk(
        &mut self,
        key: ChunkKey,
        chunk: VoxelChunk,
    ) -> Result<(), GridError> {
        if !key.in_range() {
            return Err(GridError::KeyOutOfRange(key));
        }
        if self.index.contains_key(&key) {
            return Err(GridError::DuplicateChunk(key));
        }
        self.index.insert(key, self.chunks.len());
        self.chunks.push(chunk);
        self.keys.push(key);
        Ok(())
    }
}
