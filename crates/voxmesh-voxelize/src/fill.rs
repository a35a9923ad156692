use std::collections::VecDeque;
use std::time::Instant;

use bitvec::vec::BitVec;
use voxmesh_grid::{CHUNK_SIZE, NEIGHBORS_6, VoxelGrid, VoxelPos, VoxelType, neighbor};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStats {
    pub region_voxels: usize,
    pub exterior: usize,
    pub filled: usize,
}

// Inclusive voxel box searched by the flood fill, with a dense visited bitmap
// indexed by global coordinate relative to `lo`.
struct Region {
    lo: VoxelPos,
    hi: VoxelPos,
    dx: usize,
    dy: usize,
    visited: BitVec,
}

impl Region {
    fn new(lo: VoxelPos, hi: VoxelPos) -> Self {
        let span = |a: i32, b: i32| (b as i64 - a as i64 + 1) as usize;
        let dx = span(lo.0, hi.0);
        let dy = span(lo.1, hi.1);
        let dz = span(lo.2, hi.2);
        Self {
            lo,
            hi,
            dx,
            dy,
            visited: BitVec::repeat(false, dx * dy * dz),
        }
    }

    #[inline]
    fn contains(&self, v: VoxelPos) -> bool {
        v.0 >= self.lo.0
            && v.0 <= self.hi.0
            && v.1 >= self.lo.1
            && v.1 <= self.hi.1
            && v.2 >= self.lo.2
            && v.2 <= self.hi.2
    }

    #[inline]
    fn idx(&self, v: VoxelPos) -> usize {
        let x = (v.0 as i64 - self.lo.0 as i64) as usize;
        let y = (v.1 as i64 - self.lo.1 as i64) as usize;
        let z = (v.2 as i64 - self.lo.2 as i64) as usize;
        x + y * self.dx + z * self.dx * self.dy
    }

    #[inline]
    fn is_visited(&self, v: VoxelPos) -> bool {
        self.visited[self.idx(v)]
    }

    /// Marks `v` visited; returns false if it already was.
    #[inline]
    fn visit(&mut self, v: VoxelPos) -> bool {
        let i = self.idx(v);
        if self.visited[i] {
            return false;
        }
        self.visited.set(i, true);
        true
    }

    fn is_boundary(&self, v: VoxelPos) -> bool {
        v.0 == self.lo.0
            || v.0 == self.hi.0
            || v.1 == self.lo.1
            || v.1 == self.hi.1
            || v.2 == self.lo.2
            || v.2 == self.hi.2
    }
}

// Voxel span of chunks `klo..=khi` grown by one chunk, clipped to `i32`.
fn grown_span(klo: i32, khi: i32) -> (i32, i32) {
    let n = CHUNK_SIZE as i64;
    let lo = (klo as i64 - 1) * n;
    let hi = (khi as i64 + 2) * n - 1;
    (
        lo.max(i32::MIN as i64) as i32,
        hi.min(i32::MAX as i64) as i32,
    )
}

/// Fills every EMPTY voxel that cannot reach open space with `fill_value`.
///
/// The search region is the bounding box of all chunks grown by one chunk on
/// every side, so its outer faces lie in chunks that do not exist and are
/// all EMPTY. At the edges of the `i32` range the region is clipped and
/// space beyond it counts as exterior. The EMPTY voxels of those faces seed
/// a 6-connected breadth-first flood over EMPTY voxels; whatever EMPTY voxel
/// the flood never reaches is enclosed.
pub fn fill_interior(grid: &mut VoxelGrid, fill_value: VoxelType) -> FillStats {
    if fill_value.is_empty() {
        log::warn!("fill_interior called with EMPTY fill value; nothing to do");
        return FillStats::default();
    }
    let Some((klo, khi)) = grid.chunk_bounds() else {
        return FillStats::default();
    };
    let t0 = Instant::now();
    let (x0, x1) = grown_span(klo.cx, khi.cx);
    let (y0, y1) = grown_span(klo.cy, khi.cy);
    let (z0, z1) = grown_span(klo.cz, khi.cz);
    let (lo, hi) = ((x0, y0, z0), (x1, y1, z1));
    let mut region = Region::new(lo, hi);
    let mut stats = FillStats {
        region_voxels: region.visited.len(),
        ..Default::default()
    };

    let mut queue: VecDeque<VoxelPos> = VecDeque::new();
    for z in lo.2..=hi.2 {
        for y in lo.1..=hi.1 {
            for x in lo.0..=hi.0 {
                let v = (x, y, z);
                if region.is_boundary(v) && grid.get(v).is_empty() && region.visit(v) {
                    queue.push_back(v);
                }
            }
        }
    }

    while let Some(v) = queue.pop_front() {
        stats.exterior += 1;
        for d in NEIGHBORS_6 {
            let Some(nb) = neighbor(v, d) else {
                continue;
            };
            if !region.contains(nb) || region.is_visited(nb) {
                continue;
            }
            if grid.get(nb).is_empty() {
                region.visit(nb);
                queue.push_back(nb);
            }
        }
    }

    // Every EMPTY voxel the flood did not reach is enclosed.
    for z in lo.2 + 1..hi.2 {
        for y in lo.1 + 1..hi.1 {
            for x in lo.0 + 1..hi.0 {
                let v = (x, y, z);
                if !region.is_visited(v) && grid.get(v).is_empty() {
                    grid.set(v, fill_value);
                    stats.filled += 1;
                }
            }
        }
    }

    log::info!(
        target: "perf",
        "ms={} fill_interior region={} exterior={} filled={}",
        t0.elapsed().as_millis(),
        stats.region_voxels,
        stats.exterior,
        stats.filled
    );
    stats
}
