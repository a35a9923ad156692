//! Sparse chunked voxel grid: chunk index, coordinate mapping, surface
//! normal storage and persisted payloads.
#![forbid(unsafe_code)]

use thiserror::Error;

mod grid;
mod key;
mod mapper;
mod normals;
mod payload;

pub use grid::{GridStats, VoxelGrid};
pub use key::{ChunkKey, split_voxel};
pub use mapper::CoordinateMapper;
pub use normals::SurfaceNormals;
pub use payload::{ChunkEntry, GridPayload};

pub use voxmesh_chunk::{CHUNK_SIZE, ChunkError, ChunkPayload, VoxelChunk, VoxelType};

/// Global voxel coordinate.
pub type VoxelPos = (i32, i32, i32);

/// Largest voxel coordinate magnitude mesh input may reach. Two chunks of
/// headroom below the `i32` limits let passes step a chunk and a voxel past
/// any occupied chunk.
pub const VOXEL_LIMIT: i32 = (i32::MAX / CHUNK_SIZE as i32 - 2) * CHUNK_SIZE as i32;

/// `v + d`, or `None` when a coordinate leaves the `i32` range. Such
/// neighbors cannot be stored and read as EMPTY.
#[inline]
pub fn neighbor(v: VoxelPos, d: VoxelPos) -> Option<VoxelPos> {
    Some((
        v.0.checked_add(d.0)?,
        v.1.checked_add(d.1)?,
        v.2.checked_add(d.2)?,
    ))
}

/// The six axis neighbor offsets.
pub const NEIGHBORS_6: [VoxelPos; 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f64),
    #[error("grid origin must be finite")]
    NonFiniteOrigin,
    #[error("chunk {0:?} appears more than once")]
    DuplicateChunk(ChunkKey),
    #[error("chunk {0:?} lies outside the i32 voxel range")]
    KeyOutOfRange(ChunkKey),
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}
