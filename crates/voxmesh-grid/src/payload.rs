use serde::{Deserialize, Serialize};
use voxmesh_chunk::{ChunkPayload, VoxelChunk};
use voxmesh_geom::Vec3;

use crate::{ChunkKey, GridError, VoxelGrid};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub key: ChunkKey,
    pub payload: ChunkPayload,
}

/// Persisted form of a grid: mapping parameters plus every chunk entry,
/// retained empty chunks included. Normals are derived data and are not
/// part of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPayload {
    pub cell_size: f64,
    pub origin: [f64; 3],
    pub chunks: Vec<ChunkEntry>,
}

impl VoxelGrid {
    /// Snapshot with chunks sorted by key.
    pub fn to_payload(&self) -> GridPayload {
        let mut chunks: Vec<ChunkEntry> = self
            .iter_chunks()
            .map(|(key, chunk)| ChunkEntry {
                key,
                payload: chunk.to_payload(),
            })
            .collect();
        chunks.sort_unstable_by_key(|e| e.key);
        GridPayload {
            cell_size: self.cell_size(),
            origin: self.origin().to_array(),
            chunks,
        }
    }

    pub fn from_payload(payload: &GridPayload) -> Result<Self, GridError> {
        let mut grid = VoxelGrid::new(payload.cell_size, Vec3::from(payload.origin))?;
        for entry in &payload.chunks {
            let chunk = VoxelChunk::from_payload(&entry.payload)?;
            grid.insert_chunk(entry.key, chunk)?;
        }
        log::debug!(
            "restored grid: {} chunk(s), {} voxel(s)",
            grid.chunk_count(),
            grid.voxel_count()
        );
        Ok(grid)
    }
}
