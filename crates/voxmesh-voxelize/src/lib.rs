//! Mesh-to-voxel passes: triangle rasterization, interior flood fill,
//! surface classification and per-voxel normal aggregation.
//!
//! Every pass is a synchronous batch over a `&mut VoxelGrid`.
#![forbid(unsafe_code)]

pub mod fill;
pub mod mesh;
pub mod normals;
pub mod pipeline;
pub mod raster;
pub mod surface;

pub use fill::{FillStats, fill_interior};
pub use mesh::{MeshError, TriangleMesh};
pub use normals::{NormalStats, compute_surface_normals};
pub use pipeline::{PipelineOptions, PipelineReport, run_pipeline};
pub use raster::{
    VoxelizeStats, triangle_footprint, triangle_voxel_range, voxelize_arrays, voxelize_mesh,
};
pub use surface::{clear_by_type, extract_surface, is_boundary_voxel, mark_surface};
