use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use voxmesh_geom::Vec3;
use voxmesh_grid::VoxelType;
use voxmesh_voxelize::{PipelineOptions, TriangleMesh};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct VoxmeshConfig {
    #[serde(default)]
    pub grid: GridSection,
    #[serde(default)]
    pub passes: PassesSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GridSection {
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub origin: [f64; 3],
}

fn default_cell_size() -> f64 {
    1.0
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            origin: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PassesSection {
    #[serde(default = "default_true")]
    pub fill: bool,
    #[serde(default = "default_true")]
    pub surface: bool,
    #[serde(default = "default_true")]
    pub normals: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PassesSection {
    fn default() -> Self {
        Self {
            fill: true,
            surface: true,
            normals: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OutputSection {
    #[serde(default)]
    pub prune_empty: bool,
}

impl VoxmeshConfig {
    pub fn origin(&self) -> Vec3 {
        Vec3::from(self.grid.origin)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            target: VoxelType::SOLID,
            fill: self.passes.fill.then_some(VoxelType::SOLID),
            surface: self.passes.surface.then_some(VoxelType::SURFACE),
            normals: self.passes.normals,
        }
    }
}

pub fn load_config(path: &Path) -> Result<VoxmeshConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: VoxmeshConfig = toml::from_str(&s)?;
    Ok(cfg)
}

/// On-disk mesh: `vertices = [[x, y, z], ...]`, `triangles = [[a, b, c], ...]`.
#[derive(Clone, Debug, Deserialize)]
pub struct MeshFile {
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub triangles: Vec<[u32; 3]>,
}

impl MeshFile {
    pub fn into_mesh(self) -> Result<TriangleMesh, Box<dyn Error>> {
        let vertices = self.vertices.into_iter().map(Vec3::from).collect();
        Ok(TriangleMesh::new(vertices, self.triangles)?)
    }
}

pub fn parse_mesh(s: &str) -> Result<TriangleMesh, Box<dyn Error>> {
    let file: MeshFile = toml::from_str(s)?;
    file.into_mesh()
}

pub fn load_mesh(path: &Path) -> Result<TriangleMesh, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    parse_mesh(&s)
}
