use voxmesh_geom::Vec3;
use voxmesh_grid::{VoxelGrid, VoxelType};
use voxmesh_voxelize::{
    PipelineOptions, TriangleMesh, compute_surface_normals, extract_surface, fill_interior,
    MeshError, mark_surface, run_pipeline, voxelize_mesh,
};

fn grid(cell: f64) -> VoxelGrid {
    VoxelGrid::new(cell, Vec3::ZERO).unwrap()
}

fn in_box(v: (i32, i32, i32), lo: i32, hi: i32) -> bool {
    (lo..=hi).contains(&v.0) && (lo..=hi).contains(&v.1) && (lo..=hi).contains(&v.2)
}

#[test]
fn unit_cube_stays_in_its_voxel_bounds() {
    let mut g = grid(1.0);
    let cube = TriangleMesh::cuboid(Vec3::ZERO, Vec3::splat(1.0));
    let stats = voxelize_mesh(&mut g, &cube, VoxelType::SOLID).unwrap();
    assert_eq!(stats.triangles, 12);
    assert_eq!(stats.degenerate, 0);
    let solid = g.voxels_of_type(VoxelType::SOLID);
    assert!(solid.iter().all(|&v| in_box(v, 0, 1)));
    // the faces at 1.0 belong to the cells above them
    assert_eq!(solid.len(), 8);
}

#[test]
fn triangle_on_a_grid_plane_marks_one_layer() {
    let mut g = grid(1.0);
    let tri = TriangleMesh::new(
        vec![
            Vec3::new(0.5, 0.5, 2.0),
            Vec3::new(2.5, 0.5, 2.0),
            Vec3::new(0.5, 2.5, 2.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    voxelize_mesh(&mut g, &tri, VoxelType::SOLID).unwrap();
    let solid = g.voxels_of_type(VoxelType::SOLID);
    assert!(!solid.is_empty());
    assert!(solid.iter().all(|v| v.2 == 2), "{solid:?}");
    assert!(solid.contains(&(0, 0, 2)));
    assert!(solid.contains(&(2, 0, 2)));
}

#[test]
fn grid_aligned_cube_owns_its_max_faces() {
    let mut g = grid(1.0);
    let (lo, hi) = (Vec3::ZERO, Vec3::splat(2.0));
    let cube = TriangleMesh::cuboid(lo, hi);
    voxelize_mesh(&mut g, &cube, VoxelType::SOLID).unwrap();
    let (vlo, vhi) = (g.world_to_voxel(lo), g.world_to_voxel(hi));
    assert_eq!((vlo, vhi), ((0, 0, 0), (2, 2, 2)));

    let solid = g.voxels_of_type(VoxelType::SOLID);
    assert!(solid.iter().all(|&v| in_box(v, vlo.0, vhi.0)));
    // nothing leaks below the min faces
    assert!(solid.iter().all(|v| v.0 >= 0 && v.1 >= 0 && v.2 >= 0));
    // every cell of {0,1,2}^3 except the one strictly inside
    assert_eq!(solid.len(), 26);
    assert!(!solid.contains(&(1, 1, 1)));
    assert!(solid.contains(&(2, 2, 2)));
    assert!(solid.contains(&(0, 1, 1)));

    assert_eq!(fill_interior(&mut g, VoxelType::SOLID).filled, 1);
}

#[test]
fn out_of_range_mesh_is_rejected_without_writes() {
    let mut g = grid(1.0);
    let far = TriangleMesh::cuboid(Vec3::splat(3.0e9), Vec3::splat(3.0e9 + 1.0));
    assert!(matches!(
        run_pipeline(&mut g, &far, &PipelineOptions::default()),
        Err(MeshError::OutOfGridRange { .. })
    ));
    assert_eq!(g.chunk_count(), 0);
    assert_eq!(g.surface_normal_count(), 0);

    // a small cell size pushes modest coordinates out of range too
    let mut fine = grid(1.0e-6);
    let cube = TriangleMesh::cuboid(Vec3::ZERO, Vec3::splat(5000.0));
    assert!(voxelize_mesh(&mut fine, &cube, VoxelType::SOLID).is_err());
    assert_eq!(fine.chunk_count(), 0);
}

#[test]
fn cube_inside_one_voxel_marks_only_that_voxel() {
    let mut g = grid(1.0);
    let cube = TriangleMesh::cuboid(Vec3::splat(0.25), Vec3::splat(0.75));
    voxelize_mesh(&mut g, &cube, VoxelType::SOLID).unwrap();
    assert_eq!(g.voxels_of_type(VoxelType::SOLID), vec![(0, 0, 0)]);
    assert_eq!(g.chunk_count(), 1);
}

#[test]
fn cube_across_negative_chunks() {
    let mut g = grid(0.5);
    let cube = TriangleMesh::cuboid(Vec3::splat(-9.75), Vec3::splat(-0.25));
    voxelize_mesh(&mut g, &cube, VoxelType::SOLID).unwrap();
    // voxel range -20..=-1 on each axis, split across chunks -2 and -1
    assert_eq!(g.chunk_count(), 8);
    assert_eq!(g.occupied_voxel_bounds(), Some(((-20, -20, -20), (-1, -1, -1))));
    let filled = fill_interior(&mut g, VoxelType::SOLID);
    assert_eq!(filled.filled, 18 * 18 * 18);
    assert_eq!(g.voxel_count(), 20 * 20 * 20);
}

#[test]
fn hollow_box_fill_leaves_exterior_alone() {
    let mut g = grid(1.0);
    let shell = TriangleMesh::cuboid(Vec3::splat(0.5), Vec3::splat(6.5));
    voxelize_mesh(&mut g, &shell, VoxelType::SOLID).unwrap();
    assert_eq!(g.voxel_count(), 7 * 7 * 7 - 5 * 5 * 5);
    assert!(g.get((3, 3, 3)).is_empty());

    let stats = fill_interior(&mut g, VoxelType::SOLID);
    assert_eq!(stats.filled, 5 * 5 * 5);
    assert_eq!(g.voxel_count(), 7 * 7 * 7);
    for z in 1..=5 {
        for y in 1..=5 {
            for x in 1..=5 {
                assert_eq!(g.get((x, y, z)), VoxelType::SOLID);
            }
        }
    }
    let outside = [
        (-1, 3, 3),
        (7, 3, 3),
        (3, -1, 3),
        (3, 7, 3),
        (3, 3, -1),
        (3, 3, 7),
        (20, 20, 20),
    ];
    for v in outside {
        assert!(g.get(v).is_empty(), "exterior voxel {v:?} changed");
    }
}

#[test]
fn surface_after_fill_is_outer_shell() {
    let mut g = grid(1.0);
    g.set_box((0, 0, 0), (4, 4, 4), VoxelType::SOLID);
    let marked = mark_surface(&mut g, VoxelType::SURFACE);
    assert_eq!(marked, 5 * 5 * 5 - 3 * 3 * 3);
    for v in g.voxels_of_type(VoxelType::SURFACE) {
        assert!([v.0, v.1, v.2].iter().any(|&c| c == 0 || c == 4));
    }
    assert_eq!(g.count_by_type(VoxelType::SOLID), 27);
    assert_eq!(extract_surface(&g).len(), marked);
}

#[test]
fn quad_normals_one_per_voxel() {
    let mut g = grid(1.0);
    let quad = TriangleMesh::new(
        vec![
            Vec3::new(0.25, 0.25, 0.5),
            Vec3::new(2.75, 0.25, 0.5),
            Vec3::new(2.75, 2.75, 0.5),
            Vec3::new(0.25, 2.75, 0.5),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap();
    voxelize_mesh(&mut g, &quad, VoxelType::SURFACE).unwrap();
    let surf = g.voxels_of_type(VoxelType::SURFACE);
    assert_eq!(surf.len(), 9);

    let stats = compute_surface_normals(&mut g, &quad);
    assert_eq!(stats.voxels, 9);
    for v in surf {
        assert_eq!(g.get_surface_normals(v), &[Vec3::Z], "voxel {v:?}");
    }
}

#[test]
fn full_pipeline_on_hollow_box() {
    let mut g = grid(1.0);
    let shell = TriangleMesh::cuboid(Vec3::splat(0.5), Vec3::splat(6.5));
    let report = run_pipeline(&mut g, &shell, &PipelineOptions::default()).unwrap();

    assert_eq!(report.voxelize.triangles, 12);
    assert_eq!(report.fill.map(|f| f.filled), Some(125));
    assert_eq!(report.surface_marked, Some(7 * 7 * 7 - 5 * 5 * 5));
    assert_eq!(report.normals.map(|n| n.voxels), Some(7 * 7 * 7 - 5 * 5 * 5));

    assert_eq!(g.count_by_type(VoxelType::SOLID), 125);
    assert_eq!(g.get_surface_normals((0, 3, 3)), &[-Vec3::X]);
    assert_eq!(g.get_surface_normals((6, 3, 3)), &[Vec3::X]);
    // corners see three faces
    assert_eq!(g.get_surface_normals((0, 0, 0)).len(), 3);
    assert!(!g.has_surface_normal((3, 3, 3)));
}

#[test]
fn pipeline_passes_can_be_skipped() {
    let mut g = grid(1.0);
    let shell = TriangleMesh::cuboid(Vec3::splat(0.5), Vec3::splat(6.5));
    let options = PipelineOptions {
        fill: None,
        surface: None,
        normals: false,
        ..Default::default()
    };
    let report = run_pipeline(&mut g, &shell, &options).unwrap();
    assert!(report.fill.is_none());
    assert!(report.surface_marked.is_none());
    assert!(report.normals.is_none());
    assert!(g.get((3, 3, 3)).is_empty());
    assert_eq!(g.surface_normal_count(), 0);
}
