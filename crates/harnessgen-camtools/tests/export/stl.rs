use harnessgen_camtools::export::solid_file_name;
use harnessgen_camtools::geometry::{CsgNode, Mesh3D, Placement, Primitive};
use harnessgen_camtools::{generate_3d, write_all, write_mesh, ExportError, Peripheral, Solid3D};
use harnessgen_core::{normalize, ParameterSet};
use std::fs::File;
use tempfile::TempDir;

#[test]
fn test_carrier_reads_back() {
    let dir = TempDir::new().unwrap();
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let carrier = &solids[0];
    let path = dir.path().join("carrier.stl");

    write_mesh(carrier, &path).unwrap();
    let mut file = File::open(&path).unwrap();
    let mesh = stl_io::read_stl(&mut file).unwrap();

    assert_eq!(mesh.faces.len(), carrier.mesh.triangle_count());
    for vertex in &mesh.vertices {
        for c in [vertex[0], vertex[1], vertex[2]] {
            assert!(c.is_finite());
            assert!((c as f64 - normalize(c as f64)).abs() < 1e-5);
        }
    }
    let top = mesh
        .vertices
        .iter()
        .map(|v| v[2])
        .fold(f32::MIN, f32::max);
    assert_eq!(top, 4.0);
}

#[test]
fn test_write_all_uses_standard_names() {
    let dir = TempDir::new().unwrap();
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();

    let paths = write_all(&solids, dir.path()).unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "magnet_carrier.stl",
            "connector.stl",
            "liner_spacer.stl",
            "strap_clip.stl"
        ]
    );
    for (path, solid) in paths.iter().zip(&solids) {
        assert_eq!(path.file_name().unwrap().to_string_lossy(), solid_file_name(solid));
        assert!(std::fs::metadata(path).unwrap().len() > 84);
    }
}

#[test]
fn test_empty_mesh_is_refused_without_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.stl");
    let solid = Solid3D {
        peripheral: Peripheral::Connector,
        tree: CsgNode::leaf(
            Primitive::Box {
                width: 1.0,
                depth: 1.0,
                height: 1.0,
            },
            Placement::identity(),
        ),
        mesh: Mesh3D::new(Vec::new()),
    };

    let err = write_mesh(&solid, &path).unwrap_err();
    assert!(matches!(err, ExportError::MalformedGeometry(_)));
    assert!(err.to_string().contains("connector"));
    assert!(!path.exists());
}

#[test]
fn test_open_mesh_is_refused_without_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("open.stl");
    let tree = CsgNode::leaf(
        Primitive::Box {
            width: 2.0,
            depth: 2.0,
            height: 1.0,
        },
        Placement::identity(),
    );
    let closed = tree.evaluate(Peripheral::LinerSpacer).unwrap();
    // Side walls only: their normals still cancel
    let walls: Vec<_> = closed
        .triangles
        .iter()
        .filter(|t| t.normal.z.abs() < 0.5)
        .cloned()
        .collect();
    let solid = Solid3D {
        peripheral: Peripheral::LinerSpacer,
        tree,
        mesh: Mesh3D::new(walls),
    };
    assert!(solid.mesh.vector_area().norm() < 1e-9);

    let err = write_mesh(&solid, &path).unwrap_err();
    assert!(matches!(err, ExportError::MalformedGeometry(_)));
    assert!(err.to_string().contains("not closed"), "{err}");
    assert!(!path.exists());
}

#[test]
fn test_missing_directory_reports_path() {
    let dir = TempDir::new().unwrap();
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let path = dir.path().join("missing").join("liner.stl");

    match write_mesh(&solids[2], &path) {
        Err(ExportError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected {:?}", other),
    }
}
