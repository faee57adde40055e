//! Parameters in, files out.

use harnessgen_camtools::{
    generate_3d, generate_profiles, validate, write_all, write_profiles, ProfileRole, Severity,
    VectorOptions,
};
use harnessgen_core::{Param, ParameterStore};
use tempfile::TempDir;

#[test]
fn test_reference_design_produces_all_files() {
    let store = ParameterStore::new();
    store.set("circumradius", 50.0).unwrap();
    store.set("magnetCount", 6.0).unwrap();
    store.set("magnetDiameter", 5.0).unwrap();
    store.set("ringRadius", 20.0).unwrap();
    store.set("clearance", 1.0).unwrap();
    let params = store.snapshot();

    let report = validate(&params);
    assert_eq!(
        report.findings.iter().filter(|f| f.severity == Severity::Error).count(),
        0,
        "{:?}",
        report.findings
    );

    let profiles = generate_profiles(&params).unwrap();
    let tile = &profiles[0];
    assert_eq!(tile.outline().unwrap().vertex_count(), 6);
    assert_eq!(tile.count(ProfileRole::MagnetHole), 6);

    let solids = generate_3d(&params).unwrap();
    assert!(solids.iter().all(|s| s.mesh.is_closed()));

    let dir = TempDir::new().unwrap();
    let dxfs = write_profiles(&profiles, dir.path(), &VectorOptions::default()).unwrap();
    let stls = write_all(&solids, dir.path()).unwrap();

    assert!(dxfs.iter().all(|p| std::fs::metadata(p).unwrap().len() > 0));
    assert_eq!(dxfs.len(), 3);
    assert_eq!(stls.len(), 4);
    let mut names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "connector.stl",
            "foam_piece_hexagon.dxf",
            "liner_spacer.stl",
            "magnet_carrier.stl",
            "magnet_ring_hexagon.dxf",
            "strap_clip.stl",
            "tile_hexagon.dxf",
        ]
    );
}

#[test]
fn test_infeasible_design_writes_nothing() {
    let store = ParameterStore::new();
    store.set_param(Param::CarrierHeight, 1.0).unwrap();
    let params = store.snapshot();

    assert!(validate(&params).find(harnessgen_camtools::RuleId::CarrierDepth).is_some());
    assert!(generate_3d(&params).is_err());
}
