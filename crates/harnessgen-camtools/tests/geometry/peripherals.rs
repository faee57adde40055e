use harnessgen_camtools::geometry::{generate_3d, Peripheral, Primitive, Solid3D};
use harnessgen_camtools::GeometryError;
use harnessgen_core::{Param, ParameterSet, TileType};
use std::f64::consts::PI;

/// Area of a regular polygon with `segments` vertices on radius `r`
fn polygon_area(r: f64, segments: usize) -> f64 {
    0.5 * segments as f64 * r * r * (2.0 * PI / segments as f64).sin()
}

fn assert_volume(solid: &Solid3D, expected: f64) {
    let volume = solid.mesh.signed_volume();
    assert!(
        ((volume - expected) / expected).abs() < 1e-6,
        "{}: expected volume {expected}, got {volume}",
        solid.peripheral
    );
}

#[test]
fn test_reference_peripherals() {
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let kinds: Vec<_> = solids.iter().map(|s| s.peripheral).collect();
    assert_eq!(kinds, Peripheral::ALL);

    for solid in &solids {
        let report = solid.mesh.report();
        assert!(report.is_closed, "{} is open", solid.peripheral);
        assert!(report.is_finite);
        assert!(report.volume > 0.0);
        assert_eq!(report.bounds_min[2], 0.0);
    }
}

#[test]
fn test_carrier_has_one_bore_per_magnet() {
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let carrier = &solids[0];

    let leaves = carrier.tree.leaves();
    assert_eq!(leaves.len(), 7);
    let bores = leaves
        .iter()
        .filter(|(p, _)| matches!(p, Primitive::Cylinder { .. }))
        .count();
    assert_eq!(bores, 6);

    // ring 15.35..24.65 x 4mm, six 2.65mm pockets 2mm deep
    let ring = (polygon_area(24.65, 32) - polygon_area(15.35, 32)) * 4.0;
    let pockets = 6.0 * polygon_area(2.65, 32) * 2.0;
    assert_volume(carrier, ring - pockets);

    let mesh = &carrier.mesh;
    assert!((mesh.bounds_max.z - 4.0).abs() < 1e-9);
    assert!(mesh.bounds_max.x <= 24.65 + 1e-9);
    assert!(mesh.bounds_max.x >= 24.65 * (PI / 32.0).cos() - 1e-9);
}

#[test]
fn test_square_liner_volume() {
    let params = ParameterSet::defaults().with_tile_type(TileType::Square);
    let solids = generate_3d(&params).unwrap();
    let liner = &solids[2];

    assert_volume(liner, 58.0 * 58.0 - polygon_area(10.0, 32));
    assert!((liner.mesh.bounds_max.x - 29.0).abs() < 1e-9);
    assert!((liner.mesh.bounds_min.y + 29.0).abs() < 1e-9);
    assert!((liner.mesh.bounds_max.z - 1.0).abs() < 1e-9);
}

#[test]
fn test_hexagon_liner_volume() {
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let liner = &solids[2];

    // inradius 43.30 less the 1mm inset
    let hexagon = 2.0 * 3.0f64.sqrt() * 42.3 * 42.3;
    assert_volume(liner, hexagon - polygon_area(10.0, 32));
    assert!((liner.mesh.bounds_max.z - 1.0).abs() < 1e-9);
    assert!(liner.mesh.bounds_min.z.abs() < 1e-9);
}

#[test]
fn test_liner_without_tactor_opening() {
    let params = ParameterSet::defaults()
        .with_tile_type(TileType::Square)
        .with(Param::TactorDiameter, 0.0);
    let solids = generate_3d(&params).unwrap();
    assert_volume(&solids[2], 58.0 * 58.0);
}

#[test]
fn test_connector_shape() {
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let connector = &solids[1];
    assert_eq!(connector.tree.leaves().len(), 5);

    let mesh = &connector.mesh;
    // half spacing plus pocket radius plus rim
    assert!(mesh.bounds_max.x <= 7.5 + 4.15 + 1e-9);
    assert!(mesh.bounds_max.x > 7.5 + 4.0);
    assert!((mesh.bounds_max.z - 4.0).abs() < 1e-9);
    assert!(mesh.signed_volume() < 15.0 * 8.3 * 4.0 + polygon_area(4.15, 32) * 4.0);
}

#[test]
fn test_strap_clip_shape() {
    let solids = generate_3d(&ParameterSet::defaults()).unwrap();
    let clip = &solids[3];
    assert_eq!(clip.peripheral, Peripheral::StrapClip);
    assert_eq!(clip.tree.leaves().len(), 3);

    // 14 x 8 plate with 1mm corners of eight chords each, two 10 x 1 slots
    let corner_loss = 1.0 - 4.0 * (PI / 16.0).sin();
    let plate = 14.0 * 8.0 - 4.0 * corner_loss;
    assert_volume(clip, plate - 2.0 * 10.0);

    let mesh = &clip.mesh;
    assert!((mesh.bounds_max.x - 7.0).abs() < 1e-9);
    assert!((mesh.bounds_min.y + 4.0).abs() < 1e-9);
    assert!((mesh.bounds_max.z - 1.0).abs() < 1e-9);
}

#[test]
fn test_infeasible_peripherals_name_the_parameter() {
    let cases = [
        (Param::RingRadius, 4.0, "ringRadius"),
        (Param::CarrierHeight, 1.5, "carrierHeight"),
        (Param::ConnectorThickness, 2.0, "connectorThickness"),
        (Param::LinerInset, 45.0, "linerInset"),
        (Param::TactorDiameter, 90.0, "tactorDiameter"),
        (Param::StrapClipRadius, 3.0, "strapClipRadius"),
    ];
    for (param, value, name) in cases {
        let params = ParameterSet::defaults().with(param, value);
        match generate_3d(&params) {
            Err(GeometryError::Infeasible { parameter, .. }) => assert_eq!(parameter, name),
            other => panic!("{name}: unexpected {:?}", other.map(|s| s.len())),
        }
    }
}
