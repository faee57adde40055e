use harnessgen_camtools::geometry::{generate_2d, Point2, ProfileRole};
use harnessgen_camtools::TileMetrics;
use harnessgen_core::{normalize, Param, ParameterSet, TileType};

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

#[test]
fn test_reference_hexagon_profile() {
    let params = ParameterSet::defaults();
    let profile = generate_2d(&params).unwrap();

    let roles: Vec<_> = profile.polylines.iter().map(|p| p.role).collect();
    let mut expected = vec![ProfileRole::Outline, ProfileRole::FoldLine];
    expected.extend([ProfileRole::MagnetHole; 6]);
    expected.extend([ProfileRole::Slit; 6]);
    expected.push(ProfileRole::TactorCutout);
    assert_eq!(roles, expected);

    let outline = profile.outline().unwrap();
    assert_eq!(outline.vertex_count(), 6);
    assert_eq!(outline.vertices()[0], Point2::new(50.0, 0.0));
    assert_eq!(outline.vertices()[1], Point2::new(25.0, 43.3));
    assert_eq!(outline.vertices()[3], Point2::new(-50.0, 0.0));
}

#[test]
fn test_phase_offset_rotates_hexagon() {
    let params = ParameterSet::defaults().with(Param::PhaseOffset, 30.0);
    let profile = generate_2d(&params).unwrap();
    let outline = profile.outline().unwrap();
    assert_eq!(outline.vertices()[0], Point2::new(43.3, 25.0));
    assert_eq!(outline.vertices()[1], Point2::new(0.0, 50.0));
}

#[test]
fn test_square_outline_corners() {
    let params = ParameterSet::defaults().with_tile_type(TileType::Square);
    let profile = generate_2d(&params).unwrap();
    assert_eq!(profile.tile_type, TileType::Square);

    let outline = profile.outline().unwrap();
    assert_eq!(
        outline.vertices(),
        &[
            Point2::new(30.0, 30.0),
            Point2::new(-30.0, 30.0),
            Point2::new(-30.0, -30.0),
            Point2::new(30.0, -30.0),
        ]
    );
    assert_eq!(profile.count(ProfileRole::Slit), 4);
}

#[test]
fn test_fold_line_is_offset_by_kerf() {
    for tile_type in [TileType::Hexagon, TileType::Square] {
        let params = ParameterSet::defaults()
            .with_tile_type(tile_type)
            .with(Param::Kerf, 0.5);
        let tile = TileMetrics::from_params(&params);
        let profile = generate_2d(&params).unwrap();
        let fold = profile.by_role(ProfileRole::FoldLine).next().unwrap();

        let vertices = fold.vertices();
        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let midpoint = Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
            assert_close(midpoint.radius(), tile.inradius - 0.5, 0.01);
        }
    }
}

#[test]
fn test_every_polyline_is_closed_simple_and_normalized() {
    let variants = [
        ParameterSet::defaults(),
        ParameterSet::defaults().with(Param::PhaseOffset, 17.5),
        ParameterSet::defaults().with_tile_type(TileType::Square),
        ParameterSet::defaults()
            .with(Param::MagnetCount, 12.0)
            .with(Param::MagnetDiameter, 3.0)
            .with(Param::CircleSegments, 64.0),
    ];

    for params in variants {
        let profile = generate_2d(&params).unwrap();
        for polyline in &profile.polylines {
            assert!(polyline.is_closed(), "{} not closed", polyline.role);
            assert!(polyline.is_simple(), "{} self-intersects", polyline.role);
            assert!(polyline.distinct_vertex_count() >= 3);
            for p in &polyline.points {
                assert_eq!(normalize(p.x), p.x);
                assert_eq!(normalize(p.y), p.y);
            }
        }
    }
}

#[test]
fn test_magnet_holes_have_magnet_diameter() {
    let params = ParameterSet::defaults();
    let profile = generate_2d(&params).unwrap();
    for hole in profile.by_role(ProfileRole::MagnetHole) {
        assert_eq!(hole.vertex_count(), 32);
        let centre = hole.centroid();
        assert_close(centre.radius(), 20.0, 0.01);
        for vertex in hole.vertices() {
            assert_close(vertex.distance_to(&centre), 2.5, 0.01);
        }
    }
}

#[test]
fn test_slits_sit_on_edge_normals() {
    let params = ParameterSet::defaults();
    let tile = TileMetrics::from_params(&params);
    let profile = generate_2d(&params).unwrap();
    let mid_depth = tile.compensated_inradius - 3.0 - 0.75;

    for (edge, slit) in profile.by_role(ProfileRole::Slit).enumerate() {
        assert_eq!(slit.vertex_count(), 4);
        let centre = slit.centroid();
        assert_close(centre.radius(), mid_depth, 0.01);

        let expected = 60.0 * edge as f64 + 30.0;
        let angle = centre.y.atan2(centre.x).to_degrees().rem_euclid(360.0);
        assert_close(angle, expected, 0.05);

        let v = slit.vertices();
        assert_close(v[0].distance_to(&v[3]), 20.0, 0.02);
        assert_close(v[0].distance_to(&v[1]), 1.5, 0.02);
        for vertex in v {
            assert!(vertex.radius() < tile.compensated_circumradius);
        }
    }
}

#[test]
fn test_tactor_cutout_is_centred_hexagon() {
    let profile = generate_2d(&ParameterSet::defaults()).unwrap();
    let tactor = profile.by_role(ProfileRole::TactorCutout).next().unwrap();
    assert_eq!(tactor.vertex_count(), 6);
    for vertex in tactor.vertices() {
        assert_close(vertex.radius(), 10.0, 0.01);
    }
    assert_eq!(tactor.vertices()[0], Point2::new(10.0, 0.0));
}

#[test]
fn test_generation_is_deterministic() {
    let params = ParameterSet::defaults().with(Param::RingRadius, 18.37);
    assert_eq!(generate_2d(&params).unwrap(), generate_2d(&params).unwrap());
}
