use dxf::entities::EntityType;
use dxf::enums::AcadVersion;
use dxf::Drawing;
use harnessgen_camtools::export::{
    profile_file_name, write_profile_set, write_profiles, write_vector_with,
};
use harnessgen_camtools::geometry::{Point2, Polyline, Profile2D, ProfileRole};
use harnessgen_camtools::{
    generate_2d, generate_profiles, write_vector, ExportError, VectorOptions,
};
use harnessgen_core::{ParameterSet, TileType};
use tempfile::TempDir;

#[test]
fn test_profile_reads_back() {
    let dir = TempDir::new().unwrap();
    let profile = generate_2d(&ParameterSet::defaults()).unwrap();
    let path = dir.path().join("tile.dxf");

    write_vector(&profile, &path).unwrap();
    let drawing = Drawing::load_file(&path).unwrap();
    assert_eq!(drawing.header.version, AcadVersion::R2000);

    let entities: Vec<_> = drawing.entities().collect();
    assert_eq!(entities.len(), profile.polylines.len());

    for (entity, polyline) in entities.iter().zip(&profile.polylines) {
        assert_eq!(entity.common.layer, polyline.role.layer_name());
        let EntityType::LwPolyline(lw) = &entity.specific else {
            panic!("expected an LWPOLYLINE, got {:?}", entity.specific);
        };
        assert_eq!(lw.flags & 1, 1);
        assert_eq!(lw.vertices.len(), polyline.vertex_count());
        for (v, p) in lw.vertices.iter().zip(polyline.vertices()) {
            assert_eq!((v.x, v.y), (p.x, p.y));
        }
    }

    let layers: Vec<_> = drawing.layers().map(|l| l.name.clone()).collect();
    for role in ProfileRole::ALL {
        assert!(layers.contains(&role.layer_name().to_string()), "missing {role}");
    }
}

#[test]
fn test_single_layer_option() {
    let dir = TempDir::new().unwrap();
    let profile = generate_2d(&ParameterSet::defaults()).unwrap();
    let path = dir.path().join("flat.dxf");

    let options = VectorOptions {
        layer_per_role: false,
    };
    write_vector_with(&profile, &path, &options).unwrap();

    let drawing = Drawing::load_file(&path).unwrap();
    assert!(drawing.entities().all(|e| e.common.layer == "0"));
    assert!(!drawing.layers().any(|l| l.name == "magnet-hole"));
}

#[test]
fn test_profile_set_uses_standard_name() {
    let dir = TempDir::new().unwrap();
    let params = ParameterSet::defaults().with_tile_type(TileType::Square);
    let profile = generate_2d(&params).unwrap();
    assert_eq!(profile_file_name(&profile), "tile_square.dxf");

    let path = write_profile_set(&profile, dir.path(), &VectorOptions::default()).unwrap();
    assert_eq!(path, dir.path().join("tile_square.dxf"));
    assert!(path.exists());
}

#[test]
fn test_every_cut_piece_is_written() {
    let dir = TempDir::new().unwrap();
    let profiles = generate_profiles(&ParameterSet::defaults()).unwrap();
    let paths = write_profiles(&profiles, dir.path(), &VectorOptions::default()).unwrap();

    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["tile_hexagon.dxf", "foam_piece_hexagon.dxf", "magnet_ring_hexagon.dxf"]
    );

    let ring = Drawing::load_file(&paths[2]).unwrap();
    let layers: Vec<_> = ring.entities().map(|e| e.common.layer.clone()).collect();
    assert_eq!(layers.iter().filter(|l| *l == "magnet-hole").count(), 6);
    assert_eq!(layers.iter().filter(|l| *l == "outline").count(), 1);
    assert!(!layers.iter().any(|l| l == "slit"));
}

#[test]
fn test_bad_profile_stops_the_whole_set() {
    let dir = TempDir::new().unwrap();
    let mut profiles = generate_profiles(&ParameterSet::defaults()).unwrap();
    profiles[2].polylines[0].points.pop();

    assert!(write_profiles(&profiles, dir.path(), &VectorOptions::default()).is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_open_polyline_is_refused_without_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.dxf");
    let mut profile = Profile2D::new(TileType::Hexagon);
    profile.push(Polyline {
        role: ProfileRole::Outline,
        points: vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ],
    });

    let err = write_vector(&profile, &path).unwrap_err();
    assert!(matches!(err, ExportError::MalformedGeometry(_)));
    assert!(!path.exists());
}

#[test]
fn test_non_finite_and_degenerate_profiles_are_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.dxf");

    let mut nan = Profile2D::new(TileType::Hexagon);
    nan.push(Polyline::closed(
        ProfileRole::Slit,
        [
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 0.0),
            Point2::new(1.0, 1.0),
        ],
    ));
    let mut sliver = Profile2D::new(TileType::Hexagon);
    sliver.push(Polyline::closed(
        ProfileRole::Slit,
        [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
    ));
    let empty = Profile2D::new(TileType::Square);

    for profile in [nan, sliver, empty] {
        let err = write_vector(&profile, &path).unwrap_err();
        assert!(matches!(err, ExportError::MalformedGeometry(_)), "{err}");
        assert!(!path.exists());
    }
}

#[test]
fn test_self_intersecting_and_unrounded_profiles_are_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.dxf");

    let mut bowtie = Profile2D::new(TileType::Hexagon);
    bowtie.push(Polyline::closed(
        ProfileRole::Outline,
        [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ],
    ));
    let err = write_vector(&bowtie, &path).unwrap_err();
    assert!(err.to_string().contains("intersects itself"), "{err}");
    assert!(!path.exists());

    let mut unrounded = Profile2D::new(TileType::Hexagon);
    unrounded.push(Polyline::closed(
        ProfileRole::Outline,
        [
            Point2::new(0.0, 0.0),
            Point2::new(10.004, 0.0),
            Point2::new(0.0, 10.0),
        ],
    ));
    let err = write_vector(&unrounded, &path).unwrap_err();
    assert!(err.to_string().contains("not normalized"), "{err}");
    assert!(!path.exists());
}

#[test]
fn test_missing_directory_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("tile.dxf");
    let profile = generate_2d(&ParameterSet::defaults()).unwrap();

    match write_vector(&profile, &path) {
        Err(ExportError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected {:?}", other),
    }
}
