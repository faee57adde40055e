//! Magnet holes in the tile and bores in the carrier must line up.

use harnessgen_camtools::geometry::{
    carrier_tree, generate_2d, magnet_centres, Placement, Primitive, ProfileRole,
};
use harnessgen_core::{Param, ParameterSet};

const LAYOUTS: [(f64, f64); 5] = [(3.0, 15.0), (5.0, 17.25), (6.0, 20.0), (8.0, 18.5), (12.0, 21.0)];

fn layout(count: f64, radius: f64) -> ParameterSet {
    ParameterSet::defaults()
        .with(Param::MagnetCount, count)
        .with(Param::RingRadius, radius)
        .with(Param::MagnetDiameter, 3.0)
}

#[test]
fn test_carrier_bores_match_magnet_centres() {
    for (count, radius) in LAYOUTS {
        let params = layout(count, radius);
        let centres = magnet_centres(&params).unwrap();
        assert_eq!(centres.len(), count as usize);

        let tree = carrier_tree(&params).unwrap();
        let bores: Vec<&Placement> = tree
            .leaves()
            .into_iter()
            .filter(|(primitive, _)| matches!(primitive, Primitive::Cylinder { .. }))
            .map(|(_, placement)| placement)
            .collect();
        assert_eq!(bores.len(), centres.len());

        for (bore, centre) in bores.iter().zip(&centres) {
            assert_eq!(bore.offset[0], centre.x);
            assert_eq!(bore.offset[1], centre.y);
        }
    }
}

#[test]
fn test_tile_holes_match_magnet_centres() {
    for (count, radius) in LAYOUTS {
        let params = layout(count, radius);
        let centres = magnet_centres(&params).unwrap();
        let profile = generate_2d(&params).unwrap();
        let holes: Vec<_> = profile.by_role(ProfileRole::MagnetHole).collect();
        assert_eq!(holes.len(), centres.len());

        for (hole, centre) in holes.iter().zip(&centres) {
            assert!(
                hole.centroid().distance_to(centre) <= 0.01,
                "hole off centre for N={count}, R={radius}"
            );
        }
    }
}

#[test]
fn test_first_magnet_sits_on_positive_x_axis() {
    let centres = magnet_centres(&layout(5.0, 17.25)).unwrap();
    assert_eq!(centres[0].x, 17.25);
    assert_eq!(centres[0].y, 0.0);
}
