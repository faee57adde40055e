//! Geometry generator
//!
//! Derives the flat cut profiles and the printed peripherals from a
//! parameter set. Every entry point is pure. They expect a set that passed
//! validation but never panic on one that did not: values that make a shape
//! impossible are refused with [`GeometryError::Infeasible`] naming the
//! parameter.

use super::profile::{Point2, Polyline, Profile2D, ProfileKind, ProfileRole};
use super::solid::{BooleanOp, CsgNode, Peripheral, Placement, Primitive, Solid3D, OVERSHOOT};
use crate::error::{GeometryError, GeometryResult};
use crate::tile::TileMetrics;
use harnessgen_core::{greater_than, normalize, Param, ParameterSet, TileType};
use std::f64::consts::PI;
use tracing::info;

/// Number of sides of the tactor cut-out
const TACTOR_SIDES: usize = 6;

/// Generate the cut profile of the tile
///
/// Polylines are emitted in a fixed order: outline, fold-line, magnet
/// holes, slits, tactor cut-out.
pub fn generate_2d(params: &ParameterSet) -> GeometryResult<Profile2D> {
    let p = prepare(params)?;
    let tile = TileMetrics::from_params(&p);
    check_tile(&p, &tile)?;

    let start = tile.start_angle(&p);
    let mut profile = Profile2D::new(tile.tile_type);

    profile.push(regular_polygon(
        ProfileRole::Outline,
        Point2::new(0.0, 0.0),
        tile.circumradius,
        tile.sides,
        start,
    ));

    if tile.compensated_circumradius <= 0.0 {
        return Err(GeometryError::infeasible(
            Param::Kerf.name(),
            "kerf offset consumes the whole tile",
        ));
    }
    profile.push(regular_polygon(
        ProfileRole::FoldLine,
        Point2::new(0.0, 0.0),
        tile.compensated_circumradius,
        tile.sides,
        start,
    ));

    let magnet_radius = positive(&p, Param::MagnetDiameter)? / 2.0;
    let segments = circle_segments(&p)?;
    for centre in magnet_centres(&p)? {
        profile.push(regular_polygon(
            ProfileRole::MagnetHole,
            centre,
            magnet_radius,
            segments,
            0.0,
        ));
    }

    let slit_width = p.get(Param::SlitWidth);
    if slit_width > 0.0 {
        let outer = tile.compensated_inradius - p.get(Param::SlitInset);
        let inner = outer - positive(&p, Param::SlitHeight)?;
        if inner <= 0.0 {
            return Err(GeometryError::infeasible(
                Param::SlitInset.name(),
                "slits would cross the tile centre",
            ));
        }
        for edge in 0..tile.sides {
            let theta = start + 2.0 * PI * (edge as f64 + 0.5) / tile.sides as f64;
            profile.push(slit(theta, inner, outer, slit_width / 2.0));
        }
    }

    let tactor = p.get(Param::TactorDiameter);
    if tactor > 0.0 {
        profile.push(regular_polygon(
            ProfileRole::TactorCutout,
            Point2::new(0.0, 0.0),
            tactor / 2.0,
            TACTOR_SIDES,
            0.0,
        ));
    }

    if let Some(line) = profile.polylines.iter().find(|l| l.distinct_vertex_count() < 3) {
        return Err(GeometryError::infeasible(
            role_parameter(line.role).name(),
            format!("{} collapses below three distinct points", line.role),
        ));
    }

    info!(
        "Generated {} tile profile: {} polylines ({} magnet holes, {} slits)",
        tile.tile_type,
        profile.polylines.len(),
        profile.count(ProfileRole::MagnetHole),
        profile.count(ProfileRole::Slit)
    );
    Ok(profile)
}

/// Generate every cut profile: the tile, the foam piece and the magnet ring
///
/// The foam piece and the magnet ring reuse the tile's fold-line as their
/// outline, so all three pieces stack edge to edge.
pub fn generate_profiles(params: &ParameterSet) -> GeometryResult<Vec<Profile2D>> {
    let tile = generate_2d(params)?;
    let foam = cut_piece(
        &tile,
        ProfileKind::FoamPiece,
        &[ProfileRole::TactorCutout],
    );
    let ring = cut_piece(
        &tile,
        ProfileKind::MagnetRing,
        &[ProfileRole::MagnetHole, ProfileRole::TactorCutout],
    );
    Ok(vec![tile, foam, ring])
}

/// Piece cut along the tile's fold-line, keeping the cuts with `roles`
fn cut_piece(tile: &Profile2D, kind: ProfileKind, roles: &[ProfileRole]) -> Profile2D {
    let mut piece = Profile2D::of_kind(kind, tile.tile_type);
    if let Some(fold) = tile.by_role(ProfileRole::FoldLine).next() {
        piece.push(Polyline {
            role: ProfileRole::Outline,
            points: fold.points.clone(),
        });
    }
    for polyline in &tile.polylines {
        if roles.contains(&polyline.role) {
            piece.push(polyline.clone());
        }
    }
    piece
}

/// Generate every printed peripheral
///
/// Returns the magnet carrier, the connector, the liner spacer and the strap
/// clip, in that order.
pub fn generate_3d(params: &ParameterSet) -> GeometryResult<Vec<Solid3D>> {
    let p = prepare(params)?;
    let tile = TileMetrics::from_params(&p);
    check_tile(&p, &tile)?;

    let solids = vec![
        Solid3D::build(Peripheral::MagnetCarrier, carrier_tree(&p)?)?,
        Solid3D::build(Peripheral::Connector, connector_tree(&p)?)?,
        Solid3D::build(Peripheral::LinerSpacer, liner_tree(&p, &tile)?)?,
        Solid3D::build(Peripheral::StrapClip, strap_clip_tree(&p)?)?,
    ];

    info!(
        "Generated {} peripherals ({} triangles)",
        solids.len(),
        solids.iter().map(|s| s.mesh.triangle_count()).sum::<usize>()
    );
    Ok(solids)
}

/// Magnet carrier: a ring through the magnet centres with one blind pocket
/// per magnet, opened at the top
pub fn carrier_tree(params: &ParameterSet) -> GeometryResult<CsgNode> {
    let segments = circle_segments(params)?;
    let ring_radius = positive(params, Param::RingRadius)?;
    let pocket_radius = pocket_radius(params)?;
    let wall = positive(params, Param::CarrierWallThickness)?;
    let height = positive(params, Param::CarrierHeight)?;
    let depth = pocket_depth(params, Param::CarrierHeight, height)?;

    let inner_radius = normalize(ring_radius - pocket_radius - wall);
    if inner_radius <= 0.0 {
        return Err(GeometryError::infeasible(
            Param::RingRadius.name(),
            "magnet ring is too small to leave an opening in the carrier",
        ));
    }

    let mut operands = vec![CsgNode::leaf(
        Primitive::Ring {
            inner_radius,
            outer_radius: normalize(ring_radius + pocket_radius + wall),
            height,
            segments,
        },
        Placement::identity(),
    )];

    let pocket = Primitive::Cylinder {
        radius: pocket_radius,
        height: normalize(depth + OVERSHOOT),
        segments,
    };
    for centre in magnet_centres(params)? {
        operands.push(CsgNode::leaf(
            pocket,
            Placement::at(centre.x, centre.y, height - depth),
        ));
    }

    Ok(CsgNode::combine(BooleanOp::Subtract, operands))
}

/// Connector: a stadium plate holding two magnets
pub fn connector_tree(params: &ParameterSet) -> GeometryResult<CsgNode> {
    let segments = circle_segments(params)?;
    let spacing = positive(params, Param::ConnectorMagnetSpacing)?;
    let pocket_radius = pocket_radius(params)?;
    let end_radius = normalize(pocket_radius + positive(params, Param::ConnectorRimWidth)?);
    let thickness = positive(params, Param::ConnectorThickness)?;
    let depth = pocket_depth(params, Param::ConnectorThickness, thickness)?;
    let half = spacing / 2.0;

    let end_cap = Primitive::Cylinder {
        radius: end_radius,
        height: thickness,
        segments,
    };
    let plate = CsgNode::combine(
        BooleanOp::Union,
        vec![
            CsgNode::leaf(
                Primitive::Box {
                    width: spacing,
                    depth: normalize(2.0 * end_radius),
                    height: thickness,
                },
                Placement::identity(),
            ),
            CsgNode::leaf(end_cap, Placement::at(-half, 0.0, 0.0)),
            CsgNode::leaf(end_cap, Placement::at(half, 0.0, 0.0)),
        ],
    );

    let pocket = Primitive::Cylinder {
        radius: pocket_radius,
        height: normalize(depth + OVERSHOOT),
        segments,
    };
    Ok(CsgNode::combine(
        BooleanOp::Subtract,
        vec![
            plate,
            CsgNode::leaf(pocket, Placement::at(-half, 0.0, thickness - depth)),
            CsgNode::leaf(pocket, Placement::at(half, 0.0, thickness - depth)),
        ],
    ))
}

/// Liner spacer: the tile shape inset by the liner inset, with the tactor
/// opening removed
///
/// The hexagonal prism is the intersection of three slabs rotated 60° apart.
pub fn liner_tree(params: &ParameterSet, tile: &TileMetrics) -> GeometryResult<CsgNode> {
    let thickness = positive(params, Param::LinerThickness)?;
    let inradius = normalize(tile.inradius - params.get(Param::LinerInset));
    if inradius <= 0.0 {
        return Err(GeometryError::infeasible(
            Param::LinerInset.name(),
            "liner inset consumes the whole tile",
        ));
    }

    let body = match tile.tile_type {
        TileType::Square => CsgNode::leaf(
            Primitive::Box {
                width: normalize(2.0 * inradius),
                depth: normalize(2.0 * inradius),
                height: thickness,
            },
            Placement::identity(),
        ),
        TileType::Hexagon => {
            let phase = params.get(Param::PhaseOffset);
            let slab = |height: f64| Primitive::Box {
                width: normalize(4.0 * inradius),
                depth: normalize(2.0 * inradius),
                height,
            };
            // Only the first slab bounds the prism in Z
            let tall = normalize(thickness + 2.0 * OVERSHOOT);
            CsgNode::combine(
                BooleanOp::Intersect,
                vec![
                    CsgNode::leaf(slab(thickness), Placement::identity().rotated(phase)),
                    CsgNode::leaf(
                        slab(tall),
                        Placement::at(0.0, 0.0, -OVERSHOOT).rotated(phase + 60.0),
                    ),
                    CsgNode::leaf(
                        slab(tall),
                        Placement::at(0.0, 0.0, -OVERSHOOT).rotated(phase + 120.0),
                    ),
                ],
            )
        }
    };

    let tactor = params.get(Param::TactorDiameter);
    if tactor <= 0.0 {
        return Ok(body);
    }
    if tactor / 2.0 >= inradius {
        return Err(GeometryError::infeasible(
            Param::TactorDiameter.name(),
            "tactor opening is wider than the liner",
        ));
    }

    Ok(CsgNode::combine(
        BooleanOp::Subtract,
        vec![
            body,
            CsgNode::leaf(
                Primitive::Cylinder {
                    radius: normalize(tactor / 2.0),
                    height: normalize(thickness + 2.0 * OVERSHOOT),
                    segments: circle_segments(params)?,
                },
                Placement::at(0.0, 0.0, -OVERSHOOT),
            ),
        ],
    ))
}

/// Strap clip: a rounded plate with two parallel slots for the strap ends
///
/// The slots are separated by the strap gap and surrounded by the rim.
pub fn strap_clip_tree(params: &ParameterSet) -> GeometryResult<CsgNode> {
    let strap_width = positive(params, Param::StrapWidth)?;
    let strap_thickness = positive(params, Param::StrapThickness)?;
    let gap = positive(params, Param::StrapGap)?;
    let thickness = positive(params, Param::StrapClipThickness)?;
    let rim = positive(params, Param::StrapClipRim)?;
    let corner_radius = params.get(Param::StrapClipRadius);
    if corner_radius < 0.0 || greater_than(corner_radius, rim) {
        return Err(GeometryError::infeasible(
            Param::StrapClipRadius.name(),
            "corner radius must lie between 0 and the clip rim",
        ));
    }

    let plate = CsgNode::leaf(
        Primitive::RoundedBox {
            width: normalize(strap_width + 2.0 * rim),
            depth: normalize(gap + 2.0 * strap_thickness + 2.0 * rim),
            height: thickness,
            corner_radius,
            segments: circle_segments(params)?,
        },
        Placement::identity(),
    );
    let slot = Primitive::Box {
        width: strap_width,
        depth: strap_thickness,
        height: normalize(thickness + 2.0 * OVERSHOOT),
    };
    let offset = (gap + strap_thickness) / 2.0;
    Ok(CsgNode::combine(
        BooleanOp::Subtract,
        vec![
            plate,
            CsgNode::leaf(slot, Placement::at(0.0, -offset, -OVERSHOOT)),
            CsgNode::leaf(slot, Placement::at(0.0, offset, -OVERSHOOT)),
        ],
    ))
}

/// Centres of the magnet holes, `360° / N · k` around the ring
///
/// The carrier bores are placed at these same points.
pub fn magnet_centres(params: &ParameterSet) -> GeometryResult<Vec<Point2>> {
    let count = Param::MagnetCount
        .definition()
        .check_domain(params.get(Param::MagnetCount))?;
    let radius = params.get(Param::RingRadius);
    if radius < 0.0 {
        return Err(GeometryError::infeasible(
            Param::RingRadius.name(),
            "ring radius must not be negative",
        ));
    }

    let count = count as usize;
    Ok((0..count)
        .map(|k| {
            let angle = 2.0 * PI * k as f64 / count as f64;
            Point2::normalized(radius * angle.cos(), radius * angle.sin())
        })
        .collect())
}

/// Normalized copy of the input with every value inside its domain
fn prepare(params: &ParameterSet) -> GeometryResult<ParameterSet> {
    let p = params.normalized();
    p.check_domains()?;
    Ok(p)
}

fn check_tile(params: &ParameterSet, tile: &TileMetrics) -> GeometryResult<()> {
    if params.checked_tile_type().is_none() {
        return Err(GeometryError::infeasible(
            Param::TileType.name(),
            "unknown tile type",
        ));
    }
    if tile.circumradius <= 0.0 {
        let param = match tile.tile_type {
            TileType::Hexagon => Param::Circumradius,
            TileType::Square => Param::SideLength,
        };
        return Err(GeometryError::infeasible(param.name(), "tile size must be positive"));
    }
    Ok(())
}

fn positive(params: &ParameterSet, param: Param) -> GeometryResult<f64> {
    let value = params.get(param);
    if value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::infeasible(param.name(), "must be positive"))
    }
}

fn circle_segments(params: &ParameterSet) -> GeometryResult<usize> {
    let segments = Param::CircleSegments
        .definition()
        .check_domain(params.get(Param::CircleSegments))?;
    Ok(segments as usize)
}

fn pocket_radius(params: &ParameterSet) -> GeometryResult<f64> {
    let radius = positive(params, Param::MagnetDiameter)? / 2.0;
    Ok(normalize(radius + params.get(Param::FitTolerance).max(0.0)))
}

/// Magnet pocket depth, which must leave a floor under the pocket
fn pocket_depth(params: &ParameterSet, part: Param, thickness: f64) -> GeometryResult<f64> {
    let depth = positive(params, Param::MagnetThickness)?;
    if depth >= thickness {
        return Err(GeometryError::infeasible(
            part.name(),
            "magnet pocket would cut through the part",
        ));
    }
    Ok(depth)
}

fn role_parameter(role: ProfileRole) -> Param {
    match role {
        ProfileRole::Outline | ProfileRole::FoldLine => Param::Circumradius,
        ProfileRole::MagnetHole => Param::MagnetDiameter,
        ProfileRole::Slit => Param::SlitWidth,
        ProfileRole::TactorCutout => Param::TactorDiameter,
    }
}

/// Counter-clockwise regular polygon with normalized vertices
fn regular_polygon(
    role: ProfileRole,
    centre: Point2,
    radius: f64,
    sides: usize,
    start: f64,
) -> Polyline {
    Polyline::closed(
        role,
        (0..sides).map(|k| {
            let angle = start + 2.0 * PI * k as f64 / sides as f64;
            Point2::normalized(
                centre.x + radius * angle.cos(),
                centre.y + radius * angle.sin(),
            )
        }),
    )
}

/// Rectangle centred on the edge mid-normal at `theta`, spanning `inner` to
/// `outer` from the tile centre
fn slit(theta: f64, inner: f64, outer: f64, half_width: f64) -> Polyline {
    let (sin, cos) = theta.sin_cos();
    let corner = |along: f64, across: f64| {
        Point2::normalized(along * cos - across * sin, along * sin + across * cos)
    };
    Polyline::closed(
        ProfileRole::Slit,
        [
            corner(inner, -half_width),
            corner(outer, -half_width),
            corner(outer, half_width),
            corner(inner, half_width),
        ],
    )
}
