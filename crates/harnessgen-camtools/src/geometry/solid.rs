//! Solid peripherals
//!
//! A peripheral is described as a combination tree of primitive solids and
//! evaluated with the `csgrs` BSP kernel. Every boolean step is checked: a
//! result that is empty, not finite, not closed, without volume or with a
//! volume its operands cannot produce is refused instead of being passed on
//! as a corrupt mesh.
//!
//! The kernel only clips faces that fall inside the other operand's bounding
//! box. When one operand lies wholly inside the other their surfaces never
//! meet, so nesting is resolved here before the kernel runs.

use super::mesh::Mesh3D;
use crate::error::{GeometryError, GeometryResult};
use csgrs::mesh::Mesh as CsgMesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use harnessgen_core::normalize;
use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Distance tool solids extend past the faces they cut through, so the
/// kernel never sees coplanar faces
pub const OVERSHOOT: f64 = 0.5;

/// Smallest volume accepted for a boolean result, in mm³
const MIN_VOLUME: f64 = 1e-6;

/// Relative slack when comparing a result's volume with its operands'
const VOLUME_TOLERANCE: f64 = 1e-6;

/// Printed part a solid represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Peripheral {
    MagnetCarrier,
    Connector,
    LinerSpacer,
    StrapClip,
}

impl Peripheral {
    pub const ALL: [Peripheral; 4] = [
        Peripheral::MagnetCarrier,
        Peripheral::Connector,
        Peripheral::LinerSpacer,
        Peripheral::StrapClip,
    ];

    /// Base name of the exported file
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::MagnetCarrier => "magnet_carrier",
            Self::Connector => "connector",
            Self::LinerSpacer => "liner_spacer",
            Self::StrapClip => "strap_clip",
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MagnetCarrier => write!(f, "magnet carrier"),
            Self::Connector => write!(f, "connector"),
            Self::LinerSpacer => write!(f, "liner spacer"),
            Self::StrapClip => write!(f, "strap clip"),
        }
    }
}

/// Primitive solid in its own frame
///
/// Boxes are centred on the Z axis; every primitive spans `z = 0..height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Box {
        width: f64,
        depth: f64,
        height: f64,
    },
    /// Box with its vertical edges rounded; `segments` per full circle
    RoundedBox {
        width: f64,
        depth: f64,
        height: f64,
        corner_radius: f64,
        segments: usize,
    },
    Cylinder {
        radius: f64,
        height: f64,
        segments: usize,
    },
    Ring {
        inner_radius: f64,
        outer_radius: f64,
        height: f64,
        segments: usize,
    },
}

impl Primitive {
    fn dimensions(&self) -> Vec<f64> {
        match *self {
            Self::Box {
                width,
                depth,
                height,
            }
            | Self::RoundedBox {
                width,
                depth,
                height,
                ..
            } => vec![width, depth, height],
            Self::Cylinder { radius, height, .. } => vec![radius, height],
            Self::Ring {
                inner_radius,
                outer_radius,
                height,
                ..
            } => vec![inner_radius, outer_radius - inner_radius, height],
        }
    }

    fn is_degenerate(&self) -> bool {
        let too_few_segments = match *self {
            Self::Cylinder { segments, .. } | Self::Ring { segments, .. } => segments < 3,
            Self::RoundedBox { segments, .. } => segments < 4,
            Self::Box { .. } => false,
        };
        let bad_corner = match *self {
            Self::RoundedBox {
                width,
                depth,
                corner_radius,
                ..
            } => {
                !corner_radius.is_finite()
                    || corner_radius < 0.0
                    || 2.0 * corner_radius >= width.min(depth)
            }
            _ => false,
        };
        too_few_segments
            || bad_corner
            || self
                .dimensions()
                .iter()
                .any(|d| !d.is_finite() || *d <= 0.0)
    }

    fn to_csg(self) -> CsgMesh<()> {
        match self {
            Self::Box {
                width,
                depth,
                height,
            } => CsgMesh::cuboid(width, depth, height, None).transform(&Matrix4::new_translation(
                &Vector3::new(-width / 2.0, -depth / 2.0, 0.0),
            )),
            Self::RoundedBox {
                width,
                depth,
                height,
                corner_radius,
                segments,
            } => Sketch::<()>::rounded_rectangle(width, depth, corner_radius, segments / 4, None)
                .extrude(height)
                .transform(&Matrix4::new_translation(&Vector3::new(
                    -width / 2.0,
                    -depth / 2.0,
                    0.0,
                ))),
            Self::Cylinder {
                radius,
                height,
                segments,
            } => CsgMesh::cylinder(radius, height, segments, None),
            Self::Ring {
                inner_radius,
                outer_radius,
                height,
                segments,
            } => {
                let outer = CsgMesh::cylinder(outer_radius, height, segments, None);
                let bore = CsgMesh::cylinder(inner_radius, height + 2.0 * OVERSHOOT, segments, None)
                    .transform(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, -OVERSHOOT)));
                outer.difference(&bore)
            }
        }
    }
}

/// Position of a primitive: a rotation about Z followed by a translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub offset: [f64; 3],
    /// Rotation about the Z axis in degrees
    pub rotation: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            offset: [0.0; 3],
            rotation: 0.0,
        }
    }

    /// Placement translated by normalized offsets
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            offset: [normalize(x), normalize(y), normalize(z)],
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = normalize(degrees);
        self
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        let [x, y, z] = self.offset;
        let rotation =
            Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.to_radians());
        Matrix4::new_translation(&Vector3::new(x, y, z)) * rotation.to_homogeneous()
    }
}

/// Boolean operation applied by a combination node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

/// How two operands sit relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Separate,
    FirstInsideSecond,
    SecondInsideFirst,
}

impl Nesting {
    fn of(a: &Mesh3D, b: &Mesh3D) -> Self {
        if b.encloses(a) {
            Self::FirstInsideSecond
        } else if a.encloses(b) {
            Self::SecondInsideFirst
        } else {
            Self::Separate
        }
    }
}

impl BooleanOp {
    /// Apply the operation, or `None` when the result is empty
    fn apply(&self, a: &CsgMesh<()>, b: &CsgMesh<()>, nesting: Nesting) -> Option<CsgMesh<()>> {
        use Nesting::*;
        match (self, nesting) {
            (BooleanOp::Union, FirstInsideSecond) => Some(b.clone()),
            (BooleanOp::Union, SecondInsideFirst) => Some(a.clone()),
            (BooleanOp::Union, Separate) => Some(a.union(b)),
            (BooleanOp::Subtract, FirstInsideSecond) => None,
            (BooleanOp::Subtract, _) => Some(a.difference(b)),
            (BooleanOp::Intersect, FirstInsideSecond) => Some(a.clone()),
            (BooleanOp::Intersect, SecondInsideFirst) => Some(b.clone()),
            (BooleanOp::Intersect, Separate) => Some(a.intersection(b)),
        }
    }

    /// Whether `result` is a volume this operation can produce from operands
    /// of volume `a` and `b`
    fn volume_is_consistent(&self, a: f64, b: f64, result: f64) -> bool {
        let slack = VOLUME_TOLERANCE * (a + b) + MIN_VOLUME;
        match self {
            BooleanOp::Union => result >= a.max(b) - slack && result <= a + b + slack,
            BooleanOp::Subtract => result >= a - b - slack && result <= a + slack,
            BooleanOp::Intersect => result <= a.min(b) + slack,
        }
    }
}

/// Node of a combination tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum CsgNode {
    Leaf {
        primitive: Primitive,
        placement: Placement,
    },
    /// `operands[0] op operands[1] op ...`, folded left to right
    Combine {
        op: BooleanOp,
        operands: Vec<CsgNode>,
    },
}

impl CsgNode {
    pub fn leaf(primitive: Primitive, placement: Placement) -> Self {
        Self::Leaf {
            primitive,
            placement,
        }
    }

    pub fn combine(op: BooleanOp, operands: Vec<CsgNode>) -> Self {
        Self::Combine { op, operands }
    }

    /// All leaves in depth-first order
    pub fn leaves(&self) -> Vec<(&Primitive, &Placement)> {
        match self {
            Self::Leaf {
                primitive,
                placement,
            } => vec![(primitive, placement)],
            Self::Combine { operands, .. } => {
                operands.iter().flat_map(CsgNode::leaves).collect()
            }
        }
    }

    /// Number of boolean nodes in the tree
    pub fn operation_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Combine { operands, .. } => {
                1 + operands.iter().map(CsgNode::operation_count).sum::<usize>()
            }
        }
    }

    /// Evaluate the tree into a single checked mesh
    pub fn evaluate(&self, peripheral: Peripheral) -> GeometryResult<Mesh3D> {
        let csg = self.evaluate_csg(peripheral)?;
        checked_mesh(&csg, peripheral, "solid")
    }

    fn evaluate_csg(&self, peripheral: Peripheral) -> GeometryResult<CsgMesh<()>> {
        match self {
            Self::Leaf {
                primitive,
                placement,
            } => {
                if primitive.is_degenerate() {
                    warn!("Degenerate primitive in {}: {:?}", peripheral, primitive);
                    return Err(GeometryError::boolean_failed(
                        peripheral.to_string(),
                        "degenerate primitive",
                    ));
                }
                Ok(primitive.to_csg().transform(&placement.matrix()))
            }
            Self::Combine { op, operands } => {
                reject_coincident(operands, peripheral)?;

                let (first, rest) = operands.split_first().ok_or_else(|| {
                    GeometryError::boolean_failed(peripheral.to_string(), "empty combination")
                })?;

                let step = format!("{:?}", op);
                let mut acc = first.evaluate_csg(peripheral)?;
                let mut acc_mesh = Mesh3D::from_csg(&acc);
                for operand in rest {
                    let rhs = operand.evaluate_csg(peripheral)?;
                    let rhs_mesh = Mesh3D::from_csg(&rhs);
                    let nesting = Nesting::of(&acc_mesh, &rhs_mesh);

                    acc = op.apply(&acc, &rhs, nesting).ok_or_else(|| {
                        warn!(
                            "Boolean {} failed for {}: operand removed entirely",
                            step, peripheral
                        );
                        GeometryError::boolean_failed(
                            peripheral.to_string(),
                            "subtracted solid encloses the whole operand",
                        )
                    })?;
                    let mesh = checked_mesh(&acc, peripheral, &step)?;

                    let (a, b) = (acc_mesh.signed_volume(), rhs_mesh.signed_volume());
                    if !op.volume_is_consistent(a.abs(), b.abs(), mesh.signed_volume().abs()) {
                        warn!(
                            "Boolean {} failed for {}: volume {:.3} from operands {:.3} and {:.3}",
                            step,
                            peripheral,
                            mesh.signed_volume(),
                            a,
                            b
                        );
                        return Err(GeometryError::boolean_failed(
                            peripheral.to_string(),
                            "result volume does not match its operands",
                        ));
                    }

                    debug!(
                        "{} {:?} step: {} triangles ({:?})",
                        peripheral,
                        op,
                        mesh.triangle_count(),
                        nesting
                    );
                    acc_mesh = mesh;
                }
                Ok(acc)
            }
        }
    }
}

/// Refuse identical primitives at identical placements in one combination
fn reject_coincident(operands: &[CsgNode], peripheral: Peripheral) -> GeometryResult<()> {
    for (i, a) in operands.iter().enumerate() {
        if matches!(a, CsgNode::Leaf { .. }) && operands[i + 1..].contains(a) {
            warn!("Coincident primitives in {}", peripheral);
            return Err(GeometryError::boolean_failed(
                peripheral.to_string(),
                "coincident primitives",
            ));
        }
    }
    Ok(())
}

fn checked_mesh(csg: &CsgMesh<()>, peripheral: Peripheral, step: &str) -> GeometryResult<Mesh3D> {
    let mesh = Mesh3D::from_csg(csg);
    let fail = |reason: &str| {
        warn!("Boolean {} failed for {}: {}", step, peripheral, reason);
        Err(GeometryError::boolean_failed(peripheral.to_string(), reason))
    };

    if mesh.is_empty() {
        return fail("result is empty");
    }
    if !mesh.is_finite() {
        return fail("result has non-finite vertices");
    }
    if !mesh.is_closed() {
        return fail("result is not a closed surface");
    }
    if mesh.signed_volume().abs() < MIN_VOLUME {
        return fail("result has no volume");
    }
    Ok(mesh)
}

/// An evaluated peripheral
#[derive(Debug, Clone)]
pub struct Solid3D {
    pub peripheral: Peripheral,
    pub tree: CsgNode,
    pub mesh: Mesh3D,
}

impl Solid3D {
    /// Evaluate `tree` and keep both the tree and its mesh
    pub fn build(peripheral: Peripheral, tree: CsgNode) -> GeometryResult<Self> {
        let mesh = tree.evaluate(peripheral)?;
        debug!(
            "Built {}: {} triangles, volume {:.2} mm³",
            peripheral,
            mesh.triangle_count(),
            mesh.signed_volume()
        );
        Ok(Self {
            peripheral,
            tree,
            mesh,
        })
    }
}
