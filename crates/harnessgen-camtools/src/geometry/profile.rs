//! 2D cut profiles
//!
//! A [`Profile2D`] is the flat geometry of one cut piece: closed polylines
//! in the tile's local frame, each tagged with what it is for. Besides the
//! tile itself, the foam piece and the magnet ring are cut from the same
//! outlines.

use harnessgen_core::{normalize, TileType};
use serde::Serialize;
use std::fmt;

/// A point in the tile plane, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a point with both coordinates normalized
    pub fn normalized(x: f64, y: f64) -> Self {
        Self::new(normalize(x), normalize(y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Distance from the origin
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// What a polyline is cut or marked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileRole {
    Outline,
    FoldLine,
    MagnetHole,
    Slit,
    TactorCutout,
}

impl ProfileRole {
    pub const ALL: [ProfileRole; 5] = [
        ProfileRole::Outline,
        ProfileRole::FoldLine,
        ProfileRole::MagnetHole,
        ProfileRole::Slit,
        ProfileRole::TactorCutout,
    ];

    /// Layer name used in exported drawings
    pub fn layer_name(&self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::FoldLine => "fold-line",
            Self::MagnetHole => "magnet-hole",
            Self::Slit => "slit",
            Self::TactorCutout => "tactor-cutout",
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layer_name())
    }
}

/// A closed polyline; the last point repeats the first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub role: ProfileRole,
    pub points: Vec<Point2>,
}

impl Polyline {
    /// Build a closed polyline from its distinct vertices
    ///
    /// Consecutive duplicates are dropped and the first point is repeated at
    /// the end.
    pub fn closed(role: ProfileRole, vertices: impl IntoIterator<Item = Point2>) -> Self {
        let mut points: Vec<Point2> = Vec::new();
        for point in vertices {
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if let Some(&first) = points.first() {
            points.push(first);
        }
        Self { role, points }
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    /// Vertices without the closing repeat
    pub fn vertices(&self) -> &[Point2] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Number of pairwise distinct vertices
    pub fn distinct_vertex_count(&self) -> usize {
        let vertices = self.vertices();
        vertices
            .iter()
            .enumerate()
            .filter(|(i, p)| !vertices[..*i].contains(p))
            .count()
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point2::is_finite)
    }

    /// Shoelace area, positive for counter-clockwise polylines
    pub fn signed_area(&self) -> f64 {
        let vertices = self.vertices();
        let n = vertices.len();
        (0..n)
            .map(|i| {
                let a = vertices[i];
                let b = vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    /// Average of the vertices
    pub fn centroid(&self) -> Point2 {
        let vertices = self.vertices();
        let n = vertices.len().max(1) as f64;
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / n, sy / n)
    }

    /// Whether no two non-adjacent edges cross or touch
    pub fn is_simple(&self) -> bool {
        let vertices = self.vertices();
        let n = vertices.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            for j in (i + 1)..n {
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let (c, d) = (vertices[j], vertices[(j + 1) % n]);
                if segments_intersect(a, b, c, d) {
                    return false;
                }
            }
        }
        true
    }
}

fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}

/// Cut piece a profile describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// The folded tile with every cut
    Tile,
    /// Foam padding: the fold-line outline and the tactor opening
    FoamPiece,
    /// Magnet backing ring: the fold-line outline, magnet holes and the
    /// tactor opening
    MagnetRing,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [
        ProfileKind::Tile,
        ProfileKind::FoamPiece,
        ProfileKind::MagnetRing,
    ];

    /// Base name of the exported file
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::FoamPiece => "foam_piece",
            Self::MagnetRing => "magnet_ring",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile => write!(f, "tile"),
            Self::FoamPiece => write!(f, "foam piece"),
            Self::MagnetRing => write!(f, "magnet ring"),
        }
    }
}

/// Flat geometry of one cut piece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile2D {
    pub kind: ProfileKind,
    pub tile_type: TileType,
    pub polylines: Vec<Polyline>,
}

impl Profile2D {
    /// Empty tile profile
    pub fn new(tile_type: TileType) -> Self {
        Self::of_kind(ProfileKind::Tile, tile_type)
    }

    pub fn of_kind(kind: ProfileKind, tile_type: TileType) -> Self {
        Self {
            kind,
            tile_type,
            polylines: Vec::new(),
        }
    }

    pub fn push(&mut self, polyline: Polyline) {
        self.polylines.push(polyline);
    }

    pub fn by_role(&self, role: ProfileRole) -> impl Iterator<Item = &Polyline> {
        self.polylines.iter().filter(move |p| p.role == role)
    }

    pub fn count(&self, role: ProfileRole) -> usize {
        self.by_role(role).count()
    }

    pub fn outline(&self) -> Option<&Polyline> {
        self.by_role(ProfileRole::Outline).next()
    }
}
