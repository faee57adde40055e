//! Triangle meshes
//!
//! The evaluated surface of a peripheral. Coordinates are kept at full
//! precision here; they are normalized when written out.

use csgrs::mesh::Mesh as CsgMesh;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::collections::HashMap;

/// Distance under which two vertices are the same point
const WELD_TOLERANCE: f64 = 1e-6;

/// Relative tolerance on the vector area of a closed surface
const CLOSURE_TOLERANCE: f64 = 1e-6;

/// Direction of the parity ray, chosen off every axis and diagonal
const RAY_DIRECTION: [f64; 3] = [0.577_215_664_9, 0.618_033_988_7, 0.531_709_431_8];

/// A 3D triangle made up of three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle3D {
    pub vertices: [Point3<f64>; 3],
    pub normal: Vector3<f64>,
}

impl Triangle3D {
    pub fn new(v1: Point3<f64>, v2: Point3<f64>, v3: Point3<f64>) -> Self {
        let normal = (v2 - v1)
            .cross(&(v3 - v1))
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros);

        Self {
            vertices: [v1, v2, v3],
            normal,
        }
    }

    /// Area-weighted normal, half the edge cross product
    pub fn vector_area(&self) -> Vector3<f64> {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)) * 0.5
    }

    pub fn area(&self) -> f64 {
        self.vector_area().norm()
    }

    /// Signed volume of the tetrahedron spanned with the origin
    pub fn signed_volume(&self) -> f64 {
        let [a, b, c] = self.vertices;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }

    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }

    /// Möller–Trumbore test for a hit strictly in front of `origin`
    fn ray_hits(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> bool {
        let [a, b, c] = self.vertices;
        let (e1, e2) = (b - a, c - a);
        let h = direction.cross(&e2);
        let det = e1.dot(&h);
        if det.abs() < 1e-12 {
            return false;
        }
        let inv = 1.0 / det;
        let s = origin - a;
        let u = s.dot(&h) * inv;
        if !(0.0..=1.0).contains(&u) {
            return false;
        }
        let q = s.cross(&e1);
        let v = direction.dot(&q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return false;
        }
        e2.dot(&q) * inv > 1e-9
    }

    /// Get bounding box of the triangle
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for vertex in &self.vertices[1..] {
            min = min.inf(vertex);
            max = max.sup(vertex);
        }
        (min, max)
    }
}

/// A triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh3D {
    pub triangles: Vec<Triangle3D>,
    pub bounds_min: Point3<f64>,
    pub bounds_max: Point3<f64>,
}

impl Mesh3D {
    pub fn new(triangles: Vec<Triangle3D>) -> Self {
        let mut mesh = Self {
            triangles,
            bounds_min: Point3::origin(),
            bounds_max: Point3::origin(),
        };
        mesh.calculate_bounds();
        mesh
    }

    /// Triangulate the polygons of a boolean kernel result
    ///
    /// Kernel polygons are convex, so each one is fanned from its first
    /// vertex. Slivers with no area are dropped.
    pub fn from_csg(csg: &CsgMesh<()>) -> Self {
        let mut triangles = Vec::new();
        for polygon in &csg.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }
            let origin = vertices[0].pos;
            for pair in vertices[1..].windows(2) {
                let triangle = Triangle3D::new(origin, pair[0].pos, pair[1].pos);
                if triangle.area() > 0.0 {
                    triangles.push(triangle);
                }
            }
        }
        Self::new(triangles)
    }

    fn calculate_bounds(&mut self) {
        let Some(first) = self.triangles.first() else {
            return;
        };

        let (mut min, mut max) = first.bounds();
        for triangle in &self.triangles[1..] {
            let (tri_min, tri_max) = triangle.bounds();
            min = min.inf(&tri_min);
            max = max.sup(&tri_max);
        }

        self.bounds_min = min;
        self.bounds_max = max;
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_finite(&self) -> bool {
        self.triangles.iter().all(Triangle3D::is_finite)
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle3D::area).sum()
    }

    /// Enclosed volume, positive when faces point outward
    pub fn signed_volume(&self) -> f64 {
        self.triangles.iter().map(Triangle3D::signed_volume).sum()
    }

    /// Sum of the area-weighted normals; zero for a closed surface
    pub fn vector_area(&self) -> Vector3<f64> {
        self.triangles
            .iter()
            .fold(Vector3::zeros(), |sum, t| sum + t.vector_area())
    }

    /// Whether the surface encloses a volume without gaps
    ///
    /// Every welded edge must be matched by an edge running the other way,
    /// and the area-weighted normals must cancel.
    pub fn is_closed(&self) -> bool {
        let area = self.surface_area();
        area > 0.0
            && self.vector_area().norm() <= CLOSURE_TOLERANCE * area
            && self.edge_report().is_watertight()
    }

    /// Pair up the edges of the welded surface
    ///
    /// Kernel output contains T-junctions: a vertex of one face may sit in
    /// the middle of a neighbour's edge. Each edge is therefore split at
    /// every welded vertex lying on it before edges are paired.
    pub fn edge_report(&self) -> EdgeReport {
        let welded = WeldedMesh::build(self);
        // (forward, backward) uses of each undirected edge
        let mut uses: HashMap<(usize, usize), (usize, usize)> = HashMap::new();

        for face in &welded.faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                let mut from = a;
                for to in welded.split_edge(a, b) {
                    let entry = uses.entry((from.min(to), from.max(to))).or_default();
                    if from < to {
                        entry.0 += 1;
                    } else {
                        entry.1 += 1;
                    }
                    from = to;
                }
            }
        }

        EdgeReport {
            vertex_count: welded.vertices.len(),
            edge_count: uses.len(),
            boundary_edge_count: uses.values().filter(|(f, b)| f != b).count(),
            non_manifold_edge_count: uses.values().filter(|(f, b)| f + b > 2).count(),
        }
    }

    /// Whether `point` lies inside the surface, by the parity of ray hits
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        let direction = Vector3::from(RAY_DIRECTION);
        let hits = self
            .triangles
            .iter()
            .filter(|t| t.ray_hits(point, &direction))
            .count();
        hits % 2 == 1
    }

    /// Whether `other` lies entirely inside this surface
    pub fn encloses(&self, other: &Mesh3D) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let within_bounds = (0..3).all(|axis| {
            other.bounds_min[axis] >= self.bounds_min[axis]
                && other.bounds_max[axis] <= self.bounds_max[axis]
        });
        within_bounds
            && other
                .triangles
                .iter()
                .flat_map(|t| t.vertices.iter())
                .all(|v| self.contains_point(v))
    }

    pub fn report(&self) -> MeshReport {
        MeshReport {
            triangle_count: self.triangle_count(),
            surface_area: self.surface_area(),
            volume: self.signed_volume(),
            is_closed: self.is_closed(),
            is_finite: self.is_finite(),
            edges: self.edge_report(),
            bounds_min: [self.bounds_min.x, self.bounds_min.y, self.bounds_min.z],
            bounds_max: [self.bounds_max.x, self.bounds_max.y, self.bounds_max.z],
        }
    }
}

/// Welded vertices sorted by x, and faces indexing them
struct WeldedMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl WeldedMesh {
    /// Merge vertices closer than the weld tolerance through a spatial hash
    /// and drop faces that collapse
    fn build(mesh: &Mesh3D) -> Self {
        let cell_size = WELD_TOLERANCE * 2.0;
        let cell = |p: &Point3<f64>| {
            (
                (p.x / cell_size).floor() as i64,
                (p.y / cell_size).floor() as i64,
                (p.z / cell_size).floor() as i64,
            )
        };

        let mut points: Vec<Point3<f64>> = Vec::new();
        let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut corners = Vec::with_capacity(mesh.triangles.len());

        for triangle in &mesh.triangles {
            let mut face = [0; 3];
            for (slot, vertex) in face.iter_mut().zip(&triangle.vertices) {
                let (cx, cy, cz) = cell(vertex);
                let mut found = None;
                'search: for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                                continue;
                            };
                            if let Some(&index) = candidates
                                .iter()
                                .find(|&&i| (points[i] - vertex).norm() < WELD_TOLERANCE)
                            {
                                found = Some(index);
                                break 'search;
                            }
                        }
                    }
                }
                *slot = found.unwrap_or_else(|| {
                    points.push(*vertex);
                    grid.entry((cx, cy, cz)).or_default().push(points.len() - 1);
                    points.len() - 1
                });
            }
            corners.push(face);
        }

        // Sort by x so edge splitting can search a window
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));
        let mut rank = vec![0; points.len()];
        for (sorted, &original) in order.iter().enumerate() {
            rank[original] = sorted;
        }

        Self {
            vertices: order.iter().map(|&i| points[i]).collect(),
            faces: corners
                .into_iter()
                .map(|f| [rank[f[0]], rank[f[1]], rank[f[2]]])
                .filter(|f| f[0] != f[1] && f[1] != f[2] && f[0] != f[2])
                .collect(),
        }
    }

    /// Vertices met walking from `a` to `b`, ending with `b`
    fn split_edge(&self, a: usize, b: usize) -> Vec<usize> {
        let (pa, pb) = (self.vertices[a], self.vertices[b]);
        let d = pb - pa;
        let length_sq = d.norm_squared();
        let lo = pa.x.min(pb.x) - WELD_TOLERANCE;
        let hi = pa.x.max(pb.x) + WELD_TOLERANCE;
        let start = self.vertices.partition_point(|v| v.x < lo);

        let mut inner: Vec<(f64, usize)> = self.vertices[start..]
            .iter()
            .take_while(|v| v.x <= hi)
            .enumerate()
            .map(|(offset, v)| (start + offset, v))
            .filter(|&(i, _)| i != a && i != b)
            .filter_map(|(i, v)| {
                let t = (v - pa).dot(&d) / length_sq;
                let off_line = (v - (pa + d * t)).norm();
                (t > 0.0 && t < 1.0 && off_line < WELD_TOLERANCE).then_some((t, i))
            })
            .collect();
        inner.sort_by(|x, y| x.0.total_cmp(&y.0));
        inner
            .into_iter()
            .map(|(_, i)| i)
            .chain(std::iter::once(b))
            .collect()
    }
}

/// Edge connectivity of a welded mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeReport {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Edges not matched by an edge running the other way
    pub boundary_edge_count: usize,
    /// Edges shared by more than two faces
    pub non_manifold_edge_count: usize,
}

impl EdgeReport {
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count == 0
    }
}

/// Summary of a mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshReport {
    pub triangle_count: usize,
    pub surface_area: f64,
    pub volume: f64,
    pub is_closed: bool,
    pub is_finite: bool,
    pub edges: EdgeReport,
    pub bounds_min: [f64; 3],
    pub bounds_max: [f64; 3],
}
