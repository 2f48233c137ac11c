//! Indexed triangle mesh shared by the generators, the world projection and the exporter.

use glam::DVec3;

/// Triangle mesh: vertex positions plus counter-clockwise (outward) index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, v: DVec3) -> u32 {
        self.vertices.push(v);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Positions of the three corners of triangle `i`
    pub fn triangle(&self, i: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Iterate over triangle corner positions
    pub fn triangle_positions(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        (0..self.triangles.len()).map(move |i| self.triangle(i))
    }

    /// Mean of all vertex positions
    pub fn centroid(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }

    /// Signed volume (positive for a closed mesh wound outward)
    pub fn signed_volume(&self) -> f64 {
        self.triangle_positions()
            .map(|[a, b, c]| a.dot(b.cross(c)) / 6.0)
            .sum()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

/// Unit normal of a triangle: normalize((v1 - v0) x (v2 - v0)).
///
/// Coincident vertices give a zero vector instead of NaN.
pub fn face_normal([v0, v1, v2]: [DVec3; 3]) -> DVec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_points(points: &[DVec3]) -> Self {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}
