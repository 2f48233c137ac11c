//! Mesh validation utilities.
//!
//! `MeshValidator` provides methods to check mesh data integrity:
//! in-range indices, finite vertices, degenerate triangles, AABB dimensions,
//! winding relative to an interior reference, enclosed volume.

use glam::DVec3;

use crate::mesh::{face_normal, Aabb, Mesh};

/// Triangles with an area below this are counted as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Validator for `Mesh` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a Mesh,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.triangles.iter().flatten().all(|&i| i < max_idx)
    }

    /// Check that every vertex coordinate is finite.
    pub fn are_vertices_finite(&self) -> bool {
        self.mesh.vertices.iter().all(|v| v.is_finite())
    }

    /// Number of triangles with (near) zero area.
    pub fn degenerate_count(&self) -> usize {
        self.mesh
            .triangle_positions()
            .filter(|[a, b, c]| (*b - *a).cross(*c - *a).length() * 0.5 < DEGENERATE_AREA)
            .count()
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn aabb(&self) -> Aabb {
        self.mesh.aabb()
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f64; 3] {
        self.aabb().size().to_array()
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f64; 3], tolerance: f64) -> bool {
        let dims = self.dimensions();
        (0..3).all(|i| (dims[i] - expected[i]).abs() < tolerance)
    }

    /// Signed enclosed volume; positive for a closed mesh wound outward.
    pub fn signed_volume(&self) -> f64 {
        self.mesh.signed_volume()
    }

    /// Count non-degenerate triangles whose normal points toward the interior.
    ///
    /// `interior` maps a triangle centroid to the nearest interior reference
    /// point (the origin for convex solids, a core circle for a torus, ...).
    pub fn inward_faces(&self, interior: impl Fn(DVec3) -> DVec3) -> usize {
        self.mesh
            .triangle_positions()
            .filter(|tri| {
                let n = face_normal(*tri);
                if n == DVec3::ZERO {
                    return false;
                }
                let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
                n.dot(centroid - interior(centroid)) <= 0.0
            })
            .count()
    }

    /// Count inward faces relative to a single interior point.
    pub fn inward_faces_from(&self, point: DVec3) -> usize {
        self.inward_faces(|_| point)
    }

    /// Count non-degenerate triangles not facing along `dir` (flat shapes).
    pub fn faces_not_facing(&self, dir: DVec3) -> usize {
        self.mesh
            .triangle_positions()
            .map(face_normal)
            .filter(|n| *n != DVec3::ZERO && n.dot(dir) <= 0.0)
            .count()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.vertex_count() == 0 || self.triangle_count() == 0 {
            errors.push(format!(
                "Mesh is empty ({} vertices, {} triangles)",
                self.vertex_count(),
                self.triangle_count()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .triangles
                .iter()
                .flatten()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if !self.are_vertices_finite() {
            errors.push("Some vertices are not finite".to_string());
        }

        // Only safe to walk triangles once indices are known to be valid
        if errors.is_empty() {
            let degenerate = self.degenerate_count();
            if degenerate > 0 {
                errors.push(format!("{} degenerate triangles", degenerate));
            }
        }

        errors
    }
}
