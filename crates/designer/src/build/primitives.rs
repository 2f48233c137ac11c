//! Procedural primitive generation.
//!
//! Every generator is centered on the local origin and winds its triangles
//! counter-clockwise seen from outside, so `mesh::face_normal` points outward.
//! Flat shapes (plane, ring) lie in the XY plane and face +Z.

use std::f64::consts::TAU;

use glam::DVec3;
use shared::{clamp_scale, ShapeKind, Vector3};

use super::polyhedra;
use crate::mesh::Mesh;

pub const SPHERE_SECTORS: u32 = 32;
pub const SPHERE_RINGS: u32 = 32;
pub const ROUND_SEGMENTS: u32 = 32;
pub const PYRAMID_SIDES: u32 = 4;
pub const TORUS_TUBULAR_SEGMENTS: u32 = 100;
pub const TORUS_RADIAL_SEGMENTS: u32 = 16;
pub const RING_SEGMENTS: u32 = 32;
pub const TUBE_PATH_SEGMENTS: u32 = 20;
pub const TUBE_RADIAL_SEGMENTS: u32 = 8;

/// Generate the local-space mesh for a shape kind.
///
/// Scale components are clamped into the valid range first. Unknown kinds
/// are built as a box.
pub fn generate_mesh(kind: &ShapeKind, scale: Vector3) -> Mesh {
    let s = scale.map(clamp_scale);
    match kind {
        ShapeKind::Box => cuboid(s.x, s.y, s.z),
        ShapeKind::Sphere => sphere(s.x / 2.0, SPHERE_SECTORS, SPHERE_RINGS),
        ShapeKind::Cylinder => cylinder(s.x / 2.0, s.y, ROUND_SEGMENTS),
        ShapeKind::Cone => cone(s.x / 2.0, s.y, ROUND_SEGMENTS),
        ShapeKind::Torus => torus(
            s.x / 2.0,
            s.x / 6.0,
            TORUS_TUBULAR_SEGMENTS,
            TORUS_RADIAL_SEGMENTS,
        ),
        ShapeKind::Pyramid => cone(s.x / 2.0, s.y, PYRAMID_SIDES),
        ShapeKind::Octahedron => polyhedra::octahedron(s.x / 2.0),
        ShapeKind::Dodecahedron => polyhedra::dodecahedron(s.x / 2.0),
        ShapeKind::Icosahedron => polyhedra::icosahedron(s.x / 2.0),
        ShapeKind::Tetrahedron => polyhedra::tetrahedron(s.x / 2.0),
        ShapeKind::Plane => plane(s.x, s.y),
        ShapeKind::Ring => ring(s.x / 4.0, s.x / 2.0, RING_SEGMENTS),
        ShapeKind::Tube => tube(s.x / 4.0, s.y, TUBE_PATH_SEGMENTS, TUBE_RADIAL_SEGMENTS),
        ShapeKind::Unknown(name) => {
            tracing::warn!("Unknown shape kind {name:?}, building a box instead");
            cuboid(s.x, s.y, s.z)
        }
    }
}

/// Point on a circle of radius `r` in the XZ plane at height `y`.
/// Angle 0 lies on +Z, increasing toward +X.
fn around_y(r: f64, angle: f64, y: f64) -> DVec3 {
    DVec3::new(r * angle.sin(), y, r * angle.cos())
}

fn angle(i: u32, segments: u32) -> f64 {
    (i % segments) as f64 * TAU / segments as f64
}

pub fn cuboid(w: f64, h: f64, d: f64) -> Mesh {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [[DVec3; 4]; 6] = [
        // Front (+Z)
        [DVec3::new(-hw, -hh, hd), DVec3::new(hw, -hh, hd), DVec3::new(hw, hh, hd), DVec3::new(-hw, hh, hd)],
        // Back (-Z)
        [DVec3::new(hw, -hh, -hd), DVec3::new(-hw, -hh, -hd), DVec3::new(-hw, hh, -hd), DVec3::new(hw, hh, -hd)],
        // Right (+X)
        [DVec3::new(hw, -hh, hd), DVec3::new(hw, -hh, -hd), DVec3::new(hw, hh, -hd), DVec3::new(hw, hh, hd)],
        // Left (-X)
        [DVec3::new(-hw, -hh, -hd), DVec3::new(-hw, -hh, hd), DVec3::new(-hw, hh, hd), DVec3::new(-hw, hh, -hd)],
        // Top (+Y)
        [DVec3::new(-hw, hh, hd), DVec3::new(hw, hh, hd), DVec3::new(hw, hh, -hd), DVec3::new(-hw, hh, -hd)],
        // Bottom (-Y)
        [DVec3::new(-hw, -hh, -hd), DVec3::new(hw, -hh, -hd), DVec3::new(hw, -hh, hd), DVec3::new(-hw, -hh, hd)],
    ];

    let mut mesh = Mesh::with_capacity(24, 12);
    for quad in &faces {
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend_from_slice(quad);
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }
    mesh
}

/// UV sphere with one vertex per pole.
pub fn sphere(radius: f64, sectors: u32, rings: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity(
        (sectors * (rings - 1) + 2) as usize,
        (2 * sectors * (rings - 1)) as usize,
    );

    let top = mesh.push_vertex(DVec3::new(0.0, radius, 0.0));
    for r in 1..rings {
        let phi = std::f64::consts::PI * r as f64 / rings as f64;
        for s in 0..sectors {
            let theta = angle(s, sectors);
            mesh.push_vertex(DVec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }
    let bottom = mesh.push_vertex(DVec3::new(0.0, -radius, 0.0));

    // Ring r (1-based) sector s
    let at = |r: u32, s: u32| 1 + (r - 1) * sectors + s % sectors;

    for s in 0..sectors {
        mesh.push_triangle(top, at(1, s + 1), at(1, s));
    }
    for r in 1..rings - 1 {
        for s in 0..sectors {
            let a = at(r, s);
            let b = at(r, s + 1);
            let c = at(r + 1, s + 1);
            let d = at(r + 1, s);
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }
    for s in 0..sectors {
        mesh.push_triangle(at(rings - 1, s), at(rings - 1, s + 1), bottom);
    }
    mesh
}

/// Flat disc fan at height `y`; `up` selects which way it faces.
fn add_cap(mesh: &mut Mesh, radius: f64, y: f64, segments: u32, up: bool) {
    let center = mesh.push_vertex(DVec3::new(0.0, y, 0.0));
    let first = mesh.vertices.len() as u32;
    for i in 0..segments {
        mesh.push_vertex(around_y(radius, angle(i, segments), y));
    }
    for i in 0..segments {
        let cur = first + i;
        let next = first + (i + 1) % segments;
        if up {
            mesh.push_triangle(center, cur, next);
        } else {
            mesh.push_triangle(center, next, cur);
        }
    }
}

/// Side wall of a cylinder between heights `y0` and `y1` (no caps).
fn add_wall(mesh: &mut Mesh, radius: f64, y0: f64, y1: f64, rows: u32, segments: u32) {
    let first = mesh.vertices.len() as u32;
    for row in 0..=rows {
        let y = y0 + (y1 - y0) * row as f64 / rows as f64;
        for i in 0..segments {
            mesh.push_vertex(around_y(radius, angle(i, segments), y));
        }
    }
    let at = |row: u32, i: u32| first + row * segments + i % segments;
    for row in 0..rows {
        for i in 0..segments {
            let a = at(row, i);
            let b = at(row, i + 1);
            let c = at(row + 1, i + 1);
            let d = at(row + 1, i);
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }
}

pub fn cylinder(radius: f64, height: f64, segments: u32) -> Mesh {
    let hh = height * 0.5;
    let mut mesh = Mesh::default();
    add_wall(&mut mesh, radius, -hh, hh, 1, segments);
    add_cap(&mut mesh, radius, hh, segments, true);
    add_cap(&mut mesh, radius, -hh, segments, false);
    mesh
}

/// Cone with apex on +Y. With 4 segments this is the pyramid.
pub fn cone(radius: f64, height: f64, segments: u32) -> Mesh {
    let hh = height * 0.5;
    let mut mesh = Mesh::default();
    let apex = mesh.push_vertex(DVec3::new(0.0, hh, 0.0));
    let first = mesh.vertices.len() as u32;
    for i in 0..segments {
        mesh.push_vertex(around_y(radius, angle(i, segments), -hh));
    }
    for i in 0..segments {
        mesh.push_triangle(first + i, first + (i + 1) % segments, apex);
    }
    add_cap(&mut mesh, radius, -hh, segments, false);
    mesh
}

/// Torus around the Z axis, lying in the XY plane.
pub fn torus(major: f64, minor: f64, tubular: u32, radial: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity(
        (tubular * radial) as usize,
        (2 * tubular * radial) as usize,
    );
    for u in 0..tubular {
        let theta = angle(u, tubular);
        for v in 0..radial {
            let phi = angle(v, radial);
            let ring = major + minor * phi.cos();
            mesh.push_vertex(DVec3::new(
                ring * theta.cos(),
                ring * theta.sin(),
                minor * phi.sin(),
            ));
        }
    }
    let at = |u: u32, v: u32| (u % tubular) * radial + v % radial;
    for u in 0..tubular {
        for v in 0..radial {
            let a = at(u, v);
            let b = at(u + 1, v);
            let c = at(u + 1, v + 1);
            let d = at(u, v + 1);
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }
    mesh
}

/// Single-sided rectangle in the XY plane facing +Z.
pub fn plane(w: f64, h: f64) -> Mesh {
    let hw = w * 0.5;
    let hh = h * 0.5;
    Mesh {
        vertices: vec![
            DVec3::new(-hw, -hh, 0.0),
            DVec3::new(hw, -hh, 0.0),
            DVec3::new(hw, hh, 0.0),
            DVec3::new(-hw, hh, 0.0),
        ],
        triangles: vec![[0, 1, 2], [0, 2, 3]],
    }
}

/// Single-sided annulus in the XY plane facing +Z.
pub fn ring(inner: f64, outer: f64, segments: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity((2 * segments) as usize, (2 * segments) as usize);
    for i in 0..segments {
        let a = angle(i, segments);
        mesh.push_vertex(DVec3::new(inner * a.cos(), inner * a.sin(), 0.0));
        mesh.push_vertex(DVec3::new(outer * a.cos(), outer * a.sin(), 0.0));
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (in0, out0) = (2 * i, 2 * i + 1);
        let (in1, out1) = (2 * j, 2 * j + 1);
        mesh.push_triangle(in0, out0, out1);
        mesh.push_triangle(in0, out1, in1);
    }
    mesh
}

/// Open tube swept along the Y axis. The ends are left open.
pub fn tube(radius: f64, length: f64, path_segments: u32, radial_segments: u32) -> Mesh {
    let hl = length * 0.5;
    let mut mesh = Mesh::default();
    add_wall(&mut mesh, radius, -hl, hl, path_segments, radial_segments);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::face_normal;

    fn assert_outward_from_axis_y(mesh: &Mesh) {
        for tri in mesh.triangle_positions() {
            let n = face_normal(tri);
            let c = (tri[0] + tri[1] + tri[2]) / 3.0;
            let radial = DVec3::new(c.x, 0.0, c.z);
            assert!(n.dot(radial) > 0.0, "normal {n:?} points inward at {c:?}");
        }
    }

    #[test]
    fn test_cuboid_counts_and_extent() {
        let mesh = cuboid(2.0, 3.0, 4.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let size = mesh.aabb().size();
        assert_eq!(size, DVec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = sphere(0.5, SPHERE_SECTORS, SPHERE_RINGS);
        for v in &mesh.vertices {
            assert!((v.length() - 0.5).abs() < 1e-9);
        }
        assert_eq!(
            mesh.triangle_count() as u32,
            2 * SPHERE_SECTORS * (SPHERE_RINGS - 1)
        );
    }

    #[test]
    fn test_cylinder_dimensions() {
        let mesh = cylinder(0.5, 2.0, ROUND_SEGMENTS);
        let size = mesh.aabb().size();
        assert!((size.x - 1.0).abs() < 1e-9);
        assert!((size.y - 2.0).abs() < 1e-9);
        assert!((size.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tube_wall_faces_away_from_axis() {
        let mesh = tube(0.25, 1.0, TUBE_PATH_SEGMENTS, TUBE_RADIAL_SEGMENTS);
        assert_eq!(
            mesh.triangle_count() as u32,
            2 * TUBE_PATH_SEGMENTS * TUBE_RADIAL_SEGMENTS
        );
        assert_outward_from_axis_y(&mesh);
    }

    #[test]
    fn test_pyramid_has_four_sides() {
        let mesh = cone(0.5, 1.0, PYRAMID_SIDES);
        // 4 side triangles + 4 cap triangles
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn test_flat_shapes_face_plus_z() {
        for mesh in [plane(1.0, 2.0), ring(0.25, 0.5, RING_SEGMENTS)] {
            for tri in mesh.triangle_positions() {
                let n = face_normal(tri);
                assert!((n - DVec3::Z).length() < 1e-9, "normal {n:?}");
            }
        }
    }

    #[test]
    fn test_ring_radii() {
        let mesh = ring(0.25, 0.5, RING_SEGMENTS);
        for v in &mesh.vertices {
            let r = v.length();
            assert!((r - 0.25).abs() < 1e-9 || (r - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_torus_extent() {
        let mesh = torus(0.5, 1.0 / 6.0, TORUS_TUBULAR_SEGMENTS, TORUS_RADIAL_SEGMENTS);
        let size = mesh.aabb().size();
        let expected = 2.0 * (0.5 + 1.0 / 6.0);
        assert!((size.x - expected).abs() < 1e-9);
        assert!((size.z - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_kind_degrades_to_box() {
        let mesh = generate_mesh(&ShapeKind::Unknown("teapot".into()), Vector3::ONE);
        assert_eq!(mesh, cuboid(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_generate_clamps_degenerate_scale() {
        let mesh = generate_mesh(&ShapeKind::Box, Vector3::new(0.0, -2.0, f64::NAN));
        let size = mesh.aabb().size();
        assert!((size - DVec3::splat(0.1)).length() < 1e-12);
    }
}
