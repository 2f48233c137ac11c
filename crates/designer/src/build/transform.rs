//! Local → world transform shared by the preview projection and the exporter.

use glam::{DAffine3, DMat3, DVec3};
use shared::Vector3;

use crate::mesh::Mesh;

/// Rotation from Euler angles (radians), order XYZ: `Rx(x) * Ry(y) * Rz(z)`.
///
/// A point is rotated about Z first, then Y, then X.
pub fn euler_rotation(rotation: Vector3) -> DMat3 {
    DMat3::from_rotation_x(rotation.x)
        * DMat3::from_rotation_y(rotation.y)
        * DMat3::from_rotation_z(rotation.z)
}

/// Rotate, then translate.
pub fn object_matrix(position: Vector3, rotation: Vector3) -> DAffine3 {
    DAffine3::from_mat3_translation(
        euler_rotation(rotation),
        DVec3::from_array(position.to_array()),
    )
}

/// Transform a local mesh into world space. Triangle indices are unchanged:
/// a proper rotation preserves winding.
pub fn to_world(mesh: &Mesh, position: Vector3, rotation: Vector3) -> Mesh {
    let matrix = object_matrix(position, rotation);
    Mesh {
        vertices: mesh
            .vertices
            .iter()
            .map(|v| matrix.transform_point3(*v))
            .collect(),
        triangles: mesh.triangles.clone(),
    }
}
