use glam::Vec3;

use crate::geometry::MeshData;

/// Axis-aligned box centered on the origin, one flat-shaded quad per face.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;
    let mut mesh = MeshData::default();

    // (normal, u axis, v axis) with u x v == normal so quads wind counter-clockwise.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u, v) in faces {
        let base = mesh.positions.len() as u32;
        let center = normal * half;

        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = center + u * half * su + v * half * sv;
            mesh.push_vertex(position, normal);
        }

        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::assert_faces_match_normals;

    #[test]
    fn unit_cube_layout() {
        let mesh = box_geometry(1.0, 1.0, 1.0);

        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);

        for p in &mesh.positions {
            assert_eq!(p.abs(), Vec3::splat(0.5));
        }

        assert_faces_match_normals(&mesh);
    }

    #[test]
    fn non_uniform_box_extents() {
        let mesh = box_geometry(2.0, 4.0, 6.0);

        let max = mesh
            .positions
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, p| acc.max(*p));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }
}
