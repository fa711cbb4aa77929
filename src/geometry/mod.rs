use glam::Vec3;

pub mod box_geometry;
pub mod extrude;
pub mod text;
pub mod triangulate;

/// Indexed triangle list with one normal per vertex.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position);
        self.normals.push(normal);
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::MeshData;

    /// Every triangle must be counter-clockwise when seen from the side its normals face.
    pub(crate) fn assert_faces_match_normals(mesh: &MeshData) {
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.positions[triangle[i] as usize]);
            let face_normal = (b - a).cross(c - a);

            for &index in triangle {
                let normal = mesh.normals[index as usize];
                assert!(
                    face_normal.dot(normal) > 0.0,
                    "triangle {:?} winds against its normal {:?}",
                    triangle,
                    normal
                );
            }
        }
    }
}
