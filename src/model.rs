use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use itertools::izip;

use crate::geometry::MeshData;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

impl Model {
    pub fn from_mesh_data(name: impl Into<String>, mesh: MeshData) -> anyhow::Result<Model> {
        let name = name.into();

        if mesh.is_empty() {
            return Err(anyhow::anyhow!("Mesh without triangles: {}", name));
        }

        let vertices = izip!(mesh.positions, mesh.normals)
            .map(|(position, normal)| Vertex { position, normal })
            .collect::<Vec<Vertex>>();

        Ok(Model {
            name,
            primitives: vec![ModelPrimitive {
                index: 0,
                vertices,
                indices: mesh.indices,
            }],
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(|p| p.indices.len() / 3).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::box_geometry::box_geometry;

    #[test]
    fn cube_model_keeps_vertex_attributes() {
        let model = Model::from_mesh_data("Cube", box_geometry(1.0, 1.0, 1.0)).unwrap();

        assert_eq!(model.primitives.len(), 1);
        assert_eq!(model.primitives[0].vertices.len(), 24);
        assert_eq!(model.triangle_count(), 12);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(Model::from_mesh_data("Nothing", MeshData::default()).is_err());
    }
}
