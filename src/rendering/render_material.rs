use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::scene_graph::{
    material::{Material, MaterialId},
    scene::Scene,
};

/// GPU layout of `glowtext::lighting::Material`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    _padding: f32,
}

impl MaterialUniform {
    pub fn from_material(material: &Material) -> Self {
        match material {
            Material::Phong(phong) => Self {
                ambient_color: phong.ambient_color.to_array(),
                ambient_intensity: phong.ambient_intensity,
                diffuse_color: phong.diffuse_color.to_array(),
                shininess: phong.shininess,
                specular_color: phong.specular_color.to_array(),
                _padding: 0.0,
            },
            // The glow shader emits ambient_color * ambient_intensity as is.
            Material::Glow { color } => Self {
                ambient_color: color.to_array(),
                ambient_intensity: 1.0,
                diffuse_color: [0.0; 3],
                shininess: 1.0,
                specular_color: [0.0; 3],
                _padding: 0.0,
            },
        }
    }

    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }
}

pub struct RenderMaterial {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    last_uploaded: MaterialUniform,
}

/// Mirrors scene materials into uniform buffers, re-uploading only the ones
/// that changed since the last frame.
pub struct RenderMaterialManager {
    materials: HashMap<MaterialId, RenderMaterial>,
}

impl RenderMaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) {
        for (id, material) in scene.materials.iter() {
            let uniform = MaterialUniform::from_material(material);

            match self.materials.get_mut(&id) {
                Some(existing) => {
                    if existing.last_uploaded != uniform {
                        queue.write_buffer(&existing.buffer, 0, bytemuck::cast_slice(&[uniform]));
                        existing.last_uploaded = uniform;
                    }
                }
                None => {
                    let render_material = Self::create(device, layout, id, uniform);
                    self.materials.insert(id, render_material);
                }
            }
        }
    }

    fn create(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        id: MaterialId,
        uniform: MaterialUniform,
    ) -> RenderMaterial {
        let label = format!("Material {}", id.index());

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        RenderMaterial {
            buffer,
            bind_group,
            last_uploaded: uniform,
        }
    }

    pub fn get(&self, id: MaterialId) -> Option<&RenderMaterial> {
        self.materials.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::material::{Color, PhongMaterial};

    #[test]
    fn layout_matches_wgsl_struct() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn phong_parameters_are_packed() {
        let uniform = MaterialUniform::from_material(&Material::Phong(PhongMaterial::digit()));

        assert_eq!(uniform.ambient_color, [0.0, 1.0, 1.0]);
        assert_eq!(uniform.specular_color, [0.0, 1.0, 1.0]);
        assert_eq!(uniform.shininess, 64.0);
        assert_eq!(uniform.ambient_intensity, 0.341);
    }

    #[test]
    fn glow_emits_its_color() {
        let uniform = MaterialUniform::from_material(&Material::Glow {
            color: Color::WHITE,
        });

        assert_eq!(uniform.ambient_color, [1.0; 3]);
        assert_eq!(uniform.ambient_intensity, 1.0);
    }
}
