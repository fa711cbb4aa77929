use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::{camera::Camera, demo::Lighting};

/// Per-frame data shared by every pipeline, bound at group 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniformState {
    pub view_proj: Mat4,
    pub view_position: Vec4,
    pub light_position: Vec4,
    pub resolution: [f32; 2],
    pub time: f32,
    _padding: f32,
}

impl SceneUniformState {
    pub fn new(
        camera: &Camera,
        lighting: &Lighting,
        resolution: PhysicalSize<u32>,
        time: f32,
    ) -> Self {
        let resolution = Vec2::new(resolution.width as f32, resolution.height as f32);

        Self {
            view_proj: camera.get_vp_matrix(resolution),
            view_position: lighting.view_position.extend(1.0),
            light_position: lighting.light_position.extend(1.0),
            resolution: resolution.to_array(),
            time,
            _padding: 0.0,
        }
    }
}

pub struct SceneUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl SceneUniform {
    pub fn new(device: &wgpu::Device, initial_state: SceneUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: SceneUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn layout_matches_wgsl_struct() {
        assert_eq!(std::mem::size_of::<SceneUniformState>(), 112);
    }

    #[test]
    fn positions_come_from_lighting() {
        let lighting = Lighting {
            light_position: Vec3::new(0.0, 2.0, 0.0),
            view_position: Vec3::new(1.0, 0.0, 20.0),
        };
        let state = SceneUniformState::new(
            &Camera::default(),
            &lighting,
            PhysicalSize::new(800, 600),
            1.5,
        );

        assert_eq!(state.light_position, Vec4::new(0.0, 2.0, 0.0, 1.0));
        assert_eq!(state.view_position, Vec4::new(1.0, 0.0, 20.0, 1.0));
        assert_eq!(state.resolution, [800.0, 600.0]);
    }
}
