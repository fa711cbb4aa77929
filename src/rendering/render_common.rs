use std::sync::RwLock;

use wgpu::SurfaceConfiguration;
use winit::dpi::PhysicalSize;

use crate::rendering::{
    render_material::MaterialUniform,
    scene_uniform::{SceneUniform, SceneUniformState},
};

/// State shared by every pass: the output surface format and the bind group
/// layouts all pipelines agree on.
pub struct RenderCommon {
    pub output_surface_config: RwLock<SurfaceConfiguration>,
    pub scene_uniform: SceneUniform,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
        initial_scene: SceneUniformState,
    ) -> Self {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        log::info!(
            "Configured {}x{} surface with format {:?}",
            output_surface_config.width,
            output_surface_config.height,
            surface_format
        );

        let scene_uniform = SceneUniform::new(device, initial_scene);
        let material_bind_group_layout = MaterialUniform::bind_group_layout(device);

        Self {
            output_surface_config: RwLock::new(output_surface_config),
            scene_uniform,
            material_bind_group_layout,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.output_surface_config
            .read()
            .map(|config| config.format)
            .unwrap_or_else(|poisoned| poisoned.into_inner().format)
    }
}
