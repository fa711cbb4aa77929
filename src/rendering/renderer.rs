use std::{path::Path, sync::Arc};

use anyhow::Context;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    demo::DemoState,
    rendering::{
        imgui_renderer::ImguiRendererState,
        passes::{
            glow_pass::GlowPass,
            lit_pass::LitPass,
            pass::{MeshTextureViews, Pass},
        },
        render_common::RenderCommon,
        render_material::RenderMaterialManager,
        render_model::{gather_instances, render_model_instances, RenderModel},
        scene_uniform::SceneUniformState,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    render_models: Arena<RenderModel>,
    materials: RenderMaterialManager,

    shader_loader: ShaderLoader,

    lit_pass: LitPass,
    glow_pass: GlowPass,
    imgui: ImguiRendererState,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        demo_state: &DemoState,
        imgui_context: &mut imgui::Context,
        shader_folder: &Path,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible graphics adapter")?;

        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request device")?;

        let initial_scene = SceneUniformState::new(
            &demo_state.camera,
            &demo_state.lighting,
            size,
            0.0,
        );
        let common = Arc::new(RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            initial_scene,
        ));

        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");

        let mut cache_builder = PipelineCacheBuilder::new();
        let lit_pass = LitPass::create(&device, common.clone(), &mut cache_builder)?;
        let glow_pass = GlowPass::create(&device, common.clone(), &mut cache_builder)?;

        let shader_loader = ShaderLoader::new(device.clone(), cache_builder, shader_folder)?;

        let imgui = ImguiRendererState::new(&device, &queue, common.surface_format(), imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            render_models: Arena::new(),
            materials: RenderMaterialManager::new(),
            shader_loader,
            lit_pass,
            glow_pass,
            imgui,
        })
    }

    /// Uploads every scene model that has no GPU buffers yet.
    pub fn load_models(&mut self, demo_state: &mut DemoState) {
        let scene = &mut demo_state.scene;

        for (_id, scene_model) in scene.models.iter_mut() {
            if scene_model.render_model.is_some() {
                continue;
            }

            let transparent = scene
                .materials
                .get(scene_model.material)
                .is_some_and(|material| material.is_transparent());

            let render_model = RenderModel::from_model(
                &self.device,
                &scene_model.model,
                scene_model.material,
                transparent,
            );
            scene_model.render_model = Some(self.render_models.alloc(render_model));

            log::info!(
                "Loaded model {} with {} triangles",
                scene_model.model.name,
                scene_model.model.triangle_count()
            );
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;

        let config = {
            let mut config = match self.common.output_surface_config.write() {
                Ok(config) => config,
                Err(poisoned) => poisoned.into_inner(),
            };
            config.width = new_size.width;
            config.height = new_size.height;
            config.clone()
        };

        self.surface.configure(&self.device, &config);
        self.depth_texture.resize(&self.device, new_size);
    }

    pub fn render(
        &mut self,
        demo_state: &mut DemoState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.common.scene_uniform.update(
            &self.queue,
            SceneUniformState::new(
                &demo_state.camera,
                &demo_state.lighting,
                self.size,
                demo_state.start_time.elapsed().as_secs_f32(),
            ),
        );

        self.materials.sync(
            &self.device,
            &self.queue,
            &self.common.material_bind_group_layout,
            &demo_state.scene,
        );

        gather_instances(&demo_state.scene, &mut self.render_models);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let texture_views = MeshTextureViews {
            color: view.clone(),
            depth: self.depth_texture.view().clone(),
        };

        let pipeline_cache = &self.shader_loader.cache;
        let render_models = &self.render_models;
        let materials = &self.materials;
        let queue = &self.queue;

        self.lit_pass
            .render(&texture_views, &mut encoder, pipeline_cache, |render_pass| {
                draw_models(render_pass, queue, render_models, materials, false);
            });

        self.glow_pass
            .render(&texture_views, &mut encoder, pipeline_cache, |render_pass| {
                draw_models(render_pass, queue, render_models, materials, true);
            });

        if let Err(e) = self.imgui.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        ) {
            log::error!("{:#}", e);
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}

fn draw_models(
    render_pass: &mut wgpu::RenderPass,
    queue: &wgpu::Queue,
    render_models: &Arena<RenderModel>,
    materials: &RenderMaterialManager,
    transparent: bool,
) {
    for (_id, render_model) in render_models.iter() {
        if render_model.transparent != transparent || !render_model.instances.should_render() {
            continue;
        }

        let Some(material) = materials.get(render_model.material) else {
            continue;
        };

        render_pass.set_bind_group(1, &material.bind_group, &[]);
        render_model_instances(render_pass, queue, render_model);
    }
}
