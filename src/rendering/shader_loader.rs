use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, channel},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags},
};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{PollType, RenderPipeline};

const SHARED_MODULES_FOLDER: &str = "shared";

pub type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub struct ShaderDefinition {
    pub name: &'static str,
    pub path: &'static str,
}

pub struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

pub struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub fn add_shader(&mut self, def: ShaderDefinition, factory: PipelineFactory) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        self.shaders.alloc(ShaderEntry {
            pipeline_id,
            def,
            factory,
        });
        pipeline_id
    }

    fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    /// `None` only for ids from another builder; every registered shader is
    /// compiled before the loader is constructed.
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline> {
        self.pipelines.get(id).and_then(|entry| entry.0.as_ref())
    }

    fn set(&mut self, id: PipelineId, pipeline: wgpu::RenderPipeline) {
        if let Some(entry) = self.pipelines.get_mut(id) {
            entry.0 = Some(pipeline);
        }
    }
}

/// Compiles shaders into pipelines and recompiles them on a watcher thread
/// whenever their source changes.
pub struct ShaderLoader {
    pub cache: PipelineCache,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ShaderLoader {
    pub fn new(
        device: wgpu::Device,
        cache_builder: PipelineCacheBuilder,
        shader_folder: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let shader_folder: PathBuf = shader_folder.into();
        let mut cache = cache_builder.build();

        let composer = create_composer(&shader_folder.join(SHARED_MODULES_FOLDER))?;
        let composer = Arc::new(Mutex::new(composer));

        let shaders = cache.shaders.clone();
        for (_, shader) in shaders.iter() {
            let pipeline = compile_file(&device, &shader_folder, &shader.def, &shader.factory, &composer)
                .with_context(|| format!("Failed to compile shader: {}", shader.def.name))?;
            cache.set(shader.pipeline_id, pipeline);
        }

        let (send_new_pipelines, recv_new_pipelines) = channel();

        let watcher_folder = shader_folder.clone();
        let mut debouncer: Debouncer<RecommendedWatcher> = new_debouncer_opt(
            notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
            move |res: DebounceEventResult| match res {
                Ok(events) => {
                    let changed: Vec<&Path> = events
                        .iter()
                        .filter(|event| event.kind == DebouncedEventKind::Any)
                        .map(|event| event.path.as_path())
                        .collect();

                    let shared_changed = changed.iter().any(|path| is_shared_module(path));

                    if shared_changed {
                        match create_composer(&watcher_folder.join(SHARED_MODULES_FOLDER)) {
                            Ok(new_composer) => match composer.lock() {
                                Ok(mut composer) => *composer = new_composer,
                                Err(_) => {
                                    log::error!("Shader composer lock poisoned");
                                    return;
                                }
                            },
                            Err(e) => {
                                log::error!("Failed to reload shared shader modules: {:?}", e);
                                return;
                            }
                        }
                    }

                    for (_, entry) in shaders.iter() {
                        let affected = shared_changed
                            || changed.iter().any(|path| path.ends_with(entry.def.path));
                        if !affected {
                            continue;
                        }

                        match compile_file(&device, &watcher_folder, &entry.def, &entry.factory, &composer) {
                            Ok(pipeline) => {
                                if send_new_pipelines
                                    .send((entry.def.name, entry.pipeline_id, pipeline))
                                    .is_err()
                                {
                                    return;
                                }
                            }
                            Err(e) => log::error!("Failed to reload shader: {:?}", e),
                        }
                    }
                }
                Err(e) => log::error!("Error debouncing shader changes: {}", e),
            },
        )
        .context("Failed to create shader watcher")?;

        let absolute_shader_folder = shader_folder
            .canonicalize()
            .with_context(|| format!("Shader folder not found: {}", shader_folder.display()))?;

        debouncer
            .watcher()
            .watch(&absolute_shader_folder, RecursiveMode::Recursive)
            .context("Failed to watch shader folder")?;

        Ok(Self {
            cache,
            receiver: recv_new_pipelines,
            _debouncer: debouncer,
        })
    }

    pub fn load_pending_shaders(&mut self) {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            log::info!("Shader reloaded: {}", name);
            self.cache.set(pipeline_id, pipeline);
        }
    }
}

fn compile_file(
    device: &wgpu::Device,
    shader_folder: &Path,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    composer: &Mutex<Composer>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = shader_folder.join(shader_def.path);
    let shader_code = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;

    let file_path = path.to_string_lossy().to_string();

    let module = {
        let mut composer = composer
            .lock()
            .map_err(|_| anyhow::anyhow!("Shader composer lock poisoned"))?;

        composer
            .make_naga_module(NagaModuleDescriptor {
                file_path: &file_path,
                source: &shader_code,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(&composer)))
            .context("Failed to create Naga module from shader code")?
    };

    // wgpu validates again when the module is created; this pass only feeds the WGSL writer.
    let info = naga::valid::Validator::new(ValidationFlags::empty(), Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    let shader_code = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to convert Naga module to WGSL string")?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    log::debug!("Compiled shader {}", shader_def.name);

    pipeline
}

/// Shared modules are imported by every shader, so a change to one of them
/// invalidates all pipelines.
fn is_shared_module(path: &Path) -> bool {
    path.parent()
        .is_some_and(|parent| parent.ends_with(SHARED_MODULES_FOLDER))
        && path.extension().is_some_and(|ext| ext == "wgsl")
}

fn create_composer(shared_folder: &Path) -> anyhow::Result<Composer> {
    let shared_files = std::fs::read_dir(shared_folder).with_context(|| {
        format!(
            "Failed to read shared shader modules directory {}",
            shared_folder.display()
        )
    })?;

    let mut composer = Composer::default();

    for entry in shared_files {
        let path = entry
            .context("Failed to read entry in shared shader modules directory")?
            .path();

        if !path.is_file() || path.extension().map_or(true, |ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read shared shader module {}", path.display()))?;

        let file_path = path.to_string_lossy().to_string();

        let added = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map(|_| ());

        if let Err(e) = added {
            return Err(anyhow::anyhow!("{}", e.emit_to_string(&composer)))
                .with_context(|| format!("Failed to add shared shader module: {}", file_path));
        }
    }

    Ok(composer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_module_changes_are_detected() {
        assert!(is_shared_module(Path::new("/demo/assets/shaders/shared/lighting.wgsl")));
        assert!(is_shared_module(Path::new("assets/shaders/shared/scene.wgsl")));

        assert!(!is_shared_module(Path::new("/demo/assets/shaders/lit.wgsl")));
        assert!(!is_shared_module(Path::new("/demo/assets/shaders/shared/notes.txt")));
        assert!(!is_shared_module(Path::new("/demo/assets/shaders/shared")));
    }
}
