use id_arena::Id;

use crate::{model::Model, rendering::render_model::RenderModelId, scene_graph::material::MaterialId};

pub type SceneModelId = Id<SceneModel>;

/// Geometry paired with the material it is drawn with.
pub struct SceneModel {
    pub model: Model,
    pub material: MaterialId,
    pub render_model: Option<RenderModelId>,
}

impl SceneModel {
    pub fn new(model: Model, material: MaterialId) -> Self {
        Self {
            model,
            material,
            render_model: None,
        }
    }
}
