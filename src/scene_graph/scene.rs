use glam::Vec3;
use id_arena::Arena;

use crate::model::Model;
use crate::scene_graph::material::{Material, MaterialId};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    pub materials: Arena<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            materials: Arena::new(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.alloc(material)
    }

    pub fn add_model(&mut self, model: Model, material: MaterialId) -> SceneModelId {
        self.models.alloc(SceneModel::new(model, material))
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds a single object drawing `model` with `material` at `translation`.
    pub fn spawn_mesh(
        &mut self,
        name: impl Into<String>,
        model: Model,
        material: Material,
        translation: Vec3,
    ) -> ObjectId {
        let material_id = self.add_material(material);
        let model_id = self.add_model(model, material_id);
        let object = Object3D::new(name, Transform::from_translation(translation)).with_model(model_id);
        self.add_object(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn translate_object(&mut self, id: ObjectId, delta: Vec3) {
        if let Some(object) = self.objects.get_mut(id) {
            object.transform.translate(delta);
        }
    }

    pub fn object_translation(&self, id: ObjectId) -> Option<Vec3> {
        self.get_object(id).map(|object| object.transform.translation)
    }

    pub fn material_of(&self, model_id: SceneModelId) -> Option<&Material> {
        let model = self.models.get(model_id)?;
        self.materials.get(model.material)
    }

    /// Visible objects that draw a model, in insertion order.
    pub fn drawables(&self) -> impl Iterator<Item = (&Object3D, SceneModelId)> {
        self.objects
            .iter()
            .filter(|(_, object)| object.visible)
            .filter_map(|(_, object)| object.model_id.map(|model_id| (object, model_id)))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
