use anyhow::Context;
use glam::Vec3;

use crate::{
    camera::Camera,
    config::{Cli, Shading},
    font::Typeface,
    geometry::{
        box_geometry::box_geometry,
        text::{text_geometry, TextOptions},
    },
    input::KeyCommand,
    model::Model,
    scene_graph::{
        material::{Color, Material, PhongMaterial},
        object3d::ObjectId,
        scene::Scene,
    },
};

pub const LETTER_TEXT: &str = "Y";
pub const DIGIT_TEXT: &str = "1";

const TEXT_OPTIONS: TextOptions = TextOptions {
    size: 5.0,
    depth: 1.0,
    curve_segments: 12,
};

/// Positions the lighting shaders need this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light_position: Vec3,
    pub view_position: Vec3,
}

pub struct DemoState {
    pub camera: Camera,
    pub start_time: std::time::Instant,
    pub scene: Scene,
    pub lighting: Lighting,
    pub cube: ObjectId,
    pub letter: ObjectId,
    pub digit: ObjectId,
}

impl DemoState {
    pub fn new(config: &Cli) -> anyhow::Result<Self> {
        let typeface = Typeface::load(&config.font)
            .with_context(|| format!("Failed to load font {}", config.font.display()))?;

        Self::from_typeface(&typeface, config.shading)
    }

    pub fn from_typeface(typeface: &Typeface, shading: Shading) -> anyhow::Result<Self> {
        let camera = Camera::default();
        let mut scene = Scene::new();

        let cube = scene.spawn_mesh(
            "Cube",
            Model::from_mesh_data("Cube", box_geometry(1.0, 1.0, 1.0))?,
            Material::Glow {
                color: Color::WHITE,
            },
            Vec3::ZERO,
        );

        let (letter_material, digit_material) = match shading {
            Shading::Phong => (PhongMaterial::alphabet(), PhongMaterial::digit()),
            Shading::Flat => (
                PhongMaterial::basic(Color::from_hex(0x7fc7f8)),
                PhongMaterial::basic(Color::from_hex(0xf8b07f)),
            ),
        };

        let letter = scene.spawn_mesh(
            LETTER_TEXT,
            text_model(typeface, LETTER_TEXT)?,
            Material::Phong(letter_material),
            Vec3::new(-10.0, 0.0, 0.0),
        );

        let digit = scene.spawn_mesh(
            DIGIT_TEXT,
            text_model(typeface, DIGIT_TEXT)?,
            Material::Phong(digit_material),
            Vec3::new(10.0, 0.0, 0.0),
        );

        let lighting = Lighting {
            light_position: Vec3::ZERO,
            view_position: camera.eye,
        };

        Ok(Self {
            camera,
            start_time: std::time::Instant::now(),
            scene,
            lighting,
            cube,
            letter,
            digit,
        })
    }

    pub fn apply(&mut self, command: KeyCommand) {
        if command.moves_camera() {
            self.camera.eye += command.delta();
        } else {
            self.scene.translate_object(self.cube, command.delta());
        }

        log::debug!(
            "{:?}: cube at {}, camera at {}",
            command,
            self.cube_position(),
            self.camera.eye
        );
    }

    pub fn cube_position(&self) -> Vec3 {
        self.scene
            .object_translation(self.cube)
            .unwrap_or(Vec3::ZERO)
    }

    /// The light rides on the cube and specular terms are seen from the camera.
    pub fn update(&mut self) {
        self.lighting = Lighting {
            light_position: self.cube_position(),
            view_position: self.camera.eye,
        };
    }
}

fn text_model(typeface: &Typeface, text: &str) -> anyhow::Result<Model> {
    let mesh = text_geometry(typeface, text, TEXT_OPTIONS)
        .with_context(|| format!("Failed to build geometry for {:?}", text))?;

    Model::from_mesh_data(text, mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(shading: Shading) -> DemoState {
        let typeface =
            Typeface::from_json(include_str!("../assets/fonts/demo_regular.typeface.json")).unwrap();
        DemoState::from_typeface(&typeface, shading).unwrap()
    }

    #[test]
    fn initial_layout() {
        let state = demo(Shading::Phong);

        assert_eq!(state.cube_position(), Vec3::ZERO);
        assert_eq!(state.camera.eye, Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(
            state.scene.object_translation(state.letter),
            Some(Vec3::new(-10.0, 0.0, 0.0))
        );
        assert_eq!(
            state.scene.object_translation(state.digit),
            Some(Vec3::new(10.0, 0.0, 0.0))
        );
        assert_eq!(state.scene.drawables().count(), 3);
    }

    #[test]
    fn keys_move_cube_and_camera_by_one_unit() {
        let mut state = demo(Shading::Phong);

        state.apply(KeyCommand::CubeUp);
        state.apply(KeyCommand::CubeUp);
        state.apply(KeyCommand::CubeDown);
        state.apply(KeyCommand::CameraRight);
        state.apply(KeyCommand::CameraRight);
        state.apply(KeyCommand::CameraLeft);

        assert_eq!(state.cube_position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(state.camera.eye, Vec3::new(1.0, 0.0, 20.0));
    }

    #[test]
    fn lighting_follows_cube_and_camera_after_update() {
        let mut state = demo(Shading::Phong);
        state.apply(KeyCommand::CubeUp);
        state.apply(KeyCommand::CameraLeft);

        // Positions are sampled once per frame.
        assert_eq!(state.lighting.light_position, Vec3::ZERO);

        state.update();
        assert_eq!(
            state.lighting,
            Lighting {
                light_position: Vec3::new(0.0, 1.0, 0.0),
                view_position: Vec3::new(-1.0, 0.0, 20.0),
            }
        );
    }

    #[test]
    fn flat_shading_uses_basic_colors() {
        let state = demo(Shading::Flat);
        let letter = state.scene.get_object(state.letter).unwrap();
        let material = state.scene.material_of(letter.model_id.unwrap()).unwrap();

        assert_eq!(
            *material,
            Material::Phong(PhongMaterial::basic(Color::from_hex(0x7fc7f8)))
        );
    }

    #[test]
    fn missing_font_is_an_error() {
        let cli = <Cli as clap::Parser>::parse_from(["glowtext", "--font", "does/not/exist.json"]);
        let error = DemoState::new(&cli).err().unwrap();

        assert!(format!("{:#}", error).contains("does/not/exist.json"));
    }
}
