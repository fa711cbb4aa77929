use crate::{demo::DemoState, scene_graph::material::Material};

pub fn update(state: &mut DemoState, ui: &mut imgui::Ui) -> anyhow::Result<()> {
    state.update();
    draw_ui(state, ui);

    Ok(())
}

fn draw_ui(state: &mut DemoState, ui: &imgui::Ui) {
    let cube = state.cube_position();
    let camera = state.camera.eye;
    let light = state.lighting.light_position;

    ui.window("Scene")
        .size([300.0, 260.0], imgui::Condition::FirstUseEver)
        .build(|| {
            ui.text("W/S: move cube  A/D: move camera");
            ui.separator();
            ui.text(format!("Cube:   {:>6.1} {:>6.1} {:>6.1}", cube.x, cube.y, cube.z));
            ui.text(format!(
                "Camera: {:>6.1} {:>6.1} {:>6.1}",
                camera.x, camera.y, camera.z
            ));
            ui.text(format!("Light:  {:>6.1} {:>6.1} {:>6.1}", light.x, light.y, light.z));
            ui.separator();

            for (model_id, scene_model) in state.scene.models.iter() {
                let Some(Material::Phong(material)) = state.scene.materials.get_mut(scene_model.material)
                else {
                    continue;
                };

                let _id = ui.push_id_usize(model_id.index());
                ui.text(&scene_model.model.name);
                ui.slider("Ambient", 0.0, 1.0, &mut material.ambient_intensity);
                ui.slider("Shininess", 1.0, 256.0, &mut material.shininess);
            }
        });
}
