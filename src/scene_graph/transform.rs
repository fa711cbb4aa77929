use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Inverse transpose of the model matrix, for transforming normals.
    pub fn normal_matrix(&self) -> Mat4 {
        self.matrix().inverse().transpose()
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let transform = Transform {
            scale: Vec3::new(2.0, 1.0, 1.0),
            ..Default::default()
        };

        // Stretching along x flattens a 45° surface, tilting its normal towards y.
        let normal = transform
            .normal_matrix()
            .transform_vector3(Vec3::new(1.0, 1.0, 0.0))
            .normalize();
        assert!(normal.x < normal.y);
    }

    #[test]
    fn translate_accumulates() {
        let mut transform = Transform::from_translation(Vec3::new(-10.0, 0.0, 0.0));
        transform.translate(Vec3::Y);
        transform.translate(Vec3::Y);

        assert_eq!(transform.translation, Vec3::new(-10.0, 2.0, 0.0));
        assert_eq!(
            transform.matrix().transform_point3(Vec3::ZERO),
            Vec3::new(-10.0, 2.0, 0.0)
        );
    }
}
