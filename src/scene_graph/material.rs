use glam::Vec3;
use id_arena::Id;

pub type MaterialId = Id<Material>;

pub const DEFAULT_AMBIENT_INTENSITY: f32 = 0.341;

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);
    pub const BLACK: Color = Color(Vec3::ZERO);

    /// Converts a `0xRRGGBB` sRGB value to linear RGB.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Color(Vec3::new(channel(16), channel(8), channel(0)))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub ambient_color: Color,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub ambient_intensity: f32,
    pub shininess: f32,
}

impl PhongMaterial {
    /// Light blue body with a white highlight, used for letters.
    pub fn alphabet() -> Self {
        Self {
            ambient_color: Color::from_hex(0xADD8E6),
            diffuse_color: Color::from_hex(0xADD8E6),
            specular_color: Color::WHITE,
            ambient_intensity: DEFAULT_AMBIENT_INTENSITY,
            shininess: 32.0,
        }
    }

    /// Metallic cyan: the highlight takes the body color.
    pub fn digit() -> Self {
        Self {
            ambient_color: Color::from_hex(0x00FFFF),
            diffuse_color: Color::from_hex(0x00FFFF),
            specular_color: Color::from_hex(0x00FFFF),
            ambient_intensity: DEFAULT_AMBIENT_INTENSITY,
            shininess: 64.0,
        }
    }

    /// Unlit flat color.
    pub fn basic(color: Color) -> Self {
        Self {
            ambient_color: color,
            diffuse_color: Color::BLACK,
            specular_color: Color::BLACK,
            ambient_intensity: 1.0,
            shininess: 1.0,
        }
    }

    /// Evaluates the lighting model on the CPU, the same way `lighting.wgsl` does.
    pub fn shade(&self, position: Vec3, normal: Vec3, light: Vec3, view: Vec3) -> Vec3 {
        let normal = normal.normalize();
        let light_dir = (light - position).normalize();
        let view_dir = (view - position).normalize();

        let ambient = self.ambient_intensity * self.ambient_color.0;

        let diff = normal.dot(light_dir).max(0.0);
        let diffuse = diff * self.diffuse_color.0;

        let reflect_dir = reflect(-light_dir, normal);
        let spec = view_dir.dot(reflect_dir).max(0.0).powf(self.shininess);
        let specular = spec * self.specular_color.0;

        ambient + diffuse + specular
    }
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Opaque, lit per pixel.
    Phong(PhongMaterial),
    /// Unlit, blended additively over the opaque scene without writing depth.
    Glow { color: Color },
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Material::Glow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-4), "{:?} != {:?}", a, b);
    }

    #[test]
    fn hex_colors_are_linearized() {
        assert_eq!(Color::from_hex(0xFFFFFF).0, Vec3::ONE);
        assert_eq!(Color::from_hex(0x000000).0, Vec3::ZERO);

        let cyan = Color::from_hex(0x00FFFF).0;
        assert_eq!(cyan, Vec3::new(0.0, 1.0, 1.0));

        // sRGB mid grey is roughly 21% in linear light.
        let grey = Color::from_hex(0x808080).0.x;
        assert!((grey - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn light_behind_surface_leaves_only_ambient() {
        let material = PhongMaterial::alphabet();
        let color = material.shade(Vec3::ZERO, Vec3::Z, Vec3::NEG_Z * 5.0, Vec3::Z * 20.0);

        assert_close(color, material.ambient_color.0 * DEFAULT_AMBIENT_INTENSITY);
    }

    #[test]
    fn head_on_light_adds_full_diffuse_and_specular() {
        let material = PhongMaterial::alphabet();
        let color = material.shade(Vec3::ZERO, Vec3::Z, Vec3::Z * 5.0, Vec3::Z * 20.0);

        let expected = material.ambient_color.0 * DEFAULT_AMBIENT_INTENSITY
            + material.diffuse_color.0
            + Vec3::ONE;
        assert_close(color, expected);
    }

    #[test]
    fn grazing_view_dims_the_highlight() {
        let material = PhongMaterial::digit();
        let light = Vec3::Z * 5.0;

        let head_on = material.shade(Vec3::ZERO, Vec3::Z, light, Vec3::Z * 20.0);
        let oblique = material.shade(Vec3::ZERO, Vec3::Z, light, Vec3::new(20.0, 0.0, 5.0));

        assert!(oblique.y < head_on.y);
        assert_eq!(oblique.x, 0.0);
    }

    #[test]
    fn basic_material_ignores_light() {
        let color = Color::from_hex(0x7fc7f8);
        let material = PhongMaterial::basic(color);

        let lit = material.shade(Vec3::ZERO, Vec3::Z, Vec3::Z, Vec3::Z * 20.0);
        let unlit = material.shade(Vec3::ZERO, Vec3::Z, Vec3::NEG_Z, Vec3::Z * 20.0);

        assert_close(lit, color.0);
        assert_close(unlit, color.0);
    }

    #[test]
    fn only_glow_is_transparent() {
        assert!(Material::Glow {
            color: Color::WHITE
        }
        .is_transparent());
        assert!(!Material::Phong(PhongMaterial::digit()).is_transparent());
    }
}
