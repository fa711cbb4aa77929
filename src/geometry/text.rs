use crate::{
    font::{shapes::DEFAULT_CURVE_SEGMENTS, typeface::Typeface, TypefaceError},
    geometry::{extrude::extrude, MeshData},
};

#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    /// Height of a full em in scene units.
    pub size: f32,
    /// Extrusion depth along +z.
    pub depth: f32,
    pub curve_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            depth: 50.0,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
        }
    }
}

/// Extruded solid text. The first glyph's origin sits at (0, 0, 0).
pub fn text_geometry(
    typeface: &Typeface,
    text: &str,
    options: TextOptions,
) -> Result<MeshData, TypefaceError> {
    let shapes = typeface.generate_shapes(text, options.size, options.curve_segments)?;
    Ok(extrude(&shapes, options.depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::assert_faces_match_normals;

    #[test]
    fn bundled_font_has_demo_glyphs() {
        let typeface = Typeface::from_json(include_str!(
            "../../assets/fonts/demo_regular.typeface.json"
        ))
        .unwrap();

        let options = TextOptions {
            size: 5.0,
            depth: 1.0,
            ..Default::default()
        };

        for text in ["Y", "1", "?"] {
            let mesh = text_geometry(&typeface, text, options).unwrap();
            assert!(!mesh.is_empty(), "no geometry for {:?}", text);
            assert_faces_match_normals(&mesh);

            let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
            assert!(max_y > 3.0 && max_y <= 5.0);
        }
    }

    #[test]
    fn whitespace_produces_no_geometry() {
        let typeface = Typeface::from_json(include_str!(
            "../../assets/fonts/demo_regular.typeface.json"
        ))
        .unwrap();

        let mesh = text_geometry(&typeface, " ", TextOptions::default()).unwrap();
        assert!(mesh.is_empty());
    }
}
