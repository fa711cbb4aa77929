use std::{collections::HashMap, path::Path};

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum TypefaceError {
    #[error("failed to read typeface file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed typeface JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("typeface resolution must be positive, got {0}")]
    InvalidResolution(f32),
    #[error("unknown outline command {command:?} in glyph {glyph:?}")]
    UnknownCommand { glyph: char, command: String },
    #[error("outline of glyph {glyph:?} ended in the middle of a {command:?} command")]
    TruncatedCommand { glyph: char, command: char },
    #[error("invalid number {value:?} in outline of glyph {glyph:?}")]
    InvalidNumber { glyph: char, value: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub ha: f32,
    #[serde(default)]
    pub x_min: f32,
    #[serde(default)]
    pub x_max: f32,
    /// Outline command string. Empty for whitespace glyphs.
    #[serde(default)]
    pub o: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typeface {
    #[serde(default)]
    pub family_name: String,
    pub resolution: f32,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
    pub glyphs: HashMap<char, Glyph>,
}

/// One command of a glyph outline, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticTo { control: Vec2, to: Vec2 },
    CubicTo { control1: Vec2, control2: Vec2, to: Vec2 },
}

impl Typeface {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TypefaceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TypefaceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, TypefaceError> {
        let typeface: Typeface = serde_json::from_str(json)?;

        if !(typeface.resolution > 0.0) {
            return Err(TypefaceError::InvalidResolution(typeface.resolution));
        }

        log::debug!(
            "Parsed typeface {:?} with {} glyphs",
            typeface.family_name,
            typeface.glyphs.len()
        );

        Ok(typeface)
    }

    /// Vertical distance between two lines of text, in font units.
    pub fn line_height(&self) -> f32 {
        self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness
    }

    /// Looks up a glyph, falling back to `?` like the typeface renderers do.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c).or_else(|| self.glyphs.get(&'?'))
    }
}

/// Tokenizes a typeface outline string.
///
/// Curve commands list their end point first, followed by the control points.
pub fn parse_outline(glyph: char, outline: &str) -> Result<Vec<PathCommand>, TypefaceError> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    while let Some(token) = tokens.next() {
        let command = match token {
            "m" => PathCommand::MoveTo(read_point(glyph, 'm', &mut tokens)?),
            "l" => PathCommand::LineTo(read_point(glyph, 'l', &mut tokens)?),
            "q" => {
                let to = read_point(glyph, 'q', &mut tokens)?;
                let control = read_point(glyph, 'q', &mut tokens)?;
                PathCommand::QuadraticTo { control, to }
            }
            "b" => {
                let to = read_point(glyph, 'b', &mut tokens)?;
                let control1 = read_point(glyph, 'b', &mut tokens)?;
                let control2 = read_point(glyph, 'b', &mut tokens)?;
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                }
            }
            "z" => continue,
            other => {
                return Err(TypefaceError::UnknownCommand {
                    glyph,
                    command: other.to_string(),
                })
            }
        };

        commands.push(command);
    }

    Ok(commands)
}

fn read_point<'a>(
    glyph: char,
    command: char,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Result<Vec2, TypefaceError> {
    let mut next = || -> Result<f32, TypefaceError> {
        let token = tokens
            .next()
            .ok_or(TypefaceError::TruncatedCommand { glyph, command })?;
        token.parse().map_err(|_| TypefaceError::InvalidNumber {
            glyph,
            value: token.to_string(),
        })
    };

    let x = next()?;
    let y = next()?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "familyName": "Test",
        "resolution": 1000,
        "boundingBox": { "xMin": 0, "xMax": 700, "yMin": -200, "yMax": 800 },
        "underlineThickness": 50,
        "glyphs": {
            "A": { "ha": 600, "x_min": 0, "x_max": 600, "o": "m 0 0 l 0 700 l 600 0" },
            "?": { "ha": 500, "o": "m 0 0 l 0 500 l 500 500 l 500 0" },
            " ": { "ha": 250 }
        }
    }"#;

    #[test]
    fn parses_typeface_document() {
        let typeface = Typeface::from_json(MINIMAL).unwrap();

        assert_eq!(typeface.family_name, "Test");
        assert_eq!(typeface.resolution, 1000.0);
        assert_eq!(typeface.glyphs.len(), 3);
        assert_eq!(typeface.line_height(), 1050.0);
        assert!(typeface.glyphs[&' '].o.is_empty());
    }

    #[test]
    fn missing_glyph_falls_back_to_question_mark() {
        let typeface = Typeface::from_json(MINIMAL).unwrap();

        assert_eq!(typeface.glyph('Z').unwrap().ha, 500.0);
        assert_eq!(typeface.glyph('A').unwrap().ha, 600.0);
    }

    #[test]
    fn rejects_zero_resolution() {
        let json = MINIMAL.replace("\"resolution\": 1000", "\"resolution\": 0");
        assert!(matches!(
            Typeface::from_json(&json),
            Err(TypefaceError::InvalidResolution(_))
        ));
    }

    #[test]
    fn curve_commands_put_end_point_first() {
        let commands = parse_outline('x', "m 0 0 q 10 0 5 5 b 0 10 10 5 5 10 z").unwrap();

        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Vec2::ZERO),
                PathCommand::QuadraticTo {
                    control: Vec2::new(5.0, 5.0),
                    to: Vec2::new(10.0, 0.0),
                },
                PathCommand::CubicTo {
                    control1: Vec2::new(10.0, 5.0),
                    control2: Vec2::new(5.0, 10.0),
                    to: Vec2::new(0.0, 10.0),
                },
            ]
        );
    }

    #[test]
    fn malformed_outlines_are_errors() {
        assert!(matches!(
            parse_outline('x', "m 0 0 k 1 1"),
            Err(TypefaceError::UnknownCommand { .. })
        ));
        assert!(matches!(
            parse_outline('x', "m 0 0 l 1"),
            Err(TypefaceError::TruncatedCommand { command: 'l', .. })
        ));
        assert!(matches!(
            parse_outline('x', "m 0 zero"),
            Err(TypefaceError::InvalidNumber { .. })
        ));
    }
}
