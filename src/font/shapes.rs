use glam::Vec2;

use crate::font::typeface::{parse_outline, PathCommand, Typeface, TypefaceError};

pub const DEFAULT_CURVE_SEGMENTS: u32 = 12;

/// A filled region: one outer contour and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub contour: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

/// Signed area of a closed polygon. Positive for counter-clockwise (y-up).
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut area = 0.0;

    for i in 0..n {
        let p = points[(i + n - 1) % n];
        let q = points[i];
        area += p.x * q.y - q.x * p.y;
    }

    area * 0.5
}

pub fn is_clockwise(points: &[Vec2]) -> bool {
    signed_area(points) < 0.0
}

pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];

        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }

        j = i;
    }

    inside
}

impl Typeface {
    /// Lays out `text` and converts every glyph outline into filled shapes.
    ///
    /// Coordinates are in scene units: one font `resolution` maps to `size`.
    pub fn generate_shapes(
        &self,
        text: &str,
        size: f32,
        curve_segments: u32,
    ) -> Result<Vec<Shape>, TypefaceError> {
        let scale = size / self.resolution;
        let line_height = self.line_height() * scale;

        let mut shapes = Vec::new();
        let mut offset = Vec2::ZERO;

        for c in text.chars() {
            if c == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }

            let Some(glyph) = self.glyph(c) else {
                log::warn!(
                    "Character {:?} does not exist in typeface {:?}",
                    c,
                    self.family_name
                );
                continue;
            };

            let commands = parse_outline(c, &glyph.o)?;
            let contours = flatten(&commands, scale, offset, curve_segments.max(1));
            shapes.extend(contours_to_shapes(contours));

            offset.x += glyph.ha * scale;
        }

        Ok(shapes)
    }
}

/// Turns outline commands into closed polylines, one per `MoveTo`.
fn flatten(commands: &[PathCommand], scale: f32, offset: Vec2, segments: u32) -> Vec<Vec<Vec2>> {
    let transform = |p: Vec2| p * scale + offset;

    let mut contours: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut pen = Vec2::ZERO;

    for command in commands {
        match *command {
            PathCommand::MoveTo(to) => {
                if !current.is_empty() {
                    contours.push(std::mem::take(&mut current));
                }
                pen = transform(to);
                current.push(pen);
            }
            PathCommand::LineTo(to) => {
                pen = transform(to);
                current.push(pen);
            }
            PathCommand::QuadraticTo { control, to } => {
                let (start, control, end) = (pen, transform(control), transform(to));
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    current.push(start * (u * u) + control * (2.0 * u * t) + end * (t * t));
                }
                pen = end;
            }
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => {
                let (start, c1, c2, end) = (pen, transform(control1), transform(control2), transform(to));
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    current.push(
                        start * (u * u * u)
                            + c1 * (3.0 * u * u * t)
                            + c2 * (3.0 * u * t * t)
                            + end * (t * t * t),
                    );
                }
                pen = end;
            }
        }
    }

    if !current.is_empty() {
        contours.push(current);
    }

    contours
        .into_iter()
        .map(clean_contour)
        .filter(|contour| contour.len() >= 3)
        .collect()
}

/// Drops consecutive duplicates and the closing point if it repeats the first.
pub fn clean_contour(mut points: Vec<Vec2>) -> Vec<Vec2> {
    const EPSILON: f32 = 1e-6;

    points.dedup_by(|a, b| a.distance_squared(*b) <= EPSILON * EPSILON);

    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if first.distance_squared(last) > EPSILON * EPSILON {
            break;
        }
        points.pop();
    }

    points
}

/// Splits a glyph's contours into solids and holes by winding.
///
/// Typeface fonts wind solids clockwise, but some are wound the other way.
/// The largest contour is always an outer one, so its winding decides which
/// direction is solid; a single-contour glyph is therefore always filled.
fn contours_to_shapes(contours: Vec<Vec<Vec2>>) -> Vec<Shape> {
    let solid_is_clockwise = contours
        .iter()
        .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
        .map_or(true, |largest| is_clockwise(largest));

    let (solids, holes): (Vec<_>, Vec<_>) = contours
        .into_iter()
        .partition(|contour| is_clockwise(contour) == solid_is_clockwise);

    let mut shapes: Vec<Shape> = solids
        .into_iter()
        .map(|contour| Shape {
            contour,
            holes: Vec::new(),
        })
        .collect();

    for hole in holes {
        let owner = shapes
            .iter_mut()
            .find(|shape| hole.iter().all(|p| point_in_polygon(*p, &shape.contour)));

        match owner {
            Some(shape) => shape.holes.push(hole),
            None => log::warn!("Dropping glyph hole that is not inside any contour"),
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPEFACE: &str = r#"{
        "familyName": "Test",
        "resolution": 100,
        "boundingBox": { "xMin": 0, "xMax": 100, "yMin": -20, "yMax": 100 },
        "underlineThickness": 10,
        "glyphs": {
            "I": { "ha": 50, "o": "m 0 0 l 0 100 l 40 100 l 40 0" },
            "O": { "ha": 100, "o": "m 0 0 l 0 100 l 100 100 l 100 0 m 20 20 l 80 20 l 80 80 l 20 80" },
            "C": { "ha": 100, "o": "m 0 0 q 0 100 -50 50 l 10 50" },
            "L": { "ha": 50, "o": "m 0 0 l 40 0 l 40 100 l 0 100" },
            "R": { "ha": 100, "o": "m 0 0 l 100 0 l 100 100 l 0 100 m 20 20 l 20 80 l 80 80 l 80 20" },
            "D": { "ha": 100, "o": "m 0 0 l 40 0 l 40 40 l 0 40 m 60 0 l 100 0 l 100 40 l 60 40" }
        }
    }"#;

    fn typeface() -> Typeface {
        Typeface::from_json(TYPEFACE).unwrap()
    }

    #[test]
    fn signed_area_follows_winding() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(signed_area(&ccw), 1.0);
        assert!(!is_clockwise(&ccw));

        let mut cw = ccw.to_vec();
        cw.reverse();
        assert!(is_clockwise(&cw));
    }

    #[test]
    fn glyphs_advance_and_scale() {
        let shapes = typeface().generate_shapes("II", 10.0, 12).unwrap();

        assert_eq!(shapes.len(), 2);
        let min_x = |shape: &Shape| shape.contour.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        assert_eq!(min_x(&shapes[0]), 0.0);
        assert_eq!(min_x(&shapes[1]), 5.0);

        let max_y = shapes[0].contour.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 10.0);
    }

    #[test]
    fn newline_moves_down_by_line_height() {
        let shapes = typeface().generate_shapes("I\nI", 1.0, 12).unwrap();

        let min_y = shapes[1].contour.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let min_x = shapes[1].contour.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        assert!((min_y - -1.3).abs() < 1e-5);
        assert_eq!(min_x, 0.0);
    }

    #[test]
    fn counter_clockwise_contours_become_holes() {
        let shapes = typeface().generate_shapes("O", 1.0, 12).unwrap();

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].contour.len(), 4);
        assert_eq!(shapes[0].holes.len(), 1);
        assert!(!is_clockwise(&shapes[0].holes[0]));
    }

    #[test]
    fn single_counter_clockwise_contour_is_solid() {
        let shapes = typeface().generate_shapes("L", 1.0, 12).unwrap();

        assert_eq!(shapes.len(), 1);
        assert!(shapes[0].holes.is_empty());
        assert!((signed_area(&shapes[0].contour) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn reversed_winding_keeps_holes() {
        let shapes = typeface().generate_shapes("R", 1.0, 12).unwrap();

        assert_eq!(shapes.len(), 1);
        assert!(!is_clockwise(&shapes[0].contour));
        assert_eq!(shapes[0].holes.len(), 1);
        assert!(is_clockwise(&shapes[0].holes[0]));
    }

    #[test]
    fn reversed_winding_with_only_solids() {
        let shapes = typeface().generate_shapes("D", 1.0, 12).unwrap();

        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|shape| shape.holes.is_empty()));
    }

    #[test]
    fn unknown_characters_without_fallback_are_skipped() {
        let shapes = typeface().generate_shapes("IZI", 1.0, 12).unwrap();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn quadratic_curves_are_subdivided() {
        let shapes = typeface().generate_shapes("C", 1.0, 4).unwrap();

        // Move point, four curve samples and the closing line.
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].contour.len(), 6);
        assert_eq!(shapes[0].contour[4], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn closing_duplicate_is_removed() {
        let contour = clean_contour(vec![Vec2::ZERO, Vec2::X, Vec2::X, Vec2::ONE, Vec2::ZERO]);
        assert_eq!(contour, vec![Vec2::ZERO, Vec2::X, Vec2::ONE]);
    }
}
