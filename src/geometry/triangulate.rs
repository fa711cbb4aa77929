use glam::Vec2;

use crate::font::shapes::signed_area;

const EPSILON: f32 = 1e-9;

/// Triangulates a polygon with holes by ear clipping.
///
/// Vertex indices refer to the concatenation of `contour` followed by every
/// hole in order. The contour must be counter-clockwise and holes clockwise;
/// the returned triangles are counter-clockwise.
pub fn triangulate(contour: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<[u32; 3]> {
    if contour.len() < 3 {
        return Vec::new();
    }

    let mut points: Vec<Vec2> = contour.to_vec();
    let mut ring: Vec<usize> = (0..contour.len()).collect();

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes {
        let start = points.len();
        points.extend_from_slice(hole);
        if hole.len() >= 3 {
            hole_rings.push((start..start + hole.len()).collect());
        }
    }

    // Bridge holes from right to left so later bridges never cross earlier ones.
    hole_rings.sort_by(|a, b| {
        let max_x = |ring: &Vec<usize>| ring.iter().map(|&i| points[i].x).fold(f32::MIN, f32::max);
        max_x(b).total_cmp(&max_x(a))
    });

    for (n, hole) in hole_rings.iter().enumerate() {
        bridge_hole(&points, &mut ring, hole, &hole_rings[n + 1..]);
    }

    clip_ears(&points, ring)
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
}

/// Splices `hole` into `ring` through the closest mutually visible vertex pair.
fn bridge_hole(points: &[Vec2], ring: &mut Vec<usize>, hole: &[usize], pending: &[Vec<usize>]) {
    let hole_start = (0..hole.len())
        .max_by(|&a, &b| points[hole[a]].x.total_cmp(&points[hole[b]].x))
        .unwrap_or(0);
    let m = points[hole[hole_start]];

    let edges = |r: &[usize]| -> Vec<(Vec2, Vec2)> {
        (0..r.len())
            .map(|i| (points[r[i]], points[r[(i + 1) % r.len()]]))
            .collect()
    };

    let mut blocking = edges(ring.as_slice());
    blocking.extend(edges(hole));
    for other in pending {
        blocking.extend(edges(other.as_slice()));
    }

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = points[ring[a]].distance_squared(m);
        let db = points[ring[b]].distance_squared(m);
        da.total_cmp(&db)
    });

    let visible = candidates.iter().copied().find(|&c| {
        let p = points[ring[c]];
        !blocking
            .iter()
            .any(|&(a, b)| segments_cross(m, p, a, b))
    });

    let Some(bridge) = visible.or(candidates.first().copied()) else {
        return;
    };

    let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
    spliced.extend_from_slice(&ring[..=bridge]);
    spliced.extend((0..=hole.len()).map(|i| hole[(hole_start + i) % hole.len()]));
    spliced.extend_from_slice(&ring[bridge..]);

    *ring = spliced;
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) >= -EPSILON && cross(b, c, p) >= -EPSILON && cross(c, a, p) >= -EPSILON
}

fn is_ear(points: &[Vec2], ring: &[usize], i: usize) -> bool {
    let n = ring.len();
    let (ia, ib, ic) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
    let (a, b, c) = (points[ia], points[ib], points[ic]);

    if cross(a, b, c) <= EPSILON {
        return false;
    }

    ring.iter().all(|&j| {
        if j == ia || j == ib || j == ic {
            return true;
        }
        let p = points[j];
        // Bridge seams duplicate vertices; coincident points never block an ear.
        if p == a || p == b || p == c {
            return true;
        }
        !point_in_triangle(p, a, b, c)
    })
}

fn clip_ears(points: &[Vec2], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));

    while ring.len() > 3 {
        let n = ring.len();

        // Collinear and zero-length spans produce no area; drop them first.
        if let Some(i) = (0..n).find(|&i| {
            let (a, b, c) = (
                points[ring[(i + n - 1) % n]],
                points[ring[i]],
                points[ring[(i + 1) % n]],
            );
            cross(a, b, c).abs() <= EPSILON && (b - a).dot(c - b) >= 0.0
        }) {
            ring.remove(i);
            continue;
        }

        let ear = (0..n).find(|&i| is_ear(points, &ring, i)).unwrap_or_else(|| {
            // Self-touching input: clip the most convex vertex to guarantee progress.
            (0..n)
                .max_by(|&x, &y| {
                    let area = |i: usize| {
                        cross(
                            points[ring[(i + n - 1) % n]],
                            points[ring[i]],
                            points[ring[(i + 1) % n]],
                        )
                    };
                    area(x).total_cmp(&area(y))
                })
                .unwrap_or(0)
        });

        let (a, b, c) = (ring[(ear + n - 1) % n], ring[ear], ring[(ear + 1) % n]);
        if cross(points[a], points[b], points[c]) > EPSILON {
            triangles.push([a as u32, b as u32, c as u32]);
        }
        ring.remove(ear);
    }

    if ring.len() == 3 {
        let (a, b, c) = (ring[0], ring[1], ring[2]);
        if cross(points[a], points[b], points[c]) > EPSILON {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }

    triangles
}

/// Total area covered by a triangle list, used to sanity check triangulations.
pub fn triangles_area(points: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
    triangles
        .iter()
        .map(|t| signed_area(&[points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    fn all_points(contour: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<Vec2> {
        let mut points = contour.to_vec();
        for hole in holes {
            points.extend_from_slice(hole);
        }
        points
    }

    #[test]
    fn square_becomes_two_triangles() {
        let contour = square(0.0, 1.0);
        let triangles = triangulate(&contour, &[]);

        assert_eq!(triangles.len(), 2);
        assert!((triangles_area(&contour, &triangles) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn concave_polygon_keeps_its_area() {
        // An L shape with a reflex corner at (1, 1).
        let contour = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let triangles = triangulate(&contour, &[]);

        assert_eq!(triangles.len(), 4);
        assert!((triangles_area(&contour, &triangles) - 3.0).abs() < 1e-5);
        for t in &triangles {
            let area = signed_area(&[
                contour[t[0] as usize],
                contour[t[1] as usize],
                contour[t[2] as usize],
            ]);
            assert!(area > 0.0);
        }
    }

    #[test]
    fn holes_are_cut_out() {
        let contour = square(0.0, 4.0);
        let mut hole = square(1.0, 3.0);
        hole.reverse();
        let holes = vec![hole];

        let triangles = triangulate(&contour, &holes);
        let points = all_points(&contour, &holes);

        assert!((triangles_area(&points, &triangles) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn two_holes_side_by_side() {
        let contour = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(7.0, 0.0),
            Vec2::new(7.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        let mut left = square(1.0, 2.0);
        left.reverse();
        let mut right = vec![
            Vec2::new(4.0, 1.0),
            Vec2::new(6.0, 1.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(4.0, 2.0),
        ];
        right.reverse();
        let holes = vec![left, right];

        let triangles = triangulate(&contour, &holes);
        let points = all_points(&contour, &holes);

        assert!((triangles_area(&points, &triangles) - 18.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_input_terminates() {
        let line = vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)];
        assert!(triangulate(&line, &[]).is_empty());
        assert!(triangulate(&[Vec2::ZERO, Vec2::X], &[]).is_empty());
    }
}
