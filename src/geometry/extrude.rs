use glam::{Vec2, Vec3};
use itertools::Itertools;

use crate::{
    font::shapes::{is_clockwise, Shape},
    geometry::{triangulate::triangulate, MeshData},
};

/// Extrudes flat shapes along +z, from z = 0 to z = `depth`.
///
/// Caps and walls get separate vertices so every face is flat shaded.
pub fn extrude(shapes: &[Shape], depth: f32) -> MeshData {
    let mut mesh = MeshData::default();

    for shape in shapes {
        let contour = oriented(&shape.contour, false);
        let holes = shape
            .holes
            .iter()
            .map(|hole| oriented(hole, true))
            .collect_vec();

        add_caps(&mut mesh, &contour, &holes, depth);

        add_walls(&mut mesh, &contour, depth);
        for hole in &holes {
            add_walls(&mut mesh, hole, depth);
        }
    }

    mesh
}

fn oriented(points: &[Vec2], clockwise: bool) -> Vec<Vec2> {
    let mut points = points.to_vec();
    if is_clockwise(&points) != clockwise {
        points.reverse();
    }
    points
}

fn add_caps(mesh: &mut MeshData, contour: &[Vec2], holes: &[Vec<Vec2>], depth: f32) {
    let triangles = triangulate(contour, holes);
    if triangles.is_empty() {
        return;
    }

    let flat = contour.iter().chain(holes.iter().flatten()).copied().collect_vec();

    let back = mesh.positions.len() as u32;
    for p in &flat {
        mesh.push_vertex(p.extend(0.0), Vec3::NEG_Z);
    }

    let front = mesh.positions.len() as u32;
    for p in &flat {
        mesh.push_vertex(p.extend(depth), Vec3::Z);
    }

    for [a, b, c] in triangles {
        mesh.indices.extend([front + a, front + b, front + c]);
        mesh.indices.extend([back + a, back + c, back + b]);
    }
}

/// Solid material lies left of each edge, so the right-hand side faces outward.
fn add_walls(mesh: &mut MeshData, ring: &[Vec2], depth: f32) {
    for (&a, &b) in ring.iter().circular_tuple_windows() {
        let edge = b - a;
        if edge.length_squared() <= f32::EPSILON {
            continue;
        }

        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize();

        let base = mesh.positions.len() as u32;
        mesh.push_vertex(a.extend(0.0), normal);
        mesh.push_vertex(b.extend(0.0), normal);
        mesh.push_vertex(b.extend(depth), normal);
        mesh.push_vertex(a.extend(depth), normal);

        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
