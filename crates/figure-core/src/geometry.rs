//! Unit cube geometry shared by every part.

use crate::constants::SIDE_SHADE;

/// One vertex as uploaded to the GPU: position, texture coordinate and the
/// fake-lighting factor applied to the solid color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub shade: f32,
}

/// Shape of a renderable part. Only the axis-aligned unit cube exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeKind {
    #[default]
    Cube,
}

#[derive(Clone, Copy)]
enum Plane {
    Xy,
    Xz,
    Zy,
}

struct Face {
    plane: Plane,
    shade: f32,
    triangles: [[[f32; 3]; 3]; 2],
}

// Corners of the [0,1]^3 cube, two triangles per face. The front face (z = 0)
// keeps the full color; the others are darkened.
const FACES: [Face; 6] = [
    Face {
        plane: Plane::Xy,
        shade: 1.0,
        triangles: [
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        ],
    },
    Face {
        plane: Plane::Xz,
        shade: SIDE_SHADE,
        triangles: [
            [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        ],
    },
    Face {
        plane: Plane::Zy,
        shade: SIDE_SHADE,
        triangles: [
            [[1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            [[1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        ],
    },
    Face {
        plane: Plane::Zy,
        shade: SIDE_SHADE,
        triangles: [
            [[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
        ],
    },
    Face {
        plane: Plane::Xz,
        shade: SIDE_SHADE,
        triangles: [
            [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
        ],
    },
    Face {
        plane: Plane::Xy,
        shade: SIDE_SHADE,
        triangles: [
            [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]],
        ],
    },
];

pub const CUBE_TRIANGLES: usize = 12;
pub const CUBE_VERTICES: usize = CUBE_TRIANGLES * 3;

/// Triangle list for the unit cube spanning [0,1] on every axis.
pub fn unit_cube() -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(CUBE_VERTICES);
    for face in &FACES {
        for tri in &face.triangles {
            for &position in tri {
                let [x, y, z] = position;
                let uv = match face.plane {
                    Plane::Xy => [x, y],
                    Plane::Xz => [x, z],
                    Plane::Zy => [z, y],
                };
                vertices.push(MeshVertex {
                    position,
                    uv,
                    shade: face.shade,
                });
            }
        }
    }
    vertices
}

/// Mesh vertices for a shape kind.
pub fn mesh_for(shape: ShapeKind) -> Vec<MeshVertex> {
    match shape {
        ShapeKind::Cube => unit_cube(),
    }
}
