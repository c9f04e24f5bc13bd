//! Vertex format and the unit box used for box-shaped scene nodes.
//!
//! Other primitives are registered with the renderer by the caller.

use bytemuck::{Pod, Zeroable};

const FLOATS_PER_VERTEX: usize = 6; // 3 position + 3 normal
const FACES_PER_BOX: usize = 6;
const VERTICES_PER_FACE: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;
}

/// Indexed triangle mesh on the CPU.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned box of side 1 centered on the origin, with flat face normals
    /// and counter-clockwise front faces.
    pub fn unit_box() -> Self {
        let mut mesh = Self {
            vertices: Vec::with_capacity(FACES_PER_BOX * VERTICES_PER_FACE),
            indices: Vec::with_capacity(FACES_PER_BOX * 6),
        };

        // normal, tangent u, tangent v; u × v == normal keeps the winding CCW.
        let faces: [([f32; 3], [f32; 3], [f32; 3]); FACES_PER_BOX] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        for (normal, u, v) in faces {
            mesh.add_face(normal, u, v);
        }
        mesh
    }

    fn add_face(&mut self, normal: [f32; 3], u: [f32; 3], v: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = [
                normal[0] * 0.5 + u[0] * su + v[0] * sv,
                normal[1] * 0.5 + u[1] * su + v[1] * sv,
                normal[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            self.vertices.push(Vertex { position, normal });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
