//! GPU-side uniform blocks (std140-compatible) and the recorder that fills them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

use super::{LightField, MaterialField, UniformName, UniformSink};
use crate::scene::{MeshDraw, MeshKind, Primitive};

/// Capacity of the light array declared by the shader.
pub const MAX_LIGHTS: usize = 8;
/// Dynamic-offset stride for per-node blocks (wgpu's default alignment).
pub const NODE_UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 3],
    pub aperture: f32,
    pub diffuse: [f32; 3],
    pub cutoff: f32,
    pub specular: [f32; 3],
    _pad0: f32,
    pub position: [f32; 4],
    pub axis: [f32; 3],
    _pad1: f32,
}

/// Per-frame block: projection and the light array.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub projection: [[f32; 4]; 4],
    pub light_count: i32,
    _pad: [i32; 3],
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            light_count: 0,
            _pad: [0; 3],
            lights: [LightUniform::default(); MAX_LIGHTS],
        }
    }
}

/// Per-node block: transforms and material.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct NodeUniform {
    pub model_view: [[f32; 4]; 4],
    pub normals: [[f32; 4]; 4],
    pub ka: [f32; 3],
    pub shininess: f32,
    pub kd: [f32; 3],
    _pad0: f32,
    pub ks: [f32; 3],
    _pad1: f32,
}

impl Default for NodeUniform {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY.to_cols_array_2d(),
            normals: Mat4::IDENTITY.to_cols_array_2d(),
            ka: [0.0; 3],
            shininess: 1.0,
            kd: [0.0; 3],
            _pad0: 0.0,
            ks: [0.0; 3],
            _pad1: 0.0,
        }
    }
}

/// A draw call captured together with the node block bound at that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedDraw {
    pub mesh: MeshKind,
    pub node: NodeUniform,
}

/// Collects one frame of uniform writes and draws into GPU blocks.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frame: FrameUniform,
    node: NodeUniform,
    draws: Vec<RecordedDraw>,
    requested_lights: usize,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.frame = FrameUniform::default();
        self.node = NodeUniform::default();
        self.draws.clear();
        self.requested_lights = 0;
    }

    pub fn frame(&self) -> &FrameUniform {
        &self.frame
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Number of lights the scene asked for, including any beyond capacity.
    pub fn requested_lights(&self) -> usize {
        self.requested_lights
    }

    fn light_mut(&mut self, index: usize) -> Option<&mut LightUniform> {
        self.frame.lights.get_mut(index)
    }

    fn mismatch(name: UniformName, kind: &str) {
        log::warn!("Uniform {name} does not accept a {kind} value");
    }
}

impl UniformSink for FrameRecorder {
    fn set_int(&mut self, name: UniformName, value: i32) {
        match name {
            UniformName::LightCount => {
                self.requested_lights = value.max(0) as usize;
                if self.requested_lights > MAX_LIGHTS {
                    log::warn!(
                        "{} lights requested, only the first {MAX_LIGHTS} reach the GPU",
                        self.requested_lights
                    );
                }
                self.frame.light_count = value.clamp(0, MAX_LIGHTS as i32);
            }
            _ => Self::mismatch(name, "int"),
        }
    }

    fn set_float(&mut self, name: UniformName, value: f32) {
        match name {
            UniformName::Light(index, LightField::Aperture) => {
                if let Some(light) = self.light_mut(index) {
                    light.aperture = value;
                }
            }
            UniformName::Light(index, LightField::Cutoff) => {
                if let Some(light) = self.light_mut(index) {
                    light.cutoff = value;
                }
            }
            UniformName::Material(MaterialField::Shininess) => self.node.shininess = value,
            _ => Self::mismatch(name, "float"),
        }
    }

    fn set_vec3(&mut self, name: UniformName, value: Vec3) {
        let value = value.to_array();
        match name {
            UniformName::Light(index, field) => {
                let Some(light) = self.light_mut(index) else {
                    return;
                };
                match field {
                    LightField::Ambient => light.ambient = value,
                    LightField::Diffuse => light.diffuse = value,
                    LightField::Specular => light.specular = value,
                    LightField::Axis => light.axis = value,
                    _ => Self::mismatch(name, "vec3"),
                }
            }
            UniformName::Material(MaterialField::Ka) => self.node.ka = value,
            UniformName::Material(MaterialField::Kd) => self.node.kd = value,
            UniformName::Material(MaterialField::Ks) => self.node.ks = value,
            _ => Self::mismatch(name, "vec3"),
        }
    }

    fn set_vec4(&mut self, name: UniformName, value: Vec4) {
        match name {
            UniformName::Light(index, LightField::Position) => {
                if let Some(light) = self.light_mut(index) {
                    light.position = value.to_array();
                }
            }
            _ => Self::mismatch(name, "vec4"),
        }
    }

    /// Every matrix block is 4x4; `mNormals` arrives through `set_mat4`.
    fn set_mat3(&mut self, name: UniformName, _value: Mat3) {
        Self::mismatch(name, "mat3");
    }

    fn set_mat4(&mut self, name: UniformName, value: Mat4) {
        let value = value.to_cols_array_2d();
        match name {
            UniformName::Projection => self.frame.projection = value,
            UniformName::ModelView => self.node.model_view = value,
            UniformName::Normals => self.node.normals = value,
            _ => Self::mismatch(name, "mat4"),
        }
    }
}

impl MeshDraw for FrameRecorder {
    fn draw(&mut self, mesh: MeshKind, primitive: Primitive) {
        match primitive {
            Primitive::Triangles => self.draws.push(RecordedDraw {
                mesh,
                node: self.node,
            }),
        }
    }
}
