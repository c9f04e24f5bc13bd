//! Projection of the scene description onto the Phong shader interface.
//!
//! The `project_*` functions are pure: panel units go in, normalized and
//! view-space values come out. The `upload_*` functions push those values
//! through a [`UniformSink`] under their fixed shader names.

pub mod blocks;

use std::collections::HashMap;
use std::fmt;

use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::light::LightSet;
use crate::material::MaterialDescriptor;

const CHANNEL_SCALE: f32 = 1.0 / 255.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightField {
    Ambient,
    Diffuse,
    Specular,
    Position,
    Axis,
    Aperture,
    Cutoff,
}

impl LightField {
    pub fn as_str(self) -> &'static str {
        match self {
            LightField::Ambient => "ambient",
            LightField::Diffuse => "diffuse",
            LightField::Specular => "specular",
            LightField::Position => "position",
            LightField::Axis => "axis",
            LightField::Aperture => "aperture",
            LightField::Cutoff => "cutoff",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialField {
    Ka,
    Kd,
    Ks,
    Shininess,
}

impl MaterialField {
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialField::Ka => "Ka",
            MaterialField::Kd => "Kd",
            MaterialField::Ks => "Ks",
            MaterialField::Shininess => "shininess",
        }
    }
}

/// Every uniform the Phong program declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformName {
    ModelView,
    Normals,
    Projection,
    LightCount,
    Light(usize, LightField),
    Material(MaterialField),
}

impl fmt::Display for UniformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformName::ModelView => f.write_str("mModelView"),
            UniformName::Normals => f.write_str("mNormals"),
            UniformName::Projection => f.write_str("mProjection"),
            UniformName::LightCount => f.write_str("uNLights"),
            UniformName::Light(index, field) => write!(f, "uLights[{index}].{}", field.as_str()),
            UniformName::Material(field) => write!(f, "uMaterial.{}", field.as_str()),
        }
    }
}

/// Receiver of typed uniform writes, implemented by rendering backends.
pub trait UniformSink {
    fn set_int(&mut self, name: UniformName, value: i32);
    fn set_float(&mut self, name: UniformName, value: f32);
    fn set_vec3(&mut self, name: UniformName, value: Vec3);
    fn set_vec4(&mut self, name: UniformName, value: Vec4);
    fn set_mat3(&mut self, name: UniformName, value: Mat3);
    fn set_mat4(&mut self, name: UniformName, value: Mat4);
}

/// A light as the shader consumes it: colors in [0, 1], geometry in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderLight {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub position: Vec4,
    pub axis: Vec3,
    /// Cone half-angle in radians.
    pub aperture: f32,
    pub cutoff: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderMaterial {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub shininess: f32,
}

fn normalize_color(color: Vec3) -> Vec3 {
    color * CHANNEL_SCALE
}

/// Projects every light, in set order, into view space.
///
/// Inactive lights keep their slot but carry no energy, so indices stay
/// stable while lights are toggled.
pub fn project_lights(lights: &LightSet, view: Mat4) -> Vec<ShaderLight> {
    let direction_matrix = view.inverse().transpose();

    lights
        .iter()
        .map(|(_, light)| {
            let (ambient, diffuse, specular) = if light.active {
                (
                    normalize_color(light.ambient),
                    normalize_color(light.diffuse),
                    normalize_color(light.specular),
                )
            } else {
                (Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
            };

            ShaderLight {
                ambient,
                diffuse,
                specular,
                position: view * light.position,
                axis: (direction_matrix * light.axis.extend(0.0))
                    .truncate()
                    .normalize_or_zero(),
                aperture: light.aperture.to_radians(),
                cutoff: light.cutoff,
            }
        })
        .collect()
}

pub fn project_material(material: &MaterialDescriptor) -> ShaderMaterial {
    ShaderMaterial {
        ka: normalize_color(material.ka),
        kd: normalize_color(material.kd),
        ks: normalize_color(material.ks),
        shininess: material.shininess,
    }
}

/// Returns the model-view matrix and the matrix that maps normals under it.
pub fn project_model_transform(model_view: Mat4) -> (Mat4, Mat4) {
    (model_view, model_view.transpose().inverse())
}

pub fn upload_projection<S: UniformSink + ?Sized>(sink: &mut S, projection: Mat4) {
    sink.set_mat4(UniformName::Projection, projection);
}

pub fn upload_lights<S: UniformSink + ?Sized>(sink: &mut S, lights: &[ShaderLight]) {
    sink.set_int(UniformName::LightCount, lights.len() as i32);

    for (index, light) in lights.iter().enumerate() {
        let name = |field| UniformName::Light(index, field);
        sink.set_vec3(name(LightField::Ambient), light.ambient);
        sink.set_vec3(name(LightField::Diffuse), light.diffuse);
        sink.set_vec3(name(LightField::Specular), light.specular);
        sink.set_vec4(name(LightField::Position), light.position);
        sink.set_vec3(name(LightField::Axis), light.axis);
        sink.set_float(name(LightField::Aperture), light.aperture);
        sink.set_float(name(LightField::Cutoff), light.cutoff);
    }
}

pub fn upload_material<S: UniformSink + ?Sized>(sink: &mut S, material: &ShaderMaterial) {
    sink.set_vec3(UniformName::Material(MaterialField::Ka), material.ka);
    sink.set_vec3(UniformName::Material(MaterialField::Kd), material.kd);
    sink.set_vec3(UniformName::Material(MaterialField::Ks), material.ks);
    sink.set_float(UniformName::Material(MaterialField::Shininess), material.shininess);
}

pub fn upload_model_view<S: UniformSink + ?Sized>(sink: &mut S, model_view: Mat4) {
    let (model_view, normals) = project_model_transform(model_view);
    sink.set_mat4(UniformName::ModelView, model_view);
    sink.set_mat4(UniformName::Normals, normals);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// Keeps the latest value written to every uniform.
#[derive(Debug, Default)]
pub struct RecordingSink {
    values: HashMap<UniformName, UniformValue>,
    writes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: UniformName) -> Option<UniformValue> {
        self.values.get(&name).copied()
    }

    /// Looks a uniform up by its shader name, e.g. `uLights[1].axis`.
    pub fn get_by_label(&self, label: &str) -> Option<UniformValue> {
        self.values
            .iter()
            .find(|(name, _)| name.to_string() == label)
            .map(|(_, value)| *value)
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn record(&mut self, name: UniformName, value: UniformValue) {
        self.writes += 1;
        self.values.insert(name, value);
    }
}

impl UniformSink for RecordingSink {
    fn set_int(&mut self, name: UniformName, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: UniformName, value: f32) {
        self.record(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: UniformName, value: Vec3) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: UniformName, value: Vec4) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_mat3(&mut self, name: UniformName, value: Mat3) {
        self.record(name, UniformValue::Mat3(value));
    }

    fn set_mat4(&mut self, name: UniformName, value: Mat4) {
        self.record(name, UniformValue::Mat4(value));
    }
}
