//! The fixed demo scene and the per-frame driver that feeds it to a backend.

use glam::Vec3;

use crate::camera::Camera;
use crate::light::LightSet;
use crate::material::{MaterialDescriptor, MaterialSet};
use crate::matrix_stack::MatrixStack;
use crate::uniforms::{
    project_lights, project_material, upload_lights, upload_material, upload_model_view,
    upload_projection, UniformSink,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    Cylinder,
    Torus,
    Bunny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

/// Issues the draw call for a mesh, with uniforms already bound.
pub trait MeshDraw {
    fn draw(&mut self, mesh: MeshKind, primitive: Primitive);
}

/// A drawable: mesh, material slot and local transform (translate, then scale).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneNode {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl SceneNode {
    const fn new(name: &'static str, mesh: MeshKind, translation: Vec3, scale: Vec3) -> Self {
        Self {
            name,
            mesh,
            translation,
            scale,
        }
    }

    /// Nodes share their name with the material they are drawn with.
    pub fn material<'a>(&self, materials: &'a MaterialSet) -> Option<&'a MaterialDescriptor> {
        materials.get(self.name)
    }
}

pub const SCENE_NODES: [SceneNode; 5] = [
    SceneNode::new(
        "ground",
        MeshKind::Cube,
        Vec3::new(0.0, -0.25, 0.0),
        Vec3::new(10.0, 0.5, 10.0),
    ),
    SceneNode::new("cube", MeshKind::Cube, Vec3::new(-2.0, 1.0, -2.0), Vec3::splat(2.0)),
    SceneNode::new("cylinder", MeshKind::Cylinder, Vec3::new(2.0, 1.0, -2.0), Vec3::splat(2.0)),
    SceneNode::new("torus", MeshKind::Torus, Vec3::new(-2.0, 0.4, 2.0), Vec3::splat(2.0)),
    SceneNode::new("bunny", MeshKind::Bunny, Vec3::new(2.0, 0.0, 2.0), Vec3::splat(15.0)),
];

/// The two fixed-function toggles read once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderFlags {
    pub backface_culling: bool,
    pub depth_test: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            backface_culling: false,
            depth_test: true,
        }
    }
}

/// Everything the panel edits and the frame driver reads.
#[derive(Clone, Debug, Default)]
pub struct SceneState {
    pub camera: Camera,
    pub lights: LightSet,
    pub materials: MaterialSet,
    pub flags: RenderFlags,
}

impl SceneState {
    pub fn with_defaults() -> Self {
        Self {
            lights: LightSet::default_rig(),
            ..Self::default()
        }
    }
}

/// Uploads one frame's uniforms and draws every node.
pub fn render_frame<B>(state: &SceneState, stack: &mut MatrixStack, backend: &mut B)
where
    B: UniformSink + MeshDraw,
{
    let view = state.camera.view_matrix();

    upload_projection(backend, state.camera.projection_matrix());
    stack.load(view);

    let lights = project_lights(&state.lights, view);
    upload_lights(backend, &lights);

    for node in &SCENE_NODES {
        let Some(material) = node.material(&state.materials) else {
            log::warn!("No material for scene node {}", node.name);
            continue;
        };

        stack.push();
        stack.translate(node.translation);
        stack.scale(node.scale);

        upload_material(backend, &project_material(material));
        upload_model_view(backend, stack.current());
        backend.draw(node.mesh, Primitive::Triangles);

        stack.pop();
    }
}
