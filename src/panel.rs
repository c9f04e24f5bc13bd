//! Parameter panel bindings.
//!
//! Every editable scalar of a [`SceneState`] is exposed as a named binding
//! with a slider range and a refresh hook. Vector fields are reached through
//! [`VecProxy`], so a widget only ever deals with `get(index)`/`set(index, v)`
//! and never with how the vector is stored.

use std::rc::Rc;

use glam::{Vec3, Vec4};
use thiserror::Error;

use crate::light::LightDescriptor;
use crate::material::{MaterialDescriptor, MaterialSet};
use crate::scene::SceneState;

const POSITION_RANGE: SliderRange = SliderRange::Continuous { min: -20.0, max: 20.0 };
const COLOR_RANGE: SliderRange = SliderRange::Continuous { min: 0.0, max: 255.0 };
const HOMOGENEOUS_CHOICES: SliderRange = SliderRange::Choice(&[0.0, 1.0]);
const XYZ: [&str; 3] = ["x", "y", "z"];
const RGB: [&str; 3] = ["r", "g", "b"];

#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("no panel field named {0}")]
    UnknownField(String),
    #[error("panel field {0} no longer resolves to scene data")]
    Detached(String),
}

/// Widget range. Purely advisory: values outside it are stored unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliderRange {
    Continuous { min: f32, max: f32 },
    Choice(&'static [f32]),
}

impl SliderRange {
    pub fn contains(&self, value: f32) -> bool {
        match self {
            SliderRange::Continuous { min, max } => (*min..=*max).contains(&value),
            SliderRange::Choice(choices) => choices.contains(&value),
        }
    }
}

/// Derived camera state to recompute after an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    None,
    View,
    Projection,
}

/// Component access to a fixed-size float vector.
pub trait VectorField {
    const LEN: usize;
    fn component(&self, index: usize) -> f32;
    fn component_mut(&mut self, index: usize) -> &mut f32;
}

impl VectorField for Vec3 {
    const LEN: usize = 3;

    fn component(&self, index: usize) -> f32 {
        self[index]
    }

    fn component_mut(&mut self, index: usize) -> &mut f32 {
        &mut self[index]
    }
}

impl VectorField for Vec4 {
    const LEN: usize = 4;

    fn component(&self, index: usize) -> f32 {
        self[index]
    }

    fn component_mut(&mut self, index: usize) -> &mut f32 {
        &mut self[index]
    }
}

type Locate<V> = Rc<dyn Fn(&SceneState) -> Option<&V>>;
type LocateMut<V> = Rc<dyn Fn(&mut SceneState) -> Option<&mut V>>;

/// Indexed accessor for one vector field of the scene.
pub struct VecProxy<V> {
    locate: Locate<V>,
    locate_mut: LocateMut<V>,
}

impl<V> Clone for VecProxy<V> {
    fn clone(&self) -> Self {
        Self {
            locate: Rc::clone(&self.locate),
            locate_mut: Rc::clone(&self.locate_mut),
        }
    }
}

impl<V: VectorField + 'static> VecProxy<V> {
    pub fn new<G, M>(locate: G, locate_mut: M) -> Self
    where
        G: Fn(&SceneState) -> Option<&V> + 'static,
        M: Fn(&mut SceneState) -> Option<&mut V> + 'static,
    {
        Self {
            locate: Rc::new(locate),
            locate_mut: Rc::new(locate_mut),
        }
    }

    pub fn len(&self) -> usize {
        V::LEN
    }

    pub fn is_empty(&self) -> bool {
        V::LEN == 0
    }

    pub fn get(&self, state: &SceneState, index: usize) -> Option<f32> {
        if index >= V::LEN {
            return None;
        }
        (self.locate)(state).map(|v| v.component(index))
    }

    /// Returns false when the index is out of bounds or the field is gone.
    pub fn set(&self, state: &mut SceneState, index: usize, value: f32) -> bool {
        if index >= V::LEN {
            return false;
        }
        match (self.locate_mut)(state) {
            Some(v) => {
                *v.component_mut(index) = value;
                true
            }
            None => false,
        }
    }
}

type ScalarGet = Rc<dyn Fn(&SceneState) -> Option<f32>>;
type ScalarSet = Rc<dyn Fn(&mut SceneState, f32) -> bool>;
type ToggleGet = Rc<dyn Fn(&SceneState) -> Option<bool>>;
type ToggleSet = Rc<dyn Fn(&mut SceneState, bool) -> bool>;

pub struct ScalarBinding {
    pub path: String,
    pub range: SliderRange,
    pub refresh: Refresh,
    get: ScalarGet,
    set: ScalarSet,
}

pub struct ToggleBinding {
    pub path: String,
    get: ToggleGet,
    set: ToggleSet,
}

/// The full set of bindings for a scene.
#[derive(Default)]
pub struct ParamPanel {
    scalars: Vec<ScalarBinding>,
    toggles: Vec<ToggleBinding>,
}

impl ParamPanel {
    /// Builds the Camera, Lights, Materials and Render folders.
    pub fn for_scene(state: &SceneState) -> Self {
        let mut panel = Self::default();
        panel.add_camera();
        for name in state.lights.names() {
            panel.add_light(name);
        }
        for name in MaterialSet::NAMES {
            panel.add_material(name);
        }
        panel.add_render_flags();
        log::debug!(
            "Panel built with {} scalar and {} toggle bindings",
            panel.scalars.len(),
            panel.toggles.len()
        );
        panel
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.scalars
            .iter()
            .map(|b| b.path.as_str())
            .chain(self.toggles.iter().map(|b| b.path.as_str()))
    }

    pub fn scalar(&self, path: &str) -> Option<&ScalarBinding> {
        self.scalars.iter().find(|b| b.path == path)
    }

    pub fn get(&self, state: &SceneState, path: &str) -> Result<f32, PanelError> {
        let binding = self.find_scalar(path)?;
        (binding.get)(state).ok_or_else(|| PanelError::Detached(path.to_string()))
    }

    /// Writes a value and refreshes whatever camera matrix depends on it.
    pub fn set(&self, state: &mut SceneState, path: &str, value: f32) -> Result<(), PanelError> {
        let binding = self.find_scalar(path)?;
        if !binding.range.contains(value) {
            log::debug!("{path} set outside its slider range: {value}");
        }
        if !(binding.set)(state, value) {
            return Err(PanelError::Detached(path.to_string()));
        }
        match binding.refresh {
            Refresh::None => {}
            Refresh::View => state.camera.update_view(),
            Refresh::Projection => state.camera.refresh_projection(),
        }
        Ok(())
    }

    pub fn get_toggle(&self, state: &SceneState, path: &str) -> Result<bool, PanelError> {
        let binding = self.find_toggle(path)?;
        (binding.get)(state).ok_or_else(|| PanelError::Detached(path.to_string()))
    }

    pub fn set_toggle(&self, state: &mut SceneState, path: &str, value: bool) -> Result<(), PanelError> {
        let binding = self.find_toggle(path)?;
        if (binding.set)(state, value) {
            Ok(())
        } else {
            Err(PanelError::Detached(path.to_string()))
        }
    }

    /// Flips a toggle and returns its new value.
    pub fn toggle(&self, state: &mut SceneState, path: &str) -> Result<bool, PanelError> {
        let value = !self.get_toggle(state, path)?;
        self.set_toggle(state, path, value)?;
        Ok(value)
    }

    fn find_scalar(&self, path: &str) -> Result<&ScalarBinding, PanelError> {
        self.scalar(path)
            .ok_or_else(|| PanelError::UnknownField(path.to_string()))
    }

    fn find_toggle(&self, path: &str) -> Result<&ToggleBinding, PanelError> {
        self.toggles
            .iter()
            .find(|b| b.path == path)
            .ok_or_else(|| PanelError::UnknownField(path.to_string()))
    }

    fn add_scalar<G, S>(&mut self, path: String, range: SliderRange, refresh: Refresh, get: G, set: S)
    where
        G: Fn(&SceneState) -> Option<f32> + 'static,
        S: Fn(&mut SceneState, f32) -> bool + 'static,
    {
        self.scalars.push(ScalarBinding {
            path,
            range,
            refresh,
            get: Rc::new(get),
            set: Rc::new(set),
        });
    }

    fn add_toggle<G, S>(&mut self, path: String, get: G, set: S)
    where
        G: Fn(&SceneState) -> Option<bool> + 'static,
        S: Fn(&mut SceneState, bool) -> bool + 'static,
    {
        self.toggles.push(ToggleBinding {
            path,
            get: Rc::new(get),
            set: Rc::new(set),
        });
    }

    /// One slider per component, all sharing a single proxy.
    fn add_vector<V: VectorField + 'static>(
        &mut self,
        folder: &str,
        labels: &[&str],
        proxy: VecProxy<V>,
        ranges: &[SliderRange],
        refresh: Refresh,
    ) {
        for (index, label) in labels.iter().enumerate() {
            let getter = proxy.clone();
            let setter = proxy.clone();
            self.add_scalar(
                format!("{folder}/{label}"),
                ranges[index.min(ranges.len() - 1)],
                refresh,
                move |s| getter.get(s, index),
                move |s, v| setter.set(s, index, v),
            );
        }
    }

    fn add_camera(&mut self) {
        self.add_vector(
            "Camera/eye",
            &XYZ,
            VecProxy::<Vec3>::new(|s| Some(&s.camera.eye), |s| Some(&mut s.camera.eye)),
            &[POSITION_RANGE],
            Refresh::View,
        );
        self.add_vector(
            "Camera/at",
            &XYZ,
            VecProxy::<Vec3>::new(|s| Some(&s.camera.at), |s| Some(&mut s.camera.at)),
            &[POSITION_RANGE],
            Refresh::View,
        );
        self.add_vector(
            "Camera/up",
            &XYZ,
            VecProxy::<Vec3>::new(|s| Some(&s.camera.up), |s| Some(&mut s.camera.up)),
            &[POSITION_RANGE],
            Refresh::View,
        );
        self.add_scalar(
            "Camera/fovy".to_string(),
            SliderRange::Continuous { min: 20.0, max: 160.0 },
            Refresh::Projection,
            |s| Some(s.camera.fovy),
            |s, v| {
                s.camera.fovy = v;
                true
            },
        );
        self.add_scalar(
            "Camera/near".to_string(),
            SliderRange::Continuous { min: 0.1, max: 40.0 },
            Refresh::Projection,
            |s| Some(s.camera.near),
            |s, v| {
                s.camera.near = v;
                true
            },
        );
        self.add_scalar(
            "Camera/far".to_string(),
            SliderRange::Continuous { min: 0.1, max: 40.0 },
            Refresh::Projection,
            |s| Some(s.camera.far),
            |s, v| {
                s.camera.far = v;
                true
            },
        );
    }

    fn add_light(&mut self, name: &str) {
        let folder = format!("Lights/{name}");

        let (n1, n2) = (name.to_string(), name.to_string());
        self.add_toggle(
            format!("{folder}/active"),
            move |s| s.lights.get(&n1).map(|l| l.active),
            move |s, v| match s.lights.get_mut(&n2) {
                Some(light) => {
                    light.active = v;
                    true
                }
                None => false,
            },
        );

        for channel in ["ambient", "diffuse", "specular"] {
            let (n1, n2) = (name.to_string(), name.to_string());
            let proxy = VecProxy::<Vec3>::new(
                move |s| s.lights.get(&n1).map(|l| light_color(l, channel)),
                move |s| s.lights.get_mut(&n2).map(|l| light_color_mut(l, channel)),
            );
            self.add_vector(&format!("{folder}/{channel}"), &RGB, proxy, &[COLOR_RANGE], Refresh::None);
        }

        let (n1, n2) = (name.to_string(), name.to_string());
        self.add_vector(
            &format!("{folder}/position"),
            &["x", "y", "z", "w"],
            VecProxy::<Vec4>::new(
                move |s| s.lights.get(&n1).map(|l| &l.position),
                move |s| s.lights.get_mut(&n2).map(|l| &mut l.position),
            ),
            &[POSITION_RANGE, POSITION_RANGE, POSITION_RANGE, HOMOGENEOUS_CHOICES],
            Refresh::None,
        );

        let (n1, n2) = (name.to_string(), name.to_string());
        self.add_vector(
            &format!("{folder}/axis"),
            &XYZ,
            VecProxy::<Vec3>::new(
                move |s| s.lights.get(&n1).map(|l| &l.axis),
                move |s| s.lights.get_mut(&n2).map(|l| &mut l.axis),
            ),
            &[POSITION_RANGE],
            Refresh::None,
        );

        let (n1, n2) = (name.to_string(), name.to_string());
        self.add_scalar(
            format!("{folder}/aperture"),
            SliderRange::Continuous { min: 0.0, max: 180.0 },
            Refresh::None,
            move |s| s.lights.get(&n1).map(|l| l.aperture),
            move |s, v| match s.lights.get_mut(&n2) {
                Some(light) => {
                    light.aperture = v;
                    true
                }
                None => false,
            },
        );

        let (n1, n2) = (name.to_string(), name.to_string());
        self.add_scalar(
            format!("{folder}/cutoff"),
            SliderRange::Continuous { min: 0.0, max: 16.0 },
            Refresh::None,
            move |s| s.lights.get(&n1).map(|l| l.cutoff),
            move |s, v| match s.lights.get_mut(&n2) {
                Some(light) => {
                    light.cutoff = v;
                    true
                }
                None => false,
            },
        );
    }

    fn add_material(&mut self, name: &'static str) {
        let folder = format!("Materials/{name}");

        for coefficient in ["Ka", "Kd", "Ks"] {
            let proxy = VecProxy::<Vec3>::new(
                move |s| s.materials.get(name).map(|m| reflectance(m, coefficient)),
                move |s| s.materials.get_mut(name).map(|m| reflectance_mut(m, coefficient)),
            );
            self.add_vector(&format!("{folder}/{coefficient}"), &RGB, proxy, &[COLOR_RANGE], Refresh::None);
        }

        self.add_scalar(
            format!("{folder}/shininess"),
            SliderRange::Continuous { min: 1.0, max: 128.0 },
            Refresh::None,
            move |s| s.materials.get(name).map(|m| m.shininess),
            move |s, v| match s.materials.get_mut(name) {
                Some(material) => {
                    material.shininess = v;
                    true
                }
                None => false,
            },
        );
    }

    fn add_render_flags(&mut self) {
        self.add_toggle(
            "Render/backfaceCulling".to_string(),
            |s| Some(s.flags.backface_culling),
            |s, v| {
                s.flags.backface_culling = v;
                true
            },
        );
        self.add_toggle(
            "Render/depthTest".to_string(),
            |s| Some(s.flags.depth_test),
            |s, v| {
                s.flags.depth_test = v;
                true
            },
        );
    }
}

fn light_color<'a>(light: &'a LightDescriptor, channel: &str) -> &'a Vec3 {
    match channel {
        "ambient" => &light.ambient,
        "diffuse" => &light.diffuse,
        _ => &light.specular,
    }
}

fn light_color_mut<'a>(light: &'a mut LightDescriptor, channel: &str) -> &'a mut Vec3 {
    match channel {
        "ambient" => &mut light.ambient,
        "diffuse" => &mut light.diffuse,
        _ => &mut light.specular,
    }
}

fn reflectance<'a>(material: &'a MaterialDescriptor, coefficient: &str) -> &'a Vec3 {
    match coefficient {
        "Ka" => &material.ka,
        "Kd" => &material.kd,
        _ => &material.ks,
    }
}

fn reflectance_mut<'a>(material: &'a mut MaterialDescriptor, coefficient: &str) -> &'a mut Vec3 {
    match coefficient {
        "Ka" => &mut material.ka,
        "Kd" => &mut material.kd,
        _ => &mut material.ks,
    }
}
