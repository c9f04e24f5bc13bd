//! Orbit camera controller with spherical coordinates.
//!
//! The eye sits on a sphere around the camera's `at` pivot. Theta is the
//! azimuth measured from +Z towards +X, phi the inclination above the XZ
//! plane (clamped to ±π/2 so the orbit never flips through a pole).
//! Pointer drags rotate, the wheel changes the radius.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use thiserror::Error;

use crate::camera::Camera;

const DEFAULT_MIN_RADIUS: f32 = 1.0;
const DEFAULT_MAX_RADIUS: f32 = 30.0;
const DEFAULT_ZOOM_DIVISOR: f32 = 100.0;
const MIN_PHI: f32 = -FRAC_PI_2;
const MAX_PHI: f32 = FRAC_PI_2;

#[derive(Debug, Error, PartialEq)]
pub enum OrbitError {
    #[error("eye coincides with the orbit pivot, radius is zero")]
    DegenerateRadius,
    #[error("invalid radius range [{min}, {max}]")]
    InvalidRadiusRange { min: f32, max: f32 },
}

#[derive(Clone, Copy, Debug)]
pub struct OrbitConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Wheel units per world unit of radius change.
    pub zoom_divisor: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            zoom_divisor: DEFAULT_ZOOM_DIVISOR,
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<(), OrbitError> {
        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius) {
            return Err(OrbitError::InvalidRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        Ok(())
    }
}

/// Spherical parametrization of the eye around the pivot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl OrbitState {
    /// Recovers the spherical angles from an eye offset.
    ///
    /// Theta comes from `asin`, which only covers the front hemisphere; a
    /// negative z offset selects the mirrored solution `π - theta`. When the
    /// offset is vertical the azimuth is undefined and `fallback_theta` is kept.
    pub fn from_offset(offset: Vec3, fallback_theta: f32) -> Result<Self, OrbitError> {
        let radius = offset.length();
        if radius == 0.0 || !radius.is_finite() {
            return Err(OrbitError::DegenerateRadius);
        }

        let phi = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let horizontal = radius * phi.cos();
        let theta = if horizontal.abs() <= f32::EPSILON * radius {
            fallback_theta
        } else {
            let theta = (offset.x / horizontal).clamp(-1.0, 1.0).asin();
            if offset.z < 0.0 {
                PI - theta
            } else {
                theta
            }
        };

        Ok(Self { radius, theta, phi })
    }

    pub fn offset(&self) -> Vec3 {
        let cos_phi = self.phi.cos();
        self.radius * Vec3::new(self.theta.sin() * cos_phi, self.phi.sin(), self.theta.cos() * cos_phi)
    }

    pub fn eye(&self, at: Vec3) -> Vec3 {
        at + self.offset()
    }
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    x: f32,
    y: f32,
    theta: f32,
    phi: f32,
}

/// Turns pointer and wheel input into eye positions on the orbit sphere.
pub struct OrbitController {
    config: OrbitConfig,
    state: OrbitState,
    drag: Option<DragAnchor>,
    enabled: bool,
    viewport: (u32, u32),
}

impl OrbitController {
    pub fn new(config: OrbitConfig, camera: &Camera) -> Self {
        let state = OrbitState::from_offset(camera.offset(), 0.0).unwrap_or(OrbitState {
            radius: config.min_radius,
            theta: 0.0,
            phi: 0.0,
        });
        Self {
            config,
            state,
            drag: None,
            enabled: true,
            viewport: (0, 0),
        }
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Panel hover leave enables input, hover enter disables it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn begin_drag(&mut self, camera: &Camera, x: f32, y: f32) -> Result<(), OrbitError> {
        if !self.enabled {
            return Ok(());
        }

        let state = OrbitState::from_offset(camera.offset(), self.state.theta)?;
        self.state = state;
        self.drag = Some(DragAnchor {
            x,
            y,
            theta: state.theta,
            phi: state.phi,
        });
        log::debug!(
            "Drag started at ({x}, {y}): radius={:.3} theta={:.3} phi={:.3}",
            state.radius,
            state.theta,
            state.phi
        );
        Ok(())
    }

    /// Returns true when the eye moved.
    pub fn update_drag(&mut self, camera: &mut Camera, x: f32, y: f32) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(anchor) = self.drag else {
            return false;
        };
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return false;
        }

        let delta_theta = TAU * (anchor.x - x) / width as f32;
        let delta_phi = TAU * (y - anchor.y) / height as f32;

        self.state.theta = anchor.theta + delta_theta;
        self.state.phi = (anchor.phi + delta_phi).clamp(MIN_PHI, MAX_PHI);

        camera.eye = self.state.eye(camera.at);
        camera.update_view_with_fallback(self.pole_up());
        true
    }

    /// Screen-up direction in the limit of looking straight down (or up) at
    /// the pivot, so the pole keeps the orientation of its neighbourhood.
    fn pole_up(&self) -> Vec3 {
        let horizontal = Vec3::new(self.state.theta.sin(), 0.0, self.state.theta.cos());
        -horizontal * self.state.phi.signum()
    }

    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("Drag ended: theta={:.3} phi={:.3}", self.state.theta, self.state.phi);
        }
    }

    pub fn zoom(&mut self, camera: &mut Camera, scroll_delta: f32) -> Result<(), OrbitError> {
        if !self.enabled {
            return Ok(());
        }

        let offset = camera.offset();
        let current = offset.length();
        if current == 0.0 || !current.is_finite() {
            return Err(OrbitError::DegenerateRadius);
        }

        let radius = (current + scroll_delta / self.config.zoom_divisor)
            .clamp(self.config.min_radius, self.config.max_radius);

        camera.eye = camera.at + offset / current * radius;
        camera.update_view();
        self.state.radius = radius;
        log::debug!("Zoom {scroll_delta}: radius {current:.3} -> {radius:.3}");
        Ok(())
    }
}
