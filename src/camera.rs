//! Look-at camera with perspective projection.
//!
//! Y-up, right-handed. The view and projection matrices are derived state:
//! they are recomputed by `update_view` / `update_projection` whenever the
//! pose or lens changes, never edited directly.

use glam::{Mat4, Vec3};
use thiserror::Error;

const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 5.0, 10.0);
const DEFAULT_AT: Vec3 = Vec3::ZERO;
const DEFAULT_UP: Vec3 = Vec3::Y;
const DEFAULT_FOVY_DEGREES: f32 = 55.0;
const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 40.0;
const DEFAULT_ASPECT: f32 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("near plane must be positive, got {0}")]
    NonPositiveNear(f32),
    #[error("near plane ({near}) must be closer than far plane ({far})")]
    InvertedClipRange { near: f32, far: f32 },
    #[error("vertical field of view must be inside (0, 180) degrees, got {0}")]
    FovyOutOfRange(f32),
}

/// Camera pose and lens, plus the matrices derived from them.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_EYE, DEFAULT_AT, DEFAULT_UP)
    }
}

impl Camera {
    pub fn new(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            eye,
            at,
            up,
            fovy: DEFAULT_FOVY_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: DEFAULT_ASPECT,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_view();
        camera.update_projection(DEFAULT_ASPECT);
        camera
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if self.near <= 0.0 {
            return Err(CameraError::NonPositiveNear(self.near));
        }
        if self.near >= self.far {
            return Err(CameraError::InvertedClipRange {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(CameraError::FovyOutOfRange(self.fovy));
        }
        Ok(())
    }

    /// Recomputes the view matrix. When `up` is parallel to the view
    /// direction, the previous view's up axis stands in for it.
    pub fn update_view(&mut self) {
        let previous_up = self.view.row(1).truncate();
        self.update_view_with_fallback(previous_up);
    }

    /// Recomputes the view matrix, using `fallback_up` when `up` is parallel to
    /// the view direction. A view that still comes out non-finite (eye on the
    /// pivot) is discarded and the previous one kept.
    pub fn update_view_with_fallback(&mut self, fallback_up: Vec3) {
        let forward = self.at - self.eye;
        let up = if !is_parallel(forward, self.up) {
            self.up
        } else if !is_parallel(forward, fallback_up) {
            fallback_up
        } else {
            forward.any_orthogonal_vector()
        };

        let view = Mat4::look_at_rh(self.eye, self.at, up);
        if view.is_finite() {
            self.view = view;
        } else {
            log::warn!(
                "Degenerate view for eye {:?} and pivot {:?}, keeping the previous view",
                self.eye,
                self.at
            );
        }
    }

    pub fn update_projection(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.refresh_projection();
    }

    /// Recomputes the projection with the last known aspect ratio.
    pub fn refresh_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    /// Offset from the pivot to the eye.
    pub fn offset(&self) -> Vec3 {
        self.eye - self.at
    }
}

fn is_parallel(a: Vec3, b: Vec3) -> bool {
    a.cross(b).length_squared() <= f32::EPSILON * a.length_squared() * b.length_squared()
}
