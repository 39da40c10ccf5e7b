//! First-person camera: an eye point, a look-at point and an up vector.
//!
//! Every movement translates eye and at together, so the viewing direction is
//! preserved. Operations validate before mutating: on error the camera is left
//! exactly as it was.

use crate::constants::{
    default_at, default_eye, default_up, CAMERA_STEP, EPSILON, YAW_STEP_DEGREES,
};
use crate::error::FigureError;
use crate::math::{Matrix4, Vector3};
use glam::Quat;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vector3,
    pub at: Vector3,
    pub up: Vector3,
    /// World units per forward/backward/strafe step.
    pub step: f32,
    pub yaw_step_degrees: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            at: default_at(),
            up: default_up(),
            step: CAMERA_STEP,
            yaw_step_degrees: YAW_STEP_DEGREES,
        }
    }
}

impl Camera {
    pub fn new(eye: Vector3, at: Vector3, up: Vector3) -> Result<Self, FigureError> {
        let camera = Self {
            eye,
            at,
            up,
            ..Self::default()
        };
        camera.check()?;
        Ok(camera)
    }

    /// Unit vector from eye toward at.
    pub fn forward(&self) -> Result<Vector3, FigureError> {
        (self.at - self.eye)
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)
    }

    /// Unit side vector pointing to the viewer's left.
    ///
    /// Convention: `normalize((eye - at) x up)`. With the default camera
    /// (looking down -Z, up +Y) this is -X. Right is its negation.
    pub fn left_direction(&self) -> Result<Vector3, FigureError> {
        let back = (self.eye - self.at)
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)?;
        let up = self
            .up
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)?;
        let side = back.cross(up);
        // same tolerance as `Matrix4::set_look_at`
        if side.length() < EPSILON {
            return Err(FigureError::DegenerateCamera);
        }
        side.normalize().map_err(|_| FigureError::DegenerateCamera)
    }

    pub fn move_forward(&mut self) -> Result<(), FigureError> {
        let f = self.forward()?;
        self.translate(f * self.step);
        Ok(())
    }

    pub fn move_backward(&mut self) -> Result<(), FigureError> {
        let f = self.forward()?;
        self.translate(-f * self.step);
        Ok(())
    }

    pub fn strafe_left(&mut self) -> Result<(), FigureError> {
        let s = self.left_direction()?;
        self.translate(s * self.step);
        Ok(())
    }

    pub fn strafe_right(&mut self) -> Result<(), FigureError> {
        let s = self.left_direction()?;
        self.translate(-s * self.step);
        Ok(())
    }

    /// Swing the look-at point around the eye about the up axis.
    /// Positive angles turn left (counter-clockwise seen from above).
    pub fn yaw(&mut self, degrees: f32) -> Result<(), FigureError> {
        let axis = self
            .up
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)?;
        let offset = self.at - self.eye;
        offset
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)?;
        let rotation = Quat::from_axis_angle(axis.as_glam(), degrees.to_radians());
        self.at = self.eye + Vector3::from(rotation * offset.as_glam());
        Ok(())
    }

    pub fn pan_left(&mut self) -> Result<(), FigureError> {
        self.yaw(self.yaw_step_degrees)
    }

    pub fn pan_right(&mut self) -> Result<(), FigureError> {
        self.yaw(-self.yaw_step_degrees)
    }

    pub fn view_matrix(&self) -> Result<Matrix4, FigureError> {
        let mut view = Matrix4::identity();
        view.set_look_at(self.eye, self.at, self.up)?;
        Ok(view)
    }

    fn check(&self) -> Result<(), FigureError> {
        self.left_direction().map(|_| ())
    }

    fn translate(&mut self, delta: Vector3) {
        self.eye = self.eye + delta;
        self.at = self.at + delta;
        log::debug!(
            "[camera] eye=({:.2},{:.2},{:.2}) at=({:.2},{:.2},{:.2})",
            self.eye.x(),
            self.eye.y(),
            self.eye.z(),
            self.at.x(),
            self.at.y(),
            self.at.z()
        );
    }
}
