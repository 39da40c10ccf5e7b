use crate::math::Vector3;

// Shared tuning constants for the scene and its camera.

// Projection
pub const FOV_Y_DEGREES: f32 = 90.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

// Camera
pub const DEFAULT_EYE: [f32; 3] = [0.0, 0.0, 3.0];
pub const DEFAULT_AT: [f32; 3] = [0.0, 0.0, -100.0];
pub const DEFAULT_UP: [f32; 3] = [0.0, 1.0, 0.0];
pub const CAMERA_STEP: f32 = 1.0; // world units per move/strafe
pub const YAW_STEP_DEGREES: f32 = 5.0;

// Animation
pub const OSCILLATION_AMPLITUDE_DEGREES: f32 = 45.0;
pub const GLOBAL_ANGLE_STEP_DEGREES: f32 = 5.0;
pub const JOINT_ANGLE_STEP_DEGREES: f32 = 5.0;

// Shading
pub const SIDE_SHADE: f32 = 0.9; // fake lighting on every face except the front
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const DEFAULT_SELECTED_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

// Floating tolerance used for degeneracy checks
pub const EPSILON: f32 = 1e-6;

#[inline]
pub fn default_eye() -> Vector3 {
    Vector3::from(DEFAULT_EYE)
}

#[inline]
pub fn default_at() -> Vector3 {
    Vector3::from(DEFAULT_AT)
}

#[inline]
pub fn default_up() -> Vector3 {
    Vector3::from(DEFAULT_UP)
}
