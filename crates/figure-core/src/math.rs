//! Vector and matrix value types used by the camera and the figure hierarchy.
//!
//! Both types wrap glam. `Matrix4` keeps the "current transform, further
//! modified" style: every `translate`/`rotate`/`scale` post-multiplies, so the
//! call order reads outermost-first and applies to geometry innermost-first.

use crate::constants::EPSILON;
use crate::error::FigureError;
use glam::{Mat4, Vec3};
use std::ops::{Add, Mul, Neg, Sub};

/// Immutable 3D vector. Every operation returns a new value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3(Vec3);

impl Vector3 {
    pub const ZERO: Self = Self(Vec3::ZERO);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn subtract(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self(self.0 * s)
    }

    /// Componentwise division by a scalar; a zero divisor is rejected instead
    /// of producing infinities.
    pub fn divide(self, s: f32) -> Result<Self, FigureError> {
        if s.abs() < EPSILON || !s.is_finite() {
            return Err(FigureError::DegenerateVector);
        }
        Ok(Self(self.0 / s))
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.0.dot(other.0)
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self(self.0.cross(other.0))
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.0.length()
    }

    /// Unit vector in the same direction. Fails for zero-length or
    /// non-finite input.
    ///
    /// The vector is first divided by its largest component so the squared
    /// length can neither overflow nor underflow.
    pub fn normalize(self) -> Result<Self, FigureError> {
        if !self.0.is_finite() {
            return Err(FigureError::DegenerateVector);
        }
        let largest = self.0.abs().max_element();
        if largest == 0.0 {
            return Err(FigureError::DegenerateVector);
        }
        (self.0 / largest)
            .try_normalize()
            .map(Self)
            .ok_or(FigureError::DegenerateVector)
    }

    #[inline]
    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        self.0.abs_diff_eq(other.0, eps)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn as_glam(self) -> Vec3 {
        self.0
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self(Vec3::from(v))
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        v.0
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// 4x4 transform stored column-major.
///
/// `Matrix4` is `Copy`: forking a hierarchy branch is a plain assignment and
/// the fork never aliases its source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4(Mat4);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    #[inline]
    pub fn identity() -> Self {
        Self(Mat4::IDENTITY)
    }

    #[inline]
    pub fn from_elements(elements: [f32; 16]) -> Self {
        Self(Mat4::from_cols_array(&elements))
    }

    /// The 16 elements in column-major order, ready for upload.
    #[inline]
    pub fn elements(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.0.to_cols_array_2d()
    }

    pub fn set_identity(&mut self) -> &mut Self {
        self.0 = Mat4::IDENTITY;
        self
    }

    pub fn set_translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.0 = Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.0 *= Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.0 *= Mat4::from_scale(Vec3::new(x, y, z));
        self
    }

    /// Post-multiply a rotation of `degrees` about the given axis.
    pub fn rotate(&mut self, degrees: f32, ax: f32, ay: f32, az: f32) -> &mut Self {
        if let Some(r) = axis_rotation(degrees, Vec3::new(ax, ay, az)) {
            self.0 *= r;
        }
        self
    }

    pub fn set_rotate(&mut self, degrees: f32, ax: f32, ay: f32, az: f32) -> &mut Self {
        if let Some(r) = axis_rotation(degrees, Vec3::new(ax, ay, az)) {
            self.0 = r;
        }
        self
    }

    /// `self = self * other`.
    pub fn multiply(&mut self, other: &Matrix4) -> &mut Self {
        self.0 *= other.0;
        self
    }

    /// Replace with a right-handed view matrix looking from `eye` at `at`.
    pub fn set_look_at(
        &mut self,
        eye: Vector3,
        at: Vector3,
        up: Vector3,
    ) -> Result<&mut Self, FigureError> {
        let dir = (at - eye)
            .normalize()
            .map_err(|_| FigureError::DegenerateCamera)?;
        let up = up.normalize().map_err(|_| FigureError::DegenerateCamera)?;
        if dir.cross(up).length() < EPSILON {
            return Err(FigureError::DegenerateCamera);
        }
        self.0 = Mat4::look_to_rh(eye.0, dir.0, up.0);
        Ok(self)
    }

    /// Replace with a right-handed perspective projection (depth in [0, 1]).
    pub fn set_perspective(
        &mut self,
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, FigureError> {
        if !(fovy_degrees > 0.0 && fovy_degrees < 180.0) {
            return Err(FigureError::InvalidProjection(format!(
                "field of view {fovy_degrees} outside (0, 180)"
            )));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(FigureError::InvalidProjection(format!(
                "aspect ratio {aspect} must be positive"
            )));
        }
        if !(near > 0.0 && far > near) {
            return Err(FigureError::InvalidProjection(format!(
                "clip planes near={near} far={far}"
            )));
        }
        self.0 = Mat4::perspective_rh(fovy_degrees.to_radians(), aspect, near, far);
        Ok(self)
    }

    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        Vector3(self.0.transform_point3(p.0))
    }

    #[inline]
    pub fn approx_eq(&self, other: &Matrix4, eps: f32) -> bool {
        self.0.abs_diff_eq(other.0, eps)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn as_glam(&self) -> Mat4 {
        self.0
    }
}

impl Mul for Matrix4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

fn axis_rotation(degrees: f32, axis: Vec3) -> Option<Mat4> {
    match axis.try_normalize() {
        Some(axis) => Some(Mat4::from_axis_angle(axis, degrees.to_radians())),
        None => {
            log::error!("[math] rotation about zero-length axis ignored ({degrees} deg)");
            None
        }
    }
}
