//! Per-frame render pass and the graphics boundary it drives.

use crate::constants::{CLEAR_COLOR, FOV_Y_DEGREES, Z_FAR, Z_NEAR};
use crate::error::FigureError;
use crate::figure::{Figure, Part, TextureSelector};
use crate::geometry::{mesh_for, MeshVertex, ShapeKind};
use crate::math::Matrix4;
use crate::state::SceneState;

/// Named matrix uniforms consumed by the vertex stage, composed as
/// `projection * view * global_rotation * model`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixUniform {
    Projection,
    View,
    GlobalRotation,
    Model,
}

/// What the render pass needs from a graphics API. Uniform setters affect
/// every subsequent `draw_triangles` until overwritten.
pub trait GraphicsBackend {
    /// Clear color and depth.
    fn clear(&mut self, rgba: [f32; 4]);
    fn set_uniform_matrix(&mut self, uniform: MatrixUniform, matrix: &Matrix4);
    fn set_uniform_color(&mut self, rgba: [f32; 4]);
    fn set_texture_selector(&mut self, selector: TextureSelector);
    fn draw_triangles(&mut self, vertices: &[MeshVertex]);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: FOV_Y_DEGREES,
            near: Z_NEAR,
            far: Z_FAR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub parts_drawn: usize,
    pub parts_skipped: usize,
}

/// Sampled textures are only usable once bound; until then draw the solid color.
#[inline]
pub fn resolve_selector(requested: TextureSelector, texture_ready: bool) -> TextureSelector {
    match requested {
        TextureSelector::Textured if !texture_ready => TextureSelector::SolidColor,
        other => other,
    }
}

pub struct FrameRenderer {
    pub projection: ProjectionConfig,
    pub clear_color: [f32; 4],
    cube: Vec<MeshVertex>,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

impl FrameRenderer {
    pub fn new(projection: ProjectionConfig) -> Self {
        Self {
            projection,
            clear_color: CLEAR_COLOR,
            cube: mesh_for(ShapeKind::Cube),
        }
    }

    /// One scheduler tick: advance animation, then render.
    pub fn tick<B: GraphicsBackend + ?Sized>(
        &self,
        state: &mut SceneState,
        figure: &Figure,
        elapsed_seconds: f64,
        backend: &mut B,
    ) -> FrameReport {
        state.animation.advance(elapsed_seconds);
        self.render(state, figure, backend)
    }

    pub fn render<B: GraphicsBackend + ?Sized>(
        &self,
        state: &SceneState,
        figure: &Figure,
        backend: &mut B,
    ) -> FrameReport {
        let camera = self.camera_matrices(state);
        backend.clear(self.clear_color);

        let (projection, view) = match camera {
            Ok(matrices) => matrices,
            Err(e) => {
                log::error!("[frame] skipping parts, camera unusable: {e}");
                return FrameReport {
                    parts_drawn: 0,
                    parts_skipped: figure.len(),
                };
            }
        };
        let mut global_rotation = Matrix4::identity();
        global_rotation.rotate(state.global_angle, 0.0, 1.0, 0.0);

        backend.set_uniform_matrix(MatrixUniform::Projection, &projection);
        backend.set_uniform_matrix(MatrixUniform::View, &view);
        backend.set_uniform_matrix(MatrixUniform::GlobalRotation, &global_rotation);

        let mut report = FrameReport::default();
        for part in figure.evaluate(&state.animation, state.selected_color) {
            match self.draw_part(&part, state.texture_ready, backend) {
                Ok(()) => report.parts_drawn += 1,
                Err(e) => {
                    log::warn!("[frame] skipped part '{}': {e}", part.name);
                    report.parts_skipped += 1;
                }
            }
        }
        report
    }

    pub fn projection_matrix(&self, aspect: f32) -> Result<Matrix4, FigureError> {
        let mut m = Matrix4::identity();
        m.set_perspective(
            self.projection.fov_y_degrees,
            aspect,
            self.projection.near,
            self.projection.far,
        )?;
        Ok(m)
    }

    fn camera_matrices(&self, state: &SceneState) -> Result<(Matrix4, Matrix4), FigureError> {
        let projection = self.projection_matrix(state.viewport.aspect())?;
        let view = state.camera.view_matrix()?;
        Ok((projection, view))
    }

    fn draw_part<B: GraphicsBackend + ?Sized>(
        &self,
        part: &Part<'_>,
        texture_ready: bool,
        backend: &mut B,
    ) -> Result<(), FigureError> {
        if !part.matrix.is_finite() {
            return Err(FigureError::NonFiniteTransform(part.name.to_string()));
        }
        let vertices = match part.shape {
            ShapeKind::Cube => &self.cube,
        };
        backend.set_texture_selector(resolve_selector(part.texture, texture_ready));
        backend.set_uniform_color(part.color);
        backend.set_uniform_matrix(MatrixUniform::Model, &part.matrix);
        backend.draw_triangles(vertices);
        Ok(())
    }
}
