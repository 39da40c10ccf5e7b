//! Error types shared by the math, camera and render layers.

use thiserror::Error;

/// Errors raised by the scene core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FigureError {
    /// A zero-length vector was normalized or divided by zero.
    #[error("degenerate vector: cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Eye and look-at coincide, or `up` is parallel to the view direction.
    #[error("degenerate camera: eye and look-at point coincide or up is parallel to view")]
    DegenerateCamera,

    /// Texture, shader or other external resource is missing.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A hierarchy node referenced a parent that does not precede it.
    #[error("invalid hierarchy: node {node} references parent {parent}")]
    InvalidHierarchy { node: usize, parent: usize },

    /// A part's world matrix contains NaN or infinite elements.
    #[error("non-finite transform for part '{0}'")]
    NonFiniteTransform(String),

    /// Projection parameters outside their valid range.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    /// The rendering pipeline could not be built.
    #[error("pipeline creation failed: {0}")]
    PipelineCreation(String),
}
