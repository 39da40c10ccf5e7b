//! Articulated figure as a flat node array with parent indices.
//!
//! Each node owns two transform lists. `joint` ops build the node's pivot,
//! which children start from; `shape` ops are the trailing size/offset that
//! only the node's own cube receives. World matrices are recomputed top-down
//! every frame, starting from a copy of the parent's pivot, so no matrix is
//! ever shared between nodes or frames.

use crate::animation::{AngleId, AnimationState};
use crate::error::FigureError;
use crate::geometry::ShapeKind;
use crate::math::{Matrix4, Vector3};
use smallvec::SmallVec;

/// Fragment shading path for a part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureSelector {
    #[default]
    SolidColor,
    UvDebug,
    Textured,
}

impl TextureSelector {
    /// Value written to the shader's selector uniform.
    #[inline]
    pub fn shader_index(self) -> i32 {
        match self {
            TextureSelector::SolidColor => 0,
            TextureSelector::UvDebug => 1,
            TextureSelector::Textured => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSource {
    Fixed([f32; 4]),
    /// The color currently selected in the UI.
    Selected,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: ColorSource,
    /// `None` renders with the solid color.
    pub texture: Option<TextureSelector>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: ColorSource::Fixed([1.0, 1.0, 1.0, 1.0]),
            texture: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AngleSource {
    Fixed(f32),
    /// Current value of an animated angle, multiplied by `sign`.
    Driven { angle: AngleId, sign: f32 },
}

impl AngleSource {
    #[inline]
    pub fn degrees(&self, animation: &AnimationState) -> f32 {
        match *self {
            AngleSource::Fixed(d) => d,
            AngleSource::Driven { angle, sign } => sign * animation.value(angle),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Vector3),
    Scale(Vector3),
    Rotate { angle: AngleSource, axis: Vector3 },
}

impl TransformOp {
    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        TransformOp::Translate(Vector3::new(x, y, z))
    }

    pub const fn scale(x: f32, y: f32, z: f32) -> Self {
        TransformOp::Scale(Vector3::new(x, y, z))
    }

    pub const fn rotate(degrees: f32, axis: Vector3) -> Self {
        TransformOp::Rotate {
            angle: AngleSource::Fixed(degrees),
            axis,
        }
    }

    pub const fn rotate_driven(angle: AngleId, sign: f32, axis: Vector3) -> Self {
        TransformOp::Rotate {
            angle: AngleSource::Driven { angle, sign },
            axis,
        }
    }

    /// Post-multiply this op onto `m`.
    pub fn apply(&self, m: &mut Matrix4, animation: &AnimationState) {
        match self {
            TransformOp::Translate(t) => {
                m.translate(t.x(), t.y(), t.z());
            }
            TransformOp::Scale(s) => {
                m.scale(s.x(), s.y(), s.z());
            }
            TransformOp::Rotate { angle, axis } => {
                m.rotate(angle.degrees(animation), axis.x(), axis.y(), axis.z());
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct FigureNode {
    pub name: String,
    pub parent: Option<usize>,
    pub joint: Vec<TransformOp>,
    pub shape_ops: Vec<TransformOp>,
    pub shape: ShapeKind,
    pub material: Material,
}

impl FigureNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            joint: Vec::new(),
            shape_ops: Vec::new(),
            shape: ShapeKind::Cube,
            material: Material::default(),
        }
    }

    pub fn parent(mut self, index: usize) -> Self {
        self.parent = Some(index);
        self
    }

    pub fn joint(mut self, op: TransformOp) -> Self {
        self.joint.push(op);
        self
    }

    pub fn shape_op(mut self, op: TransformOp) -> Self {
        self.shape_ops.push(op);
        self
    }

    pub fn color(mut self, rgba: [f32; 4]) -> Self {
        self.material.color = ColorSource::Fixed(rgba);
        self
    }

    pub fn selected_color(mut self) -> Self {
        self.material.color = ColorSource::Selected;
        self
    }

    pub fn texture(mut self, selector: TextureSelector) -> Self {
        self.material.texture = Some(selector);
        self
    }
}

/// A renderable part produced for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Part<'a> {
    pub name: &'a str,
    pub shape: ShapeKind,
    pub color: [f32; 4],
    pub texture: TextureSelector,
    pub matrix: Matrix4,
}

pub type PartList<'a> = SmallVec<[Part<'a>; 8]>;

const Z_AXIS: Vector3 = Vector3::new(0.0, 0.0, 1.0);
const X_AXIS: Vector3 = Vector3::new(1.0, 0.0, 0.0);

#[derive(Clone, Debug, Default)]
pub struct Figure {
    nodes: Vec<FigureNode>,
}

impl Figure {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a node. Its parent must already be present.
    pub fn add(&mut self, node: FigureNode) -> Result<usize, FigureError> {
        let index = self.nodes.len();
        if let Some(parent) = node.parent {
            if parent >= index {
                return Err(FigureError::InvalidHierarchy {
                    node: index,
                    parent,
                });
            }
        }
        self.nodes.push(node);
        Ok(index)
    }

    #[inline]
    pub fn nodes(&self) -> &[FigureNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Compute every node's world matrix from the current angles.
    pub fn evaluate(&self, animation: &AnimationState, selected_color: [f32; 4]) -> PartList<'_> {
        let mut pivots: SmallVec<[Matrix4; 8]> = SmallVec::with_capacity(self.nodes.len());
        let mut parts = PartList::with_capacity(self.nodes.len());
        for node in &self.nodes {
            // `add` guarantees parents precede children.
            let mut pivot = node
                .parent
                .and_then(|p| pivots.get(p).copied())
                .unwrap_or_default();
            for op in &node.joint {
                op.apply(&mut pivot, animation);
            }
            pivots.push(pivot);

            let mut world = pivot;
            for op in &node.shape_ops {
                op.apply(&mut world, animation);
            }
            let color = match node.material.color {
                ColorSource::Fixed(rgba) => rgba,
                ColorSource::Selected => selected_color,
            };
            parts.push(Part {
                name: &node.name,
                shape: node.shape,
                color,
                texture: node.material.texture.unwrap_or_default(),
                matrix: world,
            });
        }
        parts
    }

    /// The hand-authored scene: floor, sky, body, left arm and tail.
    pub fn standard() -> Self {
        let floor = FigureNode::new("floor")
            .color([1.0, 0.0, 0.0, 1.0])
            .texture(TextureSelector::UvDebug)
            .shape_op(TransformOp::translate(0.0, -0.75, 0.0))
            .shape_op(TransformOp::scale(10.0, 0.0, 10.0))
            .shape_op(TransformOp::translate(-0.5, 0.0, -0.5));

        let sky = FigureNode::new("sky")
            .color([1.0, 0.0, 0.0, 1.0])
            .texture(TextureSelector::Textured)
            .shape_op(TransformOp::scale(50.0, 50.0, 50.0))
            .shape_op(TransformOp::translate(-0.5, -0.5, -0.5));

        let body = FigureNode::new("body")
            .selected_color()
            .texture(TextureSelector::Textured)
            .shape_op(TransformOp::translate(-0.25, -0.75, 0.0))
            .shape_op(TransformOp::rotate(-5.0, X_AXIS))
            .shape_op(TransformOp::scale(0.5, 0.3, 0.5));

        // Swings up and down about the shoulder, not sideways.
        let left_arm = FigureNode::new("left_arm")
            .color([1.0, 1.0, 0.0, 1.0])
            .joint(TransformOp::translate(0.0, -0.5, 0.0))
            .joint(TransformOp::rotate_driven(AngleId::Arm, -1.0, Z_AXIS))
            .shape_op(TransformOp::scale(0.25, 0.7, 0.5))
            .shape_op(TransformOp::translate(-0.5, 0.0, 0.0));

        let tail = FigureNode::new("tail")
            .parent(3)
            .color([1.0, 0.0, 1.0, 1.0])
            .texture(TextureSelector::SolidColor)
            .joint(TransformOp::translate(0.0, 0.65, 0.0))
            .joint(TransformOp::rotate_driven(AngleId::Tail, 1.0, Z_AXIS))
            .shape_op(TransformOp::scale(0.3, 0.3, 0.3))
            .shape_op(TransformOp::translate(-0.5, 0.0, -0.001));

        Self {
            nodes: vec![floor, sky, body, left_arm, tail],
        }
    }
}
