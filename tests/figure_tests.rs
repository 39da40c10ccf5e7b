// Host-side tests for the articulated figure hierarchy.

use figure_core::{
    AngleId, AnimationState, Figure, FigureError, FigureNode, Matrix4, TextureSelector,
    TransformOp, Vector3,
};

const EPS: f32 = 1e-5;
const WHITE: [f32; 4] = [1.0; 4];

fn part_matrix(figure: &Figure, animation: &AnimationState, name: &str) -> Matrix4 {
    figure
        .evaluate(animation, WHITE)
        .into_iter()
        .find(|p| p.name == name)
        .map(|p| p.matrix)
        .expect("part present")
}

#[test]
fn standard_figure_lists_parts_in_draw_order() {
    let figure = Figure::standard();
    let names: Vec<_> = figure.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["floor", "sky", "body", "left_arm", "tail"]);
    assert_eq!(figure.nodes()[4].parent, figure.find("left_arm"));
}

#[test]
fn tail_starts_from_arm_pivot_not_arm_size() {
    let figure = Figure::standard();
    let mut animation = AnimationState::default();
    animation.set_value(AngleId::Arm, 20.0);
    animation.set_value(AngleId::Tail, -35.0);

    let mut pivot = Matrix4::identity();
    pivot.set_translate(0.0, -0.5, 0.0).rotate(-20.0, 0.0, 0.0, 1.0);

    let mut arm = pivot;
    arm.scale(0.25, 0.7, 0.5).translate(-0.5, 0.0, 0.0);

    let mut tail = pivot;
    tail.translate(0.0, 0.65, 0.0)
        .rotate(-35.0, 0.0, 0.0, 1.0)
        .scale(0.3, 0.3, 0.3)
        .translate(-0.5, 0.0, -0.001);

    assert!(part_matrix(&figure, &animation, "left_arm").approx_eq(&arm, EPS));
    assert!(part_matrix(&figure, &animation, "tail").approx_eq(&tail, EPS));
}

#[test]
fn rest_pose_places_tail_above_shoulder() {
    let figure = Figure::standard();
    let tail = part_matrix(&figure, &AnimationState::default(), "tail");
    let origin = tail.transform_point(Vector3::ZERO);
    assert!(origin.approx_eq(Vector3::new(-0.15, 0.15, -0.0003), EPS));
}

#[test]
fn arm_angle_moves_tail_but_tail_angle_leaves_arm() {
    let figure = Figure::standard();
    let rest = AnimationState::default();

    let mut swung_arm = AnimationState::default();
    swung_arm.set_value(AngleId::Arm, 30.0);
    assert!(!part_matrix(&figure, &rest, "tail")
        .approx_eq(&part_matrix(&figure, &swung_arm, "tail"), EPS));

    let mut swung_tail = AnimationState::default();
    swung_tail.set_value(AngleId::Tail, 30.0);
    assert!(part_matrix(&figure, &rest, "left_arm")
        .approx_eq(&part_matrix(&figure, &swung_tail, "left_arm"), EPS));
    assert!(part_matrix(&figure, &rest, "body")
        .approx_eq(&part_matrix(&figure, &swung_tail, "body"), EPS));
}

#[test]
fn evaluation_does_not_leak_between_frames() {
    let figure = Figure::standard();
    let animation = AnimationState::default();
    let first = part_matrix(&figure, &animation, "tail");
    let _ = figure.evaluate(&animation, WHITE);
    let second = part_matrix(&figure, &animation, "tail");
    assert_eq!(first, second);
}

#[test]
fn parts_default_to_solid_color_and_selected_color_flows_through() {
    let figure = Figure::standard();
    let red = [1.0, 0.0, 0.0, 1.0];
    let parts = figure.evaluate(&AnimationState::default(), red);
    let arm = parts.iter().find(|p| p.name == "left_arm").unwrap();
    assert_eq!(arm.texture, TextureSelector::SolidColor);
    assert_eq!(arm.color, [1.0, 1.0, 0.0, 1.0]);
    let body = parts.iter().find(|p| p.name == "body").unwrap();
    assert_eq!(body.texture, TextureSelector::Textured);
    assert_eq!(body.color, red);
}

#[test]
fn parent_must_precede_child() {
    let mut figure = Figure::empty();
    let err = figure.add(FigureNode::new("orphan").parent(0)).unwrap_err();
    assert_eq!(err, FigureError::InvalidHierarchy { node: 0, parent: 0 });

    let root = figure
        .add(FigureNode::new("root").joint(TransformOp::translate(1.0, 0.0, 0.0)))
        .unwrap();
    let child = figure
        .add(
            FigureNode::new("child")
                .parent(root)
                .shape_op(TransformOp::scale(2.0, 2.0, 2.0)),
        )
        .unwrap();
    assert_eq!((root, child), (0, 1));

    let parts = figure.evaluate(&AnimationState::default(), WHITE);
    let p = parts[1].matrix.transform_point(Vector3::new(1.0, 0.0, 0.0));
    assert!(p.approx_eq(Vector3::new(3.0, 0.0, 0.0), EPS));
}

#[test]
fn shape_ops_are_not_inherited() {
    let mut figure = Figure::empty();
    let root = figure
        .add(FigureNode::new("root").shape_op(TransformOp::scale(10.0, 10.0, 10.0)))
        .unwrap();
    figure.add(FigureNode::new("child").parent(root)).unwrap();
    let parts = figure.evaluate(&AnimationState::default(), WHITE);
    assert_eq!(parts[1].matrix, Matrix4::identity());
}

#[test]
fn driven_rotation_applies_sign() {
    let mut figure = Figure::empty();
    figure
        .add(FigureNode::new("joint").joint(TransformOp::rotate_driven(
            AngleId::Arm,
            -1.0,
            Vector3::new(0.0, 0.0, 1.0),
        )))
        .unwrap();
    let mut animation = AnimationState::default();
    animation.set_value(AngleId::Arm, 90.0);
    let parts = figure.evaluate(&animation, WHITE);
    let p = parts[0].matrix.transform_point(Vector3::new(1.0, 0.0, 0.0));
    assert!(p.approx_eq(Vector3::new(0.0, -1.0, 0.0), EPS));
}
