// Host-side tests for camera movement.

use figure_core::{Camera, FigureError, Vector3};
use proptest::prelude::*;

const EPS: f32 = 1e-4;

fn assert_close(a: Vector3, b: Vector3) {
    assert!(a.approx_eq(b, EPS), "{a:?} != {b:?}");
}

/// Cameras at arbitrary positions looking in any direction that is not
/// within 30 degrees of straight up or down.
fn any_camera() -> impl Strategy<Value = Camera> {
    (
        (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0),
        0.0f32..360.0,
        -60.0f32..60.0,
        0.5f32..500.0,
    )
        .prop_map(|((x, y, z), yaw, pitch, distance)| {
            let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
            let dir = Vector3::new(
                pitch.cos() * yaw.sin(),
                pitch.sin(),
                -pitch.cos() * yaw.cos(),
            );
            let eye = Vector3::new(x, y, z);
            Camera::new(eye, eye + dir * distance, Vector3::new(0.0, 1.0, 0.0))
                .expect("pitch keeps the camera valid")
        })
}

proptest! {
    #[test]
    fn forward_then_backward_returns_to_start(mut cam in any_camera()) {
        let (eye, at) = (cam.eye, cam.at);
        cam.move_forward().unwrap();
        cam.move_backward().unwrap();
        prop_assert!(cam.eye.approx_eq(eye, 1e-3), "{:?} != {eye:?}", cam.eye);
        prop_assert!(cam.at.approx_eq(at, 1e-3), "{:?} != {at:?}", cam.at);
    }

    #[test]
    fn left_then_right_returns_to_start(mut cam in any_camera()) {
        let (eye, at) = (cam.eye, cam.at);
        cam.strafe_left().unwrap();
        prop_assert!(!cam.eye.approx_eq(eye, 0.5));
        cam.strafe_right().unwrap();
        prop_assert!(cam.eye.approx_eq(eye, 1e-3), "{:?} != {eye:?}", cam.eye);
        prop_assert!(cam.at.approx_eq(at, 1e-3), "{:?} != {at:?}", cam.at);
    }

    #[test]
    fn forward_step_has_unit_length(mut cam in any_camera()) {
        let eye = cam.eye;
        cam.move_forward().unwrap();
        prop_assert!(((cam.eye - eye).length() - 1.0).abs() < 1e-3);
    }
}

#[test]
fn far_look_at_target_is_usable() {
    let mut cam = Camera::new(
        Vector3::ZERO,
        Vector3::new(0.0, 0.0, -1e20),
        Vector3::new(0.0, 1.0, 0.0),
    )
    .expect("distant target is valid");
    cam.move_forward().unwrap();
    assert_close(cam.eye, Vector3::new(0.0, 0.0, -1.0));
    assert!(cam.view_matrix().unwrap().is_finite());
}

#[test]
fn default_camera_matches_scene_setup() {
    let cam = Camera::default();
    assert_close(cam.eye, Vector3::new(0.0, 0.0, 3.0));
    assert_close(cam.at, Vector3::new(0.0, 0.0, -100.0));
    assert_close(cam.up, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn move_forward_steps_one_unit_toward_target() {
    let mut cam = Camera::default();
    cam.move_forward().unwrap();
    assert_close(cam.eye, Vector3::new(0.0, 0.0, 2.0));
    assert_close(cam.at, Vector3::new(0.0, 0.0, -101.0));
}

#[test]
fn backward_moves_away_from_target() {
    let mut cam = Camera::default();
    cam.move_backward().unwrap();
    assert_close(cam.eye, Vector3::new(0.0, 0.0, 4.0));
    assert_close(cam.at, Vector3::new(0.0, 0.0, -99.0));
}

#[test]
fn strafe_left_moves_toward_negative_x_by_default() {
    let mut cam = Camera::default();
    cam.strafe_left().unwrap();
    assert_close(cam.eye, Vector3::new(-1.0, 0.0, 3.0));
    cam.strafe_right().unwrap();
    cam.strafe_right().unwrap();
    assert_close(cam.eye, Vector3::new(1.0, 0.0, 3.0));
}

#[test]
fn degenerate_camera_is_left_unchanged() {
    let mut cam = Camera::default();
    cam.at = cam.eye;
    let before = cam.clone();
    assert_eq!(cam.move_forward(), Err(FigureError::DegenerateCamera));
    assert_eq!(cam.move_backward(), Err(FigureError::DegenerateCamera));
    assert_eq!(cam.strafe_left(), Err(FigureError::DegenerateCamera));
    assert_eq!(cam.strafe_right(), Err(FigureError::DegenerateCamera));
    assert_eq!(cam.yaw(10.0), Err(FigureError::DegenerateCamera));
    assert_eq!(cam.eye, before.eye);
    assert_eq!(cam.at, before.at);
    assert!(cam.eye.is_finite() && cam.at.is_finite());
}

#[test]
fn new_rejects_up_parallel_to_view() {
    let result = Camera::new(
        Vector3::ZERO,
        Vector3::new(0.0, 10.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    );
    assert!(matches!(result, Err(FigureError::DegenerateCamera)));
}

#[test]
fn yaw_keeps_distance_and_eye() {
    let mut cam = Camera::default();
    let dist = (cam.at - cam.eye).length();
    cam.yaw(90.0).unwrap();
    assert_close(cam.eye, Vector3::new(0.0, 0.0, 3.0));
    assert!(((cam.at - cam.eye).length() - dist).abs() < 1e-3);
    // positive yaw turns left: looking down -Z, left is -X
    assert!(cam.at.x() < -100.0);
    cam.yaw(-90.0).unwrap();
    assert!(cam.at.approx_eq(Vector3::new(0.0, 0.0, -100.0), 1e-3));
}

#[test]
fn pan_uses_configured_step() {
    let mut cam = Camera::default();
    cam.yaw_step_degrees = 90.0;
    cam.pan_right().unwrap();
    assert!(cam.at.x() > 100.0);
    cam.pan_left().unwrap();
    assert!(cam.at.approx_eq(Vector3::new(0.0, 0.0, -100.0), 1e-3));
}

#[test]
fn view_matrix_tracks_movement() {
    let mut cam = Camera::default();
    let before = cam.view_matrix().unwrap();
    cam.move_forward().unwrap();
    let after = cam.view_matrix().unwrap();
    assert!(!before.approx_eq(&after, 1e-6));
    // the eye always maps to the view-space origin
    assert!(after.transform_point(cam.eye).approx_eq(Vector3::ZERO, EPS));
}
