//! Keyboard mapping from key names to scene commands.

use crate::animation::AngleId;
use crate::constants::{
    BLUE, DEFAULT_SELECTED_COLOR, GLOBAL_ANGLE_STEP_DEGREES, GREEN, JOINT_ANGLE_STEP_DEGREES, RED,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyCommand {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    PanLeft,
    PanRight,
    ToggleAnimation(AngleId),
    /// Adjust the global scene rotation by this many degrees.
    RotateScene(f32),
    /// Nudge a joint angle by this many degrees.
    AdjustAngle(AngleId, f32),
    /// Replace the selected color.
    SetColor([f32; 4]),
}

/// Map a key name (as reported by the windowing layer) to a command.
#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        "w" | "W" | "ArrowUp" => Some(KeyCommand::MoveForward),
        "s" | "S" | "ArrowDown" => Some(KeyCommand::MoveBackward),
        "a" | "A" | "ArrowLeft" => Some(KeyCommand::StrafeLeft),
        "d" | "D" | "ArrowRight" => Some(KeyCommand::StrafeRight),
        "q" | "Q" => Some(KeyCommand::PanLeft),
        "e" | "E" => Some(KeyCommand::PanRight),
        "1" => Some(KeyCommand::ToggleAnimation(AngleId::Arm)),
        "2" => Some(KeyCommand::ToggleAnimation(AngleId::Tail)),
        "[" => Some(KeyCommand::RotateScene(-GLOBAL_ANGLE_STEP_DEGREES)),
        "]" => Some(KeyCommand::RotateScene(GLOBAL_ANGLE_STEP_DEGREES)),
        "z" | "Z" => Some(KeyCommand::AdjustAngle(AngleId::Arm, -JOINT_ANGLE_STEP_DEGREES)),
        "x" | "X" => Some(KeyCommand::AdjustAngle(AngleId::Arm, JOINT_ANGLE_STEP_DEGREES)),
        "c" | "C" => Some(KeyCommand::AdjustAngle(AngleId::Tail, -JOINT_ANGLE_STEP_DEGREES)),
        "v" | "V" => Some(KeyCommand::AdjustAngle(AngleId::Tail, JOINT_ANGLE_STEP_DEGREES)),
        "r" | "R" => Some(KeyCommand::SetColor(RED)),
        "g" | "G" => Some(KeyCommand::SetColor(GREEN)),
        "b" | "B" => Some(KeyCommand::SetColor(BLUE)),
        "0" => Some(KeyCommand::SetColor(DEFAULT_SELECTED_COLOR)),
        _ => None,
    }
}
