//! Scene-wide mutable state. The frontend owns one `SceneState`, input
//! callbacks mutate it between frames and the frame tick reads it fresh.

use crate::animation::{AngleId, AnimationState};
use crate::camera::Camera;
use crate::constants::DEFAULT_SELECTED_COLOR;
use crate::error::FigureError;
use crate::input::{command_for_key, KeyCommand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Viewport {
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub animation: AnimationState,
    /// Scene-wide rotation about +Y, in degrees.
    pub global_angle: f32,
    pub selected_color: [f32; 4],
    pub texture_ready: bool,
    pub viewport: Viewport,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            animation: AnimationState::default(),
            global_angle: 0.0,
            selected_color: DEFAULT_SELECTED_COLOR,
            texture_ready: false,
            viewport: Viewport::default(),
        }
    }
}

impl SceneState {
    pub fn apply(&mut self, command: KeyCommand) -> Result<(), FigureError> {
        match command {
            KeyCommand::MoveForward => self.camera.move_forward(),
            KeyCommand::MoveBackward => self.camera.move_backward(),
            KeyCommand::StrafeLeft => self.camera.strafe_left(),
            KeyCommand::StrafeRight => self.camera.strafe_right(),
            KeyCommand::PanLeft => self.camera.pan_left(),
            KeyCommand::PanRight => self.camera.pan_right(),
            KeyCommand::ToggleAnimation(id) => {
                self.animation.toggle(id);
                Ok(())
            }
            KeyCommand::RotateScene(delta) => {
                self.global_angle = (self.global_angle + delta) % 360.0;
                Ok(())
            }
            KeyCommand::AdjustAngle(id, delta) => {
                let degrees = (self.animation.value(id) + delta) % 360.0;
                self.animation.set_value(id, degrees);
                Ok(())
            }
            KeyCommand::SetColor(rgba) => {
                self.on_color_changed(rgba);
                Ok(())
            }
        }
    }

    /// Returns `true` when the key mapped to a command.
    pub fn on_key(&mut self, key: &str) -> bool {
        let Some(command) = command_for_key(key) else {
            return false;
        };
        if let Err(e) = self.apply(command) {
            log::warn!("[keys] {command:?} rejected: {e}");
        }
        true
    }

    pub fn on_color_changed(&mut self, rgba: [f32; 4]) {
        self.selected_color = rgba.map(|c| c.clamp(0.0, 1.0));
    }

    /// Slider input for a joint angle, or for the global rotation
    /// (`"global"`). Returns `false` for an unknown name.
    pub fn on_angle_slider_changed(&mut self, name: &str, degrees: f32) -> bool {
        if name.eq_ignore_ascii_case("global") {
            self.global_angle = degrees;
            return true;
        }
        match AngleId::from_name(name) {
            Some(id) => {
                self.animation.set_value(id, degrees);
                true
            }
            None => {
                log::warn!("[ui] unknown angle slider '{name}'");
                false
            }
        }
    }

    pub fn on_animation_toggle(&mut self, name: &str, enabled: bool) -> bool {
        match AngleId::from_name(name) {
            Some(id) => {
                self.animation.set_animating(id, enabled);
                true
            }
            None => {
                log::warn!("[ui] unknown animation toggle '{name}'");
                false
            }
        }
    }

    pub fn on_texture_ready(&mut self, bound: bool) {
        self.texture_ready = bound;
        log::info!("[texture] ready={bound}");
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width, height };
    }
}
