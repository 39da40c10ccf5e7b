//! Per-part joint angles, either held from UI input or oscillating with time.

use crate::constants::OSCILLATION_AMPLITUDE_DEGREES;
use instant::Instant;

/// Joints of the figure that carry an animated angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AngleId {
    Arm,
    Tail,
}

impl AngleId {
    pub const ALL: [AngleId; 2] = [AngleId::Arm, AngleId::Tail];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AngleId::Arm => 0,
            AngleId::Tail => 1,
        }
    }

    /// Accepts both the part name and the slider color used by the UI.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "arm" | "yellow" => Some(AngleId::Arm),
            "tail" | "magenta" => Some(AngleId::Tail),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AngleId::Arm => "arm",
            AngleId::Tail => "tail",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleMode {
    /// Held at the last externally written value.
    #[default]
    Fixed,
    /// Recomputed each tick as `amplitude * sin(elapsed)`.
    Oscillating,
}

#[derive(Clone, Debug)]
pub struct AnimatedAngle {
    pub mode: AngleMode,
    /// Current angle in degrees.
    pub value: f32,
    pub amplitude: f32,
}

impl Default for AnimatedAngle {
    fn default() -> Self {
        Self {
            mode: AngleMode::Fixed,
            value: 0.0,
            amplitude: OSCILLATION_AMPLITUDE_DEGREES,
        }
    }
}

impl AnimatedAngle {
    pub fn advance(&mut self, elapsed_seconds: f64) {
        if self.mode == AngleMode::Oscillating {
            self.value = oscillation(self.amplitude, elapsed_seconds);
        }
    }
}

#[inline]
pub fn oscillation(amplitude: f32, elapsed_seconds: f64) -> f32 {
    (amplitude as f64 * elapsed_seconds.sin()) as f32
}

/// All animated joint angles. Every angle shares one session clock, so
/// switching modes never resets time.
#[derive(Clone, Debug, Default)]
pub struct AnimationState {
    angles: [AnimatedAngle; 2],
}

impl AnimationState {
    pub fn advance(&mut self, elapsed_seconds: f64) {
        for angle in &mut self.angles {
            angle.advance(elapsed_seconds);
        }
    }

    #[inline]
    pub fn value(&self, id: AngleId) -> f32 {
        self.angles[id.index()].value
    }

    #[inline]
    pub fn mode(&self, id: AngleId) -> AngleMode {
        self.angles[id.index()].mode
    }

    #[inline]
    pub fn angle(&self, id: AngleId) -> &AnimatedAngle {
        &self.angles[id.index()]
    }

    /// External (slider) write. An oscillating angle takes the value until the
    /// next tick overwrites it.
    pub fn set_value(&mut self, id: AngleId, degrees: f32) {
        self.angles[id.index()].value = degrees;
    }

    pub fn set_mode(&mut self, id: AngleId, mode: AngleMode) {
        let angle = &mut self.angles[id.index()];
        if angle.mode != mode {
            log::debug!("[anim] {} -> {:?}", id.name(), mode);
            angle.mode = mode;
        }
    }

    pub fn set_animating(&mut self, id: AngleId, enabled: bool) {
        let mode = if enabled {
            AngleMode::Oscillating
        } else {
            AngleMode::Fixed
        };
        self.set_mode(id, mode);
    }

    pub fn toggle(&mut self, id: AngleId) {
        let enabled = self.mode(id) == AngleMode::Fixed;
        self.set_animating(id, enabled);
    }

    pub fn set_amplitude(&mut self, id: AngleId, degrees: f32) {
        self.angles[id.index()].amplitude = degrees;
    }
}

/// Monotonic seconds since the animation session started.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    start: Instant,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::start()
    }
}

impl AnimationClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
