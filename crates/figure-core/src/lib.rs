pub mod animation;
pub mod camera;
pub mod constants;
pub mod error;
pub mod figure;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod math;
pub mod state;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use animation::*;
pub use camera::*;
pub use error::*;
pub use figure::*;
pub use frame::*;
pub use geometry::*;
pub use input::*;
pub use math::*;
pub use state::*;
