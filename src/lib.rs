//! Duck Collector - walk around a small arena and click every duck
//!
//! Core modules:
//! - `sim`: Pure game core (entities, spawning, state transitions)
//! - `settings`: Session parameters (target, arena bounds, step, rest height)
//! - `view`: Camera, projection and picking math for the browser renderer

pub mod settings;
pub mod sim;
pub mod view;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Ducks to collect per session
    pub const DEFAULT_TARGET: u32 = 5;
    /// Arena half-extent (ducks spawn in [-bounds, bounds] on x and z)
    pub const DEFAULT_BOUNDS: f32 = 5.0;
    /// Distance covered by one move command
    pub const DEFAULT_STEP: f32 = 0.5;
    /// Height of the player and ducks above the ground plane
    pub const DEFAULT_REST_HEIGHT: f32 = 0.5;

    /// Camera sits behind and above the player
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 5.0);
    /// Vertical field of view (radians, 75 degrees)
    pub const CAMERA_FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Duck spin rate (rad/s) - 0.01 rad per frame at 60 fps
    pub const DUCK_SPIN_RATE: f32 = 0.6;
    /// Click radius around a duck's center
    pub const DUCK_PICK_RADIUS: f32 = 0.4;
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Half-size of the drawn ground square
    pub const GROUND_HALF_EXTENT: f32 = 50.0;
}
