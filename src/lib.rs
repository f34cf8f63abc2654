//! Swarm Survivor - A top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, session state)
//! - `driver`: Thin frame driver that feeds the simulation and hands out snapshots
//! - `platform`: Input capture (joystick, keyboard) and frame timing
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod driver;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::Driver;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Engine constants that are not part of game balance
pub mod consts {
    use glam::Vec2;

    /// Maximum simulated time per tick (seconds). Longer frames are clamped
    /// so a resumed tab or a slow frame can't teleport entities.
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// World dimensions
    pub const WORLD_SIZE: Vec2 = Vec2::new(2000.0, 2000.0);

    /// Default viewport (canvas) size
    pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Camera follow smoothing, fraction of the remaining distance per tick
    pub const CAMERA_LERP: f32 = 0.1;

    /// Extra margin around the viewport when culling for rendering
    pub const VISIBILITY_PADDING: f32 = 50.0;
}

/// Clamp a circle's center so the whole circle stays inside the world.
#[inline]
pub fn clamp_to_world(pos: Vec2, radius: f32, world: Vec2) -> Vec2 {
    let min = Vec2::splat(radius);
    let max = (world - Vec2::splat(radius)).max(min);
    pos.clamp(min, max)
}

/// Sanitize a raw movement intent: non-finite becomes zero, each axis is
/// limited to [-1, 1] and diagonals are normalized to unit length.
#[inline]
pub fn sanitize_intent(intent: Vec2) -> Vec2 {
    if !intent.is_finite() {
        return Vec2::ZERO;
    }
    let v = intent.clamp(Vec2::NEG_ONE, Vec2::ONE);
    if v.length_squared() > 1.0 { v.normalize_or_zero() } else { v }
}

/// Clamp a frame delta to `[0, MAX_FRAME_DT]`.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}
