//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep supplied by the caller
//! - Seeded RNG stored in the state
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod entity;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{ContactResult, knock_back, resolve_player_contact, resolve_projectile_hits};
pub use entity::{Body, Color, Enemy, EntityKind, Particle, Player, Projectile, Star};
pub use spawn::{auto_fire, death_burst, nearest_enemy, spawn_enemy};
pub use state::{Cooldowns, GameEvent, GamePhase, GameState, Hud, Snapshot, Visible};
pub use tick::{TickInput, tick};
