//! Entity records
//!
//! Every entity embeds a [`Body`] (position + radius). Kind-specific data
//! sits next to it; rendering dispatches on [`EntityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_world;
use crate::tuning::Tuning;

/// Explicit entity kind tag for render dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Star,
    Particle,
    Enemy,
    Projectile,
    Player,
}

/// Shared circle shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }

    /// Strict circle-vs-circle overlap (touching does not count)
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        let sum = self.radius + other.radius;
        self.pos.distance_squared(other.pos) < sum * sum
    }

    #[inline]
    pub fn clamp_to_world(&mut self, world: Vec2) {
        self.pos = clamp_to_world(self.pos, self.radius, world);
    }
}

/// HSL color, formatted as CSS by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Hue in degrees
    pub h: f32,
    /// Saturation, percent
    pub s: f32,
    /// Lightness, percent
    pub l: f32,
}

impl Color {
    pub const CYAN: Color = Color::hsl(180.0, 100.0, 50.0);
    pub const YELLOW: Color = Color::hsl(60.0, 100.0, 50.0);
    pub const WHITE: Color = Color::hsl(0.0, 0.0, 100.0);

    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Health-bar color: red at empty, green at full
    pub fn health(ratio: f32) -> Self {
        Self::hsl(ratio.clamp(0.0, 1.0) * 120.0, 80.0, 50.0)
    }

    pub fn css(&self) -> String {
        format!("hsl({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Units per second
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    /// Seconds of invincibility left
    pub damage_timer: f32,
    pub color: Color,
}

impl Player {
    /// A fresh player in the middle of the world
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body: Body::new(tuning.world_size * 0.5, tuning.player_radius),
            speed: tuning.player_speed,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            damage_timer: 0.0,
            color: Color::CYAN,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.damage_timer > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Apply damage, returns true if this hit killed the player
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    /// Seconds of hit-flash left
    pub hit_timer: f32,
    pub color: Color,
}

impl Enemy {
    /// Hit-flash active; the renderer hides the eye while flashing
    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.hit_timer > 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Unit vector from this enemy toward `target` (zero if coincident)
    pub fn facing(&self, target: Vec2) -> Vec2 {
        (target - self.body.pos).normalize_or_zero()
    }

    /// Apply damage and start the hit flash, returns true if this killed it
    pub fn take_hit(&mut self, damage: u32, flash: f32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.hit_timer = flash;
        self.health == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    /// Units per second
    pub vel: Vec2,
    pub color: Color,
}

impl Projectile {
    /// True while inside the world rectangle grown by `margin` on every side
    pub fn in_bounds(&self, world: Vec2, margin: f32) -> bool {
        let p = self.body.pos;
        p.x > -margin && p.x < world.x + margin && p.y > -margin && p.y < world.y + margin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub vel: Vec2,
    pub color: Color,
    /// Seconds left
    pub life: f32,
    pub initial_life: f32,
}

impl Particle {
    /// Opacity for rendering, 1 at birth and 0 when expired
    pub fn fade(&self) -> f32 {
        if self.initial_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.initial_life).clamp(0.0, 1.0)
    }
}

/// Backdrop decoration, never simulated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub body: Body,
}
