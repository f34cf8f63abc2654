//! Gameplay tuning
//!
//! Every balance number lives here so a snapshot carries the rules it was
//! played with. Keep engine constants (max dt, camera lerp) in `consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::WORLD_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World rectangle size in units
    pub world_size: Vec2,

    // === Player ===
    pub player_radius: f32,
    /// Units per second at full intent
    pub player_speed: f32,
    pub player_max_health: u32,

    // === Auto-fire ===
    /// Minimum seconds between shots
    pub fire_interval: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_damage: u32,
    /// How far past the world edge a projectile may travel before despawning
    pub projectile_despawn_margin: f32,

    // === Enemies ===
    /// Minimum seconds between spawns
    pub enemy_spawn_interval: f32,
    /// Distance outside the viewport where enemies appear
    pub enemy_spawn_padding: f32,
    pub enemy_radius: f32,
    pub enemy_speed: f32,
    pub enemy_speed_variance: f32,
    pub enemy_base_health: u32,
    pub enemy_health_variance: u32,
    /// Contact damage dealt to the player
    pub enemy_damage: u32,
    /// Extra gap kept between enemies by separation
    pub separation_buffer: f32,
    /// Fraction of the half-overlap applied per tick
    pub separation_damping: f32,
    /// Distance an enemy is shoved after hitting the player
    pub knockback_distance: f32,
    pub kill_score: u64,

    // === Effects ===
    pub hit_flash_duration: f32,
    /// Invincibility on top of the hit flash after the player is damaged
    pub invincibility_bonus: f32,
    pub screen_flash_duration: f32,
    pub death_particle_count: u32,
    pub particle_lifespan: f32,
    pub particle_speed: f32,
    /// Fraction of radius lost per second
    pub particle_shrink_rate: f32,
    pub particle_min_radius: f32,
    pub max_particles: usize,
    pub star_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,

            player_radius: 15.0,
            player_speed: 210.0,
            player_max_health: 100,

            fire_interval: 0.28,
            projectile_speed: 420.0,
            projectile_radius: 5.0,
            projectile_damage: 10,
            projectile_despawn_margin: 50.0,

            enemy_spawn_interval: 0.8,
            enemy_spawn_padding: 100.0,
            enemy_radius: 14.0,
            enemy_speed: 96.0,
            enemy_speed_variance: 18.0,
            enemy_base_health: 30,
            enemy_health_variance: 10,
            enemy_damage: 10,
            separation_buffer: 2.0,
            separation_damping: 0.8,
            knockback_distance: 25.0,
            kill_score: 10,

            hit_flash_duration: 0.1,
            invincibility_bonus: 0.4,
            screen_flash_duration: 0.15,
            death_particle_count: 15,
            particle_lifespan: 0.8,
            particle_speed: 80.0,
            particle_shrink_rate: 0.8,
            particle_min_radius: 0.3,
            max_particles: 500,
            star_count: 200,
        }
    }
}

impl Tuning {
    /// Seconds of invincibility granted when the player takes a hit
    pub fn player_invincibility(&self) -> f32 {
        self.hit_flash_duration + self.invincibility_bonus
    }

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!("Loaded tuning ({} stars, {} max particles)", tuning.star_count, tuning.max_particles);
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 300.0, "kill_score": 25 }"#).unwrap();
        assert_eq!(tuning.player_speed, 300.0);
        assert_eq!(tuning.kill_score, 25);
        assert_eq!(tuning.enemy_damage, Tuning::default().enemy_damage);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ player_speed: fast }").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_invincibility_window() {
        let tuning = Tuning::default();
        assert!((tuning.player_invincibility() - 0.5).abs() < 1e-6);
    }
}
