//! Collision detection and damage resolution
//!
//! Runs once per tick after every position has been integrated. All tests
//! are circle-vs-circle on squared distances. List order decides ties: a
//! projectile hits the first overlapping enemy in the enemy list, and the
//! player takes damage from at most one enemy per tick.

use glam::Vec2;

use super::entity::Body;
use super::spawn::death_burst;
use super::state::{GameEvent, GameState};

/// Outcome of the enemy-vs-player pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResult {
    /// Player was invincible or nothing touched
    None,
    /// Player took damage and survived
    Hit,
    /// Player took damage and died
    Killed,
}

/// Push `body` `distance` units away from `from`, then clamp into the world.
/// Coincident centers have no axis, so nothing moves.
pub fn knock_back(body: &mut Body, from: Vec2, distance: f32, world: Vec2) {
    let axis = (body.pos - from).normalize_or_zero();
    body.pos += axis * distance;
    body.clamp_to_world(world);
}

/// Projectiles against enemies. Returns the number of enemies killed.
pub fn resolve_projectile_hits(state: &mut GameState) -> u32 {
    let damage = state.tuning.projectile_damage;
    let flash = state.tuning.hit_flash_duration;
    let mut kills = 0;
    let mut i = 0;

    while i < state.projectiles.len() {
        let shot = state.projectiles[i].body;
        let Some(j) = state.enemies.iter().position(|e| shot.overlaps(&e.body)) else {
            i += 1;
            continue;
        };
        state.projectiles.remove(i);

        if state.enemies[j].take_hit(damage, flash) {
            let dead = state.enemies.remove(j);
            state.score += state.tuning.kill_score;
            death_burst(state, dead.body.pos, dead.color);
            state.events.push(GameEvent::EnemyKilled {
                id: dead.id,
                pos: dead.body.pos,
                score: state.score,
            });
            log::debug!("Enemy {} destroyed, score {}", dead.id, state.score);
            kills += 1;
        }
    }

    kills
}

/// Enemies against the player, at most one hit per tick
pub fn resolve_player_contact(state: &mut GameState) -> ContactResult {
    if state.player.is_invincible() {
        return ContactResult::None;
    }
    let player = state.player.body;
    let Some(j) = state.enemies.iter().position(|e| player.overlaps(&e.body)) else {
        return ContactResult::None;
    };

    let t = &state.tuning;
    let died = state.player.take_damage(t.enemy_damage);
    state.player.damage_timer = t.player_invincibility();
    state.cooldowns.screen_flash = t.screen_flash_duration;
    knock_back(&mut state.enemies[j].body, player.pos, t.knockback_distance, t.world_size);
    state.events.push(GameEvent::PlayerHit { health: state.player.health });

    if died { ContactResult::Killed } else { ContactResult::Hit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_VIEWPORT;
    use crate::sim::entity::{Color, Enemy, Projectile};
    use crate::tuning::Tuning;

    fn state_with_enemy(health: u32, offset: Vec2) -> GameState {
        let mut state = GameState::new(11, Tuning::default(), DEFAULT_VIEWPORT);
        let pos = state.player.body.pos + offset;
        state.enemies.push(Enemy {
            id: 1,
            body: Body::new(pos, 14.0),
            speed: 96.0,
            health,
            max_health: health,
            hit_timer: 0.0,
            color: Color::hsl(20.0, 90.0, 55.0),
        });
        state
    }

    fn shot_at(pos: Vec2) -> Projectile {
        Projectile { body: Body::new(pos, 5.0), vel: Vec2::X, color: Color::YELLOW }
    }

    #[test]
    fn test_three_hits_kill_a_thirty_hp_enemy() {
        let mut state = state_with_enemy(30, Vec2::new(200.0, 0.0));
        let target = state.enemies[0].body.pos;

        state.projectiles.push(shot_at(target));
        assert_eq!(resolve_projectile_hits(&mut state), 0);
        assert_eq!(state.enemies[0].health, 20);
        assert!(state.enemies[0].is_flashing());
        assert!(state.projectiles.is_empty());

        state.projectiles.push(shot_at(target));
        resolve_projectile_hits(&mut state);
        assert_eq!(state.enemies[0].health, 10);

        state.projectiles.push(shot_at(target));
        assert_eq!(resolve_projectile_hits(&mut state), 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.particles.len(), 15);
        assert!(state.particles.iter().all(|p| p.color == Color::hsl(20.0, 90.0, 55.0)));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_projectile_hits_only_first_enemy_in_list() {
        let mut state = state_with_enemy(30, Vec2::new(200.0, 0.0));
        let mut second = state.enemies[0].clone();
        second.id = 2;
        state.enemies.push(second);

        let target = state.enemies[0].body.pos;
        state.projectiles.push(shot_at(target));
        resolve_projectile_hits(&mut state);
        assert_eq!(state.enemies[0].health, 20);
        assert_eq!(state.enemies[1].health, 30);
    }

    #[test]
    fn test_dead_enemy_is_not_hit_twice() {
        let mut state = state_with_enemy(10, Vec2::new(200.0, 0.0));
        let target = state.enemies[0].body.pos;
        state.projectiles.push(shot_at(target));
        state.projectiles.push(shot_at(target));
        assert_eq!(resolve_projectile_hits(&mut state), 1);
        // The second shot had nothing left to hit
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_missing_projectile_survives() {
        let mut state = state_with_enemy(30, Vec2::new(200.0, 0.0));
        state.projectiles.push(shot_at(Vec2::new(10.0, 10.0)));
        resolve_projectile_hits(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.enemies[0].health, 30);
    }

    #[test]
    fn test_contact_damage_and_invincibility_window() {
        let mut state = state_with_enemy(30, Vec2::new(20.0, 0.0));
        assert_eq!(resolve_player_contact(&mut state), ContactResult::Hit);
        assert_eq!(state.player.health, 90);
        assert!(state.player.damage_timer > 0.0);
        assert!(state.flash_intensity() >= 0.0);
        assert!(state.cooldowns.screen_flash > 0.0);

        // Knocked away from the player: 20 + 25
        let dx = state.enemies[0].body.pos.x - state.player.body.pos.x;
        assert!((dx - 45.0).abs() < 1e-3);

        // Move it back on top of the player; still invincible
        state.enemies[0].body.pos = state.player.body.pos + Vec2::new(5.0, 0.0);
        assert_eq!(resolve_player_contact(&mut state), ContactResult::None);
        assert_eq!(state.player.health, 90);
    }

    #[test]
    fn test_only_one_enemy_damages_per_tick() {
        let mut state = state_with_enemy(30, Vec2::new(20.0, 0.0));
        let mut other = state.enemies[0].clone();
        other.body.pos = state.player.body.pos - Vec2::new(20.0, 0.0);
        state.enemies.push(other);

        resolve_player_contact(&mut state);
        assert_eq!(state.player.health, 90);
        // Only the first enemy was knocked back
        let second = state.enemies[1].body.pos;
        assert!((state.player.body.pos.x - second.x - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_lethal_contact() {
        let mut state = state_with_enemy(30, Vec2::new(20.0, 0.0));
        state.player.health = 5;
        assert_eq!(resolve_player_contact(&mut state), ContactResult::Killed);
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn test_knock_back_coincident_and_clamped() {
        let world = Vec2::new(2000.0, 2000.0);
        let mut body = Body::new(Vec2::new(100.0, 100.0), 14.0);
        knock_back(&mut body, Vec2::new(100.0, 100.0), 25.0, world);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));

        let mut body = Body::new(Vec2::new(20.0, 500.0), 14.0);
        knock_back(&mut body, Vec2::new(40.0, 500.0), 25.0, world);
        assert_eq!(body.pos, Vec2::new(14.0, 500.0));
    }
}
