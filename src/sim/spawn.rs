//! Spawning: enemies at the edge of view, player auto-fire, death bursts

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, Color, Enemy, Particle, Projectile};
use super::state::{GameEvent, GameState};
use crate::clamp_to_world;

/// Index of the enemy closest to `from` by squared distance.
/// Ties go to the enemy earlier in the list.
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, enemy) in enemies.iter().enumerate() {
        let d = from.distance_squared(enemy.body.pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Point on the perimeter of the rectangle `min..max`, `t` in [0, 1)
fn perimeter_point(min: Vec2, max: Vec2, t: f32) -> Vec2 {
    let size = max - min;
    let mut d = t * 2.0 * (size.x + size.y);
    if d < size.x {
        return Vec2::new(min.x + d, min.y);
    }
    d -= size.x;
    if d < size.y {
        return Vec2::new(max.x, min.y + d);
    }
    d -= size.y;
    if d < size.x {
        return Vec2::new(max.x - d, max.y);
    }
    d -= size.x;
    Vec2::new(min.x, (max.y - d).max(min.y))
}

/// Spawn one enemy if the spawn cooldown has elapsed
pub fn spawn_enemy(state: &mut GameState) {
    if state.cooldowns.spawn > 0.0 {
        return;
    }
    let t = &state.tuning;
    let cam = state.camera;
    let margin = Vec2::splat(t.enemy_spawn_padding + t.enemy_radius);
    let edge = perimeter_point(cam.pos - margin, cam.pos + cam.size + margin, state.rng.random::<f32>());
    let pos = clamp_to_world(edge, t.enemy_radius, t.world_size);

    let variance = t.enemy_health_variance as i64;
    let health = (t.enemy_base_health as i64 + state.rng.random_range(-variance..=variance)).max(1) as u32;
    let speed_var = t.enemy_speed_variance;
    let speed = if speed_var > 0.0 {
        t.enemy_speed + state.rng.random_range(-speed_var..speed_var)
    } else {
        t.enemy_speed
    };
    let color = Color::hsl(
        state.rng.random_range(0.0..60.0),
        state.rng.random_range(80.0..100.0),
        state.rng.random_range(50.0..60.0),
    );
    let radius = t.enemy_radius;
    let interval = t.enemy_spawn_interval;

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        body: Body::new(pos, radius),
        speed,
        health,
        max_health: health,
        hit_timer: 0.0,
        color,
    });
    state.cooldowns.spawn = interval;
    state.events.push(GameEvent::EnemySpawned { id, pos });
    log::debug!("Spawned enemy {} at ({:.0}, {:.0}) hp={}", id, pos.x, pos.y, health);
}

/// Fire at the nearest enemy if the fire cooldown has elapsed.
/// Without enemies nothing happens and the cooldown stays ready.
pub fn auto_fire(state: &mut GameState) {
    if state.cooldowns.fire > 0.0 {
        return;
    }
    let origin = state.player.body.pos;
    let Some(target) = nearest_enemy(&state.enemies, origin) else {
        return;
    };
    let dir = (state.enemies[target].body.pos - origin).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let vel = dir * state.tuning.projectile_speed;
    state.projectiles.push(Projectile {
        body: Body::new(origin, state.tuning.projectile_radius),
        vel,
        color: Color::YELLOW,
    });
    state.cooldowns.fire = state.tuning.fire_interval;
    state.events.push(GameEvent::ProjectileFired { pos: origin, vel });
}

/// Particle burst where an enemy died
pub fn death_burst(state: &mut GameState, at: Vec2, color: Color) {
    let t = &state.tuning;
    let (count, lifespan, speed, cap) =
        (t.death_particle_count, t.particle_lifespan, t.particle_speed, t.max_particles);
    let rng = &mut state.rng;

    for _ in 0..count {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = speed * (0.5 + rng.random::<f32>() * 0.8);
        let offset = Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        let life = lifespan * (0.7 + rng.random::<f32>() * 0.6);
        state.particles.push(Particle {
            body: Body::new(at + offset, rng.random_range(1.5..4.5)),
            vel: Vec2::from_angle(angle) * speed,
            color,
            life,
            initial_life: life,
        });
    }

    // Drop the oldest particles past the cap
    if state.particles.len() > cap {
        let excess = state.particles.len() - cap;
        state.particles.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_VIEWPORT;
    use crate::tuning::Tuning;

    fn enemy_at(id: u32, pos: Vec2) -> Enemy {
        Enemy {
            id,
            body: Body::new(pos, 14.0),
            speed: 96.0,
            health: 30,
            max_health: 30,
            hit_timer: 0.0,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_nearest_enemy_ties_break_by_order() {
        let enemies = vec![
            enemy_at(1, Vec2::new(10.0, 0.0)),
            enemy_at(2, Vec2::new(-10.0, 0.0)),
            enemy_at(3, Vec2::new(50.0, 0.0)),
        ];
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO), Some(0));
        assert_eq!(nearest_enemy(&enemies, Vec2::new(40.0, 0.0)), Some(2));
        assert_eq!(nearest_enemy(&[], Vec2::ZERO), None);
    }

    #[test]
    fn test_perimeter_point_covers_all_edges() {
        let (min, max) = (Vec2::ZERO, Vec2::new(100.0, 50.0));
        assert!(perimeter_point(min, max, 0.0).abs_diff_eq(Vec2::new(0.0, 0.0), 1e-3));
        // Perimeter 300: top 0..100, right 100..150, bottom 150..250, left 250..300
        assert!(perimeter_point(min, max, 50.0 / 300.0).abs_diff_eq(Vec2::new(50.0, 0.0), 1e-3));
        assert!(perimeter_point(min, max, 125.0 / 300.0).abs_diff_eq(Vec2::new(100.0, 25.0), 1e-3));
        assert!(perimeter_point(min, max, 200.0 / 300.0).abs_diff_eq(Vec2::new(50.0, 50.0), 1e-3));
        assert!(perimeter_point(min, max, 275.0 / 300.0).abs_diff_eq(Vec2::new(0.0, 25.0), 1e-3));
    }

    #[test]
    fn test_spawn_respects_cooldown_and_bounds() {
        let mut state = GameState::new(3, Tuning::default(), DEFAULT_VIEWPORT);
        for _ in 0..50 {
            state.cooldowns.spawn = 0.0;
            spawn_enemy(&mut state);
        }
        assert_eq!(state.enemies.len(), 50);
        spawn_enemy(&mut state);
        assert_eq!(state.enemies.len(), 50, "cooldown should block the spawn");

        for enemy in &state.enemies {
            let p = enemy.body.pos;
            assert!(p.x >= 14.0 && p.x <= 1986.0 && p.y >= 14.0 && p.y <= 1986.0);
            assert!((20..=40).contains(&enemy.health));
            assert!(enemy.speed >= 78.0 && enemy.speed < 114.0);
            assert!(enemy.color.h < 60.0);
            // Camera is centered, so spawns land off screen without clamping
            assert!(!state.camera.is_visible(p, 0.0));
        }
    }

    #[test]
    fn test_auto_fire_needs_a_target() {
        let mut state = GameState::new(3, Tuning::default(), DEFAULT_VIEWPORT);
        auto_fire(&mut state);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.cooldowns.fire, 0.0);

        let target = state.player.body.pos + Vec2::new(0.0, -200.0);
        state.enemies.push(enemy_at(1, target));
        auto_fire(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        let vel = state.projectiles[0].vel;
        assert!(vel.x.abs() < 1e-3);
        assert!((vel.y + 420.0).abs() < 1e-3);
        assert!(state.cooldowns.fire > 0.0);

        auto_fire(&mut state);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_death_burst_and_cap() {
        let mut tuning = Tuning::default();
        tuning.max_particles = 20;
        let mut state = GameState::new(3, tuning, DEFAULT_VIEWPORT);

        death_burst(&mut state, Vec2::new(500.0, 500.0), Color::WHITE);
        assert_eq!(state.particles.len(), 15);
        for p in &state.particles {
            assert!(p.body.radius >= 1.5 && p.body.radius < 4.5);
            assert!(p.life >= 0.8 * 0.7 - 1e-5 && p.life <= 0.8 * 1.3 + 1e-5);
            assert_eq!(p.life, p.initial_life);
            assert!(p.body.pos.distance(Vec2::new(500.0, 500.0)) < 7.1);
        }

        death_burst(&mut state, Vec2::new(100.0, 100.0), Color::YELLOW);
        assert_eq!(state.particles.len(), 20);
        // Newest burst is fully kept
        assert!(state.particles.iter().rev().take(15).all(|p| p.color == Color::YELLOW));
    }
}
