//! Per-tick integration of every moving entity
//!
//! All functions take an already clamped `dt` in seconds.

use glam::Vec2;

use super::entity::{Enemy, Particle, Player, Projectile};
use crate::sanitize_intent;
use crate::tuning::Tuning;

/// Move the player by the movement intent and count down invincibility
pub fn step_player(player: &mut Player, intent: Vec2, world: Vec2, dt: f32) {
    player.damage_timer = (player.damage_timer - dt).max(0.0);
    let dir = sanitize_intent(intent);
    player.body.pos += dir * player.speed * dt;
    player.body.clamp_to_world(world);
}

/// Chase the player, then push overlapping enemies apart
pub fn step_enemies(enemies: &mut [Enemy], target: Vec2, tuning: &Tuning, dt: f32) {
    for enemy in enemies.iter_mut() {
        enemy.hit_timer = (enemy.hit_timer - dt).max(0.0);
        let dir = (target - enemy.body.pos).normalize_or_zero();
        enemy.body.pos += dir * enemy.speed * dt;
        enemy.body.clamp_to_world(tuning.world_size);
    }
    separate(enemies, tuning.separation_buffer, tuning.separation_damping, tuning.world_size);
}

/// Pairwise separation, O(n²). Each overlapping pair is pushed apart by half
/// the overlap (times `damping`) along the line between their centers.
/// Coincident centers are split along +X.
pub fn separate(enemies: &mut [Enemy], buffer: f32, damping: f32, world: Vec2) {
    let n = enemies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (left, right) = enemies.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];

            let delta = b.body.pos - a.body.pos;
            let min_dist = a.body.radius + b.body.radius + buffer;
            let dist_sq = delta.length_squared();
            if dist_sq >= min_dist * min_dist {
                continue;
            }
            let dist = dist_sq.sqrt();
            let axis = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
            let push = axis * ((min_dist - dist) * 0.5 * damping);

            a.body.pos -= push;
            b.body.pos += push;
            a.body.clamp_to_world(world);
            b.body.clamp_to_world(world);
        }
    }
}

/// Advance projectiles and drop the ones that left the world
pub fn step_projectiles(projectiles: &mut Vec<Projectile>, world: Vec2, margin: f32, dt: f32) {
    for p in projectiles.iter_mut() {
        p.body.pos += p.vel * dt;
    }
    projectiles.retain(|p| p.in_bounds(world, margin));
}

/// Drift, shrink and expire particles
pub fn step_particles(particles: &mut Vec<Particle>, shrink_rate: f32, min_radius: f32, dt: f32) {
    let shrink = (1.0 - shrink_rate * dt).max(0.0);
    for p in particles.iter_mut() {
        p.body.pos += p.vel * dt;
        p.life -= dt;
        p.body.radius *= shrink;
    }
    particles.retain(|p| p.life > 0.0 && p.body.radius > min_radius);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Body, Color};

    const WORLD: Vec2 = Vec2::new(2000.0, 2000.0);

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy {
            id: 0,
            body: Body::new(pos, 14.0),
            speed: 100.0,
            health: 30,
            max_health: 30,
            hit_timer: 0.0,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let start = player.body.pos;
        step_player(&mut player, Vec2::new(1.0, 0.0), WORLD, 0.05);
        assert!((player.body.pos.x - (start.x + 210.0 * 0.05)).abs() < 1e-3);

        // Diagonal is not faster than straight
        let before = player.body.pos;
        step_player(&mut player, Vec2::new(1.0, 1.0), WORLD, 0.05);
        assert!((player.body.pos.distance(before) - 210.0 * 0.05).abs() < 1e-3);

        player.body.pos = Vec2::new(16.0, 1000.0);
        step_player(&mut player, Vec2::new(-1.0, 0.0), WORLD, 0.05);
        assert_eq!(player.body.pos.x, 15.0);
    }

    #[test]
    fn test_player_damage_timer_counts_down() {
        let mut player = Player::new(&Tuning::default());
        player.damage_timer = 0.04;
        step_player(&mut player, Vec2::ZERO, WORLD, 0.03);
        assert!(player.is_invincible());
        step_player(&mut player, Vec2::ZERO, WORLD, 0.03);
        assert_eq!(player.damage_timer, 0.0);
    }

    #[test]
    fn test_enemies_chase_target() {
        let tuning = Tuning::default();
        let mut enemies = vec![enemy_at(Vec2::new(500.0, 500.0))];
        enemies[0].hit_timer = 0.1;
        step_enemies(&mut enemies, Vec2::new(1000.0, 500.0), &tuning, 0.05);
        assert!((enemies[0].body.pos.x - 505.0).abs() < 1e-3);
        assert_eq!(enemies[0].body.pos.y, 500.0);
        assert!((enemies[0].hit_timer - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_separation_pushes_apart_symmetrically() {
        let mut enemies = vec![enemy_at(Vec2::new(100.0, 100.0)), enemy_at(Vec2::new(110.0, 100.0))];
        separate(&mut enemies, 2.0, 0.8, WORLD);
        // min 30, dist 10, overlap 20, each moves 20 * 0.5 * 0.8 = 8
        assert!((enemies[0].body.pos.x - 92.0).abs() < 1e-3);
        assert!((enemies[1].body.pos.x - 118.0).abs() < 1e-3);
        assert_eq!(enemies[0].body.pos.y, 100.0);
    }

    #[test]
    fn test_separation_handles_coincident_centers() {
        let mut enemies = vec![enemy_at(Vec2::new(300.0, 300.0)), enemy_at(Vec2::new(300.0, 300.0))];
        separate(&mut enemies, 2.0, 0.8, WORLD);
        assert!(enemies.iter().all(|e| e.body.pos.is_finite()));
        assert!(enemies[0].body.pos.x < enemies[1].body.pos.x);
    }

    #[test]
    fn test_separation_leaves_distant_enemies() {
        let mut enemies = vec![enemy_at(Vec2::new(100.0, 100.0)), enemy_at(Vec2::new(200.0, 100.0))];
        separate(&mut enemies, 2.0, 0.8, WORLD);
        assert_eq!(enemies[0].body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(enemies[1].body.pos, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_projectiles_despawn_outside_margin() {
        let mut projectiles = vec![
            Projectile { body: Body::new(Vec2::new(1000.0, 1000.0), 5.0), vel: Vec2::new(420.0, 0.0), color: Color::YELLOW },
            Projectile { body: Body::new(Vec2::new(2045.0, 1000.0), 5.0), vel: Vec2::new(420.0, 0.0), color: Color::YELLOW },
        ];
        step_projectiles(&mut projectiles, WORLD, 50.0, 0.05);
        assert_eq!(projectiles.len(), 1);
        assert!((projectiles[0].body.pos.x - 1021.0).abs() < 1e-3);
    }

    #[test]
    fn test_particles_shrink_and_expire() {
        let particle = |life, radius| Particle {
            body: Body::new(Vec2::ZERO, radius),
            vel: Vec2::new(80.0, 0.0),
            color: Color::WHITE,
            life,
            initial_life: 0.8,
        };
        let mut particles = vec![particle(0.8, 3.0), particle(0.01, 3.0), particle(0.8, 0.31)];
        step_particles(&mut particles, 0.8, 0.3, 0.05);
        assert_eq!(particles.len(), 1);
        let p = &particles[0];
        assert!((p.body.radius - 3.0 * 0.96).abs() < 1e-5);
        assert!((p.body.pos.x - 4.0).abs() < 1e-4);
        assert!((p.life - 0.75).abs() < 1e-6);
    }
}
