//! Session controller: one simulation tick
//!
//! Order within a running tick:
//! 1. screen-flash decay
//! 2. player movement, auto-fire, enemy spawn
//! 3. enemy chase + separation, projectile and particle integration
//! 4. collision resolution (may end the session)
//! 5. camera follow

use glam::Vec2;

use super::collision::{ContactResult, resolve_player_contact, resolve_projectile_hits};
use super::motion::{step_enemies, step_particles, step_player, step_projectiles};
use super::spawn::{auto_fire, spawn_enemy};
use super::state::{GameEvent, GamePhase, GameState};
use crate::clamp_dt;

/// Input sampled once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Movement intent, each axis in [-1, 1]
    pub movement: Vec2,
    /// Restart edge; applied before anything else in the tick
    pub restart: bool,
}

/// Advance the game state by `dt` seconds (clamped to `MAX_FRAME_DT`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.restart {
        state.restart();
    }

    let dt = clamp_dt(dt);
    state.cooldowns.screen_flash = (state.cooldowns.screen_flash - dt).max(0.0);

    let t = &state.tuning;
    let (world, margin, shrink, min_radius) =
        (t.world_size, t.projectile_despawn_margin, t.particle_shrink_rate, t.particle_min_radius);

    match state.phase {
        GamePhase::Running => {
            state.time_ticks += 1;
            state.time_secs += dt;
            state.cooldowns.fire = (state.cooldowns.fire - dt).max(0.0);
            state.cooldowns.spawn = (state.cooldowns.spawn - dt).max(0.0);

            step_player(&mut state.player, input.movement, world, dt);
            auto_fire(state);
            spawn_enemy(state);
            step_enemies(&mut state.enemies, state.player.body.pos, &state.tuning, dt);
            step_projectiles(&mut state.projectiles, world, margin, dt);
            step_particles(&mut state.particles, shrink, min_radius, dt);

            resolve_projectile_hits(state);
            if resolve_player_contact(state) == ContactResult::Killed {
                end_session(state);
            }

            state.camera.follow(state.player.body.pos, world);
        }
        GamePhase::Ended => {
            // Let the death effects finish fading
            step_particles(&mut state.particles, shrink, min_radius, dt);
        }
    }
}

fn end_session(state: &mut GameState) {
    state.phase = GamePhase::Ended;
    state.final_score = Some(state.score);
    state.events.push(GameEvent::GameOver { final_score: state.score });
    log::info!(
        "Game over: score {} after {:.1}s ({} ticks)",
        state.score,
        state.time_secs,
        state.time_ticks
    );
}
