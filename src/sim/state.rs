//! Game state and core simulation types
//!
//! All state that must survive a snapshot/resume lives here, including the
//! RNG, so a restored session continues along the same trajectory.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::entity::{Body, Enemy, EntityKind, Particle, Player, Projectile, Star};
use crate::tuning::Tuning;

/// PCG stream selector for the star field
const STAR_STREAM: u64 = 0x5354_4152;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Full simulation every tick
    Running,
    /// Player died; only death effects keep fading
    Ended,
}

/// Discrete things that happened during a tick, for UI/audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ProjectileFired { pos: Vec2, vel: Vec2 },
    EnemySpawned { id: u32, pos: Vec2 },
    EnemyKilled { id: u32, pos: Vec2, score: u64 },
    PlayerHit { health: u32 },
    GameOver { final_score: u64 },
    Restarted,
}

/// Rate-limit timers, counted down in simulation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    /// Seconds until the player may fire again
    pub fire: f32,
    /// Seconds until the next enemy may spawn
    pub spawn: f32,
    /// Seconds left of the screen flash
    pub screen_flash: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the session was created with
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Score at the moment the session ended
    pub final_score: Option<u64>,
    /// Simulation ticks since the last (re)start
    pub time_ticks: u64,
    /// Simulated seconds since the last (re)start
    pub time_secs: f32,
    pub cooldowns: Cooldowns,
    pub player: Player,
    /// Enemies in spawn order; collision tie-breaks rely on this order
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub camera: Camera,
    /// Events raised by the last tick (not part of a snapshot)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new running session
    pub fn new(seed: u64, tuning: Tuning, viewport: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            camera: Camera::new(viewport),
            tuning,
            phase: GamePhase::Running,
            score: 0,
            final_score: None,
            time_ticks: 0,
            time_secs: 0.0,
            cooldowns: Cooldowns::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        log::info!("Session started (seed {})", seed);
        state
    }

    /// Reinitialize everything except the RNG stream, tuning and viewport
    pub fn restart(&mut self) {
        self.reset();
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted");
    }

    fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.final_score = None;
        self.time_ticks = 0;
        self.time_secs = 0.0;
        self.cooldowns = Cooldowns::default();
        self.player = Player::new(&self.tuning);
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.events.clear();
        self.next_id = 1;
        self.scatter_stars();
        self.camera.snap_to(self.player.body.pos, self.tuning.world_size);
    }

    /// The backdrop has its own stream keyed by the seed: every restart shows
    /// the same sky and the gameplay RNG is left untouched.
    fn scatter_stars(&mut self) {
        let world = self.tuning.world_size;
        let mut rng = Pcg32::new(self.seed, STAR_STREAM);
        self.stars.clear();
        for _ in 0..self.tuning.star_count {
            let pos = Vec2::new(rng.random::<f32>() * world.x, rng.random::<f32>() * world.y);
            let radius = rng.random::<f32>() * 1.5 + 0.5;
            self.stars.push(Star { body: Body::new(pos, radius) });
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Viewport changed size
    pub fn set_viewport(&mut self, size: Vec2) {
        self.camera.resize(size, self.tuning.world_size);
    }

    /// Screen-flash opacity in [0, 0.5]: rises and falls over the flash duration
    pub fn flash_intensity(&self) -> f32 {
        let duration = self.tuning.screen_flash_duration;
        if self.cooldowns.screen_flash <= 0.0 || duration <= 0.0 {
            return 0.0;
        }
        let t = (self.cooldowns.screen_flash / duration).clamp(0.0, 1.0);
        ((t * std::f32::consts::PI).sin() * 0.5).max(0.0)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            health: self.player.health,
            max_health: self.player.max_health,
            ended: self.phase == GamePhase::Ended,
            final_score: self.final_score,
            flash: self.flash_intensity(),
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: &self.player,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            particles: &self.particles,
            stars: &self.stars,
            camera: &self.camera,
            world: self.tuning.world_size,
            hud: self.hud(),
        }
    }

    /// Serialize the full session (entities, score, timers, RNG)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a session saved with [`GameState::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Values the UI layer shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
    pub ended: bool,
    pub final_score: Option<u64>,
    /// Screen-flash opacity
    pub flash: f32,
}

/// Borrowed view of everything needed to draw a frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub stars: &'a [Star],
    pub camera: &'a Camera,
    /// World extent, for the border
    pub world: Vec2,
    pub hud: Hud,
}

/// One culled entity with its full record, for kind-specific drawing
#[derive(Debug, Clone, Copy)]
pub enum Visible<'a> {
    Star(&'a Star),
    Particle(&'a Particle),
    Enemy(&'a Enemy),
    Projectile(&'a Projectile),
    Player(&'a Player),
}

impl<'a> Visible<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Visible::Star(_) => EntityKind::Star,
            Visible::Particle(_) => EntityKind::Particle,
            Visible::Enemy(_) => EntityKind::Enemy,
            Visible::Projectile(_) => EntityKind::Projectile,
            Visible::Player(_) => EntityKind::Player,
        }
    }

    pub fn body(&self) -> &'a Body {
        match *self {
            Visible::Star(s) => &s.body,
            Visible::Particle(p) => &p.body,
            Visible::Enemy(e) => &e.body,
            Visible::Projectile(p) => &p.body,
            Visible::Player(p) => &p.body,
        }
    }
}

impl<'a> Snapshot<'a> {
    /// Entities inside the camera view, back to front (stars, particles,
    /// enemies, projectiles, player). The player is omitted once the session
    /// has ended.
    pub fn visible_entities(&self) -> Vec<Visible<'a>> {
        let cam = self.camera;
        let stars = self.stars.iter().map(Visible::Star);
        let particles = self.particles.iter().map(Visible::Particle);
        let enemies = self.enemies.iter().map(Visible::Enemy);
        let projectiles = self.projectiles.iter().map(Visible::Projectile);
        let player = (!self.hud.ended).then_some(Visible::Player(self.player));

        stars
            .chain(particles)
            .chain(enemies)
            .chain(projectiles)
            .chain(player)
            .filter(|v| cam.is_visible(v.body().pos, v.body().radius))
            .collect()
    }

    /// Kind-tagged bodies in draw order
    pub fn visible(&self) -> Vec<(EntityKind, &'a Body)> {
        self.visible_entities().into_iter().map(|v| (v.kind(), v.body())).collect()
    }
}
