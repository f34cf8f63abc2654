//! Thin frame driver
//!
//! Supplies timing and input to [`tick`] and hands the resulting view to
//! whoever draws. Input handlers write to the mailbox; the driver reads it
//! exactly once per frame, before the tick starts.

use glam::Vec2;

use crate::platform::{FrameClock, InputMailbox};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

pub struct Driver {
    state: GameState,
    clock: FrameClock,
    mailbox: InputMailbox,
}

impl Driver {
    pub fn new(seed: u64, tuning: Tuning, viewport: Vec2) -> Self {
        Self::from_state(GameState::new(seed, tuning, viewport))
    }

    /// Resume from a restored session
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            clock: FrameClock::new(),
            mailbox: InputMailbox::new(),
        }
    }

    /// Handle for input collaborators
    pub fn mailbox(&self) -> InputMailbox {
        self.mailbox.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run one frame at wall-clock time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Snapshot<'_> {
        let dt = self.clock.advance(now_ms);
        self.step(dt)
    }

    /// Run one frame with an explicit `dt` (headless runs, tests)
    pub fn step(&mut self, dt: f32) -> Snapshot<'_> {
        let (movement, restart) = self.mailbox.take();
        tick(&mut self.state, &TickInput { movement, restart }, dt);
        self.state.snapshot()
    }

    /// Events raised by the most recent frame
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    /// Push changed preferences into the running session. The particle cap
    /// applies immediately; the star count takes effect on the next restart.
    pub fn apply_settings(&mut self, settings: &Settings) {
        settings.apply_to(&mut self.state.tuning);
        let cap = self.state.tuning.max_particles;
        let particles = &mut self.state.particles;
        if particles.len() > cap {
            particles.drain(..particles.len() - cap);
        }
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.state.set_viewport(size);
    }

    /// Timestamps restart from scratch (e.g. after the tab was hidden)
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }
}
