//! Camera: maps the world onto the viewport
//!
//! The camera position is the top-left corner of the viewport in world
//! space. It trails the player with exponential smoothing and never shows
//! anything outside the world rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_LERP, VISIBILITY_PADDING};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the viewport in world space
    pub pos: Vec2,
    /// Viewport size
    pub size: Vec2,
}

impl Camera {
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: size.max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn world_to_viewport(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }

    #[inline]
    pub fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        viewport + self.pos
    }

    /// Render culling test; never consulted by the simulation
    pub fn is_visible(&self, pos: Vec2, radius: f32) -> bool {
        let bounds = radius + VISIBILITY_PADDING;
        pos.x + bounds > self.pos.x
            && pos.x - bounds < self.pos.x + self.size.x
            && pos.y + bounds > self.pos.y
            && pos.y - bounds < self.pos.y + self.size.y
    }

    /// Ease toward centering on `focus`, then clamp into the world
    pub fn follow(&mut self, focus: Vec2, world: Vec2) {
        let target = focus - self.size * 0.5;
        self.pos += (target - self.pos) * CAMERA_LERP;
        self.clamp(world);
    }

    /// Center on `focus` immediately (session start, restart)
    pub fn snap_to(&mut self, focus: Vec2, world: Vec2) {
        self.pos = focus - self.size * 0.5;
        self.clamp(world);
    }

    /// Viewport changed size (canvas resize)
    pub fn resize(&mut self, size: Vec2, world: Vec2) {
        let center = self.pos + self.size * 0.5;
        self.size = size.max(Vec2::ZERO);
        self.snap_to(center, world);
    }

    /// Viewport larger than the world pins that axis to 0
    fn clamp(&mut self, world: Vec2) {
        let max = (world - self.size).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(2000.0, 2000.0);

    #[test]
    fn test_world_to_viewport() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.pos = Vec2::new(100.0, 50.0);
        assert_eq!(cam.world_to_viewport(Vec2::new(150.0, 60.0)), Vec2::new(50.0, 10.0));
        assert_eq!(cam.viewport_to_world(Vec2::new(50.0, 10.0)), Vec2::new(150.0, 60.0));
    }

    #[test]
    fn test_visibility_padding() {
        let cam = Camera::new(Vec2::new(800.0, 600.0));
        assert!(cam.is_visible(Vec2::new(400.0, 300.0), 0.0));
        // Just outside the viewport but inside the padding
        assert!(cam.is_visible(Vec2::new(-40.0, 300.0), 0.0));
        assert!(!cam.is_visible(Vec2::new(-60.0, 300.0), 0.0));
        // A large radius pulls it back in
        assert!(cam.is_visible(Vec2::new(-60.0, 300.0), 20.0));
        assert!(!cam.is_visible(Vec2::new(400.0, 1000.0), 5.0));
    }

    #[test]
    fn test_follow_lerps_toward_target() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.pos = Vec2::new(500.0, 500.0);
        // Target top-left is (600, 700)
        cam.follow(Vec2::new(1000.0, 1000.0), WORLD);
        assert!((cam.pos.x - 510.0).abs() < 1e-3);
        assert!((cam.pos.y - 520.0).abs() < 1e-3);
    }

    #[test]
    fn test_follow_clamps_to_world() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        for _ in 0..200 {
            cam.follow(Vec2::new(10.0, 1990.0), WORLD);
        }
        assert_eq!(cam.pos.x, 0.0);
        assert_eq!(cam.pos.y, 1400.0);
    }

    #[test]
    fn test_snap_and_oversized_viewport() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.snap_to(Vec2::new(1000.0, 1000.0), WORLD);
        assert_eq!(cam.pos, Vec2::new(600.0, 700.0));

        cam.resize(Vec2::new(3000.0, 600.0), WORLD);
        assert_eq!(cam.pos.x, 0.0);
        assert_eq!(cam.pos.y, 700.0);
    }
}
