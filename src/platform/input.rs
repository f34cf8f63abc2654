//! Input capture: virtual joystick, keyboard fallback, and the mailbox the
//! driver samples once per tick.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use glam::Vec2;

use crate::sanitize_intent;

/// Joystick radius in CSS pixels
pub const JOYSTICK_RADIUS: f32 = 60.0;
/// Handle travel below this is ignored
pub const JOYSTICK_DEAD_ZONE: f32 = 5.0;

/// Floating touch joystick. A touch in the lower half of the canvas plants
/// the base; dragging the same touch moves the handle.
#[derive(Debug, Clone, Default)]
pub struct Joystick {
    touch_id: Option<i32>,
    base: Vec2,
    /// Handle offset from the base, clamped to the radius
    handle: Vec2,
    intent: Vec2,
}

impl Joystick {
    pub fn is_active(&self) -> bool {
        self.touch_id.is_some()
    }

    /// Base position (canvas pixels), for drawing
    pub fn base(&self) -> Vec2 {
        self.base
    }

    /// Handle offset from the base, for drawing
    pub fn handle(&self) -> Vec2 {
        self.handle
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    /// Touch started at `pos` (canvas pixels). Returns true if it took control.
    pub fn begin(&mut self, touch_id: i32, pos: Vec2, canvas_height: f32) -> bool {
        if pos.y < canvas_height * 0.5 {
            return false;
        }
        self.touch_id = Some(touch_id);
        self.base = pos;
        self.handle = Vec2::ZERO;
        self.intent = Vec2::ZERO;
        true
    }

    /// Touch moved; ignored unless it is the controlling touch
    pub fn drag(&mut self, touch_id: i32, pos: Vec2) {
        if self.touch_id != Some(touch_id) {
            return;
        }
        let delta = pos - self.base;
        let distance = delta.length();
        self.handle = delta.clamp_length_max(JOYSTICK_RADIUS);
        self.intent = if distance > JOYSTICK_DEAD_ZONE {
            self.handle / JOYSTICK_RADIUS
        } else {
            Vec2::ZERO
        };
    }

    /// Touch ended or was cancelled
    pub fn end(&mut self, touch_id: i32) {
        if self.touch_id == Some(touch_id) {
            self.release();
        }
    }

    /// Drop control unconditionally (game over, restart)
    pub fn release(&mut self) {
        *self = Self::default();
    }
}

/// Keys currently held, lowercased `KeyboardEvent.key` values
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// WASD / arrow keys as an intent, normalized on diagonals
    pub fn intent(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.any(&["w", "arrowup"]) {
            v.y -= 1.0;
        }
        if self.any(&["s", "arrowdown"]) {
            v.y += 1.0;
        }
        if self.any(&["a", "arrowleft"]) {
            v.x -= 1.0;
        }
        if self.any(&["d", "arrowright"]) {
            v.x += 1.0;
        }
        sanitize_intent(v)
    }
}

/// Combined intent: an active joystick overrides the keyboard
pub fn combined_intent(joystick: &Joystick, keys: &KeyState) -> Vec2 {
    if joystick.is_active() { joystick.intent() } else { keys.intent() }
}

/// Single-slot mailbox between input handlers and the driver. The intent
/// slot keeps only the latest value; restart is a latched edge that is
/// consumed by exactly one `take`.
#[derive(Debug, Clone, Default)]
pub struct InputMailbox {
    intent: Rc<Cell<Vec2>>,
    restart: Rc<Cell<bool>>,
}

impl InputMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_intent(&self, intent: Vec2) {
        self.intent.set(sanitize_intent(intent));
    }

    pub fn request_restart(&self) {
        self.restart.set(true);
    }

    /// Latest intent plus the pending restart edge (which is cleared)
    pub fn take(&self) -> (Vec2, bool) {
        (self.intent.get(), self.restart.replace(false))
    }
}
