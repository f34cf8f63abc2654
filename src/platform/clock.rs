//! Frame timing from monotonic millisecond timestamps
//! (`requestAnimationFrame` on the web, `Instant` natively).

use crate::clamp_dt;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `[0, MAX_FRAME_DT]`.
    /// The first frame after a reset reports 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp_dt(dt)
    }

    /// Forget the previous timestamp (loop restarted, tab resumed)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
