//! Game settings and preferences
//!
//! Persisted separately from the session in LocalStorage (web only).

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Next preset in the Low → Medium → High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Backdrop stars scattered across the world
    pub fn star_count(&self) -> u32 {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 400,
        }
    }

    /// Whether the background grid is drawn
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Red flash when the player is hit
    pub screen_flash: bool,
    /// Death bursts
    pub particles: bool,
    /// Star twinkle
    pub twinkle: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no flashes, no twinkle)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_flash: true,
            particles: true,
            twinkle: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset disables some effects for performance
        self.twinkle = preset != QualityPreset::Low;
    }

    /// In-game shortcuts: `F` toggles the FPS counter, `Q` cycles quality,
    /// `M` toggles reduced motion. Returns true if a setting changed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key.to_lowercase().as_str() {
            "f" => self.show_fps = !self.show_fps,
            "q" => self.apply_preset(self.quality.next()),
            "m" => self.reduced_motion = !self.reduced_motion,
            _ => return false,
        }
        log::info!(
            "Settings: quality {}, fps {}, reduced motion {}",
            self.quality.as_str(),
            self.show_fps,
            self.reduced_motion
        );
        true
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// Effective star twinkle (respects reduced_motion)
    pub fn effective_twinkle(&self) -> bool {
        self.twinkle && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles { 0 } else { self.quality.max_particles() }
    }

    /// Push quality-dependent limits into the gameplay tuning
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.max_particles = self.max_particles();
        tuning.star_count = self.quality.star_count();
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "swarm_survivor_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
