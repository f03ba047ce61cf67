//! Session settings
//!
//! Read from LocalStorage on the web. Native builds read an optional JSON
//! file named by `BUBBLE_PIT_SETTINGS`.

use serde::{Deserialize, Serialize};

use crate::audio::FloorCheck;
use crate::consts::{BODY_RADIUS, MAX_POOL_SIZE, POOL_SIZE};
use crate::sim::ShapeKind;

/// Pit and sound preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Pool ===
    /// Number of pooled bodies
    pub pool_size: usize,
    /// Sphere radius / box half side
    pub body_radius: f32,
    /// Body geometry (only spheres make sound)
    pub shape: ShapeKind,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Suppress all bubble sounds
    pub muted: bool,
    /// Where the inaudible-amplitude floor is tested
    pub floor_check: FloorCheck,

    /// Fixed RNG seed; a time-based seed is used when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pool_size: POOL_SIZE,
            body_radius: BODY_RADIUS,
            shape: ShapeKind::Sphere,

            master_volume: 1.0,
            muted: false,
            floor_check: FloorCheck::BeforeAttenuation,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        // Contacts are checked pairwise every frame
        self.pool_size = self.pool_size.clamp(1, MAX_POOL_SIZE);
        if self.body_radius.is_nan() || self.body_radius <= 0.0 {
            self.body_radius = BODY_RADIUS;
        }
        self
    }

    /// Configured seed, or `fallback` (usually the clock)
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bubble_pit_settings";

    /// Environment variable naming a native settings file
    #[allow(dead_code)]
    const SETTINGS_ENV: &'static str = "BUBBLE_PIT_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `BUBBLE_PIT_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_default(),
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.pool_size, 150);
        assert_eq!(s.shape, ShapeKind::Sphere);
        assert_eq!(s.floor_check, FloorCheck::BeforeAttenuation);
        assert_eq!(s.seed_or(7), 7);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"pool_size": 170, "shape": "Box", "seed": 9}"#).unwrap();
        assert_eq!(s.pool_size, 170);
        assert_eq!(s.shape, ShapeKind::Box);
        assert_eq!(s.seed_or(1), 9);
        assert_eq!(s.master_volume, 1.0);
        assert!(!s.muted);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            floor_check: FloorCheck::AfterAttenuation,
            muted: true,
            ..Default::default()
        };
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), Some(s));
    }

    #[test]
    fn test_sanitizes_and_rejects_garbage() {
        let s = Settings::from_json(r#"{"master_volume": 3.0, "body_radius": -1.0}"#).unwrap();
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.body_radius, BODY_RADIUS);
        assert!(Settings::from_json("not json").is_none());

        let huge = Settings::from_json(r#"{"pool_size": 100000000}"#).unwrap();
        assert_eq!(huge.pool_size, MAX_POOL_SIZE);
        let empty = Settings::from_json(r#"{"pool_size": 0}"#).unwrap();
        assert_eq!(empty.pool_size, 1);
    }
}
