// Centralized constants and runtime configuration for the canvas engine

use crate::model::{Position, Viewport};
use serde::{Deserialize, Serialize};

// Persistence
pub const SCHEMA_VERSION: &str = "1.0.0";
pub const STORAGE_KEY: &str = "true-valence-canvas-state";
pub const STORAGE_PROBE_KEY: &str = "__storage_test__";
pub const SAVE_DEBOUNCE_MS: u64 = 500;

// View transform
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;
pub const KEYBOARD_ZOOM_MIN: f64 = 0.25; // keyboard path only; the store floor still applies
pub const ZOOM_STEP: f64 = 0.1;
pub const PAN_STEP: f64 = 50.0;

// Nodes
pub const MAX_NAME_CHARS: usize = 50;
pub const SELF_NAME: &str = "You";
pub const SELF_POSITION: Position = Position { x: 400.0, y: 300.0 };
pub const NODE_RADIUS: f64 = 30.0;
pub const ARROW_PERP_OFFSET: f64 = 8.0;

// Radial layout
pub const LAYOUT_BASE_RADIUS: f64 = 150.0;
pub const LAYOUT_RADIUS_STEP: f64 = 20.0;
pub const LAYOUT_CROWD_THRESHOLD: usize = 8;
pub const LAYOUT_MARGIN: f64 = 120.0;
pub const FALLBACK_VIEWPORT: Viewport = Viewport { width: 800.0, height: 600.0 };

#[inline]
pub fn clamp_zoom(z: f64) -> f64 { z.max(ZOOM_MIN).min(ZOOM_MAX) }

#[inline]
pub fn clamp_keyboard_zoom(z: f64) -> f64 { z.max(KEYBOARD_ZOOM_MIN).min(ZOOM_MAX) }

/// Runtime-tunable settings. Every field is optional when deserialized;
/// missing ones take the defaults above.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub storage_key: String,
    pub debounce_ms: u64,
    pub fallback_viewport: Viewport,
    pub self_name: String,
    pub self_position: Position,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            storage_key: STORAGE_KEY.to_string(),
            debounce_ms: SAVE_DEBOUNCE_MS,
            fallback_viewport: FALLBACK_VIEWPORT,
            self_name: SELF_NAME.to_string(),
            self_position: SELF_POSITION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_zoom(0.1), ZOOM_MIN);
        assert_eq!(clamp_zoom(3.0), ZOOM_MAX);
        assert_eq!(clamp_zoom(1.3), 1.3);
        assert_eq!(clamp_zoom(f64::NAN), ZOOM_MIN);
        assert_eq!(clamp_keyboard_zoom(0.3), 0.3);
        assert_eq!(clamp_keyboard_zoom(0.1), KEYBOARD_ZOOM_MIN);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: CanvasConfig = serde_json::from_str(r#"{"debounceMs": 50}"#).unwrap();
        assert_eq!(cfg.debounce_ms, 50);
        assert_eq!(cfg.storage_key, STORAGE_KEY);
        assert_eq!(cfg.fallback_viewport, FALLBACK_VIEWPORT);
    }
}
