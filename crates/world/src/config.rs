//! Session tunables.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Upper bound on wood drops per chopped tree.
pub const MAX_WOOD_DROPS: u32 = 16;

/// Every tunable the session reads. Missing fields fall back to defaults, so a
/// partial TOML/JSON document is valid.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum distance (exclusive) at which an interactable can be focused.
    pub interaction_radius: f32,
    /// Walking speed in units per second.
    pub move_speed: f32,
    /// Degrees of rotation per unit of look input.
    pub look_speed: f32,
    /// Pitch clamp in degrees (applied symmetrically).
    pub pitch_limit: f32,
    /// Player spawn position.
    pub spawn_position: Vec3,
    /// Fishing attempt duration range in seconds, `[min, max)`.
    pub fishing_duration: (f32, f32),
    /// Success chance of a difficulty-0 spot.
    pub fishing_base_success: f32,
    /// Success chance lost per unit of difficulty.
    pub fishing_difficulty_penalty: f32,
    /// Wood drops per chopped tree, inclusive.
    pub wood_drops: (u32, u32),
    /// Maximum horizontal distance of a wood drop from its tree.
    pub wood_scatter_radius: f32,
    /// Number of lines the in-game log keeps.
    pub log_capacity: usize,
    /// Optional per-kind bound for the shared storage. `None` is unbounded.
    pub storage_capacity: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 3.5,
            move_speed: 6.0,
            look_speed: 0.2,
            pitch_limit: 85.0,
            spawn_position: Vec3::new(0.0, 1.8, 6.0),
            fishing_duration: (2.5, 5.0),
            fishing_base_success: 0.85,
            fishing_difficulty_penalty: 0.6,
            wood_drops: (2, 4),
            wood_scatter_radius: 1.2,
            log_capacity: 5,
            storage_capacity: None,
        }
    }
}

impl SessionConfig {
    /// Clamp values into ranges the session can work with.
    ///
    /// Swapped ranges are reordered and non-positive radii fall back to the
    /// default so a hand-edited file cannot disable interaction entirely.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.interaction_radius > 0.0) {
            tracing::warn!(
                radius = self.interaction_radius,
                "invalid interaction radius, using default"
            );
            self.interaction_radius = defaults.interaction_radius;
        }
        if self.fishing_duration.0 > self.fishing_duration.1 {
            self.fishing_duration = (self.fishing_duration.1, self.fishing_duration.0);
        }
        if self.wood_drops.0 > self.wood_drops.1 {
            self.wood_drops = (self.wood_drops.1, self.wood_drops.0);
        }
        if self.wood_drops.1 > MAX_WOOD_DROPS {
            tracing::warn!(
                max = self.wood_drops.1,
                cap = MAX_WOOD_DROPS,
                "wood drop count too large, capping"
            );
            self.wood_drops.0 = self.wood_drops.0.min(MAX_WOOD_DROPS);
            self.wood_drops.1 = MAX_WOOD_DROPS;
        }
        self.pitch_limit = self.pitch_limit.clamp(0.0, 89.9);
        self.log_capacity = self.log_capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{ "interaction_radius": 4.0 }"#).expect("parses");
        assert_eq!(cfg.interaction_radius, 4.0);
        assert_eq!(cfg.log_capacity, 5);
        assert_eq!(cfg.wood_drops, (2, 4));
    }

    #[test]
    fn sanitized_repairs_bad_values() {
        let cfg = SessionConfig {
            interaction_radius: -1.0,
            fishing_duration: (5.0, 2.5),
            wood_drops: (4, 2),
            log_capacity: 0,
            pitch_limit: 120.0,
            ..SessionConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.interaction_radius, 3.5);
        assert_eq!(cfg.fishing_duration, (2.5, 5.0));
        assert_eq!(cfg.wood_drops, (2, 4));
        assert_eq!(cfg.log_capacity, 1);
        assert!(cfg.pitch_limit < 90.0);
    }

    #[test]
    fn sanitized_caps_wood_drops() {
        let cfg = SessionConfig {
            wood_drops: (0, u32::MAX),
            ..SessionConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.wood_drops, (0, MAX_WOOD_DROPS));
    }
}
