use lettuce_park_world::SessionConfig;
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_SESSION_CONFIG_PATH: &str = "config/session.toml";

/// Load session tunables from `path` (or the default path), falling back to
/// defaults on errors.
pub fn load_session_config(path: Option<&Path>) -> SessionConfig {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SESSION_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(contents) => parse_session_config(&contents).unwrap_or_else(|err| {
            warn!("Failed to parse {}: {err}. Using defaults", path.display());
            SessionConfig::default()
        }),
        Err(err) => {
            if explicit || err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            } else {
                warn!(
                    "Session config not found at {}. Using defaults",
                    path.display()
                );
            }
            SessionConfig::default()
        }
    }
}

pub fn parse_session_config(contents: &str) -> Result<SessionConfig, toml::de::Error> {
    toml::from_str::<SessionConfig>(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = parse_session_config(
            r#"
            interaction_radius = 4.0
            wood_drops = [3, 3]
            spawn_position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.interaction_radius, 4.0);
        assert_eq!(cfg.wood_drops, (3, 3));
        assert_eq!(cfg.spawn_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cfg.move_speed, SessionConfig::default().move_speed);
        assert_eq!(cfg.storage_capacity, None);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_session_config("interaction_radius = \"far\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("lettuce-park-no-such-config.toml");
        let cfg = load_session_config(Some(&path));
        assert_eq!(cfg, SessionConfig::default());
    }
}
