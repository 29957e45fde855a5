//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the score table. Missing keys take
//! their defaults, so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BULLET_SPEED, DEFAULT_HAZARD_COUNT};
use crate::persistence::PersistenceError;
use crate::sim::Weapon;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cannon muzzle speed
    pub bullet_speed: i32,
    /// Weapon selected when a session is built
    pub weapon: Weapon,
    /// Number of decorative hazards on the field
    pub hazard_count: usize,
    /// Fixed RNG seed (random per run when unset)
    pub seed: Option<u64>,
    /// Where finished sessions are stored
    pub scores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bullet_speed: DEFAULT_BULLET_SPEED as i32,
            weapon: Weapon::Cannon,
            hazard_count: DEFAULT_HAZARD_COUNT,
            seed: None,
            scores_path: PathBuf::from("scores.json"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "target_range_settings_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(&temp_path("missing"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bullet_speed, 300);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "{ bullet_speed: ").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "weapon": "Laser", "seed": 42 }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.weapon, Weapon::Laser);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.hazard_count, DEFAULT_HAZARD_COUNT);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let settings = Settings {
            bullet_speed: 420,
            hazard_count: 3,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }
}
