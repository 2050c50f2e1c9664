//! Persistent gallery settings.
//!
//! Stored as pretty JSON. Every field has a default, so a partial file (or
//! one written by an older build) still loads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use glimmer::Knobs;

fn default_seed() -> u64 {
    0x5EED
}

fn default_window_size() -> [f32; 2] {
    [1200.0, 800.0]
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GallerySettings {
    /// Registry index of the animation shown on start.
    #[serde(default)]
    pub selected: usize,
    #[serde(default)]
    pub knobs: Knobs,
    /// Base seed for every session's random stream.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_window_size")]
    pub window_size: [f32; 2],
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            selected: 0,
            knobs: Knobs::default(),
            seed: default_seed(),
            window_size: default_window_size(),
        }
    }
}

impl GallerySettings {
    /// Save the settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let settings: GallerySettings = serde_json::from_str(&json)?;
        Ok(settings)
    }

    /// Clamp knobs into range and the selection into a registry of `len` entries.
    pub fn sanitized(mut self, len: usize) -> Self {
        self.knobs = self.knobs.clamped();
        if self.selected >= len {
            self.selected = 0;
        }
        if !(self.window_size[0] > 0.0 && self.window_size[1] > 0.0) {
            self.window_size = default_window_size();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: GallerySettings = serde_json::from_str(r#"{ "selected": 3 }"#).unwrap();
        assert_eq!(settings.selected, 3);
        assert_eq!(settings.knobs, Knobs::default());
        assert_eq!(settings.seed, 0x5EED);
    }

    #[test]
    fn test_partial_knobs_use_defaults() {
        let settings: GallerySettings = serde_json::from_str(r#"{ "knobs": { "speed": 2.5 } }"#).unwrap();
        assert_eq!(settings.knobs, Knobs::new(2.5, 1.0, 0.0));
    }

    #[test]
    fn test_sanitized() {
        let settings = GallerySettings {
            selected: 99,
            knobs: Knobs::new(10.0, 0.0, 400.0),
            window_size: [0.0, 600.0],
            ..Default::default()
        }
        .sanitized(25);
        assert_eq!(settings.selected, 0);
        assert_eq!(settings.knobs, Knobs::new(3.0, 0.3, 360.0));
        assert_eq!(settings.window_size, [1200.0, 800.0]);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("glimmer-settings-{}.json", std::process::id()));
        let settings = GallerySettings { selected: 7, seed: 42, ..Default::default() };
        settings.save(&path).unwrap();
        let loaded = GallerySettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
