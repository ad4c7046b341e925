use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use gdl_engine::AtomicFileWriter;
use gdl_logging::{gdl_error, gdl_info, gdl_warn};
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = "settings.ron";

/// Application settings that survive restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Platform config directory, or the working directory when none is known.
    pub fn locate() -> Self {
        let dir = ProjectDirs::from("", "", "gdl")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(dir)
    }

    pub fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILENAME)
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load(&self) -> Settings {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Settings::default();
            }
            Err(err) => {
                gdl_warn!("Failed to read settings from {:?}: {}", path, err);
                return Settings::default();
            }
        };

        match ron::from_str(&content) {
            Ok(settings) => {
                gdl_info!("Loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                gdl_warn!("Failed to parse settings from {:?}: {}", path, err);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) {
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(settings, pretty) {
            Ok(text) => text,
            Err(err) => {
                gdl_error!("Failed to serialize settings: {}", err);
                return;
            }
        };

        let writer = AtomicFileWriter::new(self.dir.clone());
        if let Err(err) = writer.write(SETTINGS_FILENAME, &content) {
            gdl_error!("Failed to write settings to {:?}: {}", self.dir, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::in_dir(temp.path().join("absent"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn saved_output_dir_is_restored() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("gdl");
        let store = SettingsStore::in_dir(dir.clone());
        let settings = Settings {
            output_dir: Some(PathBuf::from("/srv/media")),
        };

        store.save(&settings);

        assert!(dir.join(SETTINGS_FILENAME).is_file());
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILENAME), "(output_dir: [[[").unwrap();
        let store = SettingsStore::in_dir(temp.path().to_path_buf());
        assert_eq!(store.load(), Settings::default());
    }
}
