use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::engine::storage::app_config_dir;
use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    app_config_dir().join("ui_settings.json")
}

pub fn load_settings() -> UiSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &UiSettings) {
    save_settings_to(&settings_path(), settings);
}

fn load_settings_from(path: &Path) -> UiSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<UiSettings>(&s).ok())
        .unwrap_or_default()
        .sanitized()
}

fn save_settings_to(path: &Path, settings: &UiSettings) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!(error = %e, path = %path.display(), "failed to write ui settings");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize ui settings"),
    }
}
