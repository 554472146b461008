use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::server::settings::ServiceSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("wrong_way_jokes");
    path.push("settings.json");
    path
}

/// Settings file (if any), then `.env`, then process environment.
pub fn load_settings() -> ServiceSettings {
    dotenvy::dotenv().ok();

    let mut settings = read_settings_file(&settings_path());
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

/// Missing or unreadable files fall back to defaults.
pub fn read_settings_file(path: &Path) -> ServiceSettings {
    let Ok(text) = fs::read_to_string(path) else {
        return ServiceSettings::default();
    };

    match serde_json::from_str(&text) {
        Ok(settings) => {
            info!(path = %path.display(), "loaded settings file");
            settings
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
            ServiceSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("wrong_way_jokes_missing_settings.json");
        let _ = fs::remove_file(&path);
        assert_eq!(read_settings_file(&path), ServiceSettings::default());
    }

    #[test]
    fn reads_and_rejects_files() {
        let dir = std::env::temp_dir();

        let good = dir.join(format!("wrong_way_jokes_good_{}.json", std::process::id()));
        fs::write(&good, r#"{"model": "tiny", "timeout_ms": 900}"#).unwrap();
        let settings = read_settings_file(&good);
        assert_eq!(settings.model, "tiny");
        assert_eq!(settings.timeout_ms, 900);

        let bad = dir.join(format!("wrong_way_jokes_bad_{}.json", std::process::id()));
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(read_settings_file(&bad), ServiceSettings::default());

        let _ = fs::remove_file(good);
        let _ = fs::remove_file(bad);
    }
}
