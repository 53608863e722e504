//! JSON configuration persisted under the user's home directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::schema::Config;

/// Default configuration file location, `~/.cellmate/config.json`.
pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cellmate")
        .join("config.json")
}

/// Read the configuration file, falling back to [`Config::default`] when it
/// is missing or unreadable. A bad file is reported through `tracing` and
/// never aborts the host session.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let path = config_path.map_or_else(get_config_path, Path::to_path_buf);

    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Config::default(),
        Err(e) => {
            warn!("could not read {}: {}; starting from defaults", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("ignoring malformed {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Write the configuration as pretty-printed JSON, creating parent
/// directories as needed. Persistence failures are logged, not returned.
pub fn save_config(config: &Config, config_path: Option<&Path>) {
    let path = config_path.map_or_else(get_config_path, Path::to_path_buf);

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let json = match serde_json::to_string_pretty(config) {
        Ok(j) => j,
        Err(e) => {
            warn!("could not serialize configuration: {}", e);
            return;
        }
    };
    if let Err(e) = fs::write(&path, json) {
        warn!("could not write {}: {}", path.display(), e);
    }
}

/// Overlay the OpenAI environment variables onto a loaded config.
///
/// `OPENAI_API_KEY` and `OPENAI_ORGANIZATION` take precedence over file
/// values when set and non-empty, so notebook deployments keep working
/// without a config file.
pub fn overlay_env(config: &mut Config) {
    if let Some(key) = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()) {
        config.api.api_key = key;
    }
    if let Some(org) = std::env::var("OPENAI_ORGANIZATION")
        .ok()
        .filter(|o| !o.is_empty())
    {
        config.api.organization = Some(org);
    }
}
