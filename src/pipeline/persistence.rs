// read on startup, written only on request (--write-config); sequencer state is never saved
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::pipeline::config::EngineConfig;

const STEPCV_DIR: &str = ".stepcv";
const CONFIG_FILE: &str = "config.json";

// <project_dir>/.stepcv/config.json
pub fn config_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(STEPCV_DIR).join(CONFIG_FILE)
}

// A missing file is not an error; a broken one is.
pub fn read_config(project_dir: &Path) -> anyhow::Result<Option<EngineConfig>> {
    let path = config_file_path(project_dir);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(Some(config))
}

// Startup flavour of read_config: anything wrong falls back to defaults.
pub fn load_config(project_dir: &Path) -> EngineConfig {
    match read_config(project_dir) {
        Ok(Some(config)) => {
            log::info!("loaded config from {}", config_file_path(project_dir).display());
            config
        }
        Ok(None) => {
            log::info!("no config file, using defaults");
            EngineConfig::default()
        }
        Err(e) => {
            log::warn!("{e:#}; using defaults");
            EngineConfig::default()
        }
    }
}

// Save the config to disk, making the directory if it doesn't exist already
pub fn save_config(project_dir: &Path, config: &EngineConfig) -> anyhow::Result<PathBuf> {
    let path = config_file_path(project_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .stepcv/ if needed
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
