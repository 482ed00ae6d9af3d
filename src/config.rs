use serde::Deserialize;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use anyhow::{Context, Result};
use std::fs;
use crate::startup::FolderLaunch;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Overrides the per-user data file location.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub auto_launch: bool,
}

fn default_true() -> bool { true }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            auto_launch: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StartupConfig {
    #[serde(default)]
    pub folder_launch: FolderLaunch,
}

/// Where a new item's name and target must be unique.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateScope {
    #[default]
    Folder,
    Global,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub duplicate_scope: DuplicateScope,
}

pub fn default_config_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "nexlaunch", "nexlaunch");
    if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        log::debug!("no config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {:?}", config_path))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("parsing {:?}", config_path))?;
    Ok(config)
}
