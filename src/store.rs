use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use log::{info, debug, warn};
use crate::error::{NexError, Result};
use crate::model::LauncherEntity;

const DATA_FILE_NAME: &str = "launchers_data.json";

pub fn default_data_path() -> PathBuf {
    ProjectDirs::from("org", "nexlaunch", "nexlaunch")
        .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
}

/// JSON file holding the top-level launcher list.
#[derive(Debug, Clone)]
pub struct LauncherStore {
    path: PathBuf,
}

impl LauncherStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<LauncherEntity>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("LauncherStore: no data file at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(NexError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            debug!("LauncherStore: data file {:?} is empty", self.path);
            return Ok(Vec::new());
        }

        let items: Option<Vec<LauncherEntity>> = serde_json::from_str(&content)
            .map_err(|e| {
                warn!("LauncherStore: failed to parse {:?}: {}", self.path, e);
                NexError::DataCorrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
            })?;
        let items = items.unwrap_or_default();

        info!("LauncherStore: loaded {} top-level launchers", items.len());
        Ok(items)
    }

    pub fn save(&self, items: &[LauncherEntity]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| NexError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(items).map_err(|e| {
            NexError::io(&self.path, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;
        fs::write(&self.path, content).map_err(|e| NexError::io(&self.path, e))?;

        info!("LauncherStore: saved {} top-level launchers to {:?}", items.len(), self.path);
        Ok(())
    }

    pub fn delete_store(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("LauncherStore: deleted {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("LauncherStore: no data file to delete");
                Ok(())
            }
            Err(e) => Err(NexError::io(&self.path, e)),
        }
    }

    /// Moves an unreadable data file to `<file>.corrupt` so the next save cannot overwrite it.
    pub fn set_aside_corrupt(&self) -> Result<PathBuf> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        let backup = PathBuf::from(name);

        fs::rename(&self.path, &backup).map_err(|e| NexError::io(&self.path, e))?;
        warn!("LauncherStore: moved unreadable data to {:?}", backup);
        Ok(backup)
    }
}
