//! Registering NexLaunch itself to start with the user session.
//!
//! - Linux/BSD: an XDG autostart `.desktop` entry
//! - Other platforms: unsupported, always reports "not registered"

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use log::{debug, info};

const APP_NAME: &str = "NexLaunch";
const ENTRY_FILE: &str = "nexlaunch.desktop";

pub trait StartupRegistration {
    fn is_registered(&self) -> bool;
    fn register(&self, executable: &Path) -> Result<()>;
    fn unregister(&self) -> Result<()>;
}

pub struct XdgAutostart {
    dir: PathBuf,
}

impl XdgAutostart {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn for_user() -> Option<Self> {
        BaseDirs::new().map(|dirs| Self::new(dirs.config_dir().join("autostart")))
    }

    fn entry_path(&self) -> PathBuf {
        self.dir.join(ENTRY_FILE)
    }
}

fn desktop_entry(executable: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={}\n\
         Comment=Run startup launchers\n\
         Exec=\"{}\" run\n\
         Terminal=false\n\
         X-GNOME-Autostart-enabled=true\n",
        APP_NAME,
        executable.display()
    )
}

impl StartupRegistration for XdgAutostart {
    fn is_registered(&self) -> bool {
        self.entry_path().is_file()
    }

    fn register(&self, executable: &Path) -> Result<()> {
        if self.is_registered() {
            debug!("XdgAutostart: already registered");
            return Ok(());
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {:?}", self.dir))?;
        let path = self.entry_path();
        fs::write(&path, desktop_entry(executable))
            .with_context(|| format!("writing {:?}", path))?;
        info!("XdgAutostart: registered {:?}", path);
        Ok(())
    }

    fn unregister(&self) -> Result<()> {
        let path = self.entry_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("XdgAutostart: removed {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {:?}", path)),
        }
    }
}

pub struct Unsupported;

impl StartupRegistration for Unsupported {
    fn is_registered(&self) -> bool {
        false
    }

    fn register(&self, _executable: &Path) -> Result<()> {
        bail!("startup registration is not supported on {}", std::env::consts::OS)
    }

    fn unregister(&self) -> Result<()> {
        Ok(())
    }
}

pub fn system() -> Box<dyn StartupRegistration> {
    if cfg!(all(unix, not(target_os = "macos"))) {
        if let Some(xdg) = XdgAutostart::for_user() {
            return Box::new(xdg);
        }
    }
    Box::new(Unsupported)
}
