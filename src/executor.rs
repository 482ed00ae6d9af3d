use std::path::{Path, PathBuf};
use directories::BaseDirs;
use log::{info, warn};
use url::Url;
use crate::error::LaunchError;

/// Something a target resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(Url),
    Path(PathBuf),
}

/// Hands URLs and paths to the desktop.
pub trait Opener {
    fn open_url(&self, url: &Url) -> std::io::Result<()>;
    fn open_path(&self, path: &Path) -> std::io::Result<()>;
}

/// Uses the OS default browser / file handler.
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_url(&self, url: &Url) -> std::io::Result<()> {
        open::that_detached(url.as_str())
    }

    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        open::that_detached(path)
    }
}

const URL_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

pub fn classify(target: &str) -> Result<Target, LaunchError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(LaunchError::Empty);
    }

    let lower = target.to_ascii_lowercase();
    let candidate = if URL_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        Some(target.to_string())
    } else if lower.starts_with("www.") {
        Some(format!("http://{}", target))
    } else {
        None
    };

    if let Some(candidate) = candidate {
        let url = Url::parse(&candidate).map_err(|e| LaunchError::InvalidUrl {
            url: target.to_string(),
            reason: e.to_string(),
        })?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(LaunchError::InvalidUrl {
                url: target.to_string(),
                reason: "missing host".to_string(),
            });
        }
        return Ok(Target::Url(url));
    }

    if lower.starts_with("file://") {
        let path = Url::parse(target)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| LaunchError::InvalidUrl {
                url: target.to_string(),
                reason: "not a local file URL".to_string(),
            })?;
        return Ok(Target::Path(path));
    }

    Ok(Target::Path(expand_home(target)))
}

fn expand_home(target: &str) -> PathBuf {
    if let Some(rest) = target.strip_prefix("~/").or(if target == "~" { Some("") } else { None }) {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(target)
}

pub fn launch(target: &str, opener: &dyn Opener) -> Result<(), LaunchError> {
    let resolved = classify(target).inspect_err(|e| warn!("launch: {}", e))?;

    let result = match &resolved {
        Target::Url(url) => {
            info!("launch: opening URL {}", url);
            opener.open_url(url)
        }
        Target::Path(path) => {
            if !path.exists() {
                warn!("launch: {:?} does not exist", path);
                return Err(LaunchError::NotFound(target.trim().to_string()));
            }
            info!("launch: opening {:?}", path);
            opener.open_path(path)
        }
    };

    result.map_err(|e| {
        warn!("launch: opener failed for '{}': {}", target, e);
        LaunchError::Unsupported {
            target: target.trim().to_string(),
            reason: e.to_string(),
        }
    })
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingOpener;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn classifies_urls_and_paths() {
        assert!(matches!(classify("https://www.google.com"), Ok(Target::Url(_))));
        assert!(matches!(classify("  HTTP://example.com/a "), Ok(Target::Url(_))));
        assert!(matches!(classify("ftp://files.example.com"), Ok(Target::Url(_))));
        assert_eq!(classify("/usr/bin/top"), Ok(Target::Path(PathBuf::from("/usr/bin/top"))));
    }

    #[test]
    fn www_prefix_gets_http_scheme() {
        match classify("www.example.com/path") {
            Ok(Target::Url(url)) => assert_eq!(url.as_str(), "http://www.example.com/path"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn file_url_becomes_path() {
        assert_eq!(classify("file:///tmp/x.txt"), Ok(Target::Path(PathBuf::from("/tmp/x.txt"))));
    }

    #[test]
    fn rejects_empty_and_bad_urls() {
        assert_eq!(classify("   "), Err(LaunchError::Empty));
        assert!(matches!(classify("http://"), Err(LaunchError::InvalidUrl { .. })));
        assert!(matches!(classify("https://exa mple.com"), Err(LaunchError::InvalidUrl { .. })));
    }

    #[test]
    fn missing_file_is_a_launch_error() {
        let opener = RecordingOpener::default();
        let err = launch("not-a-real-file.xyz", &opener).unwrap_err();
        assert_eq!(err, LaunchError::NotFound("not-a-real-file.xyz".to_string()));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn existing_file_and_url_are_opened() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hi").unwrap();

        let opener = RecordingOpener::default();
        launch(file.to_str().unwrap(), &opener).unwrap();
        launch("https://www.google.com", &opener).unwrap();

        let opened = opener.opened.borrow();
        assert_eq!(opened[0], file.display().to_string());
        assert_eq!(opened[1], "https://www.google.com/");
    }

    #[test]
    fn opener_failure_is_unsupported() {
        let err = launch("https://example.com", &RecordingOpener::failing()).unwrap_err();
        assert!(matches!(err, LaunchError::Unsupported { .. }));
    }
}
