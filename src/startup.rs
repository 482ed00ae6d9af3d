use log::{info, warn};
use serde::Deserialize;
use crate::error::LaunchError;
use crate::executor::{self, Opener};
use crate::model::LauncherEntity;

/// How a startup folder is expanded at auto-launch time.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FolderLaunch {
    #[default]
    Recursive,
    #[serde(rename = "direct")]
    DirectChildren,
}

#[derive(Debug, Default)]
pub struct LaunchReport {
    pub launched: Vec<String>,
    pub failed: Vec<(String, LaunchError)>,
}

impl LaunchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn toggle_startup(entity: &mut LauncherEntity, enabled: bool) {
    entity.is_startup_item = enabled;
}

/// Every flagged entity in pre-order, wherever it sits in the hierarchy.
pub fn recompute_startup_set(entities: &[LauncherEntity]) -> Vec<LauncherEntity> {
    let mut set = Vec::new();
    collect_flagged(entities, &mut set);
    set
}

fn collect_flagged(entities: &[LauncherEntity], out: &mut Vec<LauncherEntity>) {
    for entity in entities {
        if entity.is_startup_item {
            out.push(entity.clone());
        }
        collect_flagged(entity.children(), out);
    }
}

/// Launches every item of the startup set. Failures are recorded and the batch keeps going.
///
/// Flagged entities inside a startup folder are skipped while walking that folder;
/// they are members of the set themselves and launch exactly once from there.
pub fn auto_launch_all(
    startup_set: &[LauncherEntity],
    opener: &dyn Opener,
    mode: FolderLaunch,
) -> LaunchReport {
    let mut report = LaunchReport::default();
    for entity in startup_set {
        launch_entity(entity, opener, mode, &mut report);
    }
    info!(
        "auto_launch_all: launched={}, failed={}",
        report.launched.len(),
        report.failed.len()
    );
    report
}

fn launch_entity(
    entity: &LauncherEntity,
    opener: &dyn Opener,
    mode: FolderLaunch,
    report: &mut LaunchReport,
) {
    match entity.target() {
        Some(target) => match executor::launch(target, opener) {
            Ok(()) => report.launched.push(entity.name.clone()),
            Err(e) => {
                warn!("auto-launch of '{}' failed: {}", entity.name, e);
                report.failed.push((entity.name.clone(), e));
            }
        },
        None => {
            for child in entity.children() {
                if child.is_startup_item {
                    continue;
                }
                if child.is_folder() && mode == FolderLaunch::DirectChildren {
                    continue;
                }
                launch_entity(child, opener, mode, report);
            }
        }
    }
}
