use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Folder { children: Vec<LauncherEntity> },
    Link { target: String },
}

/// A node of the launcher hierarchy.
///
/// On disk this is the flat `{name, urlOrPath, isFolder, isStartupLauncher, children}`
/// object; the conversion rejects entries that break the folder/link invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity", into = "RawEntity")]
pub struct LauncherEntity {
    pub name: String,
    pub kind: EntityKind,
    pub is_startup_item: bool,
}

impl LauncherEntity {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Folder { children: Vec::new() },
            is_startup_item: false,
        }
    }

    pub fn link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Link { target: target.into() },
            is_startup_item: false,
        }
    }

    #[cfg(test)]
    pub fn with_children(mut self, items: Vec<LauncherEntity>) -> Self {
        if let EntityKind::Folder { children } = &mut self.kind {
            *children = items;
        }
        self
    }

    pub fn with_startup(mut self, enabled: bool) -> Self {
        self.is_startup_item = enabled;
        self
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, EntityKind::Folder { .. })
    }

    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Link { target } => Some(target),
            EntityKind::Folder { .. } => None,
        }
    }

    /// Children of a folder; links have none.
    pub fn children(&self) -> &[LauncherEntity] {
        match &self.kind {
            EntityKind::Folder { children } => children,
            EntityKind::Link { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<LauncherEntity>> {
        match &mut self.kind {
            EntityKind::Folder { children } => Some(children),
            EntityKind::Link { .. } => None,
        }
    }

    /// Number of entities in this subtree, itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    name: String,
    url_or_path: Option<String>,
    #[serde(default)]
    is_folder: bool,
    #[serde(default)]
    is_startup_launcher: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<LauncherEntity>>,
}

impl TryFrom<RawEntity> for LauncherEntity {
    type Error = String;

    fn try_from(raw: RawEntity) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err("entry with an empty name".to_string());
        }

        let kind = if raw.is_folder {
            EntityKind::Folder {
                children: raw.children.unwrap_or_default(),
            }
        } else {
            match raw.url_or_path {
                Some(target) if !target.trim().is_empty() => EntityKind::Link { target },
                _ => return Err(format!("link '{}' has no URL or path", raw.name)),
            }
        };

        Ok(Self {
            name: raw.name,
            kind,
            is_startup_item: raw.is_startup_launcher,
        })
    }
}

impl From<LauncherEntity> for RawEntity {
    fn from(entity: LauncherEntity) -> Self {
        let (url_or_path, children, is_folder) = match entity.kind {
            EntityKind::Folder { children } => (None, Some(children), true),
            EntityKind::Link { target } => (Some(target), None, false),
        };
        RawEntity {
            name: entity.name,
            url_or_path,
            is_folder,
            is_startup_launcher: entity.is_startup_item,
            children,
        }
    }
}
