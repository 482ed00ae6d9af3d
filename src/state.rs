use crate::config::DuplicateScope;
use crate::error::{NexError, Result};
use crate::model::LauncherEntity;
use crate::startup;
use crate::store::LauncherStore;
use crate::tree::{self, TreeNode};

pub const PATH_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    Added(String),
    Removed(String),
    StartupToggled(String, bool),
    Reloaded,
}

type Subscriber = Box<dyn FnMut(&ModelEvent)>;

/// Owns the top-level launcher list and keeps the startup set and the data file in step with it.
pub struct AppState {
    entities: Vec<LauncherEntity>,
    startup_set: Vec<LauncherEntity>,
    store: LauncherStore,
    duplicate_scope: DuplicateScope,
    subscribers: Vec<Subscriber>,
}

impl AppState {
    /// Loads the store. Corrupt data is moved aside, the model starts empty and the error
    /// is handed back for reporting.
    pub fn open(store: LauncherStore, duplicate_scope: DuplicateScope) -> (Self, Option<NexError>) {
        log::debug!("AppState: data file {:?}", store.path());
        let (entities, err) = match store.load() {
            Ok(items) => (items, None),
            Err(e) => {
                log::error!("AppState: starting with an empty list: {}", e);
                if matches!(e, NexError::DataCorrupt { .. }) {
                    if let Err(moved) = store.set_aside_corrupt() {
                        log::error!("AppState: could not keep the unreadable data: {}", moved);
                    }
                }
                (Vec::new(), Some(e))
            }
        };

        let mut state = Self {
            entities: Vec::new(),
            startup_set: Vec::new(),
            store,
            duplicate_scope,
            subscribers: Vec::new(),
        };
        state.set_entities(entities);
        (state, err)
    }

    pub fn entities(&self) -> &[LauncherEntity] {
        &self.entities
    }

    pub fn startup_set(&self) -> &[LauncherEntity] {
        &self.startup_set
    }

    pub fn subscribe(&mut self, f: impl FnMut(&ModelEvent) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    pub fn set_entities(&mut self, entities: Vec<LauncherEntity>) {
        self.entities = entities;
        self.startup_set = startup::recompute_startup_set(&self.entities);
        self.notify(ModelEvent::Reloaded);
    }

    pub fn display_tree(&self) -> TreeNode {
        tree::build_display_tree(&self.entities)
    }

    pub fn startup_tree(&self) -> TreeNode {
        tree::build_display_tree(&self.startup_set)
    }

    /// Search view with every match expanded. A blank query goes back to the full tree.
    pub fn search(&self, query: &str) -> TreeNode {
        if query.trim().is_empty() {
            return tree::restore(&self.entities);
        }
        let mut root = tree::build_display_tree(&tree::search(query, &self.entities));
        root.set_expanded_all(true);
        root
    }

    pub fn find(&self, path: &str) -> Option<&LauncherEntity> {
        let indices = self.resolve(path)?;
        let (first, rest) = indices.split_first()?;
        rest.iter()
            .try_fold(self.entities.get(*first)?, |e, &i| e.children().get(i))
    }

    pub fn add_folder(&mut self, parent: Option<&str>, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.insert(parent, LauncherEntity::folder(name))
    }

    pub fn add_link(&mut self, parent: Option<&str>, name: &str, target: &str, startup: bool) -> Result<()> {
        let name = validate_name(name)?;
        let target = target.trim();
        if target.is_empty() {
            return Err(NexError::validation("URL or path cannot be empty"));
        }
        self.insert(parent, LauncherEntity::link(name, target).with_startup(startup))
    }

    pub fn remove(&mut self, path: &str) -> Result<LauncherEntity> {
        let indices = self.resolve_or_err(path)?;
        let (last, parents) = indices.split_last().ok_or_else(|| not_found(path))?;
        let siblings = self.siblings_mut(parents).ok_or_else(|| not_found(path))?;
        let removed = siblings.remove(*last);

        log::info!("AppState: removed '{}' ({} entities)", path, removed.subtree_len());
        self.commit(ModelEvent::Removed(path.to_string()))?;
        Ok(removed)
    }

    pub fn toggle_startup(&mut self, path: &str, enabled: bool) -> Result<()> {
        let indices = self.resolve_or_err(path)?;
        let entity = self.entity_mut(&indices).ok_or_else(|| not_found(path))?;
        startup::toggle_startup(entity, enabled);
        self.commit(ModelEvent::StartupToggled(path.to_string(), enabled))
    }

    fn insert(&mut self, parent: Option<&str>, entity: LauncherEntity) -> Result<()> {
        let parent = parent.map(str::trim).filter(|p| !p.is_empty());
        let parent_indices = match parent {
            Some(p) => self.resolve_or_err(p)?,
            None => Vec::new(),
        };

        if self.duplicate_scope == DuplicateScope::Global {
            check_duplicate(&entity, &self.entities, true)?;
        }

        let siblings = self.siblings_mut(&parent_indices).ok_or_else(|| {
            NexError::validation(format!("'{}' is not a folder", parent.unwrap_or_default()))
        })?;
        check_duplicate(&entity, siblings.as_slice(), false)?;

        let full_path = match parent {
            Some(p) => format!("{}{}{}", p, PATH_SEPARATOR, entity.name),
            None => entity.name.clone(),
        };
        siblings.push(entity);
        self.commit(ModelEvent::Added(full_path))
    }

    fn commit(&mut self, event: ModelEvent) -> Result<()> {
        self.startup_set = startup::recompute_startup_set(&self.entities);
        let persisted = if self.entities.is_empty() {
            self.store.delete_store()
        } else {
            self.store.save(&self.entities)
        };
        self.notify(event);
        persisted
    }

    fn notify(&mut self, event: ModelEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Index path for a slash-separated name path. First match wins at each level.
    fn resolve(&self, path: &str) -> Option<Vec<usize>> {
        let mut indices = Vec::new();
        let mut level: &[LauncherEntity] = &self.entities;
        for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
            let idx = level.iter().position(|e| e.name == segment)?;
            indices.push(idx);
            level = level[idx].children();
        }
        if indices.is_empty() { None } else { Some(indices) }
    }

    fn resolve_or_err(&self, path: &str) -> Result<Vec<usize>> {
        self.resolve(path).ok_or_else(|| not_found(path))
    }

    fn entity_mut(&mut self, indices: &[usize]) -> Option<&mut LauncherEntity> {
        let (first, rest) = indices.split_first()?;
        let mut entity = self.entities.get_mut(*first)?;
        for &i in rest {
            entity = entity.children_mut()?.get_mut(i)?;
        }
        Some(entity)
    }

    fn siblings_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<LauncherEntity>> {
        if parent.is_empty() {
            return Some(&mut self.entities);
        }
        self.entity_mut(parent)?.children_mut()
    }
}

fn not_found(path: &str) -> NexError {
    NexError::validation(format!("no launcher at '{}'", path))
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NexError::validation("name cannot be empty"));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(NexError::validation(format!(
            "name cannot contain '{}'",
            PATH_SEPARATOR
        )));
    }
    Ok(name)
}

fn check_duplicate(new: &LauncherEntity, existing: &[LauncherEntity], recursive: bool) -> Result<()> {
    for e in existing {
        if e.name.eq_ignore_ascii_case(&new.name) {
            return Err(NexError::validation(format!("'{}' already exists", e.name)));
        }
        if let (Some(a), Some(b)) = (e.target(), new.target()) {
            if a.trim() == b {
                return Err(NexError::validation(format!(
                    "'{}' already points to {}",
                    e.name, b
                )));
            }
        }
        if recursive {
            check_duplicate(new, e.children(), true)?;
        }
    }
    Ok(())
}
