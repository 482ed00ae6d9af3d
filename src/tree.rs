use std::fmt::Write;
use crate::matcher::NameMatcher;
use crate::model::LauncherEntity;

/// Display node. The root is invisible and carries no label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub target: Option<String>,
    pub is_folder: bool,
    pub is_startup: bool,
    pub expanded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn root() -> Self {
        Self {
            label: String::new(),
            target: None,
            is_folder: true,
            is_startup: false,
            expanded: true,
            children: Vec::new(),
        }
    }

    fn from_entity(entity: &LauncherEntity) -> Self {
        Self {
            label: entity.name.clone(),
            target: entity.target().map(str::to_string),
            is_folder: entity.is_folder(),
            is_startup: entity.is_startup_item,
            expanded: false,
            children: entity.children().iter().map(TreeNode::from_entity).collect(),
        }
    }

    pub fn set_expanded_all(&mut self, expanded: bool) {
        self.expanded = expanded;
        for child in &mut self.children {
            child.set_expanded_all(expanded);
        }
    }
}

pub fn build_display_tree(entities: &[LauncherEntity]) -> TreeNode {
    let mut root = TreeNode::root();
    root.children = entities.iter().map(TreeNode::from_entity).collect();
    root
}

/// Back to the unfiltered view after a search.
pub fn restore(entities: &[LauncherEntity]) -> TreeNode {
    build_display_tree(entities)
}

/// Returns a pruned deep copy of the entities whose names contain `query`.
///
/// A folder that matches keeps its whole subtree; a folder kept only for its
/// descendants carries just the matching ones. A blank query returns everything.
pub fn search(query: &str, entities: &[LauncherEntity]) -> Vec<LauncherEntity> {
    let query = query.trim();
    if query.is_empty() {
        return entities.to_vec();
    }

    let mut matcher = NameMatcher::new(query);
    let results: Vec<LauncherEntity> = entities
        .iter()
        .filter_map(|e| filter_entity(e, &mut matcher))
        .collect();

    log::info!("search: query='{}', top-level matches={}", query, results.len());
    results
}

fn filter_entity(entity: &LauncherEntity, matcher: &mut NameMatcher) -> Option<LauncherEntity> {
    if !entity.is_folder() {
        return matcher.is_match(&entity.name).then(|| entity.clone());
    }

    let filtered: Vec<LauncherEntity> = entity
        .children()
        .iter()
        .filter_map(|c| filter_entity(c, matcher))
        .collect();

    if matcher.is_match(&entity.name) {
        Some(entity.clone())
    } else if !filtered.is_empty() {
        Some(LauncherEntity {
            name: entity.name.clone(),
            kind: crate::model::EntityKind::Folder { children: filtered },
            is_startup_item: entity.is_startup_item,
        })
    } else {
        None
    }
}

/// Indented text listing of a display tree.
pub fn render(root: &TreeNode) -> String {
    let mut out = String::new();
    for child in &root.children {
        render_node(child, 0, &mut out);
    }
    out
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    let marker = if node.is_startup { "*" } else { " " };
    let indent = "  ".repeat(depth);
    if node.is_folder {
        let _ = writeln!(out, "{}{}{}/", marker, indent, node.label);
    } else {
        let target = node.target.as_deref().unwrap_or_default();
        let _ = writeln!(out, "{}{}{}  -> {}", marker, indent, node.label, target);
    }
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work() -> Vec<LauncherEntity> {
        vec![LauncherEntity::folder("Work").with_children(vec![
            LauncherEntity::link("Google", "https://www.google.com"),
        ])]
    }

    fn mixed() -> Vec<LauncherEntity> {
        vec![
            LauncherEntity::folder("Dev").with_children(vec![
                LauncherEntity::link("GitHub", "https://github.com"),
                LauncherEntity::link("Docs", "https://docs.rs"),
                LauncherEntity::folder("Tools").with_children(vec![
                    LauncherEntity::link("Gitk", "/usr/bin/gitk"),
                    LauncherEntity::link("Top", "/usr/bin/top"),
                ]),
            ]),
            LauncherEntity::folder("Git Archive").with_children(vec![
                LauncherEntity::link("Old", "/srv/old"),
            ]),
            LauncherEntity::link("Mail", "https://mail.example.com"),
        ]
    }

    fn wide() -> Vec<LauncherEntity> {
        let mut items = mixed();
        items.push(LauncherEntity::folder("Cafés").with_children(vec![
            LauncherEntity::link("Café Menu", "https://menu.example"),
            LauncherEntity::link("Ma Café", "https://ma.example"),
            LauncherEntity::link("Tea", "https://tea.example"),
        ]));
        items.push(LauncherEntity::folder("Schule").with_startup(true).with_children(vec![
            LauncherEntity::link("mon école", "/srv/ecole"),
            LauncherEntity::folder("Archiv").with_children(vec![
                LauncherEntity::folder("2019").with_children(vec![
                    LauncherEntity::link("Zürich Wiki", "https://wiki.example"),
                ]),
            ]),
        ]));
        items.push(LauncherEntity::link("ÉCOLE", "https://ecole.example"));
        items
    }

    fn name_matches(query: &str, name: &str) -> bool {
        name.to_lowercase().contains(&query.to_lowercase())
    }

    fn count_matching(query: &str, items: &[LauncherEntity]) -> usize {
        items
            .iter()
            .map(|e| usize::from(name_matches(query, &e.name)) + count_matching(query, e.children()))
            .sum()
    }

    // Every kept entity matches, or is a folder kept for a matching descendant.
    fn assert_sound(query: &str, results: &[LauncherEntity]) {
        for e in results {
            if name_matches(query, &e.name) {
                continue;
            }
            assert!(e.is_folder(), "{:?} kept without matching {:?}", e.name, query);
            assert!(count_matching(query, e.children()) > 0, "{:?} has no match below", e.name);
            assert_sound(query, e.children());
        }
    }

    #[test]
    fn search_keeps_folder_of_matching_link() {
        assert_eq!(search("goo", &work()), work());
        assert!(search("zzz", &work()).is_empty());
    }

    #[test]
    fn search_prunes_non_matching_siblings() {
        let results = search("git", &mixed());
        assert_eq!(
            results,
            vec![
                LauncherEntity::folder("Dev").with_children(vec![
                    LauncherEntity::link("GitHub", "https://github.com"),
                    LauncherEntity::folder("Tools")
                        .with_children(vec![LauncherEntity::link("Gitk", "/usr/bin/gitk")]),
                ]),
                // matched by name, so the whole folder stays
                LauncherEntity::folder("Git Archive")
                    .with_children(vec![LauncherEntity::link("Old", "/srv/old")]),
            ]
        );
    }

    #[test]
    fn search_results_are_sound_and_complete() {
        let model = wide();
        for query in ["g", "o", "GIT", "café", "CAFÉ", "école", "wiki", "2019", "zzz"] {
            let results = search(query, &model);
            assert_sound(query, &results);
            assert_eq!(
                count_matching(query, &results),
                count_matching(query, &model),
                "query {:?}",
                query
            );
        }
        assert!(search("zzz", &model).is_empty());
    }

    #[test]
    fn search_finds_non_ascii_names_anywhere() {
        let model = wide();

        let cafes = search("café", &model);
        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0].name, "Cafés");
        assert_eq!(cafes[0].children().len(), 3);

        let menu = search("MA CAFÉ", &model);
        assert_eq!(menu[0].children(), &[LauncherEntity::link("Ma Café", "https://ma.example")]);

        let schools: Vec<_> = search("école", &model).into_iter().map(|e| e.name).collect();
        assert_eq!(schools, vec!["Schule", "ÉCOLE"]);
    }

    #[test]
    fn deep_leaf_match_keeps_only_its_ancestors() {
        let results = search("zürich", &wide());
        assert_eq!(
            results,
            vec![LauncherEntity::folder("Schule").with_startup(true).with_children(vec![
                LauncherEntity::folder("Archiv").with_children(vec![
                    LauncherEntity::folder("2019").with_children(vec![
                        LauncherEntity::link("Zürich Wiki", "https://wiki.example"),
                    ]),
                ]),
            ])]
        );
    }

    #[test]
    fn blank_query_is_the_unfiltered_view() {
        assert_eq!(search("", &mixed()), mixed());
        assert_eq!(search("   ", &mixed()), mixed());
        assert_eq!(build_display_tree(&search("", &mixed())), restore(&mixed()));
    }

    #[test]
    fn search_results_do_not_alias_the_model() {
        let model = work();
        let mut results = search("goo", &model);
        results[0].children_mut().unwrap()[0].is_startup_item = true;
        results[0].name.push_str(" (edited)");

        assert_eq!(model, work());
    }

    #[test]
    fn search_preserves_startup_flags() {
        let model = vec![LauncherEntity::folder("Daily")
            .with_startup(true)
            .with_children(vec![LauncherEntity::link("Radio", "https://radio.example").with_startup(true)])];
        let results = search("radio", &model);
        assert!(results[0].is_startup_item);
        assert!(results[0].children()[0].is_startup_item);
    }

    #[test]
    fn display_tree_mirrors_hierarchy() {
        let tree = build_display_tree(&mixed());
        assert_eq!(tree.label, "");
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.children[0].children[2].label, "Tools");
        assert_eq!(tree.children[0].children[2].children[1].target.as_deref(), Some("/usr/bin/top"));
        assert!(!tree.children[2].is_folder);
    }

    #[test]
    fn expanding_a_search_tree_leaves_the_full_tree_alone() {
        let model = mixed();
        let mut filtered = build_display_tree(&search("gitk", &model));
        filtered.set_expanded_all(true);
        assert!(!restore(&model).children[0].expanded);
    }

    #[test]
    fn render_marks_folders_and_startup_items() {
        let model = vec![LauncherEntity::folder("Work").with_children(vec![
            LauncherEntity::link("Google", "https://www.google.com").with_startup(true),
        ])];
        let text = render(&build_display_tree(&model));
        assert_eq!(text, " Work/\n*  Google  -> https://www.google.com\n");
    }
}
