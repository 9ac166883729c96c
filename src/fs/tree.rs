use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::flatten::{ancestor_continuations, flatten, has_next_sibling};
use crate::fs::node::{NodeId, NodeKind, NoteTree};

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    pub depth: usize,
    pub is_expanded: bool,
    pub has_next_sibling: bool,
    /// Per ancestor column (outermost first): whether a vertical line continues.
    pub continuations: Vec<bool>,
}

/// State for the tree view.
///
/// Sole owner of the current [`NoteTree`]. Every expansion change goes
/// through here and is followed by a re-flatten.
pub struct TreeState {
    pub root_path: PathBuf,
    pub tree: Option<NoteTree>,
    pub flat_items: Vec<FlatItem>,
    /// Index into `flat_items` of the highlighted row.
    pub cursor: usize,
    pub scroll_offset: usize,
    /// The document currently opened in the preview, if any.
    pub selected_path: Option<PathBuf>,
    /// Whether a build for `root_path` is in flight.
    pub loading: bool,
    /// Bumped on every build request; only the latest build is installed.
    pub build_generation: u64,
}

impl TreeState {
    /// Create an empty state for `root_path`, waiting for its first build.
    pub fn new(root_path: &Path) -> Self {
        Self {
            root_path: root_path.to_path_buf(),
            tree: None,
            flat_items: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            selected_path: None,
            loading: true,
            build_generation: 0,
        }
    }

    /// Mark a new build as in flight and return its generation.
    pub fn begin_build(&mut self) -> u64 {
        self.build_generation += 1;
        self.loading = true;
        self.build_generation
    }

    /// Whether a build result of `generation` is still the latest request.
    pub fn is_current_build(&self, generation: u64) -> bool {
        generation == self.build_generation
    }

    /// Create a state around an already built tree.
    pub fn with_tree(root_path: &Path, tree: Option<NoteTree>) -> Self {
        let mut state = Self::new(root_path);
        state.loading = false;
        state.tree = tree;
        state.flatten();
        state
    }

    /// Rebuild the flat items list from the tree.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        if let Some(tree) = &self.tree {
            for id in flatten(Some(tree)) {
                let node = tree.node(id);
                self.flat_items.push(FlatItem {
                    id,
                    name: node.leaf_name(),
                    path: node.path().to_path_buf(),
                    kind: node.kind(),
                    depth: node.depth(),
                    is_expanded: node.is_expanded(),
                    has_next_sibling: has_next_sibling(tree, id),
                    continuations: ancestor_continuations(tree, id),
                });
            }
        }
        // Clamp cursor
        if self.flat_items.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.flat_items.len() {
            self.cursor = self.flat_items.len() - 1;
        }
    }

    /// Swap in a freshly built tree, carrying over expansion, cursor and
    /// selection by path where those paths still exist.
    pub fn replace_tree(&mut self, tree: Option<NoteTree>) {
        let expanded = self.collect_expanded_paths();
        let cursor_path = self.cursor_item().map(|item| item.path.clone());

        self.tree = tree;
        self.loading = false;
        self.restore_expanded(&expanded);
        self.flatten();

        if let Some(path) = cursor_path {
            if let Some(idx) = self.find_index_by_path(&path) {
                self.cursor = idx;
            }
        }
        let selection_survives = match (&self.tree, &self.selected_path) {
            (Some(tree), Some(path)) => tree.find(path).is_some(),
            _ => false,
        };
        if !selection_survives {
            self.selected_path = None;
        }
    }

    /// The item under the cursor.
    pub fn cursor_item(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.cursor)
    }

    /// Toggle the folder under the cursor, or select the document under it.
    ///
    /// Returns the document path when a document was selected.
    pub fn activate_cursor(&mut self) -> Option<PathBuf> {
        let item = self.cursor_item()?;
        match item.kind {
            NodeKind::Folder => {
                let id = item.id;
                self.toggle(id);
                None
            }
            NodeKind::Document => {
                let path = item.path.clone();
                self.selected_path = Some(path.clone());
                Some(path)
            }
        }
    }

    /// Expand the folder under the cursor (no-op on documents or when already open).
    pub fn expand_cursor(&mut self) {
        let Some(item) = self.cursor_item() else {
            return;
        };
        if item.kind == NodeKind::Folder && !item.is_expanded {
            let id = item.id;
            self.toggle(id);
        }
    }

    /// Collapse the folder under the cursor, or jump to its parent row.
    pub fn collapse_cursor(&mut self) {
        let Some(item) = self.cursor_item() else {
            return;
        };
        if item.kind == NodeKind::Folder && item.is_expanded {
            let id = item.id;
            self.toggle(id);
            return;
        }

        let parent = self
            .tree
            .as_ref()
            .and_then(|tree| tree.node(item.id).parent());
        if let Some(parent) = parent {
            if let Some(idx) = self.flat_items.iter().position(|i| i.id == parent) {
                self.cursor = idx;
            }
        }
    }

    fn toggle(&mut self, id: NodeId) {
        if let Some(tree) = &mut self.tree {
            let expanded = tree.toggle_expansion(id);
            tracing::debug!(path = %tree.node(id).path().display(), expanded, "toggled folder");
        }
        self.flatten();
    }

    /// Update the scroll offset to ensure the cursor row is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    /// Find the flat_items index of a node by its path.
    pub fn find_index_by_path(&self, path: &Path) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }

    /// Whether `path` is the document currently opened.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected_path.as_deref() == Some(path)
    }

    /// Collect every expanded folder path in the current tree.
    pub fn collect_expanded_paths(&self) -> HashSet<PathBuf> {
        match &self.tree {
            Some(tree) => tree
                .iter()
                .filter(|(_, node)| node.is_folder() && node.is_expanded())
                .map(|(_, node)| node.path().to_path_buf())
                .collect(),
            None => HashSet::new(),
        }
    }

    /// Re-expand folders from a saved set of paths.
    ///
    /// Folders not in the set keep their build-time default, so a root that
    /// was collapsed before a rebuild comes back expanded.
    pub fn restore_expanded(&mut self, expanded: &HashSet<PathBuf>) {
        let Some(tree) = &mut self.tree else {
            return;
        };
        for path in expanded {
            if let Some(id) = tree.find(path) {
                let node = tree.node(id);
                if node.is_folder() && !node.is_expanded() {
                    tree.toggle_expansion(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::builder::build;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha").join("nested")).unwrap();
        File::create(dir.path().join("alpha").join("inner.md")).unwrap();
        File::create(dir.path().join("alpha").join("nested").join("deep.txt")).unwrap();
        File::create(dir.path().join("file_a.txt")).unwrap();
        File::create(dir.path().join("file_b.md")).unwrap();
        File::create(dir.path().join("image.png")).unwrap();
        dir
    }

    fn state_for(dir: &TempDir) -> TreeState {
        TreeState::with_tree(dir.path(), build(dir.path()))
    }

    fn names(state: &TreeState) -> Vec<&str> {
        state.flat_items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn new_state_is_loading_and_empty() {
        let state = TreeState::new(Path::new("/nowhere"));
        assert!(state.loading);
        assert!(state.flat_items.is_empty());
        assert!(state.cursor_item().is_none());
    }

    #[test]
    fn initial_flatten_shows_root_children() {
        let dir = setup_test_dir();
        let state = state_for(&dir);
        assert!(!state.loading);
        assert_eq!(
            &names(&state)[1..],
            &["alpha", "beta", "file_a.txt", "file_b.md"]
        );
        assert_eq!(state.flat_items[0].depth, 0);
    }

    #[test]
    fn missing_root_has_no_items() {
        let state = TreeState::with_tree(
            Path::new("/path/does/not/exist"),
            build(Path::new("/path/does/not/exist")),
        );
        assert!(state.tree.is_none());
        assert!(state.flat_items.is_empty());
    }

    #[test]
    fn activate_folder_toggles_it() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = 1; // alpha
        assert!(state.activate_cursor().is_none());
        assert_eq!(
            &names(&state)[1..],
            &["alpha", "nested", "inner.md", "beta", "file_a.txt", "file_b.md"]
        );
        assert!(state.activate_cursor().is_none());
        assert_eq!(
            &names(&state)[1..],
            &["alpha", "beta", "file_a.txt", "file_b.md"]
        );
    }

    #[test]
    fn activate_document_selects_it() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = state.find_index_by_path(&dir.path().join("file_b.md")).unwrap();
        let opened = state.activate_cursor();
        assert_eq!(opened, Some(dir.path().join("file_b.md")));
        assert!(state.is_selected(&dir.path().join("file_b.md")));
        assert!(!state.is_selected(&dir.path().join("file_a.txt")));
    }

    #[test]
    fn selecting_another_document_replaces_selection() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = state.find_index_by_path(&dir.path().join("file_a.txt")).unwrap();
        state.activate_cursor();
        state.cursor = state.find_index_by_path(&dir.path().join("file_b.md")).unwrap();
        state.activate_cursor();
        assert_eq!(state.selected_path, Some(dir.path().join("file_b.md")));
    }

    #[test]
    fn expand_then_collapse_cursor() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = 1;
        state.expand_cursor();
        assert!(state.flat_items[1].is_expanded);
        state.expand_cursor();
        assert!(state.flat_items[1].is_expanded);
        state.collapse_cursor();
        assert!(!state.flat_items[1].is_expanded);
    }

    #[test]
    fn collapse_on_child_jumps_to_parent() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = 1;
        state.expand_cursor();
        state.cursor = state.find_index_by_path(&dir.path().join("alpha").join("inner.md")).unwrap();
        state.collapse_cursor();
        assert_eq!(state.cursor, 1);
        // alpha itself stays expanded
        assert!(state.flat_items[1].is_expanded);
    }

    #[test]
    fn collapse_root_hides_everything_else() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = 0;
        state.collapse_cursor();
        assert_eq!(state.flat_items.len(), 1);
    }

    #[test]
    fn flatten_clamps_cursor() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = state.flat_items.len() - 1;
        let root = state.tree.as_ref().unwrap().root();
        state.tree.as_mut().unwrap().toggle_expansion(root);
        state.flatten();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn sibling_flags_on_items() {
        let dir = setup_test_dir();
        let state = state_for(&dir);
        assert!(!state.flat_items[0].has_next_sibling);
        assert!(state.flat_items[1].has_next_sibling);
        let last = state.flat_items.last().unwrap();
        assert!(!last.has_next_sibling);
    }

    #[test]
    fn replace_tree_restores_expansion_cursor_and_selection() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        let alpha = dir.path().join("alpha");
        let nested = alpha.join("nested");
        let inner = alpha.join("inner.md");

        state.cursor = state.find_index_by_path(&alpha).unwrap();
        state.expand_cursor();
        state.cursor = state.find_index_by_path(&nested).unwrap();
        state.expand_cursor();
        state.cursor = state.find_index_by_path(&inner).unwrap();
        state.activate_cursor();

        state.replace_tree(build(dir.path()));

        let alpha_item = &state.flat_items[state.find_index_by_path(&alpha).unwrap()];
        assert!(alpha_item.is_expanded);
        assert!(state.find_index_by_path(&nested.join("deep.txt")).is_some());
        assert_eq!(state.cursor_item().unwrap().path, inner);
        assert!(state.is_selected(&inner));
    }

    #[test]
    fn replace_tree_drops_vanished_selection() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        let doomed = dir.path().join("file_a.txt");
        state.cursor = state.find_index_by_path(&doomed).unwrap();
        state.activate_cursor();

        fs::remove_file(&doomed).unwrap();
        state.replace_tree(build(dir.path()));

        assert!(state.selected_path.is_none());
        assert!(state.find_index_by_path(&doomed).is_none());
    }

    #[test]
    fn replace_tree_with_none_clears_items() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.replace_tree(None);
        assert!(state.flat_items.is_empty());
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn collect_expanded_paths_includes_root() {
        let dir = setup_test_dir();
        let state = state_for(&dir);
        let expanded = state.collect_expanded_paths();
        assert_eq!(expanded.len(), 1);
        assert!(expanded.contains(dir.path()));
    }

    #[test]
    fn update_scroll_follows_cursor() {
        let dir = setup_test_dir();
        let mut state = state_for(&dir);
        state.cursor = 4;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 3);
        state.cursor = 1;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 1);
    }
}
