use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Handle to a node inside a [`NoteTree`].
///
/// Ids are only meaningful for the tree that produced them; a rebuilt tree
/// hands out fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The two node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Document,
}

/// A single folder or document entry.
#[derive(Debug, Clone)]
pub struct TreeNode {
    path: PathBuf,
    kind: NodeKind,
    depth: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

impl TreeNode {
    /// Create a detached node at depth 0, collapsed, with no children.
    pub fn new(path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            depth: 0,
            parent: None,
            children: Vec::new(),
            expanded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Expansion flag. Ignored for documents.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Display name: everything after the last `/` or `\`, or the whole path.
    pub fn leaf_name(&self) -> String {
        let full = self.path.to_string_lossy();
        match full.rfind(|c: char| c == '/' || c == '\\') {
            Some(idx) => full[idx + 1..].to_string(),
            None => full.into_owned(),
        }
    }
}

/// Arena holding one built hierarchy.
///
/// `children` vectors are the only ownership edges; `parent` links are plain
/// ids. Slot 0 is always the root.
#[derive(Debug, Clone)]
pub struct NoteTree {
    nodes: Vec<TreeNode>,
    by_path: HashMap<PathBuf, NodeId>,
}

impl NoteTree {
    /// Create a tree containing only an expanded root folder.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let mut root = TreeNode::new(root_path, NodeKind::Folder);
        root.expanded = true;
        let mut by_path = HashMap::new();
        by_path.insert(root.path.clone(), NodeId(0));
        Self {
            nodes: vec![root],
            by_path,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node.
    ///
    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by its path.
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over every node in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Append a new node under `parent` and return its id.
    ///
    /// The child's depth is `parent.depth + 1`. Only folders can gain
    /// children, and a path may appear once per tree.
    pub fn attach_child(
        &mut self,
        parent: NodeId,
        path: impl Into<PathBuf>,
        kind: NodeKind,
    ) -> Result<NodeId> {
        let parent_node = self.get(parent).ok_or_else(|| {
            AppError::InvalidOperation(format!("unknown parent node {}", parent.0))
        })?;
        if !parent_node.is_folder() {
            return Err(AppError::InvalidOperation(format!(
                "cannot attach a child to document {}",
                parent_node.path.display()
            )));
        }

        let mut child = TreeNode::new(path, kind);
        if self.by_path.contains_key(&child.path) {
            return Err(AppError::InvalidOperation(format!(
                "{} is already in the tree",
                child.path.display()
            )));
        }
        child.parent = Some(parent);
        child.depth = parent_node.depth + 1;

        let id = NodeId(self.nodes.len());
        self.by_path.insert(child.path.clone(), id);
        self.nodes.push(child);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Flip the expansion flag and return the new value.
    ///
    /// Callers re-flatten afterwards; the tree itself notifies no one.
    pub fn toggle_expansion(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        node.expanded = !node.expanded;
        node.expanded
    }

    /// Position of `id` within its parent's children, `None` for the root.
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|&c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_defaults() {
        let node = TreeNode::new("/notes/a.md", NodeKind::Document);
        assert_eq!(node.depth(), 0);
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(!node.is_expanded());
        assert!(!node.is_folder());
    }

    #[test]
    fn root_starts_expanded_at_depth_zero() {
        let tree = NoteTree::new("/notes");
        let root = tree.node(tree.root());
        assert!(root.is_folder());
        assert!(root.is_expanded());
        assert_eq!(root.depth(), 0);
        assert!(root.parent().is_none());
    }

    #[test]
    fn attach_child_links_both_ways() {
        let mut tree = NoteTree::new("/notes");
        let root = tree.root();
        let folder = tree
            .attach_child(root, "/notes/journal", NodeKind::Folder)
            .unwrap();
        let doc = tree
            .attach_child(folder, "/notes/journal/day1.md", NodeKind::Document)
            .unwrap();

        assert_eq!(tree.node(root).children(), &[folder]);
        assert_eq!(tree.node(folder).children(), &[doc]);
        assert_eq!(tree.node(folder).parent(), Some(root));
        assert_eq!(tree.node(doc).parent(), Some(folder));
        assert_eq!(tree.node(folder).depth(), 1);
        assert_eq!(tree.node(doc).depth(), 2);
        assert!(!tree.node(folder).is_expanded());
    }

    #[test]
    fn attach_child_to_document_is_invalid() {
        let mut tree = NoteTree::new("/notes");
        let doc = tree
            .attach_child(tree.root(), "/notes/a.md", NodeKind::Document)
            .unwrap();
        let err = tree
            .attach_child(doc, "/notes/a.md/b.md", NodeKind::Document)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidOperation(_)));
        assert!(tree.node(doc).children().is_empty());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn attach_duplicate_path_is_invalid() {
        let mut tree = NoteTree::new("/notes");
        tree.attach_child(tree.root(), "/notes/a.md", NodeKind::Document)
            .unwrap();
        let err = tree
            .attach_child(tree.root(), "/notes/a.md", NodeKind::Document)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidOperation(_)));
    }

    #[test]
    fn find_by_path() {
        let mut tree = NoteTree::new("/notes");
        let doc = tree
            .attach_child(tree.root(), "/notes/a.md", NodeKind::Document)
            .unwrap();
        assert_eq!(tree.find(Path::new("/notes/a.md")), Some(doc));
        assert_eq!(tree.find(Path::new("/notes")), Some(tree.root()));
        assert_eq!(tree.find(Path::new("/notes/missing.md")), None);
    }

    #[test]
    fn toggle_expansion_is_its_own_inverse() {
        let mut tree = NoteTree::new("/notes");
        let folder = tree
            .attach_child(tree.root(), "/notes/sub", NodeKind::Folder)
            .unwrap();
        assert!(tree.toggle_expansion(folder));
        assert!(!tree.toggle_expansion(folder));
        assert!(!tree.node(folder).is_expanded());
    }

    #[test]
    fn leaf_name_variants() {
        assert_eq!(
            TreeNode::new("/notes/sub/a.md", NodeKind::Document).leaf_name(),
            "a.md"
        );
        assert_eq!(
            TreeNode::new(r"C:\notes\b.txt", NodeKind::Document).leaf_name(),
            "b.txt"
        );
        assert_eq!(
            TreeNode::new("plain.md", NodeKind::Document).leaf_name(),
            "plain.md"
        );
    }

    #[test]
    fn sibling_index_positions() {
        let mut tree = NoteTree::new("/notes");
        let root = tree.root();
        let a = tree.attach_child(root, "/notes/a", NodeKind::Folder).unwrap();
        let b = tree.attach_child(root, "/notes/b.md", NodeKind::Document).unwrap();
        assert_eq!(tree.sibling_index(root), None);
        assert_eq!(tree.sibling_index(a), Some(0));
        assert_eq!(tree.sibling_index(b), Some(1));
    }
}
