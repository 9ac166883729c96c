//! Expansion-aware linearization of a [`NoteTree`] and the sibling queries
//! used to draw connector lines.

use crate::fs::node::{NodeId, NoteTree};

/// Pre-order list of the nodes currently visible.
///
/// A folder's children are emitted only while it is expanded; collapsed
/// subtrees are never visited.
pub fn flatten(tree: Option<&NoteTree>) -> Vec<NodeId> {
    let mut out = Vec::new();
    if let Some(tree) = tree {
        flatten_into(tree, tree.root(), &mut out);
    }
    out
}

fn flatten_into(tree: &NoteTree, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    let node = tree.node(id);
    if node.is_folder() && node.is_expanded() {
        for &child in node.children() {
            flatten_into(tree, child, out);
        }
    }
}

/// Whether `id` has a sibling after it. False for the root.
pub fn has_next_sibling(tree: &NoteTree, id: NodeId) -> bool {
    let Some(parent) = tree.node(id).parent() else {
        return false;
    };
    match tree.sibling_index(id) {
        Some(idx) => idx + 1 < tree.node(parent).children().len(),
        None => false,
    }
}

/// For every indent column `1..depth` of `id`, outermost first, whether a
/// vertical connector continues through that column.
///
/// Column `d` continues when the ancestor at depth `d` has a next sibling.
pub fn ancestor_continuations(tree: &NoteTree, id: NodeId) -> Vec<bool> {
    let depth = tree.node(id).depth();
    let mut columns = vec![false; depth.saturating_sub(1)];
    let mut current = tree.node(id).parent();
    while let Some(ancestor) = current {
        let d = tree.node(ancestor).depth();
        if d == 0 {
            break;
        }
        columns[d - 1] = has_next_sibling(tree, ancestor);
        current = tree.node(ancestor).parent();
    }
    columns
}
