#![deny(missing_docs)]

//! # Path Index
//!
//! Flattens a [`SchemaTree`] into a sorted map from slash joined path to
//! node id. The index is the generation work list: everything downstream
//! iterates it instead of re-walking the tree.

use std::collections::BTreeMap;

use crate::tree::{NodeId, SchemaTree};

/// Sorted map from slash joined tree path to the node it addresses.
pub type PathIndex = BTreeMap<String, NodeId>;

/// Indexes every payload carrying node reachable without crossing a `$ref`.
///
/// Structural nodes only shape the tree, so they are left out. A reference
/// node prunes its entire subtree: the definition it points at is indexed
/// under its own path. The root contributes no path element, so keys start
/// at the first level below it.
pub fn flatten_tree(tree: &SchemaTree) -> PathIndex {
    let mut index = PathIndex::new();
    let mut elements = Vec::new();
    collect_nodes(tree, tree.root(), &mut elements, &mut index);
    index
}

fn collect_nodes<'a>(
    tree: &'a SchemaTree,
    id: NodeId,
    elements: &mut Vec<&'a str>,
    index: &mut PathIndex,
) {
    let node = tree.node(id);
    if node.reference.is_some() {
        return;
    }
    if !node.payload.is_structural() {
        index.insert(elements.join("/"), id);
    }
    for child in node.children.values() {
        elements.push(tree.node(*child).path_element.as_str());
        collect_nodes(tree, *child, elements, index);
        elements.pop();
    }
}
