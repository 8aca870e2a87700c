#![deny(missing_docs)]

//! # Friendly Names
//!
//! Assigns each indexed node the shortest UpperCamelCase alias that is
//! unique across the whole document. Names are built from the node's path
//! suffix, extended one ancestor at a time until the collision resolves, so
//! `components/schemas/Pet` is just `Pet` unless something else competes
//! for that name. Ancestors with an element name (the `schemas` category
//! reads as `Schema`) contribute that instead of their raw path element.

use std::collections::{BTreeMap, BTreeSet};

use heck::ToUpperCamelCase;

use crate::flatten::PathIndex;
use crate::tree::{NodeId, SchemaTree};

/// Computes and stores a friendly name for every node in `index`.
///
/// Runs in rounds of growing suffix depth. A name is assigned once exactly
/// one unnamed node produces it and no earlier round claimed it. Nodes
/// whose full ancestry still collides with another node keep `None`; there
/// is no counter suffix to force apart names the document itself cannot
/// tell apart.
pub fn assign_friendly_names(tree: &mut SchemaTree, index: &PathIndex) {
    let chains: Vec<(NodeId, Vec<String>)> = index
        .values()
        .map(|id| (*id, display_chain(tree, *id)))
        .collect();
    let max_depth = chains.iter().map(|(_, chain)| chain.len()).max().unwrap_or(0);

    let mut named: BTreeSet<NodeId> = BTreeSet::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut assigned: Vec<(NodeId, String)> = Vec::new();

    for depth in 1..=max_depth {
        let mut candidates: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
        for (id, chain) in &chains {
            if !named.contains(id) {
                candidates.entry(candidate_name(chain, depth)).or_default().push(*id);
            }
        }

        for (name, ids) in candidates {
            if let [only] = ids.as_slice() {
                if !taken.contains(&name) {
                    named.insert(*only);
                    taken.insert(name.clone());
                    assigned.push((*only, name));
                }
            }
        }
    }

    for (id, name) in assigned {
        tree.node_mut(id).friendly_name = Some(name);
    }
}

/// The displayed ancestry of a node, root first, the node itself last. The
/// root is synthetic and contributes nothing.
fn display_chain(tree: &SchemaTree, id: NodeId) -> Vec<String> {
    let mut elements = Vec::new();
    let mut current = id;
    loop {
        let node = tree.node(current);
        let parent = match node.parent {
            Some(parent) => parent,
            None => break,
        };
        elements.push(
            node.element_name
                .clone()
                .unwrap_or_else(|| node.path_element.clone()),
        );
        current = parent;
    }
    elements.reverse();
    elements
}

/// The candidate at a given suffix depth: the last `depth` chain entries,
/// each camel cased, concatenated. Chains shorter than `depth` stop
/// growing and keep producing their full name.
fn candidate_name(chain: &[String], depth: usize) -> String {
    let start = chain.len().saturating_sub(depth);
    chain[start..]
        .iter()
        .map(|element| element.to_upper_camel_case())
        .collect()
}
