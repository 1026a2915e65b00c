//! Pre-order traversal over the catalog tree.
//!
//! Every consumer of the tree (sync, resolution, size accounting, rendering)
//! goes through these helpers instead of writing its own recursion. Visits are
//! deterministic: document order, parents before children, each node exactly
//! once.
//!
//! Mutable walks only hand out `&mut Component`. A component has no children,
//! so a visitor can flip selection and install flags but has no way to
//! restructure the tree. [`find_mut`] is the exception and returns the node
//! itself so a category can cascade to its descendants.

use crate::manifest::{Component, Node};

/// Pre-order iterator over a forest of nodes.
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> PreOrder<'a> {
    pub fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Category(category) = node {
            self.stack.extend(category.children.iter().rev());
        }
        Some(node)
    }
}

/// Iterate over every node in pre-order.
pub fn iter(roots: &[Node]) -> PreOrder<'_> {
    PreOrder::new(roots)
}

/// Iterate over every component in document order.
pub fn components(roots: &[Node]) -> impl Iterator<Item = &Component> {
    iter(roots).filter_map(Node::as_component)
}

/// Apply `visit` to every node in pre-order.
pub fn walk<F>(roots: &[Node], mut visit: F)
where
    F: FnMut(&Node),
{
    for node in iter(roots) {
        visit(node);
    }
}

/// Apply `visit` to every component in document order, allowing flag mutation.
pub fn walk_components_mut<F>(roots: &mut [Node], mut visit: F)
where
    F: FnMut(&mut Component),
{
    fn recurse<F: FnMut(&mut Component)>(nodes: &mut [Node], visit: &mut F) {
        for node in nodes {
            match node {
                Node::Component(component) => visit(component),
                Node::Category(category) => recurse(&mut category.children, visit),
            }
        }
    }

    recurse(roots, &mut visit);
}

/// Find a node by its hierarchical id, searching in pre-order.
pub fn find_mut<'a>(roots: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in roots {
        if node.info().id == id {
            return Some(node);
        }
        if let Node::Category(category) = node {
            if let Some(found) = find_mut(&mut category.children, id) {
                return Some(found);
            }
        }
    }
    None
}
