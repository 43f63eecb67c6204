//! Scene tree
//!
//! Slotmap-backed storage for groups and shapes. The tree owns every node;
//! groups hold ordered child handles and each node holds its parent handle.

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{Result, SceneError};
use crate::node::{Group, Node, NodeId, SceneNode};
use crate::shape::Shape;

/// Ancestor chain, root first; inline for typical nesting depths
pub type AncestorChain = SmallVec<[NodeId; 8]>;

/// Owner of all scene nodes
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Insertion and Lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a detached node
    pub fn insert(&mut self, node: impl Into<SceneNode>) -> NodeId {
        let mut node = node.into();
        node.core_mut().set_parent(None);
        if let SceneNode::Group(group) = &mut node {
            // children of an inserted group are not in this tree yet
            group.clear_children();
        }
        self.nodes.insert(node)
    }

    pub fn insert_group(&mut self, group: Group) -> NodeId {
        self.insert(group)
    }

    pub fn insert_shape(&mut self, shape: Shape) -> NodeId {
        self.insert(shape)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.nodes.get(id).and_then(SceneNode::as_shape)
    }

    pub fn shape_mut(&mut self, id: NodeId) -> Option<&mut Shape> {
        self.nodes.get_mut(id).and_then(SceneNode::as_shape_mut)
    }

    pub fn group(&self, id: NodeId) -> Option<&Group> {
        self.nodes.get(id).and_then(SceneNode::as_group)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.core().parent())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(SceneNode::children).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structure
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach `child` as the last child of `parent`, moving it from any
    /// previous parent
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        match self.nodes.get(parent) {
            None => return Err(SceneError::NodeNotFound(parent)),
            Some(SceneNode::Shape(_)) => return Err(SceneError::NotAContainer(parent)),
            Some(SceneNode::Group(_)) => {}
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.unlink(child);
        if let Some(group) = self.nodes.get_mut(parent).and_then(SceneNode::as_group_mut) {
            group.push_child(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.core_mut().set_parent(Some(parent));
        }
        tracing::trace!(?parent, ?child, "attached node");
        Ok(())
    }

    /// Detach a node from its parent; it stays in the tree as a root
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        self.unlink(id);
        Ok(())
    }

    /// Remove a node and its whole subtree, returning the removed node
    pub fn remove(&mut self, id: NodeId) -> Result<SceneNode> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        self.unlink(id);

        let mut pending: Vec<NodeId> = self.children(id).to_vec();
        while let Some(next) = pending.pop() {
            pending.extend_from_slice(self.children(next));
            self.nodes.remove(next);
        }
        self.nodes
            .remove(id)
            .ok_or(SceneError::NodeNotFound(id))
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(group) = self.nodes.get_mut(parent).and_then(SceneNode::as_group_mut) {
            group.remove_child(id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.core_mut().set_parent(None);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Chain from the root down to `id` inclusive; empty for stale handles
    pub fn ancestors(&self, id: NodeId) -> AncestorChain {
        let mut chain = AncestorChain::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            chain.push(node_id);
            current = node.core().parent();
        }
        chain.reverse();
        chain
    }

    /// Own opacity times every ancestor's opacity
    pub fn absolute_opacity(&self, id: NodeId) -> f32 {
        self.ancestors(id)
            .iter()
            .filter_map(|&n| self.nodes.get(n))
            .map(|n| n.core().opacity())
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SceneTree, NodeId, NodeId, NodeId) {
        let mut tree = SceneTree::new();
        let root = tree.insert_group(Group::new().with_opacity(0.5));
        let layer = tree.insert_group(Group::new().with_opacity(0.5));
        let shape = tree.insert_shape(Shape::rect(10.0, 10.0));
        tree.add_child(root, layer).unwrap();
        tree.add_child(layer, shape).unwrap();
        (tree, root, layer, shape)
    }

    #[test]
    fn test_ancestors_root_first() {
        let (tree, root, layer, shape) = sample();
        assert_eq!(tree.ancestors(shape).as_slice(), &[root, layer, shape]);
        assert_eq!(tree.ancestors(root).as_slice(), &[root]);
    }

    #[test]
    fn test_absolute_opacity() {
        let (tree, _, _, shape) = sample();
        assert_eq!(tree.absolute_opacity(shape), 0.25);
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let (mut tree, root, layer, shape) = sample();
        tree.add_child(root, shape).unwrap();

        assert_eq!(tree.parent(shape), Some(root));
        assert_eq!(tree.children(root), &[layer, shape]);
        assert!(tree.children(layer).is_empty());
    }

    #[test]
    fn test_add_child_rejections() {
        let (mut tree, root, layer, shape) = sample();
        let other = tree.insert_shape(Shape::new());

        assert_eq!(
            tree.add_child(shape, other),
            Err(SceneError::NotAContainer(shape))
        );
        assert_eq!(
            tree.add_child(layer, root),
            Err(SceneError::Cycle {
                parent: layer,
                child: root
            })
        );
        assert_eq!(
            tree.add_child(root, root),
            Err(SceneError::Cycle {
                parent: root,
                child: root
            })
        );
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, root, layer, shape) = sample();
        tree.remove(layer).unwrap();

        assert!(!tree.contains(layer));
        assert!(!tree.contains(shape));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.add_child(root, shape),
            Err(SceneError::NodeNotFound(shape))
        );
    }

    #[test]
    fn test_detach_makes_root() {
        let (mut tree, _, layer, shape) = sample();
        tree.detach(shape).unwrap();
        assert_eq!(tree.parent(shape), None);
        assert!(tree.children(layer).is_empty());
        assert_eq!(tree.absolute_opacity(shape), 1.0);
    }

    #[test]
    fn test_stale_handle_queries() {
        let (mut tree, _, _, shape) = sample();
        tree.remove(shape).unwrap();
        assert!(tree.ancestors(shape).is_empty());
        assert!(tree.shape(shape).is_none());
        assert_eq!(tree.detach(shape), Err(SceneError::NodeNotFound(shape)));
    }
}
