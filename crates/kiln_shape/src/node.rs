//! Scene nodes
//!
//! Every node, group or shape, carries a [`NodeCore`]: its own placement
//! (position, rotation, scale), a center offset, an opacity and a
//! back-reference to its parent. The tree owns the nodes; parents are plain
//! handles, never owning pointers.

use kiln_core::{Affine2D, Point, Vec2};
use slotmap::new_key_type;

use crate::shape::Shape;

new_key_type! {
    /// Handle to a node in a [`SceneTree`](crate::SceneTree)
    pub struct NodeId;
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Core
// ─────────────────────────────────────────────────────────────────────────────

/// Placement and hierarchy data shared by every node
#[derive(Clone, Debug, PartialEq)]
pub struct NodeCore {
    position: Point,
    rotation: f32,
    scale: Vec2,
    center_offset: Vec2,
    opacity: f32,
    parent: Option<NodeId>,
    name: Option<String>,
}

impl Default for NodeCore {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            center_offset: Vec2::ZERO,
            opacity: 1.0,
            parent: None,
            name: None,
        }
    }
}

impl NodeCore {
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Translation applied before the node's own transform
    pub fn center_offset(&self) -> Vec2 {
        self.center_offset
    }

    pub fn set_center_offset(&mut self, offset: Vec2) {
        self.center_offset = offset;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to `0.0..=1.0`; NaN is treated as fully opaque
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// `translate(position) · rotate(rotation) · scale(scale)`
    pub fn local_transform(&self) -> Affine2D {
        let mut m = Affine2D::translation(self.position.x, self.position.y);
        if self.rotation != 0.0 {
            m = m.then(&Affine2D::rotation(self.rotation));
        }
        if self.scale != Vec2::ONE {
            m = m.then(&Affine2D::scale(self.scale.x, self.scale.y));
        }
        m
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Access to the shared node data, with builder-style setters
pub trait Node {
    fn core(&self) -> &NodeCore;
    fn core_mut(&mut self) -> &mut NodeCore;

    fn local_transform(&self) -> Affine2D {
        self.core().local_transform()
    }

    fn with_position(mut self, x: f32, y: f32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_position(Point::new(x, y));
        self
    }

    fn with_rotation(mut self, radians: f32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_rotation(radians);
        self
    }

    fn with_scale(mut self, sx: f32, sy: f32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_scale(Vec2::new(sx, sy));
        self
    }

    fn with_center_offset(mut self, x: f32, y: f32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_center_offset(Vec2::new(x, y));
        self
    }

    fn with_opacity(mut self, opacity: f32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_opacity(opacity);
        self
    }

    fn with_name(mut self, name: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_name(name);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Group
// ─────────────────────────────────────────────────────────────────────────────

/// Container node; only groups can have children
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    core: NodeCore,
    children: Vec<NodeId>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }
}

impl Node for Group {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene Node
// ─────────────────────────────────────────────────────────────────────────────

/// A node stored in the scene tree
#[derive(Debug)]
pub enum SceneNode {
    Group(Group),
    Shape(Shape),
}

impl SceneNode {
    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            SceneNode::Shape(shape) => Some(shape),
            SceneNode::Group(_) => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            SceneNode::Shape(shape) => Some(shape),
            SceneNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            SceneNode::Group(group) => Some(group),
            SceneNode::Shape(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            SceneNode::Group(group) => Some(group),
            SceneNode::Shape(_) => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            SceneNode::Group(group) => group.children(),
            SceneNode::Shape(_) => &[],
        }
    }
}

impl Node for SceneNode {
    fn core(&self) -> &NodeCore {
        match self {
            SceneNode::Group(group) => group.core(),
            SceneNode::Shape(shape) => shape.core(),
        }
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        match self {
            SceneNode::Group(group) => group.core_mut(),
            SceneNode::Shape(shape) => shape.core_mut(),
        }
    }
}

impl From<Group> for SceneNode {
    fn from(group: Group) -> Self {
        SceneNode::Group(group)
    }
}

impl From<Shape> for SceneNode {
    fn from(shape: Shape) -> Self {
        SceneNode::Shape(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_default_local_transform_is_identity() {
        assert!(NodeCore::default().local_transform().is_identity());
    }

    #[test]
    fn test_local_transform_order() {
        // scale first, then rotate, then translate
        let group = Group::new()
            .with_position(10.0, 0.0)
            .with_rotation(FRAC_PI_2)
            .with_scale(2.0, 2.0);
        let p = group
            .local_transform()
            .transform_point(Point::new(1.0, 0.0));
        assert!(approx(p, Point::new(10.0, 2.0)), "got {p:?}");
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut core = NodeCore::default();
        core.set_opacity(1.5);
        assert_eq!(core.opacity(), 1.0);
        core.set_opacity(-0.5);
        assert_eq!(core.opacity(), 0.0);
        core.set_opacity(f32::NAN);
        assert_eq!(core.opacity(), 1.0);
    }

    #[test]
    fn test_scene_node_accessors() {
        let node: SceneNode = Group::new().with_name("layer").into();
        assert!(node.as_group().is_some());
        assert!(node.as_shape().is_none());
        assert_eq!(node.core().name(), Some("layer"));
        assert!(node.children().is_empty());
    }
}
