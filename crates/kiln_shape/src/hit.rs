//! Hit testing
//!
//! Two strategies, chosen per shape by its [`DetectionMode`]:
//!
//! - path: redraw the shape into a cleared probe surface and ask whether the
//!   point lies inside the path it traced (non-zero winding, surface space)
//! - pixel: look up the alpha of the shape's cached snapshot
//!
//! Both fail closed: anything that prevents an answer reports a miss.
//!
//! [`DetectionMode`]: crate::DetectionMode

use kiln_core::Point;
use kiln_paint::Surface;

use crate::node::NodeId;
use crate::render::render_shape;
use crate::style::DetectionMode;
use crate::tree::SceneTree;

/// Path-mode containment against a freshly traced outline
pub fn path_hit(tree: &SceneTree, probe: &mut dyn Surface, id: NodeId, point: Point) -> bool {
    probe.clear();
    if let Err(err) = render_shape(tree, id, probe) {
        tracing::warn!(?id, error = %err, "hit test treated as miss");
        return false;
    }
    probe.is_point_in_path(point.x, point.y)
}

/// Pixel-mode containment against the cached snapshot
pub fn pixel_hit(tree: &SceneTree, id: NodeId, point: Point) -> bool {
    tree.shape(id)
        .is_some_and(|shape| shape.pixel_cache().hit(point))
}

/// Containment using the shape's own detection mode
pub fn hit_test(tree: &SceneTree, probe: &mut dyn Surface, id: NodeId, point: Point) -> bool {
    let Some(shape) = tree.shape(id) else {
        return false;
    };
    match shape.detection_mode() {
        DetectionMode::Path => path_hit(tree, probe, id, point),
        DetectionMode::Pixel => pixel_hit(tree, id, point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawError;
    use crate::node::Node;
    use crate::shape::Shape;
    use kiln_paint::RecordingSurface;

    #[test]
    fn test_path_hit_rect() {
        let mut tree = SceneTree::new();
        let id = tree.insert_shape(Shape::rect(100.0, 100.0));
        let mut probe = RecordingSurface::new(200, 200);

        assert!(path_hit(&tree, &mut probe, id, Point::new(50.0, 50.0)));
        assert!(!path_hit(&tree, &mut probe, id, Point::new(150.0, 150.0)));
    }

    #[test]
    fn test_path_hit_follows_position() {
        let mut tree = SceneTree::new();
        let id = tree.insert_shape(Shape::rect(10.0, 10.0).with_position(100.0, 100.0));
        let mut probe = RecordingSurface::new(200, 200);

        assert!(path_hit(&tree, &mut probe, id, Point::new(105.0, 105.0)));
        assert!(!path_hit(&tree, &mut probe, id, Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_probe_is_cleared_between_queries() {
        let mut tree = SceneTree::new();
        let a = tree.insert_shape(Shape::rect(10.0, 10.0));
        let b = tree.insert_shape(Shape::new());
        let mut probe = RecordingSurface::new(20, 20);

        assert!(path_hit(&tree, &mut probe, a, Point::new(5.0, 5.0)));
        assert!(!path_hit(&tree, &mut probe, b, Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_failing_callback_misses() {
        let mut tree = SceneTree::new();
        let id = tree.insert_shape(Shape::new().with_draw_fn(|ctx| {
            ctx.rect(0.0, 0.0, 10.0, 10.0);
            Err(DrawError::failed("broken"))
        }));
        let mut probe = RecordingSurface::new(20, 20);
        assert!(!path_hit(&tree, &mut probe, id, Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_pixel_mode_without_snapshot_misses() {
        let mut tree = SceneTree::new();
        let mut shape = Shape::rect(10.0, 10.0);
        shape.set_detection_mode(DetectionMode::Pixel);
        let id = tree.insert_shape(shape);
        let mut probe = RecordingSurface::new(20, 20);

        assert!(!hit_test(&tree, &mut probe, id, Point::new(5.0, 5.0)));
    }
}
