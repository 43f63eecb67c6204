//! Shape rendering
//!
//! One draw pass of one shape: the surface state is saved, the composite
//! transform, opacity and line join are applied, the geometry callback runs,
//! and the state is restored on every exit path.

use kiln_paint::{Surface, SurfaceExt};

use crate::context::ShapeContext;
use crate::error::RenderError;
use crate::node::NodeId;
use crate::transform::compose_transform;
use crate::tree::SceneTree;

/// Draw a shape onto `surface`
///
/// Stale handles, groups and shapes without a geometry callback draw
/// nothing. A failing callback is reported after the surface state has been
/// restored. The surface's current path is left as the callback built it.
pub fn render_shape(
    tree: &SceneTree,
    id: NodeId,
    surface: &mut dyn Surface,
) -> Result<(), RenderError> {
    let Some(shape) = tree.shape(id) else {
        tracing::trace!(?id, "render skipped: not a shape");
        return Ok(());
    };
    let Some(draw) = shape.draw_fn() else {
        tracing::trace!(?id, "render skipped: no geometry callback");
        return Ok(());
    };

    let composite = compose_transform(tree, id);
    let alpha = tree.absolute_opacity(id);

    let mut guard = surface.saved();
    guard.transform(&composite);
    if alpha != 1.0 {
        guard.set_global_alpha(alpha);
    }
    guard.set_line_join(shape.style().line_join);

    let mut ctx = ShapeContext::new(&mut *guard, shape.style());
    let result = draw(&mut ctx);
    drop(guard);

    result.map_err(|source| {
        tracing::debug!(?id, error = %source, "geometry callback failed");
        RenderError::Draw { node: id, source }
    })
}
