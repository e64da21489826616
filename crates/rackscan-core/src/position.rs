use crate::bounds::{anchor, bounds};
use crate::geom::{Point, point};
use crate::transform::compose_to_root;
use crate::tree::{NodeId, ShapeTree};

/// Local reference point of `id`: its anchor, else the top-left of its bounds, else the origin.
pub fn local_point(tree: &ShapeTree, id: NodeId) -> Point {
    anchor(tree, id)
        .or_else(|| bounds(tree, id).min())
        .unwrap_or_else(|| point(0.0, 0.0))
}

/// Absolute placement of `id`: its local point carried through the transforms of the node
/// and each ancestor below `root`.
///
/// This is the transformed anchor, not necessarily the rendered top-left corner.
pub fn resolve_position(tree: &ShapeTree, id: NodeId, root: NodeId) -> Point {
    let local = local_point(tree, id);
    let p = compose_to_root(tree, id, root, local);
    tracing::trace!(node = id.index(), x = p.x, y = p.y, "resolved position");
    p
}
