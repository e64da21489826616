//! Local-space extents of shape subtrees.
//!
//! Coordinates are taken as written; transforms inside the subtree are not applied.

use crate::geom::{BoundingBox, Point, point};
use crate::path;
use crate::tree::{NodeId, ShapeNode, ShapeTree, Tag};

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Average glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Box around `id` and every primitive below it. Empty when nothing measurable was found.
pub fn bounds(tree: &ShapeTree, id: NodeId) -> BoundingBox {
    let mut b = BoundingBox::EMPTY;
    include_node(&mut b, tree.node(id));
    for d in tree.descendants(id) {
        include_node(&mut b, tree.node(d));
    }
    b
}

/// Adds the points a single primitive contributes. Containers contribute nothing.
pub fn include_node(b: &mut BoundingBox, node: &ShapeNode) {
    match node.tag {
        Tag::Line => {
            b.include_point(node.number("x1"), node.number("y1"));
            b.include_point(node.number("x2"), node.number("y2"));
        }
        Tag::Rect => {
            let (x, y) = (node.number("x"), node.number("y"));
            b.include_point(x, y);
            b.include_point(x + node.number("width"), y + node.number("height"));
        }
        Tag::Circle => {
            let (cx, cy, r) = (node.number("cx"), node.number("cy"), node.number("r"));
            b.include_point(cx - r, cy - r);
            b.include_point(cx + r, cy + r);
        }
        Tag::Ellipse => {
            let (cx, cy) = (node.number("cx"), node.number("cy"));
            let (rx, ry) = (node.number("rx"), node.number("ry"));
            b.include_point(cx - rx, cy - ry);
            b.include_point(cx + rx, cy + ry);
        }
        Tag::Path => {
            if let Some(d) = node.attr("d") {
                for (x, y) in path::coordinate_pairs(d) {
                    b.include_point(x, y);
                }
            }
        }
        Tag::Text => {
            let (x, y) = (node.number("x"), node.number("y"));
            let font_size = font_size(node);
            b.include_point(x, y - font_size);
            b.include_point(x + estimated_text_width(node, font_size), y);
        }
        _ => {}
    }
}

pub fn font_size(node: &ShapeNode) -> f64 {
    node.attr("font-size")
        .and_then(crate::geom::parse_length)
        .filter(|v| *v > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

pub fn estimated_text_width(node: &ShapeNode, font_size: f64) -> f64 {
    node.glyph_count() as f64 * font_size * GLYPH_WIDTH_RATIO
}

/// First move-command coordinate of `id` if it is a path, else of its first direct path child
/// that has one.
pub fn anchor(tree: &ShapeTree, id: NodeId) -> Option<Point> {
    let node = tree.node(id);
    let candidates = std::iter::once(node).chain(tree.children(id).map(|(_, c)| c));
    candidates
        .filter(|n| n.tag == Tag::Path)
        .filter_map(|n| n.attr("d"))
        .find_map(path::first_move)
        .map(|(x, y)| point(x, y))
}
