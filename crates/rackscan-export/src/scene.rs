//! Pieces shared by the canvas exporters: stage size, layer order and primitive extraction.

use crate::color::normalize_color;
use indexmap::IndexMap;
use rackscan_core::classify::paint;
use rackscan_core::geom::parse_length;
use rackscan_core::{Category, ClassifiedObject, Inventory, NodeId, ShapeNode, ShapeTree, Tag};
use serde::Serialize;

pub const DEFAULT_WIDTH: f64 = 3660.0;
pub const DEFAULT_HEIGHT: f64 = 1417.0;

/// Stage size from the root `width`/`height`, else the `viewBox`, else the default canvas.
pub fn canvas_size(tree: &ShapeTree) -> (f64, f64) {
    let root = tree.node(tree.root());
    let view_box: Option<Vec<f64>> = root.attr("viewBox").map(|vb| {
        vb.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect()
    });
    let from_view_box = |i: usize| {
        view_box
            .as_ref()
            .filter(|v| v.len() == 4)
            .map(|v| v[i])
            .filter(|v| *v > 0.0)
    };

    let width = root
        .attr("width")
        .and_then(parse_length)
        .filter(|v| *v > 0.0)
        .or_else(|| from_view_box(2))
        .unwrap_or(DEFAULT_WIDTH);
    let height = root
        .attr("height")
        .and_then(parse_length)
        .filter(|v| *v > 0.0)
        .or_else(|| from_view_box(3))
        .unwrap_or(DEFAULT_HEIGHT);
    (width, height)
}

/// Non-empty categories, floor first, each with its objects.
pub fn layers(inventory: &Inventory) -> Vec<(Category, &[ClassifiedObject])> {
    Category::ALL
        .into_iter()
        .map(|c| (c, inventory.objects(c)))
        .filter(|(_, objs)| !objs.is_empty())
        .collect()
}

/// Display name such as `Server Rack 3` (1-based, for humans).
pub fn object_name(obj: &ClassifiedObject, index: usize) -> String {
    let words: Vec<String> = obj
        .category
        .slug()
        .split('-')
        .map(|w| match w {
            "pdu" => "PDU".to_string(),
            "ppc" => "PPC".to_string(),
            w => {
                let mut cs = w.chars();
                match cs.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + cs.as_str(),
                    None => String::new(),
                }
            }
        })
        .collect();
    format!("{} {}", words.join(" "), index + 1)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMetadata {
    pub total_elements: usize,
    pub element_counts: IndexMap<String, usize>,
    pub clickable: bool,
    pub grouped: bool,
}

impl SceneMetadata {
    pub fn of(inventory: &Inventory) -> Self {
        let element_counts: IndexMap<String, usize> = layers(inventory)
            .into_iter()
            .map(|(c, objs)| (c.layer().to_string(), objs.len()))
            .collect();
        Self {
            total_elements: inventory.len(),
            element_counts,
            clickable: true,
            grouped: true,
        }
    }
}

/// A drawable element below a claimed group, with paint resolved through the group.
#[derive(Debug, Clone)]
pub struct Primitive<'a> {
    pub id: NodeId,
    pub node: &'a ShapeNode,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Primitive<'_> {
    pub fn kind(&self) -> &'static str {
        match self.node.tag {
            Tag::Line => "line",
            Tag::Rect => "rect",
            Tag::Circle => "circle",
            Tag::Ellipse => "ellipse",
            Tag::Path => "path",
            Tag::Text => "text",
            _ => "shape",
        }
    }
}

fn is_drawable(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Line | Tag::Rect | Tag::Circle | Tag::Ellipse | Tag::Path | Tag::Text
    )
}

/// Every drawable below `group`, in document order. Nested groups are flattened.
pub fn primitives(tree: &ShapeTree, group: NodeId) -> Vec<Primitive<'_>> {
    tree.descendants(group)
        .filter(|&id| is_drawable(&tree.node(id).tag))
        .map(|id| Primitive {
            id,
            node: tree.node(id),
            fill: inherited(tree, id, group, "fill").and_then(|v| normalize_color(&v)),
            stroke: inherited(tree, id, group, "stroke").and_then(|v| normalize_color(&v)),
            stroke_width: inherited(tree, id, group, "stroke-width")
                .and_then(|v| parse_length(&v)),
        })
        .collect()
}

/// Nearest non-empty paint value on `id` or its ancestors, up to and including `group`.
fn inherited(tree: &ShapeTree, id: NodeId, group: NodeId, name: &str) -> Option<String> {
    let chain = std::iter::once(id).chain(tree.ancestors(id));
    let mut seen_group = false;
    chain
        .take_while(|&n| {
            let keep = !seen_group;
            seen_group |= n == group;
            keep
        })
        .map(|n| paint(tree.node(n), name))
        .find(|v| !v.is_empty())
}
