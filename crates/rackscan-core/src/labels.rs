use crate::tree::{NodeId, ShapeTree, Tag};

/// A label group holds more than this many texts.
pub const MIN_LABEL_TEXTS: usize = 10;
/// How many leading texts are checked for shortness.
pub const SAMPLED_LABELS: usize = 5;
pub const MAX_LABEL_GLYPHS: usize = 4;

/// Outermost groups that look like coordinate grid labels: many texts whose first few are
/// all short ("AA", "01", ...). Groups nested inside a match are not reported again.
pub fn find_grid_labels(tree: &ShapeTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        if tree.node(id).tag == Tag::Group && is_grid_label_group(tree, id) {
            out.push(id);
            continue;
        }
        stack.extend(tree.node(id).children.iter().rev().copied());
    }
    out
}

pub fn is_grid_label_group(tree: &ShapeTree, id: NodeId) -> bool {
    let texts: Vec<NodeId> = tree
        .descendants(id)
        .filter(|&d| tree.node(d).tag == Tag::Text)
        .collect();
    texts.len() > MIN_LABEL_TEXTS
        && texts
            .iter()
            .take(SAMPLED_LABELS)
            .all(|&t| tree.node(t).glyph_count() <= MAX_LABEL_GLYPHS)
}
