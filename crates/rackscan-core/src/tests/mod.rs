mod bounds;
mod classify;
mod position;

use crate::{NodeId, ShapeTree, Tag};

pub(crate) fn load(body: &str) -> ShapeTree {
    ShapeTree::parse(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600">{body}</svg>"#
    ))
    .unwrap()
}

pub(crate) fn groups(tree: &ShapeTree) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| tree.node(id).tag == Tag::Group)
        .collect()
}

pub(crate) fn first_group(tree: &ShapeTree) -> NodeId {
    groups(tree)[0]
}

/// A bordered tile with `circles` four-curve circles: `circles + 1` moves, `4 * circles`
/// curves, one close.
pub(crate) fn tile_path(circles: usize) -> String {
    let mut d = String::from("M0,0 L40,0 L40,40 L0,40 Z");
    for i in 0..circles {
        let (cx, cy) = (5 + (i % 3) * 12, 5 + (i / 3) * 12);
        d.push_str(&format!(
            " M{cx},{y0} C{a},{y0} {b},{cy} {b},{cy} C{b},{c} {a},{d} {cx},{d} C{e},{d} {f},{c} {f},{cy} C{f},{g} {e},{y0} {cx},{y0}",
            y0 = cy - 3,
            a = cx + 2,
            b = cx + 3,
            c = cy + 2,
            d = cy + 3,
            e = cx - 2,
            f = cx - 3,
            g = cy - 2,
        ));
    }
    d
}
