//! Signature predicates for floor-plan groups.
//!
//! Every predicate looks only at the group's own attributes and the primitives below it; none
//! of them walks outside the subtree. Overlaps are settled by [`Category::PRECEDENCE`].

use crate::config::ScanOptions;
use crate::path::{self, CommandCounts};
use crate::tree::{NodeId, ShapeNode, ShapeTree, Tag};
use serde::{Deserialize, Serialize};

/// Signature colors, written without whitespace.
pub mod palette {
    pub const ROW_BEIGE: &str = "rgb(224,224,215)";
    pub const RACK_RED: &str = "rgb(230,0,0)";
    pub const RACK_GRAY: &str = "rgb(110,110,110)";
    pub const COOLING_BLUES: [&str; 2] = ["rgb(62,153,223)", "rgb(171,211,241)"];
    pub const PDU_GREENS: [&str; 2] = ["rgb(103,203,51)", "rgb(189,232,167)"];
    pub const COLUMN_GRAYS: [&str; 2] = ["rgb(230,230,230)", "rgb(145,145,145)"];
    pub const DOOR_BLACK: &str = "rgb(0,0,0)";
    pub const FLOOR_SILVER: &str = "silver";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Floor,
    Row,
    Wall,
    Door,
    Column,
    PduPpc,
    ServerRack,
    CoolingUnit,
    CoolingTile,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Floor,
        Category::Row,
        Category::Wall,
        Category::Door,
        Category::Column,
        Category::PduPpc,
        Category::ServerRack,
        Category::CoolingUnit,
        Category::CoolingTile,
        Category::Other,
    ];

    /// Evaluation order; the first matching predicate wins.
    pub const PRECEDENCE: [Category; 9] = [
        Category::Floor,
        Category::ServerRack,
        Category::CoolingUnit,
        Category::CoolingTile,
        Category::PduPpc,
        Category::Column,
        Category::Wall,
        Category::Door,
        Category::Row,
    ];

    /// Singular identifier stem, e.g. `server-rack`.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Floor => "floor",
            Category::Row => "row",
            Category::Wall => "wall",
            Category::Door => "door",
            Category::Column => "column",
            Category::PduPpc => "pdu-ppc",
            Category::ServerRack => "server-rack",
            Category::CoolingUnit => "cooling-unit",
            Category::CoolingTile => "cooling-tile",
            Category::Other => "other",
        }
    }

    /// Plural layer name, e.g. `server-racks`.
    pub fn layer(self) -> &'static str {
        match self {
            Category::Floor => "floor",
            Category::Row => "rows",
            Category::Wall => "walls",
            Category::Door => "doors",
            Category::Column => "columns",
            Category::PduPpc => "pdus-ppcs",
            Category::ServerRack => "server-racks",
            Category::CoolingUnit => "cooling-units",
            Category::CoolingTile => "cooling-tiles",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Floor => "Floor",
            Category::Row => "Rows",
            Category::Wall => "Walls",
            Category::Door => "Doors",
            Category::Column => "Columns",
            Category::PduPpc => "PDUs/PPCs",
            Category::ServerRack => "Server Racks",
            Category::CoolingUnit => "Cooling Units",
            Category::CoolingTile => "Cooling Tiles",
            Category::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RackColor {
    Red,
    Gray,
}

impl RackColor {
    pub fn as_str(self) -> &'static str {
        match self {
            RackColor::Red => "red",
            RackColor::Gray => "gray",
        }
    }
}

/// Paint value of `name`, from the attribute or else the inline `style`, with whitespace
/// removed and ASCII lowercased.
pub fn paint(node: &ShapeNode, name: &str) -> String {
    let raw = node.attr(name).or_else(|| style_declaration(node, name));
    raw.unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn style_declaration<'a>(node: &'a ShapeNode, name: &str) -> Option<&'a str> {
    node.attr("style")?.split(';').find_map(|decl| {
        let (k, v) = decl.split_once(':')?;
        (k.trim() == name).then(|| v.trim())
    })
}

/// `fill-opacity` as a number. Absent means fully opaque; unparseable yields `None`.
fn fill_opacity(node: &ShapeNode) -> Option<f64> {
    match node.attr("fill-opacity") {
        None => Some(1.0),
        Some(raw) => raw.trim().parse::<f64>().ok(),
    }
}

fn opacity_within(node: &ShapeNode, lo: f64, hi: f64) -> bool {
    fill_opacity(node).is_some_and(|o| (lo..=hi).contains(&o))
}

fn fill_or_stroke_has(node: &ShapeNode, colors: &[&str]) -> bool {
    let fill = paint(node, "fill");
    let stroke = paint(node, "stroke");
    colors
        .iter()
        .any(|c| fill.contains(c) || stroke.contains(c))
}

fn has_line_and_path_children(tree: &ShapeTree, id: NodeId) -> bool {
    let mut line = false;
    let mut path = false;
    for (_, child) in tree.children(id) {
        match child.tag {
            Tag::Line => line = true,
            Tag::Path => path = true,
            _ => {}
        }
    }
    line && path
}

fn own_paths<'a>(tree: &'a ShapeTree, id: NodeId) -> impl Iterator<Item = &'a ShapeNode> + 'a {
    tree.own_primitives(id)
        .into_iter()
        .map(move |n| tree.node(n))
        .filter(|n| n.tag == Tag::Path)
}

fn path_data(node: &ShapeNode) -> &str {
    node.attr("d").unwrap_or_default()
}

pub fn is_floor(tree: &ShapeTree, id: NodeId) -> bool {
    if !paint(tree.node(id), "fill").contains(palette::FLOOR_SILVER) {
        return false;
    }
    own_paths(tree, id).any(|p| {
        let d = path_data(p);
        d.len() > 200 && path::max_integer(d).is_some_and(|n| n > 1000)
    })
}

/// Rack color when `id` looks like a server rack. Red wins when both colors appear.
pub fn server_rack_color(tree: &ShapeTree, id: NodeId) -> Option<RackColor> {
    let node = tree.node(id);
    let color = if fill_or_stroke_has(node, &[palette::RACK_RED]) {
        RackColor::Red
    } else if fill_or_stroke_has(node, &[palette::RACK_GRAY]) {
        RackColor::Gray
    } else {
        return None;
    };
    has_line_and_path_children(tree, id).then_some(color)
}

pub fn is_cooling_unit(tree: &ShapeTree, id: NodeId) -> bool {
    fill_or_stroke_has(tree.node(id), &palette::COOLING_BLUES)
        && has_line_and_path_children(tree, id)
}

pub fn is_cooling_tile(tree: &ShapeTree, id: NodeId, options: &ScanOptions) -> bool {
    own_paths(tree, id).any(|p| {
        options
            .tile_pattern
            .matches(&CommandCounts::of(path_data(p)))
    })
}

pub fn is_pdu_ppc(tree: &ShapeTree, id: NodeId) -> bool {
    fill_or_stroke_has(tree.node(id), &palette::PDU_GREENS) && has_line_and_path_children(tree, id)
}

pub fn is_column(tree: &ShapeTree, id: NodeId) -> bool {
    if !fill_or_stroke_has(tree.node(id), &palette::COLUMN_GRAYS) {
        return false;
    }
    let paths: Vec<&ShapeNode> = tree
        .children(id)
        .map(|(_, c)| c)
        .filter(|c| c.tag == Tag::Path)
        .collect();
    paths
        .iter()
        .any(|p| CommandCounts::of(path_data(p)).closes > 0)
        || (1..=2).contains(&paths.len())
}

/// True when the group fill carries a color claimed by another category.
fn has_foreign_signature_fill(node: &ShapeNode) -> bool {
    let fill = paint(node, "fill");
    let mut colors: Vec<&str> = vec![
        palette::ROW_BEIGE,
        palette::RACK_RED,
        palette::RACK_GRAY,
        palette::DOOR_BLACK,
        palette::FLOOR_SILVER,
    ];
    colors.extend(palette::COOLING_BLUES);
    colors.extend(palette::PDU_GREENS);
    colors.extend(palette::COLUMN_GRAYS);
    colors.iter().any(|c| fill.contains(c))
}

pub fn is_wall(tree: &ShapeTree, id: NodeId) -> bool {
    if has_foreign_signature_fill(tree.node(id)) {
        return false;
    }
    own_paths(tree, id)
        .any(|p| paint(p, "fill") == "none" && CommandCounts::of(path_data(p)).lines >= 1)
}

pub fn is_door(tree: &ShapeTree, id: NodeId) -> bool {
    let node = tree.node(id);
    let fill = paint(node, "fill");
    let black = fill.contains(palette::DOOR_BLACK) || fill.contains("black");
    if !(black && opacity_within(node, 0.5, 0.8)) {
        return false;
    }
    own_paths(tree, id).any(|p| CommandCounts::of(path_data(p)).arcs >= 1)
}

pub fn is_row(tree: &ShapeTree, id: NodeId) -> bool {
    let node = tree.node(id);
    if !(paint(node, "fill").contains(palette::ROW_BEIGE) && opacity_within(node, 0.3, 0.5)) {
        return false;
    }
    own_paths(tree, id).any(|p| {
        let d = path_data(p);
        let counts = CommandCounts::of(d);
        if counts.lines == 0 || counts.closes == 0 {
            return false;
        }
        let b = path::bounds(d);
        b.height() > b.width() * 2.0
    })
}

/// Evaluates a single category predicate. `Other` never matches.
pub fn matches(tree: &ShapeTree, id: NodeId, category: Category, options: &ScanOptions) -> bool {
    match category {
        Category::Floor => is_floor(tree, id),
        Category::ServerRack => server_rack_color(tree, id).is_some(),
        Category::CoolingUnit => is_cooling_unit(tree, id),
        Category::CoolingTile => is_cooling_tile(tree, id, options),
        Category::PduPpc => is_pdu_ppc(tree, id),
        Category::Column => is_column(tree, id),
        Category::Wall => is_wall(tree, id),
        Category::Door => is_door(tree, id),
        Category::Row => is_row(tree, id),
        Category::Other => false,
    }
}

/// Every category whose predicate holds for `id`, in precedence order.
pub fn matching_categories(tree: &ShapeTree, id: NodeId, options: &ScanOptions) -> Vec<Category> {
    Category::PRECEDENCE
        .into_iter()
        .filter(|&c| matches(tree, id, c, options))
        .collect()
}

/// Category of a group after precedence; `Other` when no predicate matches or `id` is not a
/// group.
pub fn classify(tree: &ShapeTree, id: NodeId, options: &ScanOptions) -> Category {
    if tree.node(id).tag != Tag::Group {
        return Category::Other;
    }
    let hit = Category::PRECEDENCE
        .into_iter()
        .find(|&c| matches(tree, id, c, options))
        .unwrap_or(Category::Other);
    tracing::trace!(node = id.index(), category = ?hit, "classified group");
    hit
}
