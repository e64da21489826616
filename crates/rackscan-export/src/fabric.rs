//! Fabric.js canvas JSON.
//!
//! Fabric positions shapes by their top-left corner (`left`/`top`) and stores paths as arrays of
//! `[command, args...]`.

use crate::scene::{self, Primitive, SceneMetadata};
use indexmap::IndexMap;
use rackscan_core::bounds::font_size;
use rackscan_core::path::segments;
use rackscan_core::{ClassifiedObject, Inventory, ShapeTree, Tag};
use serde::ser::{Serialize, SerializeSeq, Serializer};

pub const FORMAT_VERSION: &str = "1.0";
pub const FABRIC_VERSION: &str = "5.3.0";
pub const BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricDocument {
    pub version: &'static str,
    pub source_file: String,
    pub canvas: FabricCanvas,
    /// Layer name to the ids of its groups.
    pub layers: IndexMap<String, Vec<String>>,
    pub metadata: SceneMetadata,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FabricCanvas {
    pub version: &'static str,
    pub objects: Vec<FabricObject>,
    pub background: &'static str,
    pub width: f64,
    pub height: f64,
}

/// One `[command, args...]` entry of a Fabric path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub command: char,
    pub args: Vec<f64>,
}

impl Serialize for PathCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.args.len() + 1))?;
        seq.serialize_element(&self.command)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}

pub fn parse_path(d: &str) -> Vec<PathCommand> {
    segments(d)
        .into_iter()
        .map(|(command, args)| PathCommand { command, args })
        .collect()
}

#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricObject {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evented: Option<bool>,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<FabricObject>,
}

pub fn fabric_document(
    tree: &ShapeTree,
    inventory: &Inventory,
    source_file: &str,
) -> FabricDocument {
    let (width, height) = scene::canvas_size(tree);
    let mut objects = Vec::new();
    let mut layers: IndexMap<String, Vec<String>> = IndexMap::new();

    for (category, objs) in scene::layers(inventory) {
        let ids = layers.entry(category.layer().to_string()).or_default();
        for (i, obj) in objs.iter().enumerate() {
            let mut group = group_object(tree, obj, i);
            group.layer = Some(category.layer().to_string());
            ids.push(group.id.clone());
            objects.push(group);
        }
    }

    FabricDocument {
        version: FORMAT_VERSION,
        source_file: source_file.to_string(),
        canvas: FabricCanvas {
            version: FABRIC_VERSION,
            objects,
            background: BACKGROUND,
            width,
            height,
        },
        layers,
        metadata: SceneMetadata::of(inventory),
    }
}

fn group_object(tree: &ShapeTree, obj: &ClassifiedObject, index: usize) -> FabricObject {
    let id = obj.id(index);
    let name = scene::object_name(obj, index);
    let objects = scene::primitives(tree, obj.node)
        .iter()
        .enumerate()
        .map(|(i, prim)| {
            let mut child = primitive_object(prim, obj.x, obj.y);
            child.id = format!("{id}-{}-{i}", prim.kind());
            child.name = format!("{name} {}", prim.kind());
            child
        })
        .collect();

    FabricObject {
        kind: "group",
        left: Some(obj.x),
        top: Some(obj.y),
        width: Some(obj.width),
        height: Some(obj.height),
        angle: obj.rotation_degrees(),
        selectable: Some(true),
        evented: Some(true),
        id,
        name,
        element_type: Some(obj.category.slug().to_string()),
        original_index: Some(index),
        rack_color: obj.rack_color().map(|c| c.as_str().to_string()),
        objects,
        ..FabricObject::default()
    }
}

fn primitive_object(prim: &Primitive<'_>, ox: f64, oy: f64) -> FabricObject {
    let n = prim.node;
    let paint = FabricObject {
        kind: prim.kind(),
        fill: prim.fill.clone(),
        stroke: prim.stroke.clone(),
        stroke_width: Some(prim.stroke_width.unwrap_or(1.0)),
        ..FabricObject::default()
    };
    match n.tag {
        Tag::Rect => FabricObject {
            left: Some(n.number("x") - ox),
            top: Some(n.number("y") - oy),
            width: Some(n.number("width")),
            height: Some(n.number("height")),
            ..paint
        },
        Tag::Circle => {
            let r = n.number("r");
            FabricObject {
                left: Some(n.number("cx") - ox - r),
                top: Some(n.number("cy") - oy - r),
                radius: Some(r),
                ..paint
            }
        }
        Tag::Ellipse => {
            let (rx, ry) = (n.number("rx"), n.number("ry"));
            FabricObject {
                left: Some(n.number("cx") - ox - rx),
                top: Some(n.number("cy") - oy - ry),
                rx: Some(rx),
                ry: Some(ry),
                ..paint
            }
        }
        Tag::Line => FabricObject {
            x1: Some(n.number("x1") - ox),
            y1: Some(n.number("y1") - oy),
            x2: Some(n.number("x2") - ox),
            y2: Some(n.number("y2") - oy),
            fill: None,
            stroke: Some(prim.stroke.clone().unwrap_or_else(|| "#000000".to_string())),
            ..paint
        },
        Tag::Path => FabricObject {
            left: Some(-ox),
            top: Some(-oy),
            path: Some(parse_path(n.attr("d").unwrap_or_default())),
            ..paint
        },
        Tag::Text => FabricObject {
            left: Some(n.number("x") - ox),
            top: Some(n.number("y") - oy),
            text: Some(n.text.clone().unwrap_or_default()),
            font_size: Some(font_size(n)),
            font_family: Some(n.attr("font-family").unwrap_or("Arial").to_string()),
            fill: Some(prim.fill.clone().unwrap_or_else(|| "#000000".to_string())),
            stroke: None,
            stroke_width: None,
            ..paint
        },
        _ => paint,
    }
}
