//! Konva.js stage JSON: one layer per category, one draggable group per object.

use crate::scene::{self, Primitive, SceneMetadata};
use rackscan_core::bounds::font_size;
use rackscan_core::{ClassifiedObject, Inventory, ShapeTree, Tag};
use serde::Serialize;

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KonvaDocument {
    pub version: &'static str,
    pub source_file: String,
    pub stage: KonvaNode,
    pub metadata: SceneMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KonvaNode {
    pub class_name: &'static str,
    pub attrs: KonvaAttrs,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<KonvaNode>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KonvaAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
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
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listening: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack_color: Option<String>,
}

pub fn konva_document(tree: &ShapeTree, inventory: &Inventory, source_file: &str) -> KonvaDocument {
    let (width, height) = scene::canvas_size(tree);
    let layers = scene::layers(inventory)
        .into_iter()
        .map(|(category, objs)| KonvaNode {
            class_name: "Layer",
            attrs: KonvaAttrs {
                id: Some(format!("{}-layer", category.layer())),
                name: Some(format!("{} Layer", category.label())),
                visible: Some(true),
                ..KonvaAttrs::default()
            },
            children: objs
                .iter()
                .enumerate()
                .map(|(i, obj)| group_node(tree, obj, i))
                .collect(),
        })
        .collect();

    KonvaDocument {
        version: FORMAT_VERSION,
        source_file: source_file.to_string(),
        stage: KonvaNode {
            class_name: "Stage",
            attrs: KonvaAttrs {
                width: Some(width),
                height: Some(height),
                ..KonvaAttrs::default()
            },
            children: layers,
        },
        metadata: SceneMetadata::of(inventory),
    }
}

fn group_node(tree: &ShapeTree, obj: &ClassifiedObject, index: usize) -> KonvaNode {
    let id = obj.id(index);
    let name = scene::object_name(obj, index);
    let children = scene::primitives(tree, obj.node)
        .iter()
        .enumerate()
        .map(|(i, prim)| {
            let mut node = primitive_node(prim, obj.x, obj.y);
            node.attrs.id = Some(format!("{id}-{}-{i}", prim.kind()));
            node.attrs.name = Some(format!("{name} {}", prim.kind()));
            node
        })
        .collect();

    KonvaNode {
        class_name: "Group",
        attrs: KonvaAttrs {
            id: Some(id),
            name: Some(name),
            x: Some(obj.x),
            y: Some(obj.y),
            width: Some(obj.width),
            height: Some(obj.height),
            rotation: obj.rotation_degrees(),
            draggable: Some(true),
            listening: Some(true),
            element_type: Some(obj.category.slug().to_string()),
            rack_color: obj.rack_color().map(|c| c.as_str().to_string()),
            ..KonvaAttrs::default()
        },
        children,
    }
}

/// Konva node for one primitive, shifted into the group frame anchored at `(ox, oy)`.
fn primitive_node(prim: &Primitive<'_>, ox: f64, oy: f64) -> KonvaNode {
    let n = prim.node;
    let paint = KonvaAttrs {
        fill: prim.fill.clone(),
        stroke: prim.stroke.clone(),
        stroke_width: Some(prim.stroke_width.unwrap_or(1.0)),
        ..KonvaAttrs::default()
    };
    let (class_name, attrs) = match n.tag {
        Tag::Rect => (
            "Rect",
            KonvaAttrs {
                x: Some(n.number("x") - ox),
                y: Some(n.number("y") - oy),
                width: Some(n.number("width")),
                height: Some(n.number("height")),
                ..paint
            },
        ),
        Tag::Circle => (
            "Circle",
            KonvaAttrs {
                x: Some(n.number("cx") - ox),
                y: Some(n.number("cy") - oy),
                radius: Some(n.number("r")),
                ..paint
            },
        ),
        Tag::Ellipse => (
            "Ellipse",
            KonvaAttrs {
                x: Some(n.number("cx") - ox),
                y: Some(n.number("cy") - oy),
                radius_x: Some(n.number("rx")),
                radius_y: Some(n.number("ry")),
                ..paint
            },
        ),
        Tag::Line => (
            "Line",
            KonvaAttrs {
                points: Some(vec![
                    n.number("x1") - ox,
                    n.number("y1") - oy,
                    n.number("x2") - ox,
                    n.number("y2") - oy,
                ]),
                fill: None,
                ..paint
            },
        ),
        Tag::Path => (
            "Path",
            KonvaAttrs {
                x: Some(-ox),
                y: Some(-oy),
                data: Some(n.attr("d").unwrap_or_default().to_string()),
                ..paint
            },
        ),
        Tag::Text => (
            "Text",
            KonvaAttrs {
                x: Some(n.number("x") - ox),
                y: Some(n.number("y") - oy),
                text: Some(n.text.clone().unwrap_or_default()),
                font_size: Some(font_size(n)),
                font_family: Some(n.attr("font-family").unwrap_or("Arial").to_string()),
                fill: Some(prim.fill.clone().unwrap_or_else(|| "#000000".to_string())),
                stroke: None,
                stroke_width: None,
                ..KonvaAttrs::default()
            },
        ),
        _ => ("Shape", paint),
    };
    KonvaNode {
        class_name,
        attrs,
        children: Vec::new(),
    }
}
