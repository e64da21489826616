//! Annotated SVG: the classified subtrees regrouped into one `<g>` per category.
//!
//! Each claimed subtree is deep-copied (attributes, mixed text content, children) with the
//! transforms of its former ancestors folded into its own `transform`, so it renders where it
//! did in the source document.

use rackscan_core::tree::XLINK_NS;
use rackscan_core::{Category, ClassifiedObject, Content, Inventory, NodeId, ShapeTree};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const FLOOR_OPACITY: &str = "0.3";

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Identifier of a copied object; racks carry their color (`server-rack-3-red`).
pub fn annotated_id(obj: &ClassifiedObject, index: usize) -> String {
    match obj.rack_color() {
        Some(color) => format!("{}-{}", obj.id(index), color.as_str()),
        None => obj.id(index),
    }
}

pub fn title(inventory: &Inventory) -> String {
    let parts: Vec<String> = Category::ALL
        .into_iter()
        .filter(|&c| c != Category::Floor && c != Category::Other)
        .map(|c| format!("{} {}", inventory.objects(c).len(), c.label().to_lowercase()))
        .collect();
    format!("Semantic layers - {}", parts.join(", "))
}

pub fn write_annotated_svg(tree: &ShapeTree, inventory: &Inventory) -> crate::Result<String> {
    let root = tree.node(tree.root());
    let mut body = String::new();
    write!(body, "<title>{}</title>", escape_xml(&title(inventory)))?;

    if let Some(floor) = &inventory.floor {
        let mut overrides = placement(tree, floor.node);
        overrides.insert("id".to_string(), "floor-shape".to_string());
        overrides.insert("opacity".to_string(), FLOOR_OPACITY.to_string());
        write_subtree(&mut body, tree, floor.node, &overrides)?;
    }

    for category in Category::ALL {
        if category == Category::Floor {
            continue;
        }
        let objs = inventory.objects(category);
        if objs.is_empty() {
            continue;
        }
        write!(body, r#"<g id="{}">"#, category.layer())?;
        for (i, obj) in objs.iter().enumerate() {
            let mut overrides = placement(tree, obj.node);
            overrides.insert("id".to_string(), annotated_id(obj, i));
            write_subtree(&mut body, tree, obj.node, &overrides)?;
        }
        body.push_str("</g>");
    }

    if !inventory.grid_labels.is_empty() {
        body.push_str(r#"<g id="grid-coordinates">"#);
        for (i, &label) in inventory.grid_labels.iter().enumerate() {
            let mut overrides = placement(tree, label);
            overrides.insert("id".to_string(), format!("grid-coordinates-{i}"));
            write_subtree(&mut body, tree, label, &overrides)?;
        }
        body.push_str("</g>");
    }

    let mut out = String::with_capacity(body.len() + 256);
    out.push_str("<svg");
    if root.attr("xmlns").is_none() {
        write!(out, r#" xmlns="{SVG_NS}""#)?;
    }
    for prefix in used_prefixes(tree, inventory) {
        let declared = format!("xmlns:{prefix}");
        if root.attr(&declared).is_some() {
            continue;
        }
        let uri = match tree.namespace_uri(&prefix) {
            Some(uri) => uri,
            None if prefix == "xlink" => XLINK_NS,
            None => continue,
        };
        write!(out, r#" {declared}="{}""#, escape_xml(uri))?;
    }
    write_attrs(&mut out, &root.attrs)?;
    out.push('>');
    out.push_str(&body);
    out.push_str("</svg>\n");
    Ok(out)
}

/// Attribute prefixes used on the root or anywhere in the copied subtrees, `xml` excepted.
fn used_prefixes(tree: &ShapeTree, inventory: &Inventory) -> BTreeSet<String> {
    let copied = inventory
        .iter()
        .map(|obj| obj.node)
        .chain(inventory.grid_labels.iter().copied());
    let nodes = copied.flat_map(move |id| std::iter::once(id).chain(tree.descendants(id)));
    std::iter::once(tree.root())
        .chain(nodes)
        .flat_map(move |id| tree.node(id).attrs.keys())
        .filter_map(|name| name.split_once(':').map(|(prefix, _)| prefix))
        .filter(|&prefix| prefix != "xml" && prefix != "xmlns")
        .map(str::to_string)
        .collect()
}

/// `transform` override for `id` composed from its ancestors (outermost first, root excluded)
/// and its own transform. Empty when nothing needs to change.
fn placement(tree: &ShapeTree, id: NodeId) -> BTreeMap<String, String> {
    let mut parts: Vec<&str> = tree
        .ancestors(id)
        .filter(|&a| a != tree.root())
        .filter_map(|a| tree.node(a).attr("transform"))
        .filter(|t| !t.trim().is_empty())
        .collect();
    parts.reverse();

    let mut out = BTreeMap::new();
    if parts.is_empty() {
        return out;
    }
    if let Some(own) = tree.node(id).attr("transform").filter(|t| !t.trim().is_empty()) {
        parts.push(own);
    }
    out.insert("transform".to_string(), parts.join(" "));
    out
}

fn write_attrs(out: &mut String, attrs: &BTreeMap<String, String>) -> std::fmt::Result {
    for (k, v) in attrs {
        write!(out, r#" {k}="{}""#, escape_xml(v))?;
    }
    Ok(())
}

fn write_subtree(
    out: &mut String,
    tree: &ShapeTree,
    id: NodeId,
    overrides: &BTreeMap<String, String>,
) -> std::fmt::Result {
    let node = tree.node(id);
    let name = node.tag.name();
    let mut attrs = node.attrs.clone();
    attrs.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

    write!(out, "<{name}")?;
    write_attrs(out, &attrs)?;

    if node.content.is_empty() {
        return match node.text.as_deref() {
            Some(text) => write!(out, ">{}</{name}>", escape_xml(text)),
            None => out.write_str("/>"),
        };
    }
    out.push('>');
    let none = BTreeMap::new();
    for part in &node.content {
        match part {
            Content::Text(text) => out.push_str(&escape_xml(text)),
            Content::Child(child) => write_subtree(out, tree, *child, &none)?,
        }
    }
    write!(out, "</{name}>")
}
