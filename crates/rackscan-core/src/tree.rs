//! Read-only arena of SVG elements.
//!
//! The document is walked once on load; every element gets a stable [`NodeId`] and a parent
//! link, so upward navigation never requires rebuilding a parent map.

use crate::geom::parse_length;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Svg,
    Group,
    Line,
    Rect,
    Circle,
    Ellipse,
    Path,
    Text,
    Other(String),
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name {
            "svg" => Self::Svg,
            "g" => Self::Group,
            "line" => Self::Line,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "path" => Self::Path,
            "text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Svg => "svg",
            Self::Group => "g",
            Self::Line => "line",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Path => "path",
            Self::Text => "text",
            Self::Other(name) => name,
        }
    }
}

pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// One piece of an element's mixed content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Child(NodeId),
}

#[derive(Debug, Clone)]
pub struct ShapeNode {
    pub tag: Tag,
    /// Attributes keyed by qualified name (`fill`, `xml:space`, `xlink:href`).
    pub attrs: BTreeMap<String, String>,
    /// Concatenated, trimmed character data; only populated for `text` elements.
    pub text: Option<String>,
    /// Character data runs interleaved with child elements. Whitespace-only runs are kept
    /// inside `text` elements only.
    pub content: Vec<Content>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl ShapeNode {
    fn new(tag: Tag, parent: Option<NodeId>) -> Self {
        Self {
            tag,
            attrs: BTreeMap::new(),
            text: None,
            content: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Numeric attribute, defaulting to zero when absent or malformed.
    pub fn number(&self, name: &str) -> f64 {
        self.attr(name).and_then(parse_length).unwrap_or(0.0)
    }

    pub fn glyph_count(&self) -> usize {
        self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct ShapeTree {
    nodes: Vec<ShapeNode>,
    /// Namespace prefixes declared anywhere in the source, first declaration wins.
    namespaces: BTreeMap<String, String>,
}

impl ShapeTree {
    /// Parses SVG text into an arena. Fails only when the text is not well-formed XML or the
    /// root element is not `<svg>`.
    pub fn parse(svg: &str) -> Result<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(svg, opts).map_err(|e| Error::Load {
            message: e.to_string(),
        })?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(Error::NotSvg {
                root: root.tag_name().name().to_string(),
            });
        }

        let mut tree = Self {
            nodes: Vec::new(),
            namespaces: BTreeMap::new(),
        };
        tree.load_element(root, None, false);
        tracing::debug!(nodes = tree.nodes.len(), "loaded shape tree");
        Ok(tree)
    }

    /// Starts an empty document holding only an `<svg>` root with the given attributes.
    pub fn with_root<K, V>(attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut root = ShapeNode::new(Tag::Svg, None);
        root.attrs = attrs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            nodes: vec![root],
            namespaces: BTreeMap::new(),
        }
    }

    /// Appends a child element under `parent` and returns its id.
    pub fn append<K, V>(
        &mut self,
        parent: NodeId,
        tag: Tag,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let id = self.push(ShapeNode::new(tag, Some(parent)));
        self.nodes[id.index()].attrs = attrs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        id
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.index()].text = Some(text.into());
    }

    fn push(&mut self, node: ShapeNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(parent) = node.parent {
            let parent = &mut self.nodes[parent.index()];
            parent.children.push(id);
            parent.content.push(Content::Child(id));
        }
        self.nodes.push(node);
        id
    }

    fn load_element(
        &mut self,
        el: roxmltree::Node<'_, '_>,
        parent: Option<NodeId>,
        in_text: bool,
    ) -> NodeId {
        for ns in el.namespaces() {
            if let Some(prefix) = ns.name() {
                self.namespaces
                    .entry(prefix.to_string())
                    .or_insert_with(|| ns.uri().to_string());
            }
        }

        let mut node = ShapeNode::new(Tag::from_name(el.tag_name().name()), parent);
        for a in el.attributes() {
            node.attrs
                .insert(qualified_name(el, a.namespace(), a.name()), a.value().to_string());
        }
        if node.tag == Tag::Text {
            let text: String = el
                .descendants()
                .filter(|d| d.is_text())
                .filter_map(|d| d.text())
                .collect();
            node.text = Some(text.trim().to_string());
        }
        let in_text = in_text || node.tag == Tag::Text;

        let id = self.push(node);
        for child in el.children() {
            if child.is_element() {
                self.load_element(child, Some(id), in_text);
            } else if let Some(text) = child.text().filter(|_| child.is_text()) {
                if in_text || !text.trim().is_empty() {
                    self.nodes[id.index()]
                        .content
                        .push(Content::Text(text.to_string()));
                }
            }
        }
        id
    }

    /// Namespace URI bound to `prefix` in the source document.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => Some(XML_NS),
            _ => self.namespaces.get(prefix).map(String::as_str),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &ShapeNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ShapeNode)> + '_ {
        self.node(id)
            .children
            .iter()
            .map(move |&c| (c, self.node(c)))
    }

    /// Strict ancestors of `id`, nearest first, ending at the document root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.node(id).children.clone();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Descendants reachable from `id` without entering a nested `<g>`.
    ///
    /// Nested groups and everything below them are skipped; they are classified on their own.
    pub fn own_primitives(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            let node = self.node(cur);
            if node.tag == Tag::Group {
                continue;
            }
            out.push(cur);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}

pub struct Descendants<'a> {
    tree: &'a ShapeTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}

fn qualified_name(el: roxmltree::Node<'_, '_>, ns: Option<&str>, local: &str) -> String {
    let prefix = match ns {
        None => None,
        Some(XML_NS) => Some("xml"),
        Some(uri) => el
            .lookup_prefix(uri)
            .or((uri == XLINK_NS).then_some("xlink")),
    };
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local}"),
        _ => local.to_string(),
    }
}
