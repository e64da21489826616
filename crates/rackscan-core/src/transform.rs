//! `transform` attribute parsing and point composition.
//!
//! This is intentionally not full SVG transform-list semantics: a `matrix(...)` replaces every
//! other component, and otherwise scale is applied before translate regardless of the order the
//! functions appear in the attribute.

use crate::geom::{Point, Transform, point};
use crate::tree::{NodeId, ShapeTree};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub(crate) const NUM: &str = r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?";

fn re_translate() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(&format!(r"translate\s*\(\s*({NUM})(?:\s*[,\s]\s*({NUM}))?\s*\)"))
            .expect("valid regex")
    })
}

fn re_scale() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(&format!(r"scale\s*\(\s*({NUM})(?:\s*[,\s]\s*({NUM}))?\s*\)"))
            .expect("valid regex")
    })
}

fn re_rotate() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(&format!(r"rotate\s*\(\s*({NUM})")).expect("valid regex"))
}

fn re_matrix() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        let sep = r"\s*[,\s]\s*";
        Regex::new(&format!(
            r"matrix\s*\(\s*({NUM}){sep}({NUM}){sep}({NUM}){sep}({NUM}){sep}({NUM}){sep}({NUM})\s*\)"
        ))
        .expect("valid regex")
    })
}

fn capture_f64(caps: &regex::Captures<'_>, i: usize) -> Option<f64> {
    caps.get(i)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformRecord {
    pub translate: (f64, f64),
    pub scale: (f64, f64),
    /// Rotation angle in degrees. Not applied to points; kept for orientation reporting.
    pub rotate: f64,
    /// `(a, b, c, d, e, f)` of a `matrix(...)` function.
    pub matrix: Option<[f64; 6]>,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformRecord {
    pub const IDENTITY: Self = Self {
        translate: (0.0, 0.0),
        scale: (1.0, 1.0),
        rotate: 0.0,
        matrix: None,
    };

    /// Extracts each component independently; anything missing or malformed stays at identity.
    pub fn parse(s: &str) -> Self {
        let mut out = Self::IDENTITY;

        if let Some(caps) = re_translate().captures(s) {
            if let Some(tx) = capture_f64(&caps, 1) {
                out.translate = (tx, capture_f64(&caps, 2).unwrap_or(0.0));
            }
        }
        if let Some(caps) = re_scale().captures(s) {
            if let Some(sx) = capture_f64(&caps, 1) {
                out.scale = (sx, capture_f64(&caps, 2).unwrap_or(sx));
            }
        }
        if let Some(caps) = re_rotate().captures(s) {
            if let Some(angle) = capture_f64(&caps, 1) {
                out.rotate = angle;
            }
        }
        if let Some(caps) = re_matrix().captures(s) {
            let mut m = [0.0; 6];
            let complete = m
                .iter_mut()
                .enumerate()
                .all(|(i, slot)| match capture_f64(&caps, i + 1) {
                    Some(v) => {
                        *slot = v;
                        true
                    }
                    None => false,
                });
            if complete {
                out.matrix = Some(m);
            }
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, p: Point) -> Point {
        if let Some([a, b, c, d, e, f]) = self.matrix {
            return Transform::new(a, b, c, d, e, f).transform_point(p);
        }
        point(
            p.x * self.scale.0 + self.translate.0,
            p.y * self.scale.1 + self.translate.1,
        )
    }
}

pub fn parse_transform(s: &str) -> TransformRecord {
    TransformRecord::parse(s)
}

pub fn apply(p: Point, record: &TransformRecord) -> Point {
    record.apply(p)
}

/// The transform attribute of `id`, parsed, or `None` when absent or blank.
pub fn node_transform(tree: &ShapeTree, id: NodeId) -> Option<TransformRecord> {
    let raw = tree.node(id).attr("transform")?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(TransformRecord::parse(raw))
}

/// Applies the transforms of `id` and each of its ancestors, nearest first, stopping before
/// `root`.
pub fn compose_to_root(tree: &ShapeTree, id: NodeId, root: NodeId, local: Point) -> Point {
    transform_chain(tree, id, root).fold(local, |p, record| record.apply(p))
}

/// Sum of the rotation angles on `id` and its ancestors, stopping before `root`.
pub fn accumulated_rotation(tree: &ShapeTree, id: NodeId, root: NodeId) -> f64 {
    transform_chain(tree, id, root)
        .map(|record| record.rotate)
        .sum()
}

fn transform_chain<'a>(
    tree: &'a ShapeTree,
    id: NodeId,
    root: NodeId,
) -> impl Iterator<Item = TransformRecord> + 'a {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .take_while(move |&n| n != root)
        .filter_map(move |n| node_transform(tree, n))
}
