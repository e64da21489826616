//! Single-pass traversal that turns a shape tree into a typed inventory.

use crate::bounds::bounds;
use crate::classify::{Category, RackColor, classify, server_rack_color};
use crate::config::ScanOptions;
use crate::labels::find_grid_labels;
use crate::position::resolve_position;
use crate::transform::accumulated_rotation;
use crate::tree::{NodeId, ShapeTree, Tag};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategoryExtra {
    Rack {
        color: RackColor,
    },
    Door {
        #[serde(rename = "rotationDegrees")]
        rotation_degrees: f64,
    },
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedObject {
    pub category: Category,
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub extra: CategoryExtra,
}

impl ClassifiedObject {
    pub fn rack_color(&self) -> Option<RackColor> {
        match self.extra {
            CategoryExtra::Rack { color } => Some(color),
            _ => None,
        }
    }

    pub fn rotation_degrees(&self) -> Option<f64> {
        match self.extra {
            CategoryExtra::Door { rotation_degrees } => Some(rotation_degrees),
            _ => None,
        }
    }

    /// Identifier shared by every exporter: `{category-slug}-{index}`.
    pub fn id(&self, index: usize) -> String {
        format!("{}-{index}", self.category.slug())
    }

    /// Position rounded to one decimal, prefixed by the rack color for racks.
    pub fn dedup_key(&self) -> String {
        let pos = format!("{:.1},{:.1}", self.x, self.y);
        match self.rack_color() {
            Some(color) => format!("{}:{pos}", color.as_str()),
            None => pos,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub floor: Option<ClassifiedObject>,
    pub objects: BTreeMap<Category, Vec<ClassifiedObject>>,
    pub grid_labels: Vec<NodeId>,
}

impl Inventory {
    pub fn objects(&self, category: Category) -> &[ClassifiedObject] {
        if category == Category::Floor {
            return self.floor.as_slice();
        }
        match self.objects.get(&category) {
            Some(objs) => objs,
            None => &[],
        }
    }

    /// Floor first, then every category in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedObject> {
        self.floor.iter().chain(self.objects.values().flatten())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_none() && self.objects.values().all(Vec::is_empty)
    }

    pub fn counts(&self) -> BTreeMap<Category, usize> {
        let mut out = BTreeMap::new();
        if self.floor.is_some() {
            out.insert(Category::Floor, 1);
        }
        for (category, objs) in &self.objects {
            out.insert(*category, objs.len());
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    Claimed(Category),
    Suppressed,
}

pub struct InventoryBuilder<'a> {
    tree: &'a ShapeTree,
    options: &'a ScanOptions,
    root: NodeId,
    states: Vec<VisitState>,
    seen: FxHashSet<(Category, String)>,
    inventory: Inventory,
}

impl<'a> InventoryBuilder<'a> {
    pub fn new(tree: &'a ShapeTree, options: &'a ScanOptions) -> Self {
        Self {
            tree,
            options,
            root: tree.root(),
            states: vec![VisitState::Unvisited; tree.len()],
            seen: FxHashSet::default(),
            inventory: Inventory::default(),
        }
    }

    pub fn state(&self, id: NodeId) -> VisitState {
        self.states[id.index()]
    }

    pub fn build(mut self) -> Inventory {
        self.walk();
        self.finish()
    }

    /// Depth-first walk over every group. Claimed subtrees are not descended into.
    pub fn walk(&mut self) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.state(id) != VisitState::Unvisited {
                continue;
            }
            if self.tree.node(id).tag == Tag::Group {
                let category = classify(self.tree, id, self.options);
                if category != Category::Other {
                    self.claim(id, category);
                    continue;
                }
            }
            stack.extend(self.tree.node(id).children.iter().rev().copied());
        }
    }

    pub fn finish(mut self) -> Inventory {
        if self.options.detect_grid_labels {
            self.inventory.grid_labels = find_grid_labels(self.tree);
        }
        let inv = self.inventory;
        tracing::info!(
            objects = inv.len(),
            floor = inv.floor.is_some(),
            grid_labels = inv.grid_labels.len(),
            "inventory built"
        );
        inv
    }

    fn claim(&mut self, id: NodeId, category: Category) {
        self.states[id.index()] = VisitState::Claimed(category);
        for d in self.tree.descendants(id) {
            if self.tree.node(d).tag == Tag::Group {
                self.states[d.index()] = VisitState::Suppressed;
            }
        }

        let obj = self.measure(id, category);
        if category == Category::Floor && self.inventory.floor.is_some() {
            tracing::debug!(node = id.index(), "dropping additional floor");
            return;
        }
        if !self.seen.insert((category, obj.dedup_key())) {
            tracing::debug!(
                node = id.index(),
                category = ?category,
                key = %obj.dedup_key(),
                "dropping duplicate"
            );
            return;
        }

        tracing::debug!(
            node = id.index(),
            category = ?category,
            x = obj.x,
            y = obj.y,
            "claimed"
        );
        if category == Category::Floor {
            self.inventory.floor = Some(obj);
        } else {
            let objs = self.inventory.objects.entry(category).or_default();
            objs.push(obj);
        }
    }

    fn measure(&self, id: NodeId, category: Category) -> ClassifiedObject {
        let p = resolve_position(self.tree, id, self.root);
        let b = bounds(self.tree, id);
        let extra = match category {
            Category::ServerRack => match server_rack_color(self.tree, id) {
                Some(color) => CategoryExtra::Rack { color },
                None => CategoryExtra::None,
            },
            Category::Door => CategoryExtra::Door {
                rotation_degrees: accumulated_rotation(self.tree, id, self.root),
            },
            _ => CategoryExtra::None,
        };
        ClassifiedObject {
            category,
            node: id,
            x: p.x,
            y: p.y,
            width: b.width(),
            height: b.height(),
            extra,
        }
    }
}

pub fn build_inventory(tree: &ShapeTree, options: &ScanOptions) -> Inventory {
    InventoryBuilder::new(tree, options).build()
}
