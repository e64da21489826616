#![forbid(unsafe_code)]

//! Semantic inventory extraction for data-center floor-plan SVGs (headless).
//!
//! Floor plans exported from drawing tools carry no type tags; racks, cooling units, walls and
//! the rest are recognized from colors, path-command histograms and child composition. The
//! pipeline is:
//! - [`ShapeTree::parse`] loads the document into an index arena
//! - [`classify`] decides the category of each group
//! - [`InventoryBuilder`] walks the tree once, resolves positions and deduplicates

pub mod bounds;
pub mod classify;
pub mod config;
pub mod error;
pub mod geom;
pub mod inventory;
pub mod labels;
pub mod path;
pub mod position;
pub mod transform;
pub mod tree;

pub use bounds::{anchor, bounds};
pub use classify::{Category, RackColor, classify};
pub use config::{ScanOptions, TilePatternWindow};
pub use error::{Error, Result};
pub use geom::{BoundingBox, Point};
pub use inventory::{
    CategoryExtra, ClassifiedObject, Inventory, InventoryBuilder, VisitState, build_inventory,
};
pub use position::resolve_position;
pub use transform::{TransformRecord, apply, parse_transform};
pub use tree::{Content, NodeId, ShapeNode, ShapeTree, Tag};

/// A loaded document together with its inventory.
#[derive(Debug, Clone)]
pub struct Scan {
    pub tree: ShapeTree,
    pub inventory: Inventory,
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn scan(&self, tree: &ShapeTree) -> Inventory {
        build_inventory(tree, &self.options)
    }

    /// Loads `svg` and scans it. Fails only when the document cannot be loaded.
    pub fn scan_str(&self, svg: &str) -> Result<Scan> {
        let tree = ShapeTree::parse(svg)?;
        let inventory = self.scan(&tree);
        Ok(Scan { tree, inventory })
    }
}

#[cfg(test)]
mod tests;
