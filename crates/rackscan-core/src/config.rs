use crate::path::CommandCounts;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Command-count window a path must fall in to be read as a perforated cooling tile
/// (a border plus a grid of circles drawn with cubic curves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TilePatternWindow {
    pub curves: [usize; 2],
    pub moves: [usize; 2],
    pub min_closes: usize,
}

impl Default for TilePatternWindow {
    fn default() -> Self {
        Self::wide()
    }
}

impl TilePatternWindow {
    pub fn wide() -> Self {
        Self {
            curves: [30, 50],
            moves: [8, 15],
            min_closes: 1,
        }
    }

    pub fn narrow() -> Self {
        Self {
            curves: [30, 40],
            moves: [8, 12],
            min_closes: 1,
        }
    }

    pub fn matches(&self, counts: &CommandCounts) -> bool {
        (self.curves[0]..=self.curves[1]).contains(&counts.curves)
            && (self.moves[0]..=self.moves[1]).contains(&counts.moves)
            && counts.closes >= self.min_closes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanOptions {
    pub tile_pattern: TilePatternWindow,
    /// Collect groups of short coordinate labels ("AA", "01", ...) alongside the inventory.
    pub detect_grid_labels: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::wide()
    }
}

impl ScanOptions {
    pub fn wide() -> Self {
        Self {
            tile_pattern: TilePatternWindow::wide(),
            detect_grid_labels: true,
        }
    }

    pub fn narrow() -> Self {
        Self {
            tile_pattern: TilePatternWindow::narrow(),
            ..Self::wide()
        }
    }

    /// Reads options from JSON; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text).map_err(|e| Error::InvalidOptions {
            message: e.to_string(),
        })?;
        let w = &opts.tile_pattern;
        if w.curves[0] > w.curves[1] || w.moves[0] > w.moves[1] {
            return Err(Error::InvalidOptions {
                message: "tilePattern windows must be [min, max] with min <= max".to_string(),
            });
        }
        Ok(opts)
    }
}
