#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Parses a numeric attribute value such as `"12"`, `" 3.5 "` or `"1417px"`.
pub fn parse_length(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Axis-aligned box accumulated from primitive coordinates.
///
/// A fresh box is "empty": mins at `+inf`, maxes at `-inf`. Width and height of an empty box
/// are reported as zero so infinities never leak to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut b = Self::EMPTY;
        for (x, y) in points {
            b.include_point(x, y);
        }
        b
    }

    pub fn include_point(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Top-left corner, or `None` for an empty box.
    pub fn min(&self) -> Option<Point> {
        (!self.is_empty()).then(|| point(self.min_x, self.min_y))
    }
}
