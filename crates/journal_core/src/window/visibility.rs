//! Most-visible panel selection by on-screen intersection area.

use crate::date::MonthOffset;

/// Axis-aligned rectangle in scroll-surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Area of `self` clamped to `other` on both axes; zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let width = (self.right().min(other.right()) - self.left.max(other.left)).max(0.0);
        let height = (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0);
        width * height
    }
}

/// Returns the panel with the strictly largest visible area inside `viewport`.
///
/// Ties keep the first panel seen, so callers pass panels in ascending mount
/// order to break ties toward the lower offset. Returns `None` when `panels`
/// is empty or nothing overlaps the viewport.
pub fn most_visible(viewport: Rect, panels: &[(MonthOffset, Rect)]) -> Option<MonthOffset> {
    let mut best: Option<MonthOffset> = None;
    let mut best_area = 0.0;
    for (offset, rect) in panels {
        let area = rect.intersection_area(&viewport);
        if area > best_area {
            best_area = area;
            best = Some(*offset);
        }
    }
    best
}
