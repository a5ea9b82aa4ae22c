//! Screen geometry for the in-page overlay.

use serde::{Deserialize, Serialize};

use zegoop_protocols::IndicatorPosition;

/// Gap between the selection end and the action menu.
const MENU_OFFSET: f64 = 10.0;
/// Room kept free to the right of and below the action menu origin.
const MENU_CLEARANCE: Size = Size::new(200.0, 150.0);
const TOOLTIP_OFFSET_X: f64 = 10.0;
const TOOLTIP_OFFSET_Y: f64 = 40.0;
const TOOLTIP_WIDTH: f64 = 250.0;
const TOOLTIP_MIN_TOP: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<IndicatorPosition> for Point {
    fn from(position: IndicatorPosition) -> Self {
        Self::new(position.left, position.top)
    }
}

impl From<Point> for IndicatorPosition {
    fn from(point: Point) -> Self {
        Self {
            left: point.x,
            top: point.y,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The visible page area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn centre(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Keep a box of `size` at `origin` fully inside the viewport.
    ///
    /// A box larger than the viewport is pinned to the top-left corner.
    pub fn clamp(&self, origin: Point, size: Size) -> Point {
        let max_x = self.width - size.width;
        let max_y = self.height - size.height;
        Point::new(origin.x.min(max_x).max(0.0), origin.y.min(max_y).max(0.0))
    }

    /// Where the action menu opens for a selection ending at `anchor`.
    pub fn action_menu_origin(&self, anchor: Option<Point>) -> Point {
        let origin = anchor
            .map(|a| Point::new(a.x + MENU_OFFSET, a.y + MENU_OFFSET))
            .unwrap_or_else(|| self.centre());
        Point::new(
            origin.x.min(self.width - MENU_CLEARANCE.width),
            origin.y.min(self.height - MENU_CLEARANCE.height),
        )
    }

    /// Where a tooltip opens for a pointer at `pointer`.
    pub fn tooltip_origin(&self, pointer: Point) -> Point {
        Point::new(
            (pointer.x + TOOLTIP_OFFSET_X).min(self.width - TOOLTIP_WIDTH),
            (pointer.y - TOOLTIP_OFFSET_Y).max(TOOLTIP_MIN_TOP),
        )
    }
}
