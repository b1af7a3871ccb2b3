//! Viewport camera: pan offset, zoom factor and coordinate conversions.
//!
//! `screen_to_world` is the single source of truth for pointer interpretation;
//! hit-testing and drag application both route through it.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::Sub;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    #[must_use]
    pub fn dist_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Camera state for pan/zoom on the infinite grid.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Camera panned by `pan` pixels on both axes at zoom 1.0.
    #[must_use]
    pub fn with_pan(pan: f64) -> Self {
        Self { pan_x: pan, pan_y: pan, zoom: 1.0 }
    }

    /// Current pan offset as a point.
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Shift the view by whole grid cells. `d_cols` / `d_rows` are directions
    /// in `{-1, 0, 1}`; a positive direction moves the view right/down.
    pub fn pan_cells(&mut self, d_cols: f64, d_rows: f64, unit: f64) {
        self.pan_x -= d_cols * unit;
        self.pan_y -= d_rows * unit;
    }

    /// Change zoom by `delta`, clamped to `[min, max]`, keeping `hover_world`
    /// fixed under `pointer_screen`.
    ///
    /// `hover_world` must be the world point computed *before* this call.
    /// Returns `false` (and leaves the camera untouched) when the clamped zoom
    /// equals the current one.
    #[allow(clippy::float_cmp)]
    pub fn zoom_at(&mut self, delta: f64, pointer_screen: Point, hover_world: Point, min: f64, max: f64) -> bool {
        let next = (self.zoom + delta).clamp(min, max);
        if next == self.zoom {
            return false;
        }
        self.zoom = next;
        self.pan_x = pointer_screen.x - hover_world.x * next;
        self.pan_y = pointer_screen.y - hover_world.y * next;
        true
    }
}
