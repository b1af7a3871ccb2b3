//! Selection model: the single selected object, the selected category, and
//! the four corner handles derived from the selected object's bounds.
//!
//! Handles are view state only. Their absolute positions are refreshed from
//! the object's bounds whenever the selection changes and after every bounds
//! mutation, so hit-testing never sees stale positions.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::camera::Point;
use crate::doc::{MapObject, ObjectId};

/// One of the four resize corners, as a relative position on the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// `{dx: 0, dy: 0}`
    TopLeft,
    /// `{dx: 0, dy: 1}`
    BottomLeft,
    /// `{dx: 1, dy: 0}`
    TopRight,
    /// `{dx: 1, dy: 1}`
    BottomRight,
}

impl Corner {
    /// All corners in hit-test order.
    pub const ALL: [Corner; 4] = [Self::TopLeft, Self::BottomLeft, Self::TopRight, Self::BottomRight];

    /// Relative x position: 0 for the left edge, 1 for the right edge.
    #[must_use]
    pub fn dx(self) -> f64 {
        match self {
            Self::TopLeft | Self::BottomLeft => 0.0,
            Self::TopRight | Self::BottomRight => 1.0,
        }
    }

    /// Relative y position: 0 for the top edge, 1 for the bottom edge.
    #[must_use]
    pub fn dy(self) -> f64 {
        match self {
            Self::TopLeft | Self::TopRight => 0.0,
            Self::BottomLeft | Self::BottomRight => 1.0,
        }
    }

    /// CSS cursor for hovering this corner.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft | Self::BottomRight => "nwse-resize",
            Self::TopRight | Self::BottomLeft => "nesw-resize",
        }
    }
}

/// A corner handle with its absolute world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub corner: Corner,
    pub x: f64,
    pub y: f64,
}

impl Handle {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Selection state: at most one object, plus the category used for new objects.
#[derive(Debug, Clone)]
pub struct Selection {
    object: Option<ObjectId>,
    category: Option<String>,
    handles: [Handle; 4],
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            object: None,
            category: None,
            handles: Corner::ALL.map(|corner| Handle { corner, x: 0.0, y: 0.0 }),
        }
    }
}

impl Selection {
    /// The selected object, if any.
    #[must_use]
    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    /// The selected category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Handles in [`Corner::ALL`] order. Only meaningful while an object is selected.
    #[must_use]
    pub fn handles(&self) -> &[Handle; 4] {
        &self.handles
    }

    /// The handle for `corner`.
    #[must_use]
    pub fn handle(&self, corner: Corner) -> Handle {
        self.handles
            .iter()
            .copied()
            .find(|h| h.corner == corner)
            .unwrap_or(Handle { corner, x: 0.0, y: 0.0 })
    }

    /// Select `id` (replacing any prior selection) and place the handles on `obj`.
    pub fn select(&mut self, id: ObjectId, obj: &MapObject) {
        self.object = Some(id);
        self.update_handles(obj);
    }

    /// Drop the object selection. The category selection is kept.
    pub fn clear_object(&mut self) {
        self.object = None;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Recompute handle positions from `obj`'s current bounds.
    pub fn update_handles(&mut self, obj: &MapObject) {
        for handle in &mut self.handles {
            let p = obj.corner(handle.corner.dx(), handle.corner.dy());
            handle.x = p.x;
            handle.y = p.y;
        }
    }
}
