//! Input model and the drag/resize engine.
//!
//! This module defines the raw input types handed over by the host (`Button`,
//! `Key`, `WheelDelta`, held arrow keys in `PanKeys`), the sampled pointer
//! position (`PointerState`), and the active drag (`DragState`). A drag
//! captures the pointer-to-target offset once at its start, in both world and
//! screen space, and is then re-applied every frame from the current pointer:
//! objects and handles follow the snapped world position, the viewport follows
//! the raw screen position so panning is not distorted by zoom.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Camera, Point};
use crate::doc::{MapObject, ObjectStore};
use crate::hit::Entity;
use crate::selection::Corner;
use crate::snap::GridSnap;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"ArrowLeft"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Arrow keys currently held.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl PanKeys {
    /// Update from a key event. Returns `false` for keys that are not arrows.
    pub fn set(&mut self, key: &str, held: bool) -> bool {
        let slot = match key {
            "ArrowLeft" => &mut self.left,
            "ArrowRight" => &mut self.right,
            "ArrowUp" => &mut self.up,
            "ArrowDown" => &mut self.down,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// Pan direction per axis, each in `{-1, 0, 1}`.
    #[must_use]
    pub fn direction(self) -> (f64, f64) {
        let axis = |neg: bool, pos: bool| f64::from(u8::from(pos)) - f64::from(u8::from(neg));
        (axis(self.left, self.right), axis(self.up, self.down))
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Pointer position sampled for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Raw pointer position in screen pixels.
    pub screen: Point,
    /// `screen` mapped through the camera.
    pub world: Point,
    /// `world` snapped to the grid.
    pub snapped: Point,
}

impl PointerState {
    /// Sample the pointer at `screen` through `camera`.
    #[must_use]
    pub fn sample(screen: Point, camera: &Camera, snap: GridSnap) -> Self {
        let world = camera.screen_to_world(screen);
        Self { screen, world, snapped: Point::new(snap.snap(world.x), snap.snap(world.y)) }
    }
}

/// The active drag: its target plus the pointer-to-target offsets captured at the start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub target: Entity,
    /// `pointer.world − target position` at drag start.
    pub offset_world: Point,
    /// `pointer.screen − target position` at drag start.
    pub offset_screen: Point,
}

impl DragState {
    /// Start dragging `target`, currently at `target_position`.
    ///
    /// The target position is the object's top-left, the handle's absolute
    /// position, or the camera pan for [`Entity::Viewport`].
    #[must_use]
    pub fn begin(target: Entity, pointer: &PointerState, target_position: Point) -> Self {
        Self {
            target,
            offset_world: pointer.world - target_position,
            offset_screen: pointer.screen - target_position,
        }
    }
}

/// Current position of a drag target, or `None` if it no longer exists.
#[must_use]
pub fn target_position(target: Entity, doc: &ObjectStore, camera: &Camera) -> Option<Point> {
    match target {
        Entity::Object(id) => doc.get(id).map(MapObject::position),
        Entity::Handle { object, corner } => doc.get(object).map(|o| o.corner(corner.dx(), corner.dy())),
        Entity::Viewport => Some(camera.pan()),
    }
}

/// Apply one frame of `drag` from the current pointer.
///
/// Returns `false` when the target object no longer exists; nothing is mutated then.
pub fn apply_drag(
    drag: &DragState,
    pointer: &PointerState,
    snap: GridSnap,
    doc: &mut ObjectStore,
    camera: &mut Camera,
) -> bool {
    let snapped = Point::new(
        snap.snap(pointer.world.x - drag.offset_world.x),
        snap.snap(pointer.world.y - drag.offset_world.y),
    );
    match drag.target {
        Entity::Object(id) => {
            let Some(obj) = doc.get_mut(id) else {
                return false;
            };
            obj.x = snapped.x;
            obj.y = snapped.y;
        }
        Entity::Handle { object, corner } => {
            let Some(obj) = doc.get_mut(object) else {
                return false;
            };
            resize_from_handle(obj, corner, snapped);
        }
        Entity::Viewport => {
            camera.pan_x = pointer.screen.x - drag.offset_screen.x;
            camera.pan_y = pointer.screen.y - drag.offset_screen.y;
        }
    }
    true
}

/// Move the `corner` of `obj` to `handle`, keeping the opposite corner fixed.
///
/// Each axis is handled independently. Dragging past the opposite edge yields
/// a negative extent, which is kept as is.
pub fn resize_from_handle(obj: &mut MapObject, corner: Corner, handle: Point) {
    let (low_x, low_y) = match corner {
        Corner::TopLeft => (true, true),
        Corner::BottomLeft => (true, false),
        Corner::TopRight => (false, true),
        Corner::BottomRight => (false, false),
    };
    (obj.x, obj.w) = resize_axis(obj.x, obj.w, low_x, handle.x);
    (obj.y, obj.h) = resize_axis(obj.y, obj.h, low_y, handle.y);
}

fn resize_axis(pos: f64, size: f64, low_edge: bool, handle: f64) -> (f64, f64) {
    if low_edge {
        (handle, pos + size - handle)
    } else {
        (pos, handle - pos)
    }
}
