#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectStore};
use crate::selection::{Corner, Selection};

/// Something the pointer can hover or drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A map rectangle.
    Object(ObjectId),
    /// A resize handle of the selected object.
    Handle { object: ObjectId, corner: Corner },
    /// The view itself, dragged to pan.
    Viewport,
}

impl Entity {
    /// The object this entity belongs to, if any.
    #[must_use]
    pub fn object(self) -> Option<ObjectId> {
        match self {
            Self::Object(id) | Self::Handle { object: id, .. } => Some(id),
            Self::Viewport => None,
        }
    }
}

/// Resolve what is under `world_pt` when no drag is active.
///
/// Handles of the selected object win over objects; objects are tested
/// topmost first. `handle_radius_px` is a screen distance, converted to world
/// units with `zoom`.
#[must_use]
pub fn hit_test(
    world_pt: Point,
    doc: &ObjectStore,
    selection: &Selection,
    zoom: f64,
    handle_radius_px: f64,
) -> Option<Entity> {
    if let Some(corner) = hit_handle(world_pt, doc, selection, zoom, handle_radius_px) {
        return selection.object().map(|object| Entity::Handle { object, corner });
    }
    hit_object(world_pt, doc).map(Entity::Object)
}

/// First handle of the selected object within the hit radius, in [`Corner::ALL`] order.
#[must_use]
pub fn hit_handle(
    world_pt: Point,
    doc: &ObjectStore,
    selection: &Selection,
    zoom: f64,
    handle_radius_px: f64,
) -> Option<Corner> {
    let obj = doc.get(selection.object()?)?;
    let radius = handle_radius_px / zoom;
    let radius_sq = radius * radius;
    Corner::ALL
        .into_iter()
        .find(|c| world_pt.dist_sq(obj.corner(c.dx(), c.dy())) < radius_sq)
}

/// Topmost object strictly containing `world_pt`.
#[must_use]
pub fn hit_object(world_pt: Point, doc: &ObjectStore) -> Option<ObjectId> {
    doc.iter()
        .rev()
        .find(|(_, obj)| obj.contains(world_pt))
        .map(|(id, _)| id)
}
