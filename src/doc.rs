//! Document model: map rectangles, categories, and the in-memory store.
//!
//! This module defines what is on the grid (`MapObject`), the named
//! categories that give objects their default color (`Category`), and the
//! runtime store that owns every live object (`ObjectStore`).
//!
//! DESIGN
//! ======
//! Objects live in an arena of generation-checked slots. An `ObjectId` is a
//! slot index plus the generation the slot had when the object was inserted,
//! so an id held by the selection or a drag never aliases a different object
//! after deletion and slot reuse. Draw order is a separate list of ids: the
//! renderer paints it front to back and the hit tester walks it in reverse.
//!
//! Category invariant: an object whose `kind` is `Some(name)` is listed exactly
//! once in category `name`, and every id in a category list is live and present
//! in the draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::Serialize;

use crate::camera::Point;
use crate::color::{Color, DEFAULT_FILL};

/// Opaque, copyable handle to an object in an [`ObjectStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    fn idx(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// An axis-aligned rectangle on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapObject {
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units. Negative after a resize handle is dragged past the opposite edge.
    pub w: f64,
    /// Height in world units.
    pub h: f64,
    /// Hex color override; `None` inherits the category color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Category name.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl MapObject {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h, color: None, kind: None }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Point at relative position `(dx, dy)` of the bounds, each in `{0, 1}`.
    #[must_use]
    pub fn corner(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx * self.w, self.y + dy * self.h)
    }

    /// Strict containment: a point exactly on an edge is outside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x > self.x && pt.x < self.x + self.w && pt.y > self.y && pt.y < self.y + self.h
    }
}

/// A named category: default color plus its member objects in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    /// Hex color.
    pub color: String,
    pub objects: Vec<ObjectId>,
}

/// A complete layout as exchanged with the outside world: categories as
/// `(name, hex color)` pairs in order, then objects in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub categories: Vec<(String, String)>,
    pub objects: Vec<MapObject>,
}

/// Error returned by store and list operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    /// A list position does not exist.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// The object id is stale or was never issued by this store.
    #[error("object no longer exists")]
    StaleObject,
    #[error("category name must not be empty")]
    EmptyCategoryName,
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
    /// At least one category must remain.
    #[error("cannot delete \"{0}\": at least one category is required")]
    LastCategory(String),
    #[error("invalid hex color \"{0}\"")]
    InvalidColor(String),
}

/// Move the element at `from` to position `to` of `list`.
///
/// `to` is interpreted after removal; values at or past the end append.
///
/// # Errors
///
/// Returns [`DocError::IndexOutOfBounds`] when `from` is not a valid index.
pub fn move_element<T>(list: &mut Vec<T>, from: usize, to: usize) -> Result<(), DocError> {
    if from == to {
        return Ok(());
    }
    if from >= list.len() {
        return Err(DocError::IndexOutOfBounds { index: from, len: list.len() });
    }
    let value = list.remove(from);
    if to >= list.len() {
        list.push(value);
    } else {
        list.insert(to, value);
    }
    Ok(())
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<MapObject>,
}

/// In-memory store of map objects and categories.
#[derive(Debug, Default)]
pub struct ObjectStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<ObjectId>,
    categories: Vec<Category>,
}

impl ObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Objects ---

    /// Insert an object on top of the draw order.
    ///
    /// If the object names a category that does not exist yet, the category
    /// is created with the default fill color.
    pub fn insert(&mut self, obj: MapObject) -> ObjectId {
        let kind = obj.kind.clone();
        let id = self.alloc(obj);
        self.order.push(id);
        if let Some(name) = kind {
            let idx = match self.category_index(&name) {
                Some(idx) => idx,
                None => {
                    self.categories.push(Category { name, color: DEFAULT_FILL.to_css(), objects: Vec::new() });
                    self.categories.len() - 1
                }
            };
            self.categories[idx].objects.push(id);
        }
        id
    }

    fn alloc(&mut self, obj: MapObject) -> ObjectId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.object = Some(obj);
            return ObjectId { index, generation: slot.generation };
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 1, object: Some(obj) });
        ObjectId { index, generation: 1 }
    }

    /// Remove an object, returning it if it was live.
    pub fn remove(&mut self, id: ObjectId) -> Option<MapObject> {
        if !self.is_alive(id) {
            return None;
        }
        let obj = self.slots[id.idx()].object.take()?;
        self.free.push(id.index);
        self.order.retain(|o| *o != id);
        if let Some(name) = &obj.kind {
            if let Some(idx) = self.category_index(name) {
                self.categories[idx].objects.retain(|o| *o != id);
            }
        }
        Some(obj)
    }

    /// Whether `id` still refers to a live object.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|s| s.generation == id.generation && s.object.is_some())
    }

    /// Return a reference to a live object.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&MapObject> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_ref()
    }

    /// Mutable access for geometry and color edits.
    ///
    /// Changing `kind` through this reference bypasses category bookkeeping;
    /// use [`ObjectStore::rename_category`] instead.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut MapObject> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_mut()
    }

    /// Ids in draw order, bottom first.
    #[must_use]
    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// Live objects in draw order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ObjectId, &MapObject)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|obj| (*id, obj)))
    }

    /// Position of `id` in the draw order.
    #[must_use]
    pub fn draw_index(&self, id: ObjectId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    /// Move an object to the top of the draw order.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::StaleObject`] when `id` is not in the store.
    pub fn bring_to_front(&mut self, id: ObjectId) -> Result<(), DocError> {
        let from = self.draw_index(id).ok_or(DocError::StaleObject)?;
        let to = self.order.len();
        move_element(&mut self.order, from, to)
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every object and category. Previously issued ids become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.object.take().is_some() {
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                self.free.push(index);
            }
        }
        self.order.clear();
        self.categories.clear();
    }

    /// Replace the whole document with `layout`.
    pub fn load(&mut self, layout: Layout) {
        self.clear();
        for (name, color) in layout.categories {
            if self.category_index(&name).is_none() {
                self.categories.push(Category { name, color, objects: Vec::new() });
            }
        }
        for obj in layout.objects {
            self.insert(obj);
        }
    }

    /// Snapshot the document as a [`Layout`].
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout {
            categories: self
                .categories
                .iter()
                .map(|c| (c.name.clone(), c.color.clone()))
                .collect(),
            objects: self.iter().map(|(_, obj)| obj.clone()).collect(),
        }
    }

    /// Resolved fill: own color, else category color, else the default fill.
    #[must_use]
    pub fn fill_color(&self, obj: &MapObject) -> Color {
        obj.color
            .as_deref()
            .and_then(Color::parse_hex)
            .or_else(|| {
                let name = obj.kind.as_deref()?;
                Color::parse_hex(&self.category(name)?.color)
            })
            .unwrap_or(DEFAULT_FILL)
    }

    // --- Categories ---

    /// Categories in insertion order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    /// Register a new, empty category.
    ///
    /// # Errors
    ///
    /// Rejects empty or duplicate names and malformed colors.
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<(), DocError> {
        if name.is_empty() {
            return Err(DocError::EmptyCategoryName);
        }
        if self.category_index(name).is_some() {
            return Err(DocError::DuplicateCategory(name.to_string()));
        }
        if !Color::is_hex(color) {
            return Err(DocError::InvalidColor(color.to_string()));
        }
        self.categories.push(Category { name: name.to_string(), color: color.to_string(), objects: Vec::new() });
        Ok(())
    }

    /// Rename a category in place and retag every member object.
    ///
    /// # Errors
    ///
    /// Rejects an unknown `old`, an empty `new`, or a `new` already in use.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<(), DocError> {
        if new.is_empty() {
            return Err(DocError::EmptyCategoryName);
        }
        let idx = self
            .category_index(old)
            .ok_or_else(|| DocError::UnknownCategory(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        if self.category_index(new).is_some() {
            return Err(DocError::DuplicateCategory(new.to_string()));
        }
        self.categories[idx].name = new.to_string();
        let members = self.categories[idx].objects.clone();
        for id in members {
            if let Some(obj) = self.get_mut(id) {
                obj.kind = Some(new.to_string());
            }
        }
        Ok(())
    }

    /// Delete a category together with its member objects.
    ///
    /// Returns the ids of the removed objects.
    ///
    /// # Errors
    ///
    /// Rejects an unknown name or the last remaining category.
    pub fn remove_category(&mut self, name: &str) -> Result<Vec<ObjectId>, DocError> {
        let idx = self
            .category_index(name)
            .ok_or_else(|| DocError::UnknownCategory(name.to_string()))?;
        if self.categories.len() <= 1 {
            return Err(DocError::LastCategory(name.to_string()));
        }
        let category = self.categories.remove(idx);
        for id in &category.objects {
            let taken = self
                .slots
                .get_mut(id.idx())
                .filter(|s| s.generation == id.generation)
                .and_then(|s| s.object.take());
            if taken.is_some() {
                self.free.push(id.index);
            }
        }
        self.order.retain(|o| !category.objects.contains(o));
        Ok(category.objects)
    }

    /// Change a category's color.
    ///
    /// # Errors
    ///
    /// Rejects an unknown name or a malformed color.
    pub fn set_category_color(&mut self, name: &str, color: &str) -> Result<(), DocError> {
        if !Color::is_hex(color) {
            return Err(DocError::InvalidColor(color.to_string()));
        }
        let idx = self
            .category_index(name)
            .ok_or_else(|| DocError::UnknownCategory(name.to_string()))?;
        self.categories[idx].color = color.to_string();
        Ok(())
    }
}
