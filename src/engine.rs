use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::config::{ConfigError, EditorConfig};
use crate::doc::{DocError, MapObject, ObjectId, ObjectStore};
use crate::exchange::{self, ImportError};
use crate::hit::{self, Entity};
use crate::input::{self, Button, DragState, Key, PanKeys, PointerState, WheelDelta};
use crate::render;
use crate::selection::Selection;
use crate::snap::GridSnap;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RenderNeeded,
    SelectionChanged(Option<ObjectId>),
    ObjectCreated(ObjectId),
    ObjectDeleted(ObjectId),
    /// The host should prompt for a new name and call [`EngineCore::commit_rename`].
    RenameRequested { category: String },
}

/// Error returned by [`EngineCore::commit_rename`].
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("no category rename is pending")]
    NoPendingRename,
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: ObjectStore,
    pub camera: Camera,
    config: EditorConfig,
    snap: GridSnap,
    selection: Selection,
    drag: Option<DragState>,
    hovering: Option<Entity>,
    pointer: PointerState,
    keys: PanKeys,
    pending_rename: Option<String>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given tunables. The camera starts panned by
    /// `initial_pan_cells` grid cells on both axes.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of [`EditorConfig::validate`]; zoom bounds
    /// out of order would otherwise break every zoom.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config
            .validate()
            .inspect_err(|e| warn!(error = %e, "editor config rejected"))?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let snap = config.grid();
        let camera = Camera::with_pan(f64::from(config.initial_pan_cells) * snap.unit_f64());
        Self {
            doc: ObjectStore::new(),
            camera,
            config,
            snap,
            selection: Selection::default(),
            drag: None,
            hovering: None,
            pointer: PointerState::default(),
            keys: PanKeys::default(),
            pending_rename: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    /// Pan by whole grid cells; a positive direction moves the view right/down.
    pub fn pan(&mut self, d_cols: f64, d_rows: f64) {
        self.camera.pan_cells(d_cols, d_rows, self.snap.unit_f64());
    }

    /// Zoom by `delta` around the last sampled pointer position.
    ///
    /// Returns `false` when the zoom is already at the bound in that direction.
    pub fn zoom(&mut self, delta: f64) -> bool {
        let changed = self.camera.zoom_at(
            delta,
            self.pointer.screen,
            self.pointer.world,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        if changed {
            self.pointer = PointerState::sample(self.pointer.screen, &self.camera, self.snap);
        }
        changed
    }

    /// Change the grid unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSnap`] for a zero unit; nothing changes then.
    pub fn set_snap(&mut self, unit: u32) -> Result<(), ConfigError> {
        let snap = GridSnap::new(unit).ok_or(ConfigError::InvalidSnap)?;
        self.snap = snap;
        self.config.snap = unit;
        self.pointer = PointerState::sample(self.pointer.screen, &self.camera, snap);
        debug!(unit, "snap unit changed");
        Ok(())
    }

    // --- Selection and drag ---

    /// Select `id` exclusively, or clear the object selection with `None`.
    ///
    /// The category selection becomes `category`, falling back to the
    /// object's own category. Any pending category rename is cancelled.
    pub fn set_selected(&mut self, id: Option<ObjectId>, category: Option<String>) {
        self.pending_rename = None;
        let mut category = category;
        match id.map(|id| (id, self.doc.get(id))) {
            Some((id, Some(obj))) => {
                category = category.or_else(|| obj.kind.clone());
                self.selection.select(id, obj);
                debug!(%id, category = category.as_deref(), "object selected");
            }
            Some((id, None)) => {
                warn!(%id, "cannot select a removed object");
                self.selection.clear_object();
            }
            None => self.selection.clear_object(),
        }
        self.selection.set_category(category);
    }

    /// Start dragging `target`, or end the current drag with `None`.
    ///
    /// The pointer-to-target offset is captured from the last sampled pointer.
    pub fn set_dragging(&mut self, target: Option<Entity>) {
        let Some(target) = target else {
            if let Some(drag) = self.drag.take() {
                debug!(entity = ?drag.target, "drag ended");
            }
            return;
        };
        match input::target_position(target, &self.doc, &self.camera) {
            Some(position) => {
                self.drag = Some(DragState::begin(target, &self.pointer, position));
                debug!(entity = ?target, "drag started");
            }
            None => {
                warn!(entity = ?target, "cannot drag a removed object");
                self.drag = None;
            }
        }
    }

    // --- Objects ---

    /// A new object at the snapped world point under the viewport center,
    /// sized `new_object_cols × new_object_rows` cells and tagged with the
    /// selected category.
    #[must_use]
    pub fn new_object(&self) -> MapObject {
        let center = self
            .camera
            .screen_to_world(Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0));
        let unit = self.snap.unit_f64();
        let mut obj = MapObject::new(
            self.snap.snap(center.x),
            self.snap.snap(center.y),
            f64::from(self.config.new_object_cols) * unit,
            f64::from(self.config.new_object_rows) * unit,
        );
        obj.kind = self.selection.category().map(str::to_string);
        obj
    }

    /// Insert [`EngineCore::new_object`] on top and select it.
    pub fn spawn_object(&mut self) -> Vec<Action> {
        let obj = self.new_object();
        let category = obj.kind.clone();
        let id = self.doc.insert(obj);
        self.set_selected(Some(id), category);
        info!(%id, count = self.doc.len(), "object created");
        vec![Action::ObjectCreated(id), Action::SelectionChanged(Some(id)), Action::RenderNeeded]
    }

    /// Delete the selected object. Returns no actions when nothing is selected.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selection.object() else {
            return Vec::new();
        };
        self.selection.clear_object();
        self.pending_rename = None;
        self.forget(id);
        if self.doc.remove(id).is_none() {
            warn!(%id, "selected object was already removed");
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }
        info!(%id, count = self.doc.len(), "object deleted");
        vec![Action::ObjectDeleted(id), Action::SelectionChanged(None), Action::RenderNeeded]
    }

    /// Drop drag and hover state that refers to `id`.
    fn forget(&mut self, id: ObjectId) {
        if self.drag.is_some_and(|d| d.target.object() == Some(id)) {
            self.drag = None;
        }
        if self.hovering.is_some_and(|h| h.object() == Some(id)) {
            self.hovering = None;
        }
    }

    // --- Per-frame ---

    /// Sample the pointer at `screen`, advance an active drag, and resolve hover.
    ///
    /// While dragging, the drag target is always the hovered entity.
    pub fn update_cursor(&mut self, screen: Point) {
        self.pointer = PointerState::sample(screen, &self.camera, self.snap);

        if let Some(id) = self.selection.object().filter(|id| !self.doc.is_alive(*id)) {
            warn!(%id, "selected object no longer exists; clearing selection");
            self.selection.clear_object();
        }
        self.refresh_handles();

        if let Some(drag) = self.drag {
            if input::apply_drag(&drag, &self.pointer, self.snap, &mut self.doc, &mut self.camera) {
                self.refresh_handles();
                self.hovering = Some(drag.target);
                return;
            }
            warn!(entity = ?drag.target, "drag target no longer exists; dropping drag");
            self.drag = None;
        }

        self.hovering = hit::hit_test(
            self.pointer.world,
            &self.doc,
            &self.selection,
            self.camera.zoom,
            self.config.handle_radius_px,
        );
    }

    /// One frame: pan for held arrow keys, then [`EngineCore::update_cursor`].
    pub fn tick(&mut self, screen: Point) {
        if self.keys.any() {
            let (d_cols, d_rows) = self.keys.direction();
            self.pan(d_cols, d_rows);
        }
        self.update_cursor(screen);
    }

    fn refresh_handles(&mut self) {
        if let Some(obj) = self.selection.object().and_then(|id| self.doc.get(id)) {
            self.selection.update_handles(obj);
        }
    }

    // --- Input events ---

    /// Begin a drag on what is under the pointer.
    ///
    /// A hovered handle of the selected object resizes it; a hovered object
    /// is raised, selected and moved; empty space pans the view and clears
    /// the object selection.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.drag = None;
        self.update_cursor(screen);

        match self.hovering {
            Some(handle @ Entity::Handle { .. }) => {
                self.set_dragging(Some(handle));
                vec![Action::RenderNeeded]
            }
            Some(Entity::Object(id)) => {
                if let Err(e) = self.doc.bring_to_front(id) {
                    warn!(error = %e, %id, "bring to front failed");
                }
                self.set_selected(Some(id), None);
                self.set_dragging(Some(Entity::Object(id)));
                vec![Action::SelectionChanged(Some(id)), Action::RenderNeeded]
            }
            Some(Entity::Viewport) | None => {
                self.set_dragging(Some(Entity::Viewport));
                if self.selection.object().is_none() {
                    return vec![Action::RenderNeeded];
                }
                self.pending_rename = None;
                self.selection.clear_object();
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        self.update_cursor(screen);
        vec![Action::RenderNeeded]
    }

    /// Apply the final drag frame at `screen` and end the drag.
    pub fn on_pointer_up(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.drag.is_none() {
            return Vec::new();
        }
        self.update_cursor(screen);
        self.set_dragging(None);
        vec![Action::RenderNeeded]
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.update_cursor(screen);
        if self.zoom(-delta.dy * self.config.wheel_zoom_step) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if self.keys.set(&key.0, true) {
            return vec![Action::RenderNeeded];
        }
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => {
                self.set_dragging(None);
                if self.selection.object().is_none() {
                    return Vec::new();
                }
                self.pending_rename = None;
                self.selection.clear_object();
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_key_up(&mut self, key: &Key) -> Vec<Action> {
        self.keys.set(&key.0, false);
        Vec::new()
    }

    // --- Categories ---

    /// Make `name` the category for new objects.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownCategory`] for a name not in the registry.
    pub fn select_category(&mut self, name: &str) -> Result<(), DocError> {
        if self.doc.category(name).is_none() {
            return Err(DocError::UnknownCategory(name.to_string()));
        }
        self.pending_rename = None;
        self.selection.set_category(Some(name.to_string()));
        Ok(())
    }

    /// Register a category and select it.
    ///
    /// # Errors
    ///
    /// See [`ObjectStore::add_category`].
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<(), DocError> {
        self.doc.add_category(name, color)?;
        info!(category = name, color, "category added");
        self.select_category(name)
    }

    /// Delete a category and its objects.
    ///
    /// The category selection moves to the first remaining category when it
    /// pointed at the removed one.
    ///
    /// # Errors
    ///
    /// See [`ObjectStore::remove_category`].
    pub fn remove_category(&mut self, name: &str) -> Result<Vec<Action>, DocError> {
        let removed = self.doc.remove_category(name)?;
        info!(category = name, objects = removed.len(), "category removed");

        let mut actions: Vec<Action> = removed.iter().copied().map(Action::ObjectDeleted).collect();
        for id in &removed {
            self.forget(*id);
        }
        if self.selection.object().is_some_and(|id| removed.contains(&id)) {
            self.selection.clear_object();
            actions.push(Action::SelectionChanged(None));
        }
        if self.pending_rename.as_deref() == Some(name) {
            self.pending_rename = None;
        }
        if self.selection.category() == Some(name) {
            let first = self.doc.categories().first().map(|c| c.name.clone());
            self.selection.set_category(first);
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Change a category's color.
    ///
    /// # Errors
    ///
    /// See [`ObjectStore::set_category_color`].
    pub fn set_category_color(&mut self, name: &str, color: &str) -> Result<Vec<Action>, DocError> {
        self.doc.set_category_color(name, color)?;
        debug!(category = name, color, "category color changed");
        Ok(vec![Action::RenderNeeded])
    }

    /// Mark `name` for renaming; the host prompts and calls [`EngineCore::commit_rename`].
    ///
    /// # Errors
    ///
    /// Returns [`DocError::UnknownCategory`] for a name not in the registry.
    pub fn request_rename(&mut self, name: &str) -> Result<Action, DocError> {
        if self.doc.category(name).is_none() {
            return Err(DocError::UnknownCategory(name.to_string()));
        }
        self.pending_rename = Some(name.to_string());
        Ok(Action::RenameRequested { category: name.to_string() })
    }

    /// Apply the pending rename. On failure the rename stays pending.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError::NoPendingRename`] when no rename was requested
    /// (or a selection change cancelled it), and the registry's error for a
    /// rejected name.
    pub fn commit_rename(&mut self, new_name: &str) -> Result<(), RenameError> {
        let old = self.pending_rename.clone().ok_or(RenameError::NoPendingRename)?;
        self.doc.rename_category(&old, new_name)?;
        self.pending_rename = None;
        if self.selection.category() == Some(old.as_str()) {
            self.selection.set_category(Some(new_name.to_string()));
        }
        info!(from = %old, to = new_name, "category renamed");
        Ok(())
    }

    // --- Import / export ---

    /// Replace the document with a JSON layout.
    ///
    /// Selection, drag and hover are reset; the first category becomes the
    /// selected one.
    ///
    /// # Errors
    ///
    /// Returns the [`ImportError`] for a rejected document; the current
    /// document is left as it was.
    pub fn import_layout(&mut self, raw: &str) -> Result<Vec<Action>, ImportError> {
        let layout = exchange::parse_layout(raw).inspect_err(|e| warn!(error = %e, "layout import rejected"))?;
        self.doc.load(layout);
        self.drag = None;
        self.hovering = None;
        self.pending_rename = None;
        self.selection.clear_object();
        let first = self.doc.categories().first().map(|c| c.name.clone());
        self.selection.set_category(first);
        info!(objects = self.doc.len(), categories = self.doc.categories().len(), "layout imported");
        Ok(vec![Action::SelectionChanged(None), Action::RenderNeeded])
    }

    /// Export the document as JSON, as a category mapping when categories exist.
    #[must_use]
    pub fn export_layout(&self) -> String {
        let out = exchange::export_layout(&self.doc);
        debug!(bytes = out.len(), objects = self.doc.len(), "layout exported");
        out
    }

    // --- Queries ---

    /// The entity under the pointer (the drag target while dragging).
    #[must_use]
    pub fn hovering(&self) -> Option<Entity> {
        self.hovering
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selection.object()
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selection.category()
    }

    /// Full selection state, including handle positions.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn snap(&self) -> GridSnap {
        self.snap
    }

    /// Raw pointer position in world coordinates.
    #[must_use]
    pub fn hover_world(&self) -> Point {
        self.pointer.world
    }

    /// Pointer position snapped to the grid.
    #[must_use]
    pub fn hover_snapped(&self) -> Point {
        self.pointer.snapped
    }

    /// The active drag target.
    #[must_use]
    pub fn dragging(&self) -> Option<Entity> {
        self.drag.map(|d| d.target)
    }

    #[must_use]
    pub fn pending_rename(&self) -> Option<&str> {
        self.pending_rename.as_deref()
    }

    /// CSS cursor for the current hover/drag state.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match (self.drag.map(|d| d.target), self.hovering) {
            (Some(Entity::Viewport), _) => "grabbing",
            (_, Some(Entity::Handle { corner, .. })) => corner.cursor(),
            (_, Some(Entity::Object(_))) => "move",
            _ => "default",
        }
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.doc.get(id)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Create an engine with the given tunables.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of [`EditorConfig::validate`].
    pub fn with_config(canvas: HtmlCanvasElement, config: EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self { canvas, core: EngineCore::with_config(config)? })
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    pub fn tick(&mut self, screen_pt: Point) {
        self.core.tick(screen_pt);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    pub fn on_key_up(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_up(key)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(&ctx, &self.core)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selected_object(&self) -> Option<ObjectId> {
        self.core.selected_object()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.core.cursor()
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.core.object(id)
    }
}
