//! Rendering: draws the full map scene to a drawing surface.
//!
//! [`draw`] receives a read-only view of the engine and produces pixels; it
//! does not mutate any application state. The drawing surface is abstracted
//! by the [`Surface`] trait so the scene can be painted to the browser's
//! [`web_sys::CanvasRenderingContext2d`] or to a recording surface in tests.
//!
//! Layers, bottom first: background, grid, world axes, snapped hover marker,
//! objects in draw order, handles of the selected object, and the hover
//! coordinate readout in screen space.
//!
//! All fallible surface calls propagate errors via `Result<(), S::Error>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Point;
use crate::color::{Color, DEFAULT_FILL};
use crate::consts::{AXIS_EXTENT_CELLS, DRAG_SATURATION_SHIFT, HOVER_MARKER_RADIUS, HOVER_SATURATION_SHIFT};
use crate::engine::EngineCore;
use crate::hit::Entity;

const BACKGROUND: &str = "#000000";
const GRID_STROKE: &str = "#505050";
const AXIS_STROKE: &str = "#ffffff";
const OBJECT_STROKE: &str = "#000000";
const READOUT_FILL: &str = "#ffffff";
const READOUT_FONT: &str = "12px sans-serif";

/// Readout inset from the bottom-right corner, in CSS pixels.
const READOUT_MARGIN_PX: f64 = 5.0;

/// Axis line width in world units.
const AXIS_WIDTH: f64 = 2.0;

const SELECTED_STROKE_WIDTH: f64 = 3.0;
const STROKE_WIDTH: f64 = 1.0;

const HANDLE_FILL: Color = Color::gray(255);
const HANDLE_HOVER_FILL: Color = Color::gray(200);
const HANDLE_DRAG_FILL: Color = Color::gray(160);

/// Outline style for a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Drawing primitives the scene is built from.
///
/// Coordinates are interpreted through the transform set by the last
/// [`Surface::set_transform`] call.
pub trait Surface {
    type Error;

    /// Reset to a `dpr`-scaled identity transform and fill the viewport with `background`.
    fn clear(&self, width: f64, height: f64, dpr: f64, background: &str) -> Result<(), Self::Error>;

    /// Replace the transform with a uniform `scale` followed by a translation
    /// of `(tx, ty)` device pixels.
    fn set_transform(&self, scale: f64, tx: f64, ty: f64) -> Result<(), Self::Error>;

    fn line(&self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<(), Self::Error>;

    /// Axis-aligned rectangle; `w` and `h` may be negative.
    fn rect(&self, origin: Point, w: f64, h: f64, fill: &str, stroke: Stroke<'_>) -> Result<(), Self::Error>;

    fn circle(&self, center: Point, radius: f64, fill: &str, stroke: Option<Stroke<'_>>) -> Result<(), Self::Error>;

    /// Text anchored at its bottom-right corner.
    fn text(&self, text: &str, anchor: Point, fill: &str, font: &str) -> Result<(), Self::Error>;
}

/// Draw the full scene for `core`.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn draw<S: Surface + ?Sized>(surface: &S, core: &EngineCore) -> Result<(), S::Error> {
    let camera = core.camera();
    let dpr = core.dpr;

    surface.clear(core.viewport_width, core.viewport_height, dpr, BACKGROUND)?;
    surface.set_transform(dpr * camera.zoom, dpr * camera.pan_x, dpr * camera.pan_y)?;

    draw_grid(surface, core)?;
    draw_axes(surface, core)?;

    let marker = DEFAULT_FILL.to_css();
    surface.circle(core.hover_snapped(), HOVER_MARKER_RADIUS, &marker, None)?;

    draw_objects(surface, core)?;
    draw_handles(surface, core)?;

    // Screen space.
    surface.set_transform(dpr, 0.0, 0.0)?;
    let hover = core.hover_world();
    let readout = format!("({}, {})", round_coord(hover.x), round_coord(hover.y));
    let anchor = Point::new(
        core.viewport_width - READOUT_MARGIN_PX,
        core.viewport_height - READOUT_MARGIN_PX,
    );
    surface.text(&readout, anchor, READOUT_FILL, READOUT_FONT)
}

/// Rounded for display; `-0` prints as `0`.
fn round_coord(v: f64) -> f64 {
    v.round() + 0.0
}

// =============================================================
// Background layers
// =============================================================

/// One line per snap unit across the visible world area, one screen pixel wide.
fn draw_grid<S: Surface + ?Sized>(surface: &S, core: &EngineCore) -> Result<(), S::Error> {
    if core.viewport_width <= 0.0 || core.viewport_height <= 0.0 {
        return Ok(());
    }
    let camera = core.camera();
    let unit = core.snap().unit_f64();
    let top_left = camera.screen_to_world(Point::new(0.0, 0.0));
    let bottom_right = camera.screen_to_world(Point::new(core.viewport_width, core.viewport_height));
    let stroke = Stroke { color: GRID_STROKE, width: camera.screen_dist_to_world(1.0) };

    let mut x = (top_left.x / unit).floor() * unit;
    while x <= bottom_right.x {
        surface.line(Point::new(x, top_left.y), Point::new(x, bottom_right.y), stroke)?;
        x += unit;
    }
    let mut y = (top_left.y / unit).floor() * unit;
    while y <= bottom_right.y {
        surface.line(Point::new(top_left.x, y), Point::new(bottom_right.x, y), stroke)?;
        y += unit;
    }
    Ok(())
}

fn draw_axes<S: Surface + ?Sized>(surface: &S, core: &EngineCore) -> Result<(), S::Error> {
    let extent = AXIS_EXTENT_CELLS * core.snap().unit_f64();
    let stroke = Stroke { color: AXIS_STROKE, width: AXIS_WIDTH };
    surface.line(Point::new(-extent, 0.0), Point::new(extent, 0.0), stroke)?;
    surface.line(Point::new(0.0, -extent), Point::new(0.0, extent), stroke)
}

// =============================================================
// Objects and handles
// =============================================================

fn draw_objects<S: Surface + ?Sized>(surface: &S, core: &EngineCore) -> Result<(), S::Error> {
    let selected = core.selected_object();
    let dragging = core.dragging();
    let hovering = core.hovering();

    for (id, obj) in core.doc.iter() {
        let base = core.doc.fill_color(obj);
        let fill = if dragging == Some(Entity::Object(id)) {
            base.with_saturation_shift(DRAG_SATURATION_SHIFT)
        } else if hovering == Some(Entity::Object(id)) {
            base.with_saturation_shift(HOVER_SATURATION_SHIFT)
        } else {
            base
        };
        let width = if selected == Some(id) { SELECTED_STROKE_WIDTH } else { STROKE_WIDTH };
        surface.rect(
            obj.position(),
            obj.w,
            obj.h,
            &fill.to_css(),
            Stroke { color: OBJECT_STROKE, width },
        )?;
    }
    Ok(())
}

fn draw_handles<S: Surface + ?Sized>(surface: &S, core: &EngineCore) -> Result<(), S::Error> {
    let Some(object) = core.selected_object().filter(|id| core.doc.is_alive(*id)) else {
        return Ok(());
    };
    let camera = core.camera();
    let radius = camera.screen_dist_to_world(core.config().handle_radius_px);
    let stroke = Stroke { color: OBJECT_STROKE, width: STROKE_WIDTH };

    for handle in core.selection().handles() {
        let entity = Some(Entity::Handle { object, corner: handle.corner });
        let fill = if core.dragging() == entity {
            HANDLE_DRAG_FILL
        } else if core.hovering() == entity {
            HANDLE_HOVER_FILL
        } else {
            HANDLE_FILL
        };
        surface.circle(handle.position(), radius, &fill.to_css(), Some(stroke))?;
    }
    Ok(())
}

// =============================================================
// Browser canvas
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&self, width: f64, height: f64, dpr: f64, background: &str) -> Result<(), JsValue> {
        self.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.set_fill_style_str(background);
        self.fill_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn set_transform(&self, scale: f64, tx: f64, ty: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::set_transform(self, scale, 0.0, 0.0, scale, tx, ty)
    }

    fn line(&self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<(), JsValue> {
        self.begin_path();
        self.move_to(from.x, from.y);
        self.line_to(to.x, to.y);
        self.set_stroke_style_str(stroke.color);
        self.set_line_width(stroke.width);
        self.stroke();
        Ok(())
    }

    fn rect(&self, origin: Point, w: f64, h: f64, fill: &str, stroke: Stroke<'_>) -> Result<(), JsValue> {
        self.set_fill_style_str(fill);
        self.fill_rect(origin.x, origin.y, w, h);
        self.set_stroke_style_str(stroke.color);
        self.set_line_width(stroke.width);
        self.stroke_rect(origin.x, origin.y, w, h);
        Ok(())
    }

    fn circle(&self, center: Point, radius: f64, fill: &str, stroke: Option<Stroke<'_>>) -> Result<(), JsValue> {
        self.begin_path();
        self.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
        self.set_fill_style_str(fill);
        self.fill();
        if let Some(stroke) = stroke {
            self.set_stroke_style_str(stroke.color);
            self.set_line_width(stroke.width);
            self.stroke();
        }
        Ok(())
    }

    fn text(&self, text: &str, anchor: Point, fill: &str, font: &str) -> Result<(), JsValue> {
        self.set_fill_style_str(fill);
        self.set_font(font);
        self.set_text_align("right");
        self.set_text_baseline("bottom");
        self.fill_text(text, anchor.x, anchor.y)
    }
}
