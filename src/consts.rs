//! Shared numeric constants for the map canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.3;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 2.0;

/// Zoom change per pixel of vertical wheel scroll.
pub const WHEEL_ZOOM_STEP: f64 = 0.001;

/// Initial pan offset, in snap cells on each axis.
pub const INITIAL_PAN_CELLS: u32 = 4;

// ── Grid ────────────────────────────────────────────────────────

/// Default snap unit in world units.
pub const DEFAULT_SNAP: u32 = 15;

/// Default size of a freshly spawned object, in snap cells.
pub const NEW_OBJECT_COLS: u32 = 5;
pub const NEW_OBJECT_ROWS: u32 = 3;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels for resize handles (hit slop and drawn size).
pub const HANDLE_RADIUS_PX: f64 = 6.0;

// ── Rendering ───────────────────────────────────────────────────

/// Radius of the snapped hover marker, in world units.
pub const HOVER_MARKER_RADIUS: f64 = 2.0;

/// Half-length of the drawn world axes, in snap cells.
pub const AXIS_EXTENT_CELLS: f64 = 300.0;

/// Saturation shift for the shade of a dragged object (HSB, 0–100 scale).
pub const DRAG_SATURATION_SHIFT: f64 = 100.0;

/// Saturation shift for the shade of a hovered object.
pub const HOVER_SATURATION_SHIFT: f64 = 50.0;
