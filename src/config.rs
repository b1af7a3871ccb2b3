//! Editor configuration: grid, zoom and interaction tunables.
//!
//! The host may hand over a JSON object (for example from a `data-config`
//! attribute or local storage); every field is optional and falls back to
//! the defaults in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_SNAP, HANDLE_RADIUS_PX, INITIAL_PAN_CELLS, MAX_ZOOM, MIN_ZOOM, NEW_OBJECT_COLS, NEW_OBJECT_ROWS,
    WHEEL_ZOOM_STEP,
};
use crate::snap::GridSnap;

/// Error returned by [`EditorConfig::from_json`] and [`EditorConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snap unit must be a positive integer")]
    InvalidSnap,
    #[error("zoom bounds must satisfy 0 < min ({min}) <= 1 <= max ({max})")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// Tunables for one editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid snap unit in world units.
    pub snap: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Handle radius in screen pixels.
    pub handle_radius_px: f64,
    /// Zoom change per wheel pixel.
    pub wheel_zoom_step: f64,
    /// Size of a spawned object, in grid cells.
    pub new_object_cols: u32,
    pub new_object_rows: u32,
    /// Initial pan offset, in grid cells.
    pub initial_pan_cells: u32,
    /// `tracing` filter directive used by [`crate::logging::init_logging`].
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: DEFAULT_SNAP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            handle_radius_px: HANDLE_RADIUS_PX,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            new_object_cols: NEW_OBJECT_COLS,
            new_object_rows: NEW_OBJECT_ROWS,
            initial_pan_cells: INITIAL_PAN_CELLS,
            log_filter: "info".into(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// errors of [`EditorConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snap == 0 {
            return Err(ConfigError::InvalidSnap);
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::InvalidZoomRange { min: self.min_zoom, max: self.max_zoom });
        }
        if self.handle_radius_px.is_nan() || self.handle_radius_px <= 0.0 {
            return Err(ConfigError::NotPositive { field: "handle_radius_px" });
        }
        if self.wheel_zoom_step.is_nan() || self.wheel_zoom_step <= 0.0 {
            return Err(ConfigError::NotPositive { field: "wheel_zoom_step" });
        }
        Ok(())
    }

    /// The snapper for the configured unit.
    #[must_use]
    pub fn grid(&self) -> GridSnap {
        GridSnap::new(self.snap).unwrap_or_default()
    }
}
