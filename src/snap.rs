//! Grid snapping.
//!
//! Coordinates are quantized to the nearest multiple of the snap unit on
//! creation, move and resize. Ties round half away from zero on both signs,
//! so `snap(-7.5)` with unit 15 is `-15`, mirroring `snap(7.5) == 15`.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::DEFAULT_SNAP;

/// Grid quantizer with a positive integer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSnap {
    unit: u32,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self { unit: DEFAULT_SNAP }
    }
}

impl GridSnap {
    /// Build a snapper. Returns `None` for a zero unit.
    #[must_use]
    pub fn new(unit: u32) -> Option<Self> {
        (unit > 0).then_some(Self { unit })
    }

    /// The snap unit in world units.
    #[must_use]
    pub fn unit(self) -> u32 {
        self.unit
    }

    /// The snap unit as a float, for geometry.
    #[must_use]
    pub fn unit_f64(self) -> f64 {
        f64::from(self.unit)
    }

    /// Quantize `value` to the nearest multiple of the unit.
    #[must_use]
    pub fn snap(self, value: f64) -> f64 {
        let unit = self.unit_f64();
        (value / unit).round() * unit
    }
}
