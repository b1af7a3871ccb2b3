//! RGB colors with hex parsing and the HSB saturation blend used for
//! hover/drag shading.
//!
//! HSB components follow the 0–360 / 0–100 / 0–100 convention, so a shade is
//! expressed as "saturation shifted by N points".

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fill for objects with neither an own nor a category color.
pub const DEFAULT_FILL: Color = Color::rgb(255, 0, 0);

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). The leading `#` is required.
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16))
            .collect::<Option<Vec<u32>>>()?;
        let channel = |hi: u32, lo: u32| u8::try_from(hi * 16 + lo).unwrap_or(u8::MAX);
        match nibbles.as_slice() {
            [r, g, b] => Some(Self::rgb(channel(*r, *r), channel(*g, *g), channel(*b, *b))),
            [r1, r2, g1, g2, b1, b2] => Some(Self::rgb(channel(*r1, *r2), channel(*g1, *g2), channel(*b1, *b2))),
            _ => None,
        }
    }

    /// Whether `s` is a valid 3- or 6-digit hex color.
    #[must_use]
    pub fn is_hex(s: &str) -> bool {
        Self::parse_hex(s).is_some()
    }

    /// Lowercase `#rrggbb`, usable as a CSS color.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to `(hue 0–360, saturation 0–100, brightness 0–100)`.
    #[must_use]
    pub fn to_hsb(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let hue = if chroma <= 0.0 {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            60.0 * ((g - b) / chroma).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * ((b - r) / chroma + 2.0)
        } else {
            60.0 * ((r - g) / chroma + 4.0)
        };
        let saturation = if max <= 0.0 { 0.0 } else { chroma / max * 100.0 };
        (hue, saturation, max * 100.0)
    }

    /// Build from `(hue 0–360, saturation 0–100, brightness 0–100)`.
    #[must_use]
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let v = (brightness / 100.0).clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h {
            h if h < 1.0 => (c, x, 0.0),
            h if h < 2.0 => (x, c, 0.0),
            h if h < 3.0 => (0.0, c, x),
            h if h < 4.0 => (0.0, x, c),
            h if h < 5.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        Self::rgb(to_channel(r + m), to_channel(g + m), to_channel(b + m))
    }

    /// Same hue and brightness with saturation replaced by `|saturation − shift|`.
    #[must_use]
    pub fn with_saturation_shift(self, shift: f64) -> Self {
        let (h, s, b) = self.to_hsb();
        Self::from_hsb(h, (s - shift).abs(), b)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}
