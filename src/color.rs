//! Colors as simulations describe them.
//!
//! Simulations think in HSL: a base hue per entity, a saturation and
//! lightness fixed by the simulation, and the user's hue shift added on top.
//! Backdrops and a few overlays use plain RGBA. Surfaces receive the
//! [`Color`] untouched, so a recording keeps the hue a simulation asked for,
//! and only a raster converts to bytes.
//!
//! ```ignore
//! let c = Color::hsl(200.0, 70.0, 60.0).shifted(180.0);
//! assert_eq!(c.hue(), Some(20.0));
//! ```

use serde::{Deserialize, Serialize};

/// An HSL(A) or RGB(A) color.
///
/// Hue is in degrees, saturation and lightness are percentages (0-100) and
/// alpha is 0-1, matching the way the simulations specify them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Hsla { h: f32, s: f32, l: f32, a: f32 },
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color::Rgba { r, g, b, a }
    }

    /// Opaque HSL color. The hue is wrapped into `[0, 360)`.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        Color::Hsla { h: wrap_hue(h), s, l, a }
    }

    /// Rotate the hue by `degrees`. RGB colors are returned unchanged.
    pub fn shifted(self, degrees: f32) -> Self {
        match self {
            Color::Hsla { h, s, l, a } => Color::Hsla { h: wrap_hue(h + degrees), s, l, a },
            rgba => rgba,
        }
    }

    /// Replace the alpha channel.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        match self {
            Color::Hsla { h, s, l, .. } => Color::Hsla { h, s, l, a },
            Color::Rgba { r, g, b, .. } => Color::Rgba { r, g, b, a },
        }
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Color::Hsla { a, .. } | Color::Rgba { a, .. } => *a,
        }
    }

    /// Hue in degrees for HSL colors.
    pub fn hue(&self) -> Option<f32> {
        match self {
            Color::Hsla { h, .. } => Some(*h),
            Color::Rgba { .. } => None,
        }
    }

    /// Convert to straight (non-premultiplied) RGBA bytes.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let (r, g, b, a) = match *self {
            Color::Hsla { h, s, l, a } => {
                let [r, g, b] = hsl_to_rgb(h, s / 100.0, l / 100.0);
                (to_byte(r), to_byte(g), to_byte(b), a)
            }
            Color::Rgba { r, g, b, a } => (r, g, b, a),
        };
        [r, g, b, to_byte(a)]
    }

    /// CSS color string, handy for logging and for web surfaces.
    pub fn to_css(&self) -> String {
        match *self {
            Color::Hsla { h, s, l, a } if a >= 1.0 => format!("hsl({}, {}%, {}%)", h, s, l),
            Color::Hsla { h, s, l, a } => format!("hsla({}, {}%, {}%, {})", h, s, l, a),
            Color::Rgba { r, g, b, a } if a >= 1.0 => format!("rgb({}, {}, {})", r, g, b),
            Color::Rgba { r, g, b, a } => format!("rgba({}, {}, {}, {})", r, g, b, a),
        }
    }
}

/// Wrap a hue into `[0, 360)`, negative inputs included.
pub fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert HSL (h in degrees, s and l in 0-1) to RGB in 0-1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = wrap_hue(h) / 60.0;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    [r + m, g + m, b + m]
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
