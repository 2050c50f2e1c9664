//! User knobs and the effective configuration built from them.
//!
//! A simulation's base configuration is a fixed record of named constants.
//! The user adjusts three global knobs. Whenever a knob or the selection
//! changes, a brand-new [`EffectiveConfig`] is built from the base record
//! and the knobs, and the session is restarted with it. Nothing mutates an
//! effective config after construction.
//!
//! | Knob | Range | Applies to |
//! |------|-------|------------|
//! | `speed` | 0.1 ..= 3.0 | per-frame increments, velocities, spawn rates, force magnitudes |
//! | `size` | 0.3 ..= 2.0 | radii, amplitudes, lengths, entity sizes |
//! | `hue_shift` | 0 ..= 360 | added to every entity's hue, modulo 360 |

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::color::{wrap_hue, Color};
use crate::families::SimKind;
use crate::registry::Descriptor;

pub const SPEED_RANGE: RangeInclusive<f32> = 0.1..=3.0;
pub const SIZE_RANGE: RangeInclusive<f32> = 0.3..=2.0;
pub const HUE_RANGE: RangeInclusive<f32> = 0.0..=360.0;
/// Slider step for the hue knob, in degrees.
pub const HUE_STEP: f64 = 10.0;

/// The three global user controls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Knobs {
    pub speed: f32,
    pub size: f32,
    pub hue_shift: f32,
}

impl Default for Knobs {
    fn default() -> Self {
        Self { speed: 1.0, size: 1.0, hue_shift: 0.0 }
    }
}

impl Knobs {
    pub fn new(speed: f32, size: f32, hue_shift: f32) -> Self {
        Self { speed, size, hue_shift }
    }

    /// Clamp every knob into its slider range. NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let d = Knobs::default();
        let fix = |v: f32, range: &RangeInclusive<f32>, fallback: f32| {
            if v.is_finite() {
                v.clamp(*range.start(), *range.end())
            } else {
                fallback
            }
        };
        Self {
            speed: fix(self.speed, &SPEED_RANGE, d.speed),
            size: fix(self.size, &SIZE_RANGE, d.size),
            hue_shift: fix(self.hue_shift, &HUE_RANGE, d.hue_shift),
        }
    }

    /// Replace knobs no frame can run with by their defaults: non-finite
    /// values, and a speed or size that is not positive. Everything else is
    /// kept as given, including values outside the slider ranges.
    pub fn guarded(self) -> Self {
        let d = Knobs::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            speed: positive(self.speed, d.speed),
            size: positive(self.size, d.size),
            hue_shift: if self.hue_shift.is_finite() { self.hue_shift } else { d.hue_shift },
        }
    }

    /// Shift a base hue by the knob, wrapped into `[0, 360)`.
    pub fn hue(&self, base: f32) -> f32 {
        wrap_hue(base + self.hue_shift)
    }

    /// Opaque entity color: shifted hue, saturation and lightness untouched.
    pub fn tint(&self, base_hue: f32, saturation: f32, lightness: f32) -> Color {
        Color::hsl(self.hue(base_hue), saturation, lightness)
    }

    /// Translucent entity color.
    pub fn tint_alpha(&self, base_hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color {
        Color::hsla(self.hue(base_hue), saturation, lightness, alpha.clamp(0.0, 1.0))
    }
}

/// A single base-configuration value, for display and inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
    List(Vec<f64>),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Flag(b) => write!(f, "{}", b),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Flag(v)
    }
}

impl From<Vec<f32>> for ParamValue {
    fn from(v: Vec<f32>) -> Self {
        ParamValue::List(v.into_iter().map(|x| x as f64).collect())
    }
}

impl From<&'static str> for ParamValue {
    fn from(v: &'static str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => ParamValue::Text("none".to_string()),
        }
    }
}

/// Lists a base configuration as ordered `(name, value)` pairs.
///
/// Usually derived with `#[derive(Params)]`.
pub trait Params {
    fn entries(&self) -> Vec<(&'static str, ParamValue)>;
}

impl<T: Params> Params for Vec<T> {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        self.iter().flat_map(|item| item.entries()).collect()
    }
}

/// Base configuration merged with the knobs for one session.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    name: &'static str,
    kind: SimKind,
    backdrop: Color,
    knobs: Knobs,
    seed: u64,
}

impl EffectiveConfig {
    /// Build a fresh config. Knobs outside the slider ranges are accepted;
    /// only unusable values are replaced (see [`Knobs::guarded`]).
    pub fn new(descriptor: &Descriptor, knobs: Knobs, seed: u64) -> Self {
        Self {
            name: descriptor.name,
            kind: descriptor.kind.clone(),
            backdrop: descriptor.backdrop,
            knobs: knobs.guarded(),
            seed,
        }
    }

    /// A new config with different knobs; `self` is left as it was.
    pub fn with_knobs(&self, knobs: Knobs) -> Self {
        Self { knobs: knobs.guarded(), ..self.clone() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &SimKind {
        &self.kind
    }

    /// Color laid over the previous frame at the start of every step.
    pub fn backdrop(&self) -> Color {
        self.backdrop
    }

    pub fn knobs(&self) -> Knobs {
        self.knobs
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.knobs.speed
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.knobs.size
    }

    #[inline]
    pub fn hue_shift(&self) -> f32 {
        self.knobs.hue_shift
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Base configuration values of the simulation.
    pub fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        self.kind.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn test_knobs_default() {
        let k = Knobs::default();
        assert_eq!(k, Knobs::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_knobs_guarded_replaces_only_unusable_values() {
        let k = Knobs::new(0.0, f32::INFINITY, f32::NAN).guarded();
        assert_eq!(k, Knobs::default());

        let k = Knobs::new(-1.0, 0.05, 725.0).guarded();
        assert_eq!(k, Knobs::new(1.0, 0.05, 725.0));
    }

    #[test]
    fn test_config_keeps_out_of_range_knobs() {
        let registry = Registry::builtin();
        let descriptor = registry.get(1).unwrap();
        let config = EffectiveConfig::new(descriptor, Knobs::new(5.0, 4.0, 400.0), 1);
        assert_eq!(config.speed(), 5.0);
        assert_eq!(config.size(), 4.0);
        assert_eq!(config.hue_shift(), 400.0);

        let again = config.with_knobs(Knobs::new(0.05, 2.5, 0.0));
        assert_eq!(again.knobs(), Knobs::new(0.05, 2.5, 0.0));
    }

    #[test]
    fn test_knobs_clamped_to_slider_ranges() {
        let k = Knobs::new(10.0, 0.0, f32::NAN).clamped();
        assert_eq!(k, Knobs::new(3.0, 0.3, 0.0));
    }

    #[test]
    fn test_tint_only_shifts_hue() {
        let k = Knobs::new(1.0, 1.0, 200.0);
        assert_eq!(k.tint(200.0, 70.0, 60.0), Color::hsl(40.0, 70.0, 60.0));
    }

    #[test]
    fn test_with_knobs_builds_new_config() {
        let registry = Registry::builtin();
        let descriptor = registry.get(0).unwrap();
        let first = EffectiveConfig::new(descriptor, Knobs::default(), 7);
        let second = first.with_knobs(Knobs::new(2.0, 1.5, 90.0));

        assert_eq!(first.speed(), 1.0);
        assert_eq!(second.speed(), 2.0);
        assert_eq!(second.seed(), 7);
        assert_eq!(second.name(), first.name());
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from(3u32).to_string(), "3");
        assert_eq!(ParamValue::from(vec![0.25f32, 0.5]).to_string(), "[0.25, 0.5]");
        assert_eq!(ParamValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_knobs_serde_defaults_missing_fields() {
        let k: Knobs = serde_json::from_str(r#"{ "speed": 2.0 }"#).unwrap();
        assert_eq!(k, Knobs::new(2.0, 1.0, 0.0));
    }
}
