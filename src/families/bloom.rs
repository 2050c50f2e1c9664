//! Growth, bloom and pulse.
//!
//! Two accumulators drive the whole picture: `growth` advances by
//! `growth_speed * speed` each frame and, for patterns with a period, wraps
//! back to zero at that period; `rotation` advances by
//! `rotation_speed * speed`. Every shape is derived from those two values
//! and its index in a fixed angular arrangement, so the state is just the
//! pair of accumulators.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{require, Frame, Setup};
use crate::error::InitError;
use crate::surface::{Paint, Stroke};
use crate::{ParamValue, Params};

/// The angular arrangement grown by the accumulators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BloomPattern {
    /// Discs on a breathing circle; radius and size follow sines of growth.
    Petals {
        petal_count: usize,
        base_radius: f32,
        radius_variation: f32,
        base_size: f32,
        size_variation: f32,
        pulse_speed: f32,
        breathe_speed: f32,
        hue_step: f32,
    },
    /// Concentric rings expanding to `max_radius` then restarting, with
    /// rotating spokes and a glowing core.
    Rings {
        ring_count: usize,
        max_radius: f32,
        spoke_count: usize,
        line_width: f32,
    },
    /// Layers of rotated ellipse petals that open over `period`.
    Mandala {
        arms: usize,
        layers: usize,
        petal_length: f32,
        petal_width: f32,
        layer_spacing: f32,
        period: f32,
        hue_step: f32,
    },
}

impl BloomPattern {
    /// Value at which `growth` wraps to zero.
    pub fn period(&self) -> Option<f32> {
        match self {
            BloomPattern::Petals { .. } => None,
            BloomPattern::Rings { max_radius, .. } => Some(*max_radius),
            BloomPattern::Mandala { period, .. } => Some(*period),
        }
    }
}

impl Params for BloomPattern {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            BloomPattern::Petals {
                petal_count,
                base_radius,
                radius_variation,
                base_size,
                size_variation,
                pulse_speed,
                breathe_speed,
                hue_step,
            } => vec![
                ("pattern", "petals".into()),
                ("petal_count", (*petal_count).into()),
                ("base_radius", (*base_radius).into()),
                ("radius_variation", (*radius_variation).into()),
                ("base_size", (*base_size).into()),
                ("size_variation", (*size_variation).into()),
                ("pulse_speed", (*pulse_speed).into()),
                ("breathe_speed", (*breathe_speed).into()),
                ("hue_step", (*hue_step).into()),
            ],
            BloomPattern::Rings { ring_count, max_radius, spoke_count, line_width } => vec![
                ("pattern", "rings".into()),
                ("ring_count", (*ring_count).into()),
                ("max_radius", (*max_radius).into()),
                ("spoke_count", (*spoke_count).into()),
                ("line_width", (*line_width).into()),
            ],
            BloomPattern::Mandala { arms, layers, petal_length, petal_width, layer_spacing, period, hue_step } => vec![
                ("pattern", "mandala".into()),
                ("arms", (*arms).into()),
                ("layers", (*layers).into()),
                ("petal_length", (*petal_length).into()),
                ("petal_width", (*petal_width).into()),
                ("layer_spacing", (*layer_spacing).into()),
                ("period", (*period).into()),
                ("hue_step", (*hue_step).into()),
            ],
        }
    }
}

/// Base configuration of a bloom simulation.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct BloomParams {
    #[param(nested)]
    pub pattern: BloomPattern,
    pub growth_speed: f32,
    /// Radians per frame.
    pub rotation_speed: f32,
    pub base_hue: f32,
    /// Hue degrees added per unit of growth.
    pub hue_drift: f32,
    pub saturation: f32,
    pub lightness: f32,
}

#[derive(Debug, Clone, Default)]
pub struct BloomState {
    growth: f32,
    rotation: f32,
}

impl BloomState {
    pub fn init(params: &BloomParams, _setup: &mut Setup) -> Result<Self, InitError> {
        require(params.growth_speed.is_finite(), "growth_speed", "must be finite")?;
        if let Some(period) = params.pattern.period() {
            require(period > 0.0, "period", "must be positive")?;
        }
        Ok(Self::default())
    }

    pub fn step(&mut self, params: &BloomParams, frame: &mut Frame) {
        let speed = frame.knobs.speed;
        let size = frame.knobs.size;
        let center = frame.dims().center();
        let (s, l) = (params.saturation, params.lightness);
        let drift = self.growth * params.hue_drift;

        match params.pattern {
            BloomPattern::Petals {
                petal_count,
                base_radius,
                radius_variation,
                base_size,
                size_variation,
                pulse_speed,
                breathe_speed,
                hue_step,
            } => {
                let t = self.growth;
                let petal_size = ((base_size + (t * breathe_speed).sin() * size_variation) * size).max(0.0);
                for i in 0..petal_count {
                    let angle = TAU / petal_count as f32 * i as f32 + self.rotation;
                    let radius = (base_radius + (t * pulse_speed + i as f32).sin() * radius_variation) * size;
                    let at = center + Vec2::from_angle(angle) * radius;
                    let color = frame.knobs.tint(params.base_hue + i as f32 * hue_step + drift, s, l);
                    frame.surface.fill_circle(at, petal_size, &Paint::Solid(color));
                }
            }
            BloomPattern::Rings { ring_count, max_radius, spoke_count, line_width } => {
                let reach = max_radius * size;
                let core = frame.knobs.tint_alpha(params.base_hue + drift, s, l, 0.8);
                frame.surface.fill_circle(center, reach * 0.25, &Paint::glow(center, reach * 0.25, core));

                for k in 0..ring_count {
                    let offset = max_radius / ring_count as f32 * k as f32;
                    let radius = (self.growth + offset).rem_euclid(max_radius);
                    let alpha = 1.0 - radius / max_radius;
                    let color = frame.knobs.tint_alpha(params.base_hue + drift + radius, s, l, alpha);
                    frame.surface.stroke_circle(center, radius * size, &Stroke::new(color, line_width * size));
                }

                let spoke = frame.knobs.tint_alpha(params.base_hue + drift, s, l, 0.5);
                let length = self.growth / max_radius * reach;
                for k in 0..spoke_count {
                    let angle = self.rotation + TAU / spoke_count as f32 * k as f32;
                    let tip = center + Vec2::from_angle(angle) * length;
                    frame.surface.line(center, tip, &Stroke::new(spoke, line_width * 0.5 * size));
                }
            }
            BloomPattern::Mandala { arms, layers, petal_length, petal_width, layer_spacing, period, hue_step } => {
                let open = self.growth / period;
                frame.surface.save();
                frame.surface.translate(center);
                frame.surface.set_global_alpha(1.0 - 0.5 * open);
                for layer in 0..layers {
                    let distance = (layer + 1) as f32 * layer_spacing * size * open;
                    let radii = Vec2::new(petal_length, petal_width) * size * open;
                    let color = frame.knobs.tint(params.base_hue + layer as f32 * hue_step + drift, s, l);
                    let paint = Paint::Solid(color);
                    // alternate layers turn the other way
                    let turn = if layer % 2 == 0 { self.rotation } else { -self.rotation };
                    for arm in 0..arms {
                        frame.surface.save();
                        frame.surface.rotate(turn + TAU / arms as f32 * arm as f32);
                        frame.surface.fill_ellipse(Vec2::new(distance, 0.0), radii, 0.0, &paint);
                        frame.surface.restore();
                    }
                }
                frame.surface.restore();
            }
        }

        self.growth += params.growth_speed * speed;
        if let Some(period) = params.pattern.period() {
            if self.growth >= period {
                self.growth = self.growth.rem_euclid(period);
            }
        }
        self.rotation += params.rotation_speed * speed;
    }

    pub fn growth(&self) -> f32 {
        self.growth
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}
