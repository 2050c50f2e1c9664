//! Branching random-walk bolts.
//!
//! A bolt is a polyline walked from a start point toward a target in
//! segments of roughly `segment_length`, each vertex pushed sideways by up
//! to `jitter`. At every interior vertex a side branch splits off with
//! probability `branch_chance`. A bolt lives for `life_frames` frames,
//! fading as it ages, and is removed when its counter reaches zero.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use super::{direction, require, Frame, Setup};
use crate::color::Color;
use crate::error::InitError;
use crate::surface::{Dimensions, Paint, Path, Rect, Stroke};
use crate::{ParamValue, Params};

/// Where bolts strike from and to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoltSource {
    /// Glowing orbs evenly spaced on the horizontal midline; any pair may
    /// connect on a frame.
    Orbs { count: usize, orb_radius: f32, glow: f32 },
    /// From a random point on the top edge down to the bottom edge, with a
    /// whole-surface flash of `flash` alpha on every strike.
    Sky { flash: f32 },
}

impl Params for BoltSource {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            BoltSource::Orbs { count, orb_radius, glow } => vec![
                ("source", "orbs".into()),
                ("orb_count", (*count).into()),
                ("orb_radius", (*orb_radius).into()),
                ("glow", (*glow).into()),
            ],
            BoltSource::Sky { flash } => vec![("source", "sky".into()), ("flash", (*flash).into())],
        }
    }
}

/// Base configuration of a bolt simulation.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct BoltParams {
    #[param(nested)]
    pub source: BoltSource,
    /// Strike probability per frame (per orb pair for orbs) at speed 1.
    pub chance: f32,
    pub segment_length: f32,
    pub jitter: f32,
    pub branch_chance: f32,
    pub life_frames: u32,
    pub line_width: f32,
    pub base_hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// One live bolt.
#[derive(Clone, Debug, PartialEq)]
pub struct Bolt {
    pub trunk: Path,
    pub branches: Vec<Path>,
    /// Frames left before removal.
    pub life: u32,
    /// Brightness picked at the strike.
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct BoltState {
    orbs: Vec<Vec2>,
    orb_radius: f32,
    bolts: Vec<Bolt>,
    /// Alpha of the sky flash still to be drawn this frame.
    flash: f32,
}

impl BoltState {
    pub fn init(params: &BoltParams, setup: &mut Setup) -> Result<Self, InitError> {
        require(params.segment_length > 0.0, "segment_length", "must be positive")?;
        require(params.life_frames > 0, "life_frames", "must be at least one frame")?;

        let dims = setup.dims;
        let (orbs, orb_radius) = match params.source {
            BoltSource::Orbs { count, orb_radius, .. } => {
                let spacing = dims.width / (count + 1) as f32;
                let orbs = (0..count).map(|i| Vec2::new(spacing * (i + 1) as f32, dims.height / 2.0)).collect();
                (orbs, orb_radius * setup.knobs.size)
            }
            BoltSource::Sky { .. } => (Vec::new(), 0.0),
        };

        Ok(Self { orbs, orb_radius, bolts: Vec::new(), flash: 0.0 })
    }

    pub fn step(&mut self, params: &BoltParams, frame: &mut Frame) {
        let dims = frame.dims();
        let speed = frame.knobs.speed;
        let size = frame.knobs.size;

        for bolt in &mut self.bolts {
            bolt.life = bolt.life.saturating_sub(1);
        }
        self.bolts.retain(|b| b.life > 0);

        let chance = params.chance * speed;
        match params.source {
            BoltSource::Orbs { .. } => {
                for i in 0..self.orbs.len() {
                    for j in (i + 1)..self.orbs.len() {
                        if frame.rng.gen::<f32>() < chance {
                            let bolt = strike(params, self.orbs[i], self.orbs[j], size, frame.rng);
                            self.bolts.push(bolt);
                        }
                    }
                }
            }
            BoltSource::Sky { flash } => {
                self.flash = 0.0;
                if frame.rng.gen::<f32>() < chance {
                    let from = Vec2::new(frame.rng.gen::<f32>() * dims.width, 0.0);
                    let to = Vec2::new(from.x + (frame.rng.gen::<f32>() - 0.5) * dims.width * 0.3, dims.height);
                    let bolt = strike(params, from, to, size, frame.rng);
                    self.bolts.push(bolt);
                    self.flash = flash;
                }
            }
        }

        self.draw(params, frame, dims);
    }

    fn draw(&self, params: &BoltParams, frame: &mut Frame, dims: Dimensions) {
        let size = frame.knobs.size;
        let (s, l) = (params.saturation, params.lightness);

        if self.flash > 0.0 {
            frame.surface.fill_rect(Rect::covering(dims), &Paint::Solid(Color::WHITE.with_alpha(self.flash)));
        }

        let width = params.line_width * size;
        for bolt in &self.bolts {
            let fade = bolt.life as f32 / params.life_frames as f32;
            let color = frame.knobs.tint_alpha(params.base_hue, s, l, bolt.intensity * fade);
            frame.surface.stroke_path(&bolt.trunk, &Stroke::new(color, width));
            for branch in &bolt.branches {
                frame.surface.stroke_path(branch, &Stroke::new(color, width * 0.5));
            }
        }

        if let BoltSource::Orbs { glow, .. } = params.source {
            let fill = frame.knobs.tint_alpha(params.base_hue, s, l, 0.6);
            frame.surface.set_shadow(glow, frame.knobs.tint(params.base_hue, s, l));
            for orb in &self.orbs {
                frame.surface.fill_circle(*orb, self.orb_radius, &Paint::Solid(fill));
            }
            frame.surface.clear_shadow();
        }
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn orbs(&self) -> &[Vec2] {
        &self.orbs
    }
}

/// Walk a bolt from `from` to `to` and sprout its branches.
fn strike(params: &BoltParams, from: Vec2, to: Vec2, size: f32, rng: &mut SmallRng) -> Bolt {
    let segment = params.segment_length * size;
    let jitter = params.jitter * size;
    let trunk = walk(from, to, segment, jitter, rng);

    let mut branches = Vec::new();
    let interior = trunk.len().saturating_sub(1);
    for k in 1..interior {
        if rng.gen::<f32>() >= params.branch_chance {
            continue;
        }
        let start = trunk.points[k];
        let (heading, remaining) = direction(start, to);
        let side = if rng.gen::<bool>() { 1.0 } else { -1.0 };
        let turn = side * (0.3 + rng.gen::<f32>() * (FRAC_PI_4 - 0.3));
        let reach = remaining * (0.3 + rng.gen::<f32>() * 0.3);
        let end = start + Vec2::from_angle(turn).rotate(heading) * reach;
        branches.push(walk(start, end, segment, jitter * 0.5, rng));
    }

    Bolt { trunk, branches, life: params.life_frames, intensity: 0.5 + rng.gen::<f32>() * 0.5 }
}

/// Polyline from `from` to `to` whose interior vertices are displaced
/// perpendicular to the straight line.
fn walk(from: Vec2, to: Vec2, segment: f32, jitter: f32, rng: &mut SmallRng) -> Path {
    let (dir, dist) = direction(from, to);
    let normal = dir.perp();
    let steps = (dist / segment.max(1.0)).ceil().max(1.0) as usize;

    let mut path = Path::new();
    path.push(from);
    for k in 1..steps {
        let along = from + dir * (dist * k as f32 / steps as f32);
        path.push(along + normal * (rng.gen::<f32>() * 2.0 - 1.0) * jitter);
    }
    path.push(to);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Knobs;
    use crate::input::InputBus;
    use crate::recording::{DrawCommand, RecordingSurface};
    use rand::SeedableRng;

    fn orbs() -> BoltParams {
        BoltParams {
            source: BoltSource::Orbs { count: 5, orb_radius: 30.0, glow: 30.0 },
            chance: 0.1,
            segment_length: 20.0,
            jitter: 8.0,
            branch_chance: 0.2,
            life_frames: 4,
            line_width: 2.0,
            base_hue: 180.0,
            saturation: 80.0,
            lightness: 70.0,
        }
    }

    struct Harness {
        rng: SmallRng,
        input: InputBus,
        surface: RecordingSurface,
    }

    impl Harness {
        fn new() -> Self {
            Self { rng: SmallRng::seed_from_u64(21), input: InputBus::new(), surface: RecordingSurface::new(600.0, 400.0) }
        }

        fn init(&mut self, params: &BoltParams, knobs: Knobs) -> BoltState {
            let mut setup = Setup {
                dims: Dimensions::new(600.0, 400.0),
                knobs,
                rng: &mut self.rng,
                input: &mut self.input,
            };
            BoltState::init(params, &mut setup).unwrap()
        }

        fn step(&mut self, state: &mut BoltState, params: &BoltParams, knobs: Knobs) {
            self.surface.clear();
            let mut frame = Frame { surface: &mut self.surface, input: &mut self.input, rng: &mut self.rng, knobs };
            state.step(params, &mut frame);
        }
    }

    #[test]
    fn test_orbs_evenly_spaced() {
        let mut h = Harness::new();
        let state = h.init(&orbs(), Knobs::default());
        let xs: Vec<f32> = state.orbs().iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        assert!(state.orbs().iter().all(|o| o.y == 200.0));
    }

    #[test]
    fn test_bolts_connect_orb_pairs() {
        let params = BoltParams { chance: 1.0, ..orbs() };
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default());
        h.step(&mut state, &params, Knobs::default());

        // every pair strikes when the chance is certain
        assert_eq!(state.bolts().len(), 10);
        for bolt in state.bolts() {
            let first = bolt.trunk.points[0];
            let last = *bolt.trunk.points.last().unwrap();
            assert!(state.orbs().contains(&first));
            assert!(state.orbs().contains(&last));
            assert!(first.x < last.x);
        }
    }

    #[test]
    fn test_bolts_expire_after_life() {
        let params = BoltParams {
            source: BoltSource::Sky { flash: 0.3 },
            chance: 1.0,
            ..orbs()
        };
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default());
        for _ in 0..50 {
            h.step(&mut state, &params, Knobs::default());
            assert!(state.bolts().len() <= params.life_frames as usize);
            assert!(state.bolts().iter().all(|b| b.life > 0 && b.life <= params.life_frames));
        }
    }

    #[test]
    fn test_sky_strike_flashes() {
        let params = BoltParams { source: BoltSource::Sky { flash: 0.3 }, chance: 1.0, ..orbs() };
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default());
        h.step(&mut state, &params, Knobs::default());
        assert!(matches!(h.surface.commands()[0], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_walk_is_finite_for_coincident_points() {
        let mut rng = SmallRng::seed_from_u64(1);
        let path = walk(Vec2::splat(50.0), Vec2::splat(50.0), 20.0, 10.0, &mut rng);
        assert_eq!(path.len(), 2);
        assert!(path.points.iter().all(|p| p.is_finite()));
    }
}
