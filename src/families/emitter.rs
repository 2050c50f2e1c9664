//! Particles that spawn, age and expire.
//!
//! One or more [`SpawnPolicy`]s decide when bursts of particles appear and
//! where.
//! Every particle carries a `life` counter that starts at the family's
//! lifetime and drops by `speed` each frame; at zero it is removed, and a
//! burst whose particles are all gone is removed with it. Growth of the
//! particle lists is bounded purely by that expiry unless `max_bursts` caps
//! it.
//!
//! | Policy | Spawns | Rate at speed `s` |
//! |--------|--------|-------------------|
//! | `Interval` | one burst at a random point | every `frames / s` frames |
//! | `Chance` | one burst at a random point | probability `per_frame * s` |
//! | `Continuous` | particles around a point moving on an ellipse | `per_frame * s` per frame |
//! | `PointerMove` | a burst at every pointer-move position | per event |
//! | `PointerClick` | a burst at every click | per event |
//!
//! Pointer policies subscribe on the input bus during init and release the
//! subscription in [`EmitterState::teardown`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use super::{require, Frame, Setup};
use crate::error::InitError;
use crate::input::{InputBus, PointerKind, SubscriptionId};
use crate::surface::{Dimensions, Paint, Stroke};
use crate::{ParamValue, Params};

/// When bursts are created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnPolicy {
    /// One burst every `frames` frames at speed 1.
    Interval { frames: f32 },
    /// One burst with probability `per_frame` each frame at speed 1.
    Chance { per_frame: f32 },
    /// `per_frame` particles every frame around a point orbiting the center.
    Continuous {
        per_frame: f32,
        radius_x: f32,
        radius_y: f32,
        /// Radians per frame of the emission point.
        angular_speed: f32,
        /// Hue degrees per radian of the path angle, or `0` for random hues.
        hue_rate: f32,
    },
    /// A burst at every pointer-move position.
    PointerMove,
    /// A burst at every pointer click.
    PointerClick,
}

impl SpawnPolicy {
    fn pointer_kind(&self) -> Option<PointerKind> {
        match self {
            SpawnPolicy::PointerMove => Some(PointerKind::Move),
            SpawnPolicy::PointerClick => Some(PointerKind::Click),
            _ => None,
        }
    }
}

impl Params for SpawnPolicy {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            SpawnPolicy::Interval { frames } => {
                vec![("spawn", "interval".into()), ("interval_frames", (*frames).into())]
            }
            SpawnPolicy::Chance { per_frame } => {
                vec![("spawn", "chance".into()), ("chance_per_frame", (*per_frame).into())]
            }
            SpawnPolicy::Continuous { per_frame, radius_x, radius_y, angular_speed, hue_rate } => vec![
                ("spawn", "continuous".into()),
                ("per_frame", (*per_frame).into()),
                ("path_radius_x", (*radius_x).into()),
                ("path_radius_y", (*radius_y).into()),
                ("path_speed", (*angular_speed).into()),
                ("path_hue_rate", (*hue_rate).into()),
            ],
            SpawnPolicy::PointerMove => vec![("spawn", "pointer move".into())],
            SpawnPolicy::PointerClick => vec![("spawn", "pointer click".into())],
        }
    }
}

/// Initial velocity of a spawned particle, scaled by speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spray {
    Still,
    /// Random direction at `base + rand * variation`.
    Radial { base: f32, variation: f32 },
    /// Each component uniform in `[-magnitude/2, magnitude/2)`.
    Jitter { magnitude: f32 },
}

impl Params for Spray {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            Spray::Still => vec![("spray", "still".into())],
            Spray::Radial { base, variation } => vec![
                ("spray", "radial".into()),
                ("spray_speed", (*base).into()),
                ("spray_variation", (*variation).into()),
            ],
            Spray::Jitter { magnitude } => vec![("spray", "jitter".into()), ("spray_speed", (*magnitude).into())],
        }
    }
}

/// How a particle is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmitShape {
    /// Filled disc, fading with remaining life.
    Dot { base_size: f32, size_variation: f32 },
    /// Stroked circle growing from zero to `max_radius`; its lifetime is
    /// `max_radius / grow_speed` frames at speed 1.
    Ring { max_radius: f32, grow_speed: f32, line_width: f32 },
}

impl Params for EmitShape {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            EmitShape::Dot { base_size, size_variation } => vec![
                ("particle_size", (*base_size).into()),
                ("size_variation", (*size_variation).into()),
            ],
            EmitShape::Ring { max_radius, grow_speed, line_width } => vec![
                ("max_radius", (*max_radius).into()),
                ("grow_speed", (*grow_speed).into()),
                ("line_width", (*line_width).into()),
            ],
        }
    }
}

/// Base configuration of an emit-and-expire simulation.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct EmitterParams {
    /// Every policy runs each frame, independently of the others.
    #[param(nested)]
    pub spawn: Vec<SpawnPolicy>,
    /// Particles per burst.
    pub burst_size: usize,
    /// Spread of spawn positions around the burst origin, in pixels.
    pub scatter: f32,
    #[param(nested)]
    pub spray: Spray,
    pub gravity: f32,
    /// Lifetime of dot particles in frames at speed 1.
    pub life: f32,
    /// Live bursts allowed at once.
    pub max_bursts: Option<usize>,
    #[param(nested)]
    pub shape: EmitShape,
    /// Shadow blur around each particle, `0` for none.
    pub glow: f32,
    pub base_hue: f32,
    pub hue_variation: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl EmitterParams {
    /// Starting `life` of a particle for the given size knob.
    pub fn lifetime(&self, size: f32) -> f32 {
        match self.shape {
            EmitShape::Dot { .. } => self.life,
            EmitShape::Ring { max_radius, grow_speed, .. } => max_radius * size / grow_speed,
        }
    }
}

/// One emitted particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub velocity: Vec2,
    pub life: f32,
    /// Radius of a dot, already scaled by size.
    pub size: f32,
    pub hue: f32,
}

/// Particles spawned together.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub origin: Vec2,
    pub sparks: Vec<Spark>,
}

/// Per-policy spawn bookkeeping.
#[derive(Debug, Clone, Default)]
struct Source {
    /// Fractional spawns carried between frames.
    accumulator: f32,
    path_angle: f32,
    subscription: Option<SubscriptionId>,
}

#[derive(Debug, Clone)]
pub struct EmitterState {
    bursts: Vec<Burst>,
    lifetime: f32,
    sources: Vec<Source>,
}

impl EmitterState {
    pub fn init(params: &EmitterParams, setup: &mut Setup) -> Result<Self, InitError> {
        match params.shape {
            EmitShape::Dot { .. } => require(params.life > 0.0, "life", "must be positive")?,
            EmitShape::Ring { max_radius, grow_speed, .. } => {
                require(grow_speed > 0.0, "grow_speed", "must be positive")?;
                require(max_radius > 0.0, "max_radius", "must be positive")?;
            }
        }
        for policy in &params.spawn {
            if let SpawnPolicy::Interval { frames } = policy {
                require(*frames > 0.0, "interval_frames", "must be positive")?;
            }
        }

        let lifetime = params.lifetime(setup.knobs.size);
        let sources = params
            .spawn
            .iter()
            .map(|policy| Source {
                subscription: policy.pointer_kind().map(|kind| setup.input.subscribe(kind)),
                ..Source::default()
            })
            .collect();

        Ok(Self { bursts: Vec::new(), lifetime, sources })
    }

    pub fn step(&mut self, params: &EmitterParams, frame: &mut Frame) {
        let dims = frame.dims();
        let speed = frame.knobs.speed;
        let size = frame.knobs.size;

        for (index, policy) in params.spawn.iter().enumerate() {
            self.spawn(index, *policy, params, frame, dims);
        }

        let lifetime = self.lifetime;
        for burst in &mut self.bursts {
            for spark in &mut burst.sparks {
                spark.position += spark.velocity;
                spark.velocity.y += params.gravity * speed;
                spark.life -= speed;
            }
            burst.sparks.retain(|s| s.life > 0.0 && s.position.is_finite() && on_screen(s, dims));
        }
        self.bursts.retain(|b| !b.sparks.is_empty());

        let (s, l) = (params.saturation, params.lightness);
        for burst in &self.bursts {
            for spark in &burst.sparks {
                let color = frame.knobs.tint(spark.hue, s, l);
                frame.surface.set_global_alpha((spark.life / lifetime).clamp(0.0, 1.0));
                if params.glow > 0.0 {
                    frame.surface.set_shadow(params.glow, color);
                }
                match params.shape {
                    EmitShape::Dot { .. } => {
                        frame.surface.fill_circle(spark.position, spark.size, &Paint::Solid(color));
                    }
                    EmitShape::Ring { max_radius, line_width, .. } => {
                        let radius = (1.0 - spark.life / lifetime) * max_radius * size;
                        frame.surface.stroke_circle(spark.position, radius, &Stroke::new(color, line_width * size));
                    }
                }
            }
        }
        frame.surface.clear_shadow();
        frame.surface.set_global_alpha(1.0);
    }

    fn spawn(&mut self, index: usize, policy: SpawnPolicy, params: &EmitterParams, frame: &mut Frame, dims: Dimensions) {
        let speed = frame.knobs.speed;
        match policy {
            SpawnPolicy::Interval { frames } => {
                self.sources[index].accumulator += speed / frames;
                while self.sources[index].accumulator >= 1.0 {
                    self.sources[index].accumulator -= 1.0;
                    let origin = random_point(dims, frame.rng);
                    self.push_burst(params, frame, origin);
                }
            }
            SpawnPolicy::Chance { per_frame } => {
                if frame.rng.gen::<f32>() < per_frame * speed {
                    let origin = random_point(dims, frame.rng);
                    self.push_burst(params, frame, origin);
                }
            }
            SpawnPolicy::Continuous { per_frame, radius_x, radius_y, angular_speed, hue_rate } => {
                let source = &mut self.sources[index];
                source.path_angle += angular_speed * speed;
                let angle = source.path_angle;
                let size = frame.knobs.size;
                let origin = dims.center() + Vec2::new(angle.cos() * radius_x, angle.sin() * radius_y) * size;

                source.accumulator += per_frame * speed;
                let count = source.accumulator.floor();
                source.accumulator -= count;

                if count >= 1.0 {
                    let hue = (hue_rate != 0.0).then(|| params.base_hue + angle * hue_rate);
                    let sparks =
                        (0..count as usize).map(|_| new_spark(params, origin, size, speed, hue, frame.rng)).collect();
                    self.bursts.push(Burst { origin, sparks });
                }
            }
            SpawnPolicy::PointerMove | SpawnPolicy::PointerClick => {
                if let Some(id) = self.sources[index].subscription {
                    for origin in frame.input.drain(id) {
                        self.push_burst(params, frame, origin);
                    }
                }
            }
        }
    }

    fn push_burst(&mut self, params: &EmitterParams, frame: &mut Frame, origin: Vec2) {
        if params.max_bursts.is_some_and(|max| self.bursts.len() >= max) {
            return;
        }
        let (size, speed) = (frame.knobs.size, frame.knobs.speed);
        let sparks = (0..params.burst_size).map(|_| new_spark(params, origin, size, speed, None, frame.rng)).collect();
        self.bursts.push(Burst { origin, sparks });
    }

    /// Release every pointer subscription taken during init.
    pub fn teardown(&mut self, input: &mut InputBus) {
        for source in &mut self.sources {
            if let Some(id) = source.subscription.take() {
                input.unsubscribe(id);
            }
        }
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn burst_count(&self) -> usize {
        self.bursts.len()
    }

    /// Live particles across all bursts.
    pub fn particle_count(&self) -> usize {
        self.bursts.iter().map(|b| b.sparks.len()).sum()
    }

    /// Starting `life` of every particle in this session.
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Pointer subscriptions currently held.
    pub fn subscriptions(&self) -> Vec<SubscriptionId> {
        self.sources.iter().filter_map(|s| s.subscription).collect()
    }
}

fn random_point(dims: Dimensions, rng: &mut SmallRng) -> Vec2 {
    Vec2::new(rng.gen::<f32>() * dims.width, rng.gen::<f32>() * dims.height)
}

fn new_spark(params: &EmitterParams, origin: Vec2, size: f32, speed: f32, hue: Option<f32>, rng: &mut SmallRng) -> Spark {
    let position = origin
        + Vec2::new((rng.gen::<f32>() - 0.5) * params.scatter, (rng.gen::<f32>() - 0.5) * params.scatter);

    let velocity = match params.spray {
        Spray::Still => Vec2::ZERO,
        Spray::Radial { base, variation } => {
            let angle = rng.gen::<f32>() * TAU;
            Vec2::from_angle(angle) * (base + rng.gen::<f32>() * variation) * speed
        }
        Spray::Jitter { magnitude } => Vec2::new(
            (rng.gen::<f32>() - 0.5) * magnitude * speed,
            (rng.gen::<f32>() - 0.5) * magnitude * speed,
        ),
    };

    let radius = match params.shape {
        EmitShape::Dot { base_size, size_variation } => (base_size + rng.gen::<f32>() * size_variation) * size,
        EmitShape::Ring { .. } => 0.0,
    };

    Spark {
        position,
        velocity,
        life: params.lifetime(size),
        size: radius,
        hue: hue.unwrap_or_else(|| params.base_hue + rng.gen::<f32>() * params.hue_variation),
    }
}

/// Dots drift off freely; once fully past an edge they are dropped.
fn on_screen(spark: &Spark, dims: Dimensions) -> bool {
    let margin = spark.size;
    spark.position.x >= -margin
        && spark.position.x <= dims.width + margin
        && spark.position.y >= -margin
        && spark.position.y <= dims.height + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Knobs;
    use crate::input::PointerEvent;
    use crate::recording::{DrawCommand, RecordingSurface};
    use rand::SeedableRng;

    fn splash() -> EmitterParams {
        EmitterParams {
            spawn: vec![SpawnPolicy::Interval { frames: 60.0 }],
            burst_size: 50,
            scatter: 0.0,
            spray: Spray::Radial { base: 2.0, variation: 5.0 },
            gravity: 0.2,
            life: 100.0,
            max_bursts: None,
            shape: EmitShape::Dot { base_size: 3.0, size_variation: 0.0 },
            glow: 0.0,
            base_hue: 0.0,
            hue_variation: 360.0,
            saturation: 70.0,
            lightness: 60.0,
        }
    }

    fn ripple() -> EmitterParams {
        EmitterParams {
            spawn: vec![SpawnPolicy::PointerClick],
            burst_size: 1,
            scatter: 0.0,
            spray: Spray::Still,
            gravity: 0.0,
            life: 0.0,
            max_bursts: None,
            shape: EmitShape::Ring { max_radius: 200.0, grow_speed: 3.0, line_width: 3.0 },
            glow: 0.0,
            base_hue: 0.0,
            hue_variation: 360.0,
            saturation: 70.0,
            lightness: 60.0,
        }
    }

    struct Harness {
        rng: SmallRng,
        input: InputBus,
        surface: RecordingSurface,
    }

    impl Harness {
        fn new() -> Self {
            Self { rng: SmallRng::seed_from_u64(11), input: InputBus::new(), surface: RecordingSurface::new(800.0, 600.0) }
        }

        fn init(&mut self, params: &EmitterParams, knobs: Knobs) -> Result<EmitterState, InitError> {
            let mut setup = Setup {
                dims: Dimensions::new(800.0, 600.0),
                knobs,
                rng: &mut self.rng,
                input: &mut self.input,
            };
            EmitterState::init(params, &mut setup)
        }

        fn step(&mut self, state: &mut EmitterState, params: &EmitterParams, knobs: Knobs) {
            self.surface.clear();
            let mut frame = Frame { surface: &mut self.surface, input: &mut self.input, rng: &mut self.rng, knobs };
            state.step(params, &mut frame);
        }
    }

    #[test]
    fn test_interval_count_bounded_by_expiry() {
        let params = splash();
        for speed in [0.5, 1.0, 3.0] {
            let knobs = Knobs::new(speed, 1.0, 0.0);
            let mut h = Harness::new();
            let mut state = h.init(&params, knobs).unwrap();

            // r * L with r = burst_size / frames, plus one burst of slack
            let bound = 50.0 / 60.0 * 100.0 + 50.0;
            for _ in 0..2000 {
                h.step(&mut state, &params, knobs);
                assert!(state.particle_count() as f32 <= bound, "speed {speed}: {}", state.particle_count());
            }
        }
    }

    #[test]
    fn test_continuous_count_bounded_by_expiry() {
        let params = EmitterParams {
            spawn: vec![SpawnPolicy::Continuous {
                per_frame: 2.0,
                radius_x: 150.0,
                radius_y: 100.0,
                angular_speed: 0.05,
                hue_rate: 50.0,
            }],
            burst_size: 0,
            scatter: 10.0,
            spray: Spray::Jitter { magnitude: 2.0 },
            gravity: 0.0,
            life: 60.0,
            max_bursts: None,
            shape: EmitShape::Dot { base_size: 2.0, size_variation: 4.0 },
            glow: 10.0,
            base_hue: 0.0,
            hue_variation: 360.0,
            saturation: 70.0,
            lightness: 60.0,
        };
        for speed in [0.3, 1.0, 3.0] {
            let knobs = Knobs::new(speed, 1.0, 0.0);
            let mut h = Harness::new();
            let mut state = h.init(&params, knobs).unwrap();
            for _ in 0..500 {
                h.step(&mut state, &params, knobs);
            }
            let count = state.particle_count() as f32;
            assert!(count <= 2.0 * 60.0 + 4.0, "speed {speed}: {count}");
            assert!(count > 0.0);
        }
    }

    #[test]
    fn test_ring_grows_and_expires() {
        let params = ripple();
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default()).unwrap();
        assert_eq!(state.lifetime(), 200.0 / 3.0);

        h.input.dispatch(PointerEvent::clicked(Vec2::new(100.0, 100.0)));
        h.step(&mut state, &params, Knobs::default());
        assert_eq!(state.burst_count(), 1);

        let radius = h.surface.commands().iter().find_map(|c| match c {
            DrawCommand::StrokeCircle { radius, .. } => Some(*radius),
            _ => None,
        });
        assert!((radius.unwrap() - 3.0).abs() < 1e-3);

        for _ in 0..70 {
            h.step(&mut state, &params, Knobs::default());
        }
        assert_eq!(state.burst_count(), 0);
    }

    #[test]
    fn test_pointer_teardown_stops_spawning() {
        let params = ripple();
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default()).unwrap();
        assert_eq!(h.input.subscription_count(), 1);

        state.teardown(&mut h.input);
        assert_eq!(h.input.subscription_count(), 0);
        assert_eq!(h.input.dispatch(PointerEvent::clicked(Vec2::new(5.0, 5.0))), 0);

        h.step(&mut state, &params, Knobs::default());
        assert_eq!(state.burst_count(), 0);
    }

    #[test]
    fn test_pointer_and_path_sources_combine() {
        let params = EmitterParams {
            spawn: vec![
                SpawnPolicy::PointerMove,
                SpawnPolicy::Continuous { per_frame: 2.0, radius_x: 150.0, radius_y: 100.0, angular_speed: 0.05, hue_rate: 50.0 },
            ],
            burst_size: 3,
            scatter: 10.0,
            spray: Spray::Jitter { magnitude: 2.0 },
            gravity: 0.0,
            life: 60.0,
            max_bursts: None,
            shape: EmitShape::Dot { base_size: 2.0, size_variation: 4.0 },
            glow: 10.0,
            base_hue: 0.0,
            hue_variation: 360.0,
            saturation: 70.0,
            lightness: 60.0,
        };
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default()).unwrap();
        assert_eq!(state.subscriptions().len(), 1);

        h.input.dispatch(PointerEvent::moved(Vec2::new(40.0, 40.0)));
        h.step(&mut state, &params, Knobs::default());
        assert_eq!(state.burst_count(), 2);
        assert_eq!(state.particle_count(), 3 + 2);
        assert_eq!(state.bursts()[0].origin, Vec2::new(40.0, 40.0));
        assert!(state.bursts()[0].sparks.iter().all(|s| s.position.distance(Vec2::new(40.0, 40.0)) < 10.0));

        state.teardown(&mut h.input);
        assert!(state.subscriptions().is_empty());
        assert_eq!(h.input.subscription_count(), 0);
    }

    #[test]
    fn test_max_bursts_caps_growth() {
        let params = EmitterParams {
            spawn: vec![SpawnPolicy::Chance { per_frame: 1.0 }],
            max_bursts: Some(3),
            life: 1000.0,
            gravity: 0.0,
            spray: Spray::Still,
            ..splash()
        };
        let mut h = Harness::new();
        let mut state = h.init(&params, Knobs::default()).unwrap();
        for _ in 0..20 {
            h.step(&mut state, &params, Knobs::default());
        }
        assert_eq!(state.burst_count(), 3);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let params = EmitterParams { spawn: vec![SpawnPolicy::Interval { frames: 0.0 }], ..splash() };
        let mut h = Harness::new();
        let err = h.init(&params, Knobs::default()).unwrap_err();
        assert!(matches!(err, InitError::InvalidParam { name: "interval_frames", .. }));
    }
}
