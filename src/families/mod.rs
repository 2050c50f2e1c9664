//! The six simulation families.
//!
//! Every animation in the gallery is one of six update/render engines run
//! with a different base configuration:
//!
//! | Family | Engine | Examples |
//! |--------|--------|----------|
//! | [`Family::Field`] | fixed grid or line, displacement from a global phase | Wave Pool, Color Waves, Hexagon Grid |
//! | [`Family::Orbit`] | bodies on parametric paths around a center | Orbit Dance, Spiral Galaxy, Pendulum Harmony |
//! | [`Family::Forces`] | free particles under forces and an edge policy | Bouncing Balls, Gravity Wells, Star Field |
//! | [`Family::Emitter`] | particles that spawn, age and expire | Paint Splash, Sparkle Trail, Ripple Effect |
//! | [`Family::Bloom`] | angular arrangement driven by growth accumulators | Flower Bloom, Pulse Rings |
//! | [`Family::Bolt`] | branching random-walk bolts with a frame lifetime | Lightning Orbs, Lightning Storm |
//!
//! A [`SimKind`] is the base configuration of one animation. [`SimKind::init`]
//! turns it into a [`SimState`] for a surface size, and [`SimState::step`]
//! advances one frame and draws it.
//!
//! # Determinism
//!
//! All randomness comes from a `SmallRng` seeded from the effective config,
//! so a session replays identically for the same seed, knobs and input.

pub mod bloom;
pub mod bolt;
pub mod emitter;
pub mod field;
pub mod forces;
pub mod orbit;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{EffectiveConfig, Knobs, ParamValue, Params};
use crate::error::InitError;
use crate::input::InputBus;
use crate::surface::{Dimensions, Surface};

pub use bloom::{BloomParams, BloomPattern, BloomState};
pub use bolt::{BoltParams, BoltSource, BoltState};
pub use emitter::{Burst, EmitShape, EmitterParams, EmitterState, Spark, SpawnPolicy, Spray};
pub use field::{FieldLayout, FieldParams, FieldState, Wave};
pub use forces::{EdgePolicy, Force, ForceParams, ForceState, Launch, Particle, ParticleShape, Respawn};
pub use orbit::{Body, OrbitMotion, OrbitParams, OrbitState};

/// Floor for any distance used as a divisor, in pixels.
pub const MIN_DISTANCE: f32 = 1.0;

/// Which engine a simulation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Field,
    Orbit,
    Forces,
    Emitter,
    Bloom,
    Bolt,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Field => "Oscillating field",
            Family::Orbit => "Orbiting bodies",
            Family::Forces => "Free particles",
            Family::Emitter => "Emit and expire",
            Family::Bloom => "Growth and bloom",
            Family::Bolt => "Branching bolts",
        }
    }

    pub fn variants() -> &'static [Family] {
        &[
            Family::Field,
            Family::Orbit,
            Family::Forces,
            Family::Emitter,
            Family::Bloom,
            Family::Bolt,
        ]
    }
}

/// Everything a family needs while building its initial state.
pub struct Setup<'a> {
    pub dims: Dimensions,
    pub knobs: Knobs,
    pub rng: &'a mut SmallRng,
    pub input: &'a mut InputBus,
}

/// Everything a family needs while stepping one frame.
pub struct Frame<'a> {
    pub surface: &'a mut dyn Surface,
    pub input: &'a mut InputBus,
    pub rng: &'a mut SmallRng,
    pub knobs: Knobs,
}

impl Frame<'_> {
    pub fn dims(&self) -> Dimensions {
        self.surface.dimensions()
    }
}

/// Base configuration of one simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum SimKind {
    Field(FieldParams),
    Orbit(OrbitParams),
    Forces(ForceParams),
    Emitter(EmitterParams),
    Bloom(BloomParams),
    Bolt(BoltParams),
}

impl SimKind {
    pub fn family(&self) -> Family {
        match self {
            SimKind::Field(_) => Family::Field,
            SimKind::Orbit(_) => Family::Orbit,
            SimKind::Forces(_) => Family::Forces,
            SimKind::Emitter(_) => Family::Emitter,
            SimKind::Bloom(_) => Family::Bloom,
            SimKind::Bolt(_) => Family::Bolt,
        }
    }

    /// Build the initial state for a surface of `dims`.
    ///
    /// Fails on a degenerate surface or an unusable parameter. Nothing is
    /// left subscribed on the input bus when this fails.
    pub fn init(
        &self,
        dims: Dimensions,
        config: &EffectiveConfig,
        input: &mut InputBus,
    ) -> Result<SimState, InitError> {
        if dims.is_degenerate() {
            return Err(InitError::DegenerateSurface { width: dims.width, height: dims.height });
        }

        let mut rng = SmallRng::seed_from_u64(config.seed());
        let mut setup = Setup { dims, knobs: config.knobs(), rng: &mut rng, input };

        let body = match self {
            SimKind::Field(p) => FamilyState::Field(FieldState::init(p, &mut setup)?),
            SimKind::Orbit(p) => FamilyState::Orbit(OrbitState::init(p, &mut setup)?),
            SimKind::Forces(p) => FamilyState::Forces(ForceState::init(p, &mut setup)?),
            SimKind::Emitter(p) => FamilyState::Emitter(EmitterState::init(p, &mut setup)?),
            SimKind::Bloom(p) => FamilyState::Bloom(BloomState::init(p, &mut setup)?),
            SimKind::Bolt(p) => FamilyState::Bolt(BoltState::init(p, &mut setup)?),
        };

        Ok(SimState { rng, frame: 0, dims, body })
    }
}

impl Params for SimKind {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            SimKind::Field(p) => p.entries(),
            SimKind::Orbit(p) => p.entries(),
            SimKind::Forces(p) => p.entries(),
            SimKind::Emitter(p) => p.entries(),
            SimKind::Bloom(p) => p.entries(),
            SimKind::Bolt(p) => p.entries(),
        }
    }
}

/// Per-family mutable state.
#[derive(Debug)]
pub enum FamilyState {
    Field(FieldState),
    Orbit(OrbitState),
    Forces(ForceState),
    Emitter(EmitterState),
    Bloom(BloomState),
    Bolt(BoltState),
}

/// Mutable state of one running simulation.
#[derive(Debug)]
pub struct SimState {
    rng: SmallRng,
    frame: u64,
    dims: Dimensions,
    body: FamilyState,
}

impl SimState {
    /// Advance one frame and draw it.
    ///
    /// Lays the config's backdrop over the previous frame first, then lets
    /// the family update and draw.
    pub fn step(&mut self, config: &EffectiveConfig, surface: &mut dyn Surface, input: &mut InputBus) {
        surface.fade(config.backdrop());

        let mut frame = Frame { surface, input, rng: &mut self.rng, knobs: config.knobs() };
        match (&mut self.body, config.kind()) {
            (FamilyState::Field(s), SimKind::Field(p)) => s.step(p, &mut frame),
            (FamilyState::Orbit(s), SimKind::Orbit(p)) => s.step(p, &mut frame),
            (FamilyState::Forces(s), SimKind::Forces(p)) => s.step(p, &mut frame),
            (FamilyState::Emitter(s), SimKind::Emitter(p)) => s.step(p, &mut frame),
            (FamilyState::Bloom(s), SimKind::Bloom(p)) => s.step(p, &mut frame),
            (FamilyState::Bolt(s), SimKind::Bolt(p)) => s.step(p, &mut frame),
            (_, kind) => {
                tracing::error!(
                    simulation = config.name(),
                    family = kind.family().name(),
                    "state does not belong to this config, skipping frame"
                );
                return;
            }
        }
        self.frame += 1;
    }

    /// Release everything the simulation acquired from the input bus.
    pub fn teardown(&mut self, input: &mut InputBus) {
        match &mut self.body {
            FamilyState::Forces(s) => s.teardown(input),
            FamilyState::Emitter(s) => s.teardown(input),
            FamilyState::Field(_)
            | FamilyState::Orbit(_)
            | FamilyState::Bloom(_)
            | FamilyState::Bolt(_) => {}
        }
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Surface size the state was built for.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn family(&self) -> Family {
        match self.body {
            FamilyState::Field(_) => Family::Field,
            FamilyState::Orbit(_) => Family::Orbit,
            FamilyState::Forces(_) => Family::Forces,
            FamilyState::Emitter(_) => Family::Emitter,
            FamilyState::Bloom(_) => Family::Bloom,
            FamilyState::Bolt(_) => Family::Bolt,
        }
    }

    pub fn body(&self) -> &FamilyState {
        &self.body
    }

    pub fn as_orbit(&self) -> Option<&OrbitState> {
        match &self.body {
            FamilyState::Orbit(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_forces(&self) -> Option<&ForceState> {
        match &self.body {
            FamilyState::Forces(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_emitter(&self) -> Option<&EmitterState> {
        match &self.body {
            FamilyState::Emitter(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bolt(&self) -> Option<&BoltState> {
        match &self.body {
            FamilyState::Bolt(s) => Some(s),
            _ => None,
        }
    }
}

// ========== Shared helpers ==========

/// Fail with `InvalidParam` unless `ok`.
pub(crate) fn require(ok: bool, name: &'static str, reason: &str) -> Result<(), InitError> {
    if ok {
        Ok(())
    } else {
        Err(InitError::InvalidParam { name, reason: reason.to_string() })
    }
}

/// Unit vector from `from` toward `to` and the floored distance between them.
pub(crate) fn direction(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length().max(MIN_DISTANCE);
    (delta / dist, dist)
}

/// Replace a non-finite vector with `fallback`.
pub(crate) fn finite_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
