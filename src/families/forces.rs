//! Free particles under forces.
//!
//! Each particle carries a position and a velocity. A frame applies every
//! [`Force`] to the velocity, multiplies by friction, integrates the
//! position, then enforces the simulation's [`EdgePolicy`]:
//!
//! | Policy | At the surface edge |
//! |--------|---------------------|
//! | `Free` | nothing, particles may leave |
//! | `Bounce` | velocity reflected (and damped), position clamped back inside |
//! | `Wrap` | position wraps to the opposite edge, velocity untouched |
//! | `Respawn` | particle re-seeded at a fresh spawn point |
//!
//! Distances used as divisors are floored at [`MIN_DISTANCE`], and a particle
//! whose position or velocity stops being finite is re-seeded on the spot.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use super::{direction, finite_or, require, Frame, Setup, MIN_DISTANCE};
use crate::color::Color;
use crate::error::InitError;
use crate::input::{InputBus, PointerKind, SubscriptionId};
use crate::surface::{Dimensions, Paint, Stroke};
use crate::{ParamValue, Params};

/// A force accumulated into velocity every frame. Magnitudes scale with speed.
#[derive(Clone, Debug, PartialEq)]
pub enum Force {
    /// Constant downward pull.
    Gravity { strength: f32 },
    /// Unit-direction pull toward fixed wells on the horizontal midline.
    Wells {
        /// Well x positions as fractions of the width.
        positions: Vec<f32>,
        strength: f32,
        /// Drawn radius of each well.
        well_radius: f32,
    },
    /// Pull toward the last pointer position, stronger when closer.
    Pointer { strength: f32, reach: f32, max_force: f32 },
    /// Pairwise push between particles closer than `radius`.
    Repulsion { radius: f32, strength: f32 },
}

impl Params for Force {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            Force::Gravity { strength } => vec![("gravity", (*strength).into())],
            Force::Wells { positions, strength, well_radius } => vec![
                ("well_positions", positions.clone().into()),
                ("well_strength", (*strength).into()),
                ("well_radius", (*well_radius).into()),
            ],
            Force::Pointer { strength, reach, max_force } => vec![
                ("pointer_strength", (*strength).into()),
                ("pointer_reach", (*reach).into()),
                ("pointer_max_force", (*max_force).into()),
            ],
            Force::Repulsion { radius, strength } => vec![
                ("repulsion_radius", (*radius).into()),
                ("repulsion_strength", (*strength).into()),
            ],
        }
    }
}

/// Where a respawned particle reappears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Respawn {
    /// Above the top edge at a random x, once it falls past the bottom.
    Top,
    /// Back at the far plane, once its depth reaches zero.
    Depth,
}

/// What happens at the surface boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePolicy {
    Free,
    Bounce {
        /// Fraction of speed kept on reflection.
        damping: f32,
        /// Keep the whole disc inside instead of just its center.
        inset_by_radius: bool,
    },
    Wrap,
    Respawn(Respawn),
}

impl Params for EdgePolicy {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            EdgePolicy::Free => vec![("edges", "free".into())],
            EdgePolicy::Bounce { damping, inset_by_radius } => vec![
                ("edges", "bounce".into()),
                ("damping", (*damping).into()),
                ("inset_by_radius", (*inset_by_radius).into()),
            ],
            EdgePolicy::Wrap => vec![("edges", "wrap".into())],
            EdgePolicy::Respawn(Respawn::Top) => vec![("edges", "respawn at top".into())],
            EdgePolicy::Respawn(Respawn::Depth) => vec![("edges", "respawn at far plane".into())],
        }
    }
}

/// Initial velocity of a particle, scaled by speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Launch {
    Still,
    /// Each component uniform in `[-magnitude/2, magnitude/2)`.
    Scatter { magnitude: f32 },
    /// Straight down at `base + rand * variation`.
    Fall { base: f32, variation: f32 },
    /// Down at `fall..2*fall` with a sideways component in `[-sway, sway)`.
    Drift { fall: f32, sway: f32 },
}

impl Params for Launch {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            Launch::Still => vec![("launch", "still".into())],
            Launch::Scatter { magnitude } => vec![("launch", "scatter".into()), ("launch_velocity", (*magnitude).into())],
            Launch::Fall { base, variation } => vec![
                ("launch", "fall".into()),
                ("fall_speed", (*base).into()),
                ("fall_variation", (*variation).into()),
            ],
            Launch::Drift { fall, sway } => vec![
                ("launch", "drift".into()),
                ("fall_speed", (*fall).into()),
                ("sway", (*sway).into()),
            ],
        }
    }
}

/// How a particle is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleShape {
    Dot { radius: f32, radius_variation: f32 },
    /// Vertical line hanging below the particle.
    Streak { base_length: f32, length_variation: f32, line_width: f32 },
    /// Point in depth projected toward the viewer, growing as it approaches.
    Star { max_size: f32, depth_speed: f32 },
}

impl Params for ParticleShape {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            ParticleShape::Dot { radius, radius_variation } => vec![
                ("radius", (*radius).into()),
                ("radius_variation", (*radius_variation).into()),
            ],
            ParticleShape::Streak { base_length, length_variation, line_width } => vec![
                ("base_length", (*base_length).into()),
                ("length_variation", (*length_variation).into()),
                ("line_width", (*line_width).into()),
            ],
            ParticleShape::Star { max_size, depth_speed } => vec![
                ("max_star_size", (*max_size).into()),
                ("depth_speed", (*depth_speed).into()),
            ],
        }
    }
}

/// Base configuration of a free-particle simulation.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct ForceParams {
    pub count: usize,
    #[param(nested)]
    pub launch: Launch,
    #[param(nested)]
    pub forces: Vec<Force>,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    #[param(nested)]
    pub edges: EdgePolicy,
    #[param(nested)]
    pub shape: ParticleShape,
    pub base_hue: f32,
    pub hue_variation: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// One free particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Distance from the viewer for star shapes, unused otherwise.
    pub depth: f32,
    /// Drawn radius or streak length, already scaled by size.
    pub extent: f32,
    pub hue: f32,
}

#[derive(Debug, Clone)]
pub struct ForceState {
    particles: Vec<Particle>,
    wells: Vec<Vec2>,
    pointer: Vec2,
    subscription: Option<SubscriptionId>,
}

impl ForceState {
    pub fn init(params: &ForceParams, setup: &mut Setup) -> Result<Self, InitError> {
        require(params.friction.is_finite() && params.friction >= 0.0, "friction", "must be a non-negative number")?;

        let dims = setup.dims;
        let wells = params
            .forces
            .iter()
            .filter_map(|f| match f {
                Force::Wells { positions, .. } => Some(positions),
                _ => None,
            })
            .flatten()
            .map(|x| Vec2::new(dims.width * x, dims.height * 0.5))
            .collect();

        let particles = (0..params.count)
            .map(|_| seed_particle(params, dims, setup.knobs.speed, setup.knobs.size, setup.rng))
            .collect();

        // subscribe last so a failed init above leaves nothing registered
        let subscription = params
            .forces
            .iter()
            .any(|f| matches!(f, Force::Pointer { .. }))
            .then(|| setup.input.subscribe(PointerKind::Move));

        Ok(Self { particles, wells, pointer: dims.center(), subscription })
    }

    pub fn step(&mut self, params: &ForceParams, frame: &mut Frame) {
        let dims = frame.dims();
        let speed = frame.knobs.speed;
        let size = frame.knobs.size;

        if let Some(id) = self.subscription {
            if let Some(last) = frame.input.drain(id).last() {
                self.pointer = *last;
            }
        }

        let snapshot: Vec<Vec2> = if params.forces.iter().any(|f| matches!(f, Force::Repulsion { .. })) {
            self.particles.iter().map(|p| p.position).collect()
        } else {
            Vec::new()
        };

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];

            for force in &params.forces {
                p.velocity += self.acceleration(force, i, &p, &snapshot, speed, size);
            }
            p.velocity *= params.friction;
            p.position += p.velocity;
            if let ParticleShape::Star { depth_speed, .. } = params.shape {
                p.depth -= depth_speed * speed;
            }

            apply_edges(&mut p, params, dims, frame.rng);

            if !(p.position.is_finite() && p.velocity.is_finite()) {
                p = seed_particle(params, dims, speed, size, frame.rng);
            }
            self.particles[i] = p;
        }

        let (s, l) = (params.saturation, params.lightness);
        for p in &self.particles {
            let color = frame.knobs.tint(p.hue, s, l);
            match params.shape {
                ParticleShape::Dot { .. } => {
                    frame.surface.fill_circle(p.position, p.extent, &Paint::Solid(color));
                }
                ParticleShape::Streak { line_width, .. } => {
                    let tail = p.position + Vec2::new(0.0, p.extent);
                    frame.surface.line(p.position, tail, &Stroke::new(color, line_width * size));
                }
                ParticleShape::Star { max_size, .. } => {
                    let depth = p.depth.max(MIN_DISTANCE);
                    let projected = Vec2::new(
                        p.position.x / depth * dims.width + dims.width / 2.0,
                        p.position.y / depth * dims.height + dims.height / 2.0,
                    );
                    let radius = (1.0 - p.depth / dims.width) * max_size * size;
                    if radius > 0.0 {
                        frame.surface.fill_circle(projected, radius, &Paint::Solid(color));
                    }
                }
            }
        }

        for force in &params.forces {
            if let Force::Wells { well_radius, .. } = force {
                let paint = Paint::Solid(Color::rgba(255, 255, 255, 0.3));
                for well in &self.wells {
                    frame.surface.fill_circle(*well, well_radius * size, &paint);
                }
            }
        }
    }

    fn acceleration(&self, force: &Force, index: usize, p: &Particle, snapshot: &[Vec2], speed: f32, size: f32) -> Vec2 {
        match force {
            Force::Gravity { strength } => Vec2::new(0.0, strength * speed),
            Force::Wells { strength, .. } => self
                .wells
                .iter()
                .map(|w| direction(p.position, *w).0 * strength * speed)
                .sum(),
            Force::Pointer { strength, reach, max_force } => {
                let (dir, dist) = direction(p.position, self.pointer);
                let magnitude = (reach / dist).min(*max_force) * speed;
                dir * magnitude * strength
            }
            Force::Repulsion { radius, strength } => {
                let range = (radius * size).max(MIN_DISTANCE);
                let mut push = Vec2::ZERO;
                for (j, other) in snapshot.iter().enumerate() {
                    if j == index {
                        continue;
                    }
                    let delta = *other - p.position;
                    let dist = delta.length();
                    // coincident particles have no direction to push along
                    if dist < range && dist > 0.0 {
                        let falloff = (range - dist) / range;
                        push -= delta / dist.max(MIN_DISTANCE) * falloff * strength * speed;
                    }
                }
                push
            }
        }
    }

    /// Release the pointer subscription, if one was taken.
    pub fn teardown(&mut self, input: &mut InputBus) {
        if let Some(id) = self.subscription.take() {
            input.unsubscribe(id);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Position the pointer force pulls toward.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn wells(&self) -> &[Vec2] {
        &self.wells
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }
}

fn seed_particle(params: &ForceParams, dims: Dimensions, speed: f32, size: f32, rng: &mut SmallRng) -> Particle {
    let (w, h) = (dims.width, dims.height);
    let velocity = match params.launch {
        Launch::Still => Vec2::ZERO,
        Launch::Scatter { magnitude } => Vec2::new(
            (rng.gen::<f32>() - 0.5) * magnitude * speed,
            (rng.gen::<f32>() - 0.5) * magnitude * speed,
        ),
        Launch::Fall { base, variation } => Vec2::new(0.0, (base + rng.gen::<f32>() * variation) * speed),
        Launch::Drift { fall, sway } => Vec2::new(
            (rng.gen::<f32>() * 2.0 - 1.0) * sway * speed,
            (fall + rng.gen::<f32>() * fall) * speed,
        ),
    };

    let (position, depth, extent) = match params.shape {
        ParticleShape::Dot { radius, radius_variation } => (
            Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h),
            0.0,
            (radius + rng.gen::<f32>() * radius_variation) * size,
        ),
        ParticleShape::Streak { base_length, length_variation, .. } => (
            Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h),
            0.0,
            (base_length + rng.gen::<f32>() * length_variation) * size,
        ),
        ParticleShape::Star { .. } => (
            Vec2::new(rng.gen::<f32>() * w - w / 2.0, rng.gen::<f32>() * h - h / 2.0),
            rng.gen::<f32>() * w,
            0.0,
        ),
    };

    Particle {
        position,
        velocity,
        depth,
        extent,
        hue: params.base_hue + rng.gen::<f32>() * params.hue_variation,
    }
}

/// Reflect one axis back inside `[lo, hi]`, keeping `damping` of the speed.
fn bounce_axis(pos: &mut f32, vel: &mut f32, lo: f32, hi: f32, damping: f32) {
    if *pos < lo {
        *pos = lo;
        *vel = vel.abs() * damping;
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs() * damping;
    }
}

fn apply_edges(p: &mut Particle, params: &ForceParams, dims: Dimensions, rng: &mut SmallRng) {
    let (w, h) = (dims.width, dims.height);
    match params.edges {
        EdgePolicy::Free => {}
        EdgePolicy::Bounce { damping, inset_by_radius } => {
            let r = if inset_by_radius { p.extent.max(0.0) } else { 0.0 };
            // a disc wider than the surface is pinned to the middle
            let (x_lo, x_hi) = (r.min(w / 2.0), (w - r).max(w / 2.0));
            let (y_lo, y_hi) = (r.min(h / 2.0), (h - r).max(h / 2.0));
            bounce_axis(&mut p.position.x, &mut p.velocity.x, x_lo, x_hi, damping);
            bounce_axis(&mut p.position.y, &mut p.velocity.y, y_lo, y_hi, damping);
        }
        EdgePolicy::Wrap => {
            p.position.x = p.position.x.rem_euclid(w);
            p.position.y = p.position.y.rem_euclid(h);
        }
        EdgePolicy::Respawn(Respawn::Top) => {
            if p.position.y > h {
                p.position = Vec2::new(rng.gen::<f32>() * w, -p.extent);
            }
        }
        EdgePolicy::Respawn(Respawn::Depth) => {
            if p.depth <= 0.0 {
                p.depth = w;
                p.position = Vec2::new(rng.gen::<f32>() * w - w / 2.0, rng.gen::<f32>() * h - h / 2.0);
            }
        }
    }
    p.position = finite_or(p.position, dims.center());
}
