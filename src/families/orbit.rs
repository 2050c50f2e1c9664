//! Orbiting bodies.
//!
//! A fixed set of bodies, each with an angle and a radius around a center (or
//! pivot). Every frame the angle advances by a per-body angular velocity that
//! was scaled by speed when the body was created. Radius and size were scaled
//! by size at the same time.
//!
//! Angular motion is linear in the speed knob: running `2N` frames at speed
//! `s` ends at the same angles as `N` frames at `2s`. Pendulums are the
//! exception, since their angular velocity comes from damped dynamics.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{require, Frame, Setup, MIN_DISTANCE};
use crate::error::InitError;
use crate::surface::{Paint, Stroke};
use crate::{ParamValue, Params};

/// How bodies are placed and moved.
#[derive(Clone, Debug, PartialEq)]
pub enum OrbitMotion {
    /// Concentric orbits, outer bodies slightly faster.
    Ring {
        base_radius: f32,
        radius_step: f32,
        base_speed: f32,
        speed_step: f32,
        body_radius: f32,
        hue_step: f32,
        glow: f32,
    },
    /// One arm winding outward; inner bodies turn faster.
    Spiral {
        turns: f32,
        max_radius: f32,
        base_speed: f32,
        speed_variation: f32,
        base_size: f32,
        size_variation: f32,
        hue_per_index: f32,
    },
    /// A ring seen at an angle: squashed vertically, near side larger and brighter.
    Carousel {
        radius: f32,
        rotation_speed: f32,
        base_size: f32,
        size_variation: f32,
        perspective: f32,
    },
    /// Concentric discs drawn through a rotating transform.
    Target {
        base_radius: f32,
        radius_step: f32,
        rotation_speed: f32,
        hue_step: f32,
    },
    /// Bodies spiralling inward, re-seeded at the rim when they reach the core.
    Vortex {
        max_radius: f32,
        min_radius: f32,
        base_speed: f32,
        speed_variation: f32,
        pull_speed: f32,
        particle_size: f32,
    },
    /// Damped pendulums of increasing length sharing one pivot.
    Pendulum {
        pivot_y: f32,
        base_length: f32,
        length_step: f32,
        initial_angle: f32,
        gravity: f32,
        damping: f32,
        bob_size: f32,
        line_width: f32,
        hue_step: f32,
    },
}

impl Params for OrbitMotion {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            OrbitMotion::Ring { base_radius, radius_step, base_speed, speed_step, body_radius, hue_step, glow } => vec![
                ("motion", "ring".into()),
                ("base_radius", (*base_radius).into()),
                ("radius_step", (*radius_step).into()),
                ("base_speed", (*base_speed).into()),
                ("speed_step", (*speed_step).into()),
                ("body_radius", (*body_radius).into()),
                ("hue_step", (*hue_step).into()),
                ("glow", (*glow).into()),
            ],
            OrbitMotion::Spiral { turns, max_radius, base_speed, speed_variation, base_size, size_variation, hue_per_index } => vec![
                ("motion", "spiral".into()),
                ("turns", (*turns).into()),
                ("max_radius", (*max_radius).into()),
                ("base_speed", (*base_speed).into()),
                ("speed_variation", (*speed_variation).into()),
                ("base_size", (*base_size).into()),
                ("size_variation", (*size_variation).into()),
                ("hue_per_index", (*hue_per_index).into()),
            ],
            OrbitMotion::Carousel { radius, rotation_speed, base_size, size_variation, perspective } => vec![
                ("motion", "carousel".into()),
                ("radius", (*radius).into()),
                ("rotation_speed", (*rotation_speed).into()),
                ("base_size", (*base_size).into()),
                ("size_variation", (*size_variation).into()),
                ("perspective", (*perspective).into()),
            ],
            OrbitMotion::Target { base_radius, radius_step, rotation_speed, hue_step } => vec![
                ("motion", "target".into()),
                ("base_radius", (*base_radius).into()),
                ("radius_step", (*radius_step).into()),
                ("rotation_speed", (*rotation_speed).into()),
                ("hue_step", (*hue_step).into()),
            ],
            OrbitMotion::Vortex { max_radius, min_radius, base_speed, speed_variation, pull_speed, particle_size } => vec![
                ("motion", "vortex".into()),
                ("max_radius", (*max_radius).into()),
                ("min_radius", (*min_radius).into()),
                ("base_speed", (*base_speed).into()),
                ("speed_variation", (*speed_variation).into()),
                ("pull_speed", (*pull_speed).into()),
                ("particle_size", (*particle_size).into()),
            ],
            OrbitMotion::Pendulum {
                pivot_y,
                base_length,
                length_step,
                initial_angle,
                gravity,
                damping,
                bob_size,
                line_width,
                hue_step,
            } => vec![
                ("motion", "pendulum".into()),
                ("pivot_y", (*pivot_y).into()),
                ("base_length", (*base_length).into()),
                ("length_step", (*length_step).into()),
                ("initial_angle", (*initial_angle).into()),
                ("gravity", (*gravity).into()),
                ("damping", (*damping).into()),
                ("bob_size", (*bob_size).into()),
                ("line_width", (*line_width).into()),
                ("hue_step", (*hue_step).into()),
            ],
        }
    }
}

/// Base configuration of an orbiting-bodies simulation.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct OrbitParams {
    pub count: usize,
    #[param(nested)]
    pub motion: OrbitMotion,
    pub base_hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// One orbiting body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Angle in radians around the center (or from vertical, for pendulums).
    pub angle: f32,
    /// Radians added per frame, already scaled by speed.
    pub angular_velocity: f32,
    /// Orbit radius or pendulum length, already scaled by size.
    pub radius: f32,
    /// Drawn radius, already scaled by size.
    pub size: f32,
    pub hue: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitState {
    center: Vec2,
    bodies: Vec<Body>,
    /// Shared rotation for motions that turn as a whole.
    rotation: f32,
}

impl OrbitState {
    pub fn init(params: &OrbitParams, setup: &mut Setup) -> Result<Self, InitError> {
        require(params.count > 0, "count", "needs at least one body")?;

        let n = params.count;
        let speed = setup.knobs.speed;
        let size = setup.knobs.size;
        let mut center = setup.dims.center();

        let bodies = (0..n)
            .map(|i| {
                let fi = i as f32;
                let t = fi / n as f32;
                match &params.motion {
                    OrbitMotion::Ring { base_radius, radius_step, base_speed, speed_step, body_radius, hue_step, .. } => Body {
                        angle: TAU / n as f32 * fi,
                        angular_velocity: (base_speed + fi * speed_step) * speed,
                        radius: (base_radius + fi * radius_step) * size,
                        size: body_radius * size,
                        hue: params.base_hue + fi * hue_step,
                    },
                    OrbitMotion::Spiral { turns, max_radius, base_speed, speed_variation, base_size, size_variation, hue_per_index } => Body {
                        angle: t * PI * turns,
                        angular_velocity: (base_speed + (1.0 - t) * speed_variation) * speed,
                        radius: t * max_radius * size,
                        size: (base_size + setup.rng.gen::<f32>() * size_variation) * size,
                        hue: params.base_hue + fi * hue_per_index,
                    },
                    OrbitMotion::Carousel { radius, base_size, .. } => Body {
                        angle: TAU / n as f32 * fi,
                        angular_velocity: 0.0,
                        radius: radius * size,
                        size: base_size * size,
                        hue: params.base_hue + 360.0 / n as f32 * fi,
                    },
                    OrbitMotion::Target { base_radius, radius_step, hue_step, .. } => Body {
                        angle: 0.0,
                        angular_velocity: 0.0,
                        radius: (base_radius + fi * radius_step) * size,
                        size: (base_radius + fi * radius_step) * size,
                        hue: params.base_hue + fi * hue_step,
                    },
                    OrbitMotion::Vortex { max_radius, base_speed, speed_variation, particle_size, .. } => Body {
                        angle: setup.rng.gen::<f32>() * TAU,
                        angular_velocity: (base_speed + setup.rng.gen::<f32>() * speed_variation) * speed,
                        radius: setup.rng.gen::<f32>() * max_radius * size,
                        size: particle_size * size,
                        hue: params.base_hue + setup.rng.gen::<f32>() * 360.0,
                    },
                    OrbitMotion::Pendulum { base_length, length_step, initial_angle, bob_size, hue_step, .. } => Body {
                        angle: *initial_angle,
                        angular_velocity: 0.0,
                        radius: (base_length + fi * length_step) * size,
                        size: bob_size * size,
                        hue: params.base_hue + fi * hue_step,
                    },
                }
            })
            .collect();

        if let OrbitMotion::Pendulum { pivot_y, .. } = &params.motion {
            center = Vec2::new(setup.dims.width / 2.0, *pivot_y);
        }

        Ok(Self { center, bodies, rotation: 0.0 })
    }

    pub fn step(&mut self, params: &OrbitParams, frame: &mut Frame) {
        let knobs = frame.knobs;
        let (speed, size) = (knobs.speed, knobs.size);
        let (s, l) = (params.saturation, params.lightness);

        match &params.motion {
            OrbitMotion::Ring { glow, .. } => {
                for body in &mut self.bodies {
                    let color = knobs.tint(body.hue, s, l);
                    frame.surface.set_shadow(*glow, color);
                    frame.surface.fill_circle(orbit_point(self.center, body), body.size, &Paint::Solid(color));
                    frame.surface.clear_shadow();
                    body.angle += body.angular_velocity;
                }
            }
            OrbitMotion::Spiral { .. } => {
                for body in &mut self.bodies {
                    let color = knobs.tint(body.hue, s, l);
                    frame.surface.fill_circle(orbit_point(self.center, body), body.size, &Paint::Solid(color));
                    body.angle += body.angular_velocity;
                }
            }
            OrbitMotion::Carousel { rotation_speed, size_variation, perspective, .. } => {
                for body in &self.bodies {
                    let angle = body.angle + self.rotation;
                    let pos = self.center
                        + Vec2::new(angle.cos() * body.radius, angle.sin() * body.radius * perspective);
                    let depth = angle.sin();
                    let radius = (body.size + depth * size_variation * size).max(0.0);
                    frame.surface.set_global_alpha((depth + 1.0) / 2.0);
                    frame.surface.fill_circle(pos, radius, &Paint::Solid(knobs.tint(body.hue, s, l)));
                    frame.surface.set_global_alpha(1.0);
                }
                self.rotation += rotation_speed * speed;
            }
            OrbitMotion::Target { rotation_speed, .. } => {
                frame.surface.save();
                frame.surface.translate(self.center);
                frame.surface.rotate(self.rotation);
                // largest first so every ring stays visible
                for body in self.bodies.iter().rev() {
                    frame.surface.fill_circle(Vec2::ZERO, body.radius, &Paint::Solid(knobs.tint(body.hue, s, l)));
                }
                frame.surface.restore();
                self.rotation += rotation_speed * speed;
            }
            OrbitMotion::Vortex { max_radius, min_radius, pull_speed, .. } => {
                let rim = (max_radius * size).max(MIN_DISTANCE);
                for body in &mut self.bodies {
                    body.angle += body.angular_velocity;
                    body.radius -= pull_speed * speed;
                    if body.radius < min_radius * size {
                        body.radius = rim;
                        body.angle = frame.rng.gen::<f32>() * TAU;
                    }
                    frame.surface.set_global_alpha(body.radius / rim);
                    frame.surface.fill_circle(orbit_point(self.center, body), body.size, &Paint::Solid(knobs.tint(body.hue, s, l)));
                    frame.surface.set_global_alpha(1.0);
                }
            }
            OrbitMotion::Pendulum { gravity, damping, line_width, .. } => {
                let g = gravity * speed;
                for body in &mut self.bodies {
                    let length = body.radius.max(MIN_DISTANCE);
                    body.angular_velocity += (-g / length) * body.angle.sin();
                    body.angular_velocity *= damping;
                    body.angle += body.angular_velocity;

                    let bob = self.center + Vec2::new(body.angle.sin(), body.angle.cos()) * length;
                    let color = knobs.tint(body.hue, s, l);
                    frame.surface.line(self.center, bob, &Stroke::new(color, line_width * size));
                    frame.surface.fill_circle(bob, body.size, &Paint::Solid(color));
                }
            }
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Shared rotation accumulator (carousel and target motions).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

fn orbit_point(center: Vec2, body: &Body) -> Vec2 {
    center + Vec2::new(body.angle.cos(), body.angle.sin()) * body.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Knobs;
    use crate::input::InputBus;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::surface::Dimensions;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ring() -> OrbitParams {
        OrbitParams {
            count: 8,
            motion: OrbitMotion::Ring {
                base_radius: 100.0,
                radius_step: 20.0,
                base_speed: 0.02,
                speed_step: 0.005,
                body_radius: 8.0,
                hue_step: 45.0,
                glow: 20.0,
            },
            base_hue: 0.0,
            saturation: 80.0,
            lightness: 60.0,
        }
    }

    fn build(params: &OrbitParams, knobs: Knobs) -> OrbitState {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut input = InputBus::new();
        let mut setup = Setup { dims: Dimensions::new(800.0, 600.0), knobs, rng: &mut rng, input: &mut input };
        OrbitState::init(params, &mut setup).unwrap()
    }

    fn run(state: &mut OrbitState, params: &OrbitParams, knobs: Knobs, frames: usize) -> RecordingSurface {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut input = InputBus::new();
        for _ in 0..frames {
            let mut frame = Frame { surface: &mut surface, input: &mut input, rng: &mut rng, knobs };
            state.step(params, &mut frame);
        }
        surface
    }

    #[test]
    fn test_ring_initial_layout() {
        let state = build(&ring(), Knobs::new(1.0, 1.5, 0.0));
        let b = state.bodies();
        assert_eq!(b.len(), 8);
        assert_eq!(b[0].angle, 0.0);
        assert!((b[2].angle - TAU / 4.0).abs() < 1e-6);
        assert_eq!(b[1].radius, 120.0 * 1.5);
        assert_eq!(b[3].hue, 135.0);
    }

    #[test]
    fn test_ring_speed_scaling_is_linear() {
        let params = ring();
        let slow = Knobs::new(0.7, 1.0, 0.0);
        let fast = Knobs::new(1.4, 1.0, 0.0);

        let mut a = build(&params, slow);
        let mut b = build(&params, fast);
        run(&mut a, &params, slow, 40);
        run(&mut b, &params, fast, 20);

        for (x, y) in a.bodies().iter().zip(b.bodies()) {
            assert!((x.angle - y.angle).abs() < 1e-3, "{} vs {}", x.angle, y.angle);
        }
    }

    #[test]
    fn test_ring_glow_is_reset() {
        let params = ring();
        let mut state = build(&params, Knobs::default());
        let surface = run(&mut state, &params, Knobs::default(), 1);
        let last = surface.commands().last().unwrap();
        assert!(matches!(last, DrawCommand::Shadow { blur, .. } if *blur == 0.0));
    }

    #[test]
    fn test_target_uses_balanced_transform() {
        let params = OrbitParams {
            count: 3,
            motion: OrbitMotion::Target { base_radius: 30.0, radius_step: 25.0, rotation_speed: 0.02, hue_step: 20.0 },
            base_hue: 0.0,
            saturation: 70.0,
            lightness: 50.0,
        };
        let mut state = build(&params, Knobs::default());
        let surface = run(&mut state, &params, Knobs::default(), 3);
        assert_eq!(surface.save_depth(), 0);
        assert!((state.rotation() - 0.06).abs() < 1e-6);

        // first disc drawn is the largest
        let first = surface.shapes().next().unwrap();
        assert!(matches!(first, DrawCommand::FillCircle { radius, .. } if *radius == 80.0));
    }

    #[test]
    fn test_vortex_reseeds_at_rim() {
        let params = OrbitParams {
            count: 50,
            motion: OrbitMotion::Vortex {
                max_radius: 300.0,
                min_radius: 10.0,
                base_speed: 0.02,
                speed_variation: 0.02,
                pull_speed: 5.0,
                particle_size: 3.0,
            },
            base_hue: 0.0,
            saturation: 70.0,
            lightness: 60.0,
        };
        let mut state = build(&params, Knobs::default());
        run(&mut state, &params, Knobs::default(), 200);
        for b in state.bodies() {
            assert!(b.radius >= 10.0 - 5.0 && b.radius <= 300.0);
        }
    }

    #[test]
    fn test_pendulum_decays() {
        let params = OrbitParams {
            count: 3,
            motion: OrbitMotion::Pendulum {
                pivot_y: 50.0,
                base_length: 100.0,
                length_step: 20.0,
                initial_angle: PI / 4.0,
                gravity: 0.5,
                damping: 0.95,
                bob_size: 10.0,
                line_width: 2.0,
                hue_step: 36.0,
            },
            base_hue: 0.0,
            saturation: 70.0,
            lightness: 60.0,
        };
        let mut state = build(&params, Knobs::default());
        assert_eq!(state.center(), Vec2::new(400.0, 50.0));
        run(&mut state, &params, Knobs::default(), 600);
        for b in state.bodies() {
            assert!(b.angle.abs() < PI / 4.0);
            assert!(b.angle.is_finite());
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut params = ring();
        params.count = 0;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut input = InputBus::new();
        let mut setup = Setup { dims: Dimensions::new(10.0, 10.0), knobs: Knobs::default(), rng: &mut rng, input: &mut input };
        assert!(OrbitState::init(&params, &mut setup).is_err());
    }
}
