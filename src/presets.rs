//! Built-in animations.
//!
//! Each preset pairs a display name with the base configuration of one of
//! the six families and the backdrop laid over the previous frame. The
//! translucent backdrops are what leave motion trails.

use std::f32::consts::PI;

use crate::color::Color;
use crate::families::{
    BloomParams, BloomPattern, BoltParams, BoltSource, EdgePolicy, EmitShape, EmitterParams, FieldLayout, FieldParams,
    Force, ForceParams, Launch, OrbitMotion, OrbitParams, ParticleShape, Respawn, SimKind, SpawnPolicy, Spray, Wave,
};

pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub backdrop: Color,
    pub config: fn() -> SimKind,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "🌊 Wave Pool",
        description: "Grid of dots bobbing on a travelling wave",
        backdrop: Color::rgba(10, 10, 30, 0.1),
        config: || {
            SimKind::Field(FieldParams {
                layout: FieldLayout::DotGrid {
                    cols: 50,
                    rows: 30,
                    amplitude: 20.0,
                    dot_radius: 3.0,
                    offset_step: 0.1,
                    hue_per_displacement: 2.0,
                },
                base_speed: 0.03,
                base_hue: 200.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🎯 Orbit Dance",
        description: "Glowing bodies on concentric orbits",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Orbit(OrbitParams {
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
            })
        },
    },
    Preset {
        name: "✨ Particle Rain",
        description: "Streaks falling and re-entering from the top",
        backdrop: Color::rgba(0, 0, 20, 0.1),
        config: || {
            SimKind::Forces(ForceParams {
                count: 100,
                launch: Launch::Fall { base: 2.0, variation: 3.0 },
                forces: Vec::new(),
                friction: 1.0,
                edges: EdgePolicy::Respawn(Respawn::Top),
                shape: ParticleShape::Streak { base_length: 10.0, length_variation: 20.0, line_width: 2.0 },
                base_hue: 180.0,
                hue_variation: 60.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🌀 Spiral Galaxy",
        description: "A winding arm of stars, inner ones turning faster",
        backdrop: Color::rgba(0, 0, 10, 0.05),
        config: || {
            SimKind::Orbit(OrbitParams {
                count: 200,
                motion: OrbitMotion::Spiral {
                    turns: 8.0,
                    max_radius: 200.0,
                    base_speed: 0.01,
                    speed_variation: 0.02,
                    base_size: 2.0,
                    size_variation: 3.0,
                    hue_per_index: 0.5,
                },
                base_hue: 260.0,
                saturation: 80.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "💫 Bouncing Balls",
        description: "Balls under gravity losing a little energy per bounce",
        backdrop: Color::rgba(20, 20, 40, 0.1),
        config: || {
            SimKind::Forces(ForceParams {
                count: 30,
                launch: Launch::Scatter { magnitude: 4.0 },
                forces: vec![Force::Gravity { strength: 0.2 }],
                friction: 1.0,
                edges: EdgePolicy::Bounce { damping: 0.9, inset_by_radius: true },
                shape: ParticleShape::Dot { radius: 10.0, radius_variation: 20.0 },
                base_hue: 0.0,
                hue_variation: 360.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🔮 Gravity Wells",
        description: "Particles falling around two fixed attractors",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Forces(ForceParams {
                count: 150,
                launch: Launch::Still,
                forces: vec![Force::Wells { positions: vec![0.3, 0.7], strength: 0.5, well_radius: 20.0 }],
                friction: 0.99,
                edges: EdgePolicy::Free,
                shape: ParticleShape::Dot { radius: 3.0, radius_variation: 0.0 },
                base_hue: 0.0,
                hue_variation: 360.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🌈 Color Waves",
        description: "Two interfering sine waves painted across the width",
        backdrop: Color::rgba(0, 0, 0, 0.1),
        config: || {
            SimKind::Field(FieldParams {
                layout: FieldLayout::WaveLine {
                    spacing: 5.0,
                    primary: Wave { frequency: 0.01, amplitude: 50.0, rate: 1.0 },
                    secondary: Wave { frequency: 0.02, amplitude: 30.0, rate: 1.5 },
                    hue_per_px: 0.5,
                },
                base_speed: 2.0,
                base_hue: 0.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "⚡ Lightning Orbs",
        description: "Orbs on a line arcing to one another at random",
        backdrop: Color::rgba(0, 0, 20, 0.2),
        config: || {
            SimKind::Bolt(BoltParams {
                source: BoltSource::Orbs { count: 5, orb_radius: 30.0, glow: 30.0 },
                chance: 0.1,
                segment_length: 24.0,
                jitter: 10.0,
                branch_chance: 0.1,
                life_frames: 3,
                line_width: 2.0,
                base_hue: 180.0,
                saturation: 80.0,
                lightness: 70.0,
            })
        },
    },
    Preset {
        name: "🎪 Pendulum Harmony",
        description: "Damped pendulums of increasing length drifting out of phase",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Orbit(OrbitParams {
                count: 10,
                motion: OrbitMotion::Pendulum {
                    pivot_y: 50.0,
                    base_length: 100.0,
                    length_step: 20.0,
                    initial_angle: PI / 4.0,
                    gravity: 0.5,
                    damping: 0.995,
                    bob_size: 10.0,
                    line_width: 2.0,
                    hue_step: 36.0,
                },
                base_hue: 0.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🌸 Flower Bloom",
        description: "Petals breathing in and out on a slowly turning ring",
        backdrop: Color::rgba(0, 0, 0, 0.02),
        config: || {
            SimKind::Bloom(BloomParams {
                pattern: BloomPattern::Petals {
                    petal_count: 12,
                    base_radius: 100.0,
                    radius_variation: 50.0,
                    base_size: 20.0,
                    size_variation: 10.0,
                    pulse_speed: 0.02,
                    breathe_speed: 0.05,
                    hue_step: 30.0,
                },
                growth_speed: 1.0,
                rotation_speed: 0.01,
                base_hue: 0.0,
                hue_drift: 1.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🎨 Paint Splash",
        description: "Bursts of paint at random spots, dripping under gravity",
        backdrop: Color::rgba(255, 255, 255, 0.05),
        config: || {
            SimKind::Emitter(EmitterParams {
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
            })
        },
    },
    Preset {
        name: "🔷 Hexagon Grid",
        description: "Honeycomb cells pulsing in brightness",
        backdrop: Color::rgb(10, 10, 30),
        config: || {
            SimKind::Field(FieldParams {
                layout: FieldLayout::HexCells { hex_size: 30.0, hue_variation: 60.0, lightness_min: 30.0, lightness_max: 70.0 },
                base_speed: 0.05,
                base_hue: 200.0,
                saturation: 70.0,
                lightness: 50.0,
            })
        },
    },
    Preset {
        name: "🌟 Star Field",
        description: "Flying through stars toward the viewer",
        backdrop: Color::rgba(0, 0, 0, 0.2),
        config: || {
            SimKind::Forces(ForceParams {
                count: 200,
                launch: Launch::Still,
                forces: Vec::new(),
                friction: 1.0,
                edges: EdgePolicy::Respawn(Respawn::Depth),
                shape: ParticleShape::Star { max_size: 5.0, depth_speed: 5.0 },
                base_hue: 200.0,
                hue_variation: 60.0,
                saturation: 70.0,
                lightness: 70.0,
            })
        },
    },
    Preset {
        name: "🧲 Magnetic Particles",
        description: "Particles drawn toward the pointer",
        backdrop: Color::rgba(0, 0, 0, 0.1),
        config: || {
            SimKind::Forces(ForceParams {
                count: 100,
                launch: Launch::Still,
                forces: vec![Force::Pointer { strength: 0.1, reach: 200.0, max_force: 5.0 }],
                friction: 0.95,
                edges: EdgePolicy::Free,
                shape: ParticleShape::Dot { radius: 4.0, radius_variation: 0.0 },
                base_hue: 0.0,
                hue_variation: 360.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🎭 Ripple Effect",
        description: "Click to drop expanding rings",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Emitter(EmitterParams {
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
            })
        },
    },
    Preset {
        name: "🎪 Carousel Spin",
        description: "A tilted ring of discs, near side larger and brighter",
        backdrop: Color::rgba(0, 0, 0, 0.1),
        config: || {
            SimKind::Orbit(OrbitParams {
                count: 12,
                motion: OrbitMotion::Carousel {
                    radius: 150.0,
                    rotation_speed: 0.02,
                    base_size: 20.0,
                    size_variation: 10.0,
                    perspective: 0.5,
                },
                base_hue: 0.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🌊 Fluid Simulation",
        description: "Particles pushing their neighbours apart",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Forces(ForceParams {
                count: 150,
                launch: Launch::Scatter { magnitude: 2.0 },
                forces: vec![Force::Repulsion { radius: 50.0, strength: 0.1 }],
                friction: 0.99,
                edges: EdgePolicy::Bounce { damping: 1.0, inset_by_radius: false },
                shape: ParticleShape::Dot { radius: 4.0, radius_variation: 0.0 },
                base_hue: 180.0,
                hue_variation: 60.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🎯 Target Practice",
        description: "Concentric discs turning as one",
        backdrop: Color::rgba(0, 0, 0, 0.05),
        config: || {
            SimKind::Orbit(OrbitParams {
                count: 8,
                motion: OrbitMotion::Target { base_radius: 30.0, radius_step: 25.0, rotation_speed: 0.02, hue_step: 20.0 },
                base_hue: 0.0,
                saturation: 70.0,
                lightness: 50.0,
            })
        },
    },
    Preset {
        name: "🌀 Vortex Flow",
        description: "Particles spiralling into the core and reappearing at the rim",
        backdrop: Color::rgba(0, 0, 0, 0.1),
        config: || {
            SimKind::Orbit(OrbitParams {
                count: 200,
                motion: OrbitMotion::Vortex {
                    max_radius: 300.0,
                    min_radius: 10.0,
                    base_speed: 0.02,
                    speed_variation: 0.02,
                    pull_speed: 0.5,
                    particle_size: 3.0,
                },
                base_hue: 0.0,
                saturation: 70.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "✨ Sparkle Trail",
        description: "Glowing sparkles behind a wandering point and the pointer",
        backdrop: Color::rgba(0, 0, 0, 0.1),
        config: || {
            SimKind::Emitter(EmitterParams {
                spawn: vec![
                    SpawnPolicy::PointerMove,
                    SpawnPolicy::Continuous {
                        per_frame: 2.0,
                        radius_x: 150.0,
                        radius_y: 100.0,
                        angular_speed: 0.05,
                        hue_rate: 50.0,
                    },
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
            })
        },
    },
    // ========== Further instances of the families ==========
    Preset {
        name: "❄️ Drifting Snow",
        description: "Flakes drifting sideways, wrapping around every edge",
        backdrop: Color::rgba(5, 10, 25, 0.15),
        config: || {
            SimKind::Forces(ForceParams {
                count: 160,
                launch: Launch::Drift { fall: 0.6, sway: 0.8 },
                forces: Vec::new(),
                friction: 1.0,
                edges: EdgePolicy::Wrap,
                shape: ParticleShape::Dot { radius: 1.5, radius_variation: 2.5 },
                base_hue: 200.0,
                hue_variation: 20.0,
                saturation: 30.0,
                lightness: 90.0,
            })
        },
    },
    Preset {
        name: "🎆 Fireworks",
        description: "Shells bursting at random, sparks falling and fading",
        backdrop: Color::rgba(0, 0, 0, 0.15),
        config: || {
            SimKind::Emitter(EmitterParams {
                spawn: vec![SpawnPolicy::Chance { per_frame: 0.04 }],
                burst_size: 80,
                scatter: 0.0,
                spray: Spray::Radial { base: 1.0, variation: 4.0 },
                gravity: 0.05,
                life: 80.0,
                max_bursts: Some(6),
                shape: EmitShape::Dot { base_size: 2.0, size_variation: 1.0 },
                glow: 8.0,
                base_hue: 0.0,
                hue_variation: 360.0,
                saturation: 90.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "💓 Pulse Rings",
        description: "Rings expanding from a glowing core under turning spokes",
        backdrop: Color::rgba(0, 0, 0, 0.12),
        config: || {
            SimKind::Bloom(BloomParams {
                pattern: BloomPattern::Rings { ring_count: 5, max_radius: 220.0, spoke_count: 12, line_width: 3.0 },
                growth_speed: 1.5,
                rotation_speed: 0.01,
                base_hue: 300.0,
                hue_drift: 0.2,
                saturation: 80.0,
                lightness: 60.0,
            })
        },
    },
    Preset {
        name: "🌩️ Lightning Storm",
        description: "Forked bolts from the sky lighting up the scene",
        backdrop: Color::rgba(5, 5, 15, 0.25),
        config: || {
            SimKind::Bolt(BoltParams {
                source: BoltSource::Sky { flash: 0.15 },
                chance: 0.03,
                segment_length: 18.0,
                jitter: 14.0,
                branch_chance: 0.15,
                life_frames: 8,
                line_width: 2.5,
                base_hue: 220.0,
                saturation: 60.0,
                lightness: 85.0,
            })
        },
    },
    Preset {
        name: "🪷 Mandala",
        description: "Layers of petals opening and closing in counter-rotation",
        backdrop: Color::rgba(0, 0, 0, 0.08),
        config: || {
            SimKind::Bloom(BloomParams {
                pattern: BloomPattern::Mandala {
                    arms: 12,
                    layers: 4,
                    petal_length: 28.0,
                    petal_width: 9.0,
                    layer_spacing: 45.0,
                    period: 360.0,
                    hue_step: 35.0,
                },
                growth_speed: 1.0,
                rotation_speed: 0.004,
                base_hue: 20.0,
                hue_drift: 0.25,
                saturation: 75.0,
                lightness: 60.0,
            })
        },
    },
];

/// Find a preset by display name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_original_order_kept() {
        assert_eq!(PRESETS[0].name, "🌊 Wave Pool");
        assert_eq!(PRESETS[19].name, "✨ Sparkle Trail");
        assert_eq!(PRESETS.len(), 25);
    }

    #[test]
    fn test_find() {
        assert!(find("🎆 Fireworks").is_some());
        assert!(find("nope").is_none());
    }
}
