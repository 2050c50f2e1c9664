//! # Glimmer - decorative 2D animations
//!
//! A gallery of frame-driven 2D simulations (waves, orbits, particles,
//! fireworks, blooms and lightning) drawn through a pluggable [`Surface`].
//!
//! Glimmer owns the animation state and nothing else: the host supplies a
//! drawing surface, pointer events and a frame scheduler, and the
//! [`PlaybackDriver`] keeps exactly one simulation running against them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glimmer::prelude::*;
//!
//! let mut driver = PlaybackDriver::new(Registry::builtin(), ManualScheduler::new());
//! let dims = Dimensions::new(800.0, 600.0);
//! driver.activate(0, Knobs::default(), dims)?;
//!
//! let mut surface = PixelSurface::new(800, 600)?;
//! for _ in 0..120 {
//!     driver.pump(&mut surface);
//! }
//! surface.save_png("wave_pool.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Simulations
//!
//! Each gallery entry is a [`Descriptor`]: a name, a backdrop color and a
//! [`SimKind`], the base configuration of one of six families. The
//! [`Registry`] holds them in a fixed order and is looked up by index.
//!
//! ### Knobs
//!
//! Three user controls apply to every simulation:
//!
//! ```ignore
//! Knobs { speed: 1.5, size: 0.8, hue_shift: 120.0 }
//! ```
//!
//! Any change builds a new [`EffectiveConfig`] and restarts the session.
//!
//! ### Sessions
//!
//! The driver swaps sessions atomically. A new session is fully built
//! before the old one is torn down, and a failed build leaves the old one
//! running.
//!
//! ## Feature Overview
//!
//! | Family | Simulations |
//! |--------|-------------|
//! | Field | Wave Pool, Color Waves, Hexagon Grid |
//! | Orbit | Orbit Dance, Spiral Galaxy, Pendulum Harmony, Carousel Spin, Target Practice, Vortex Flow |
//! | Forces | Particle Rain, Bouncing Balls, Gravity Wells, Star Field, Magnetic Particles, Fluid Simulation, Drifting Snow |
//! | Emitter | Paint Splash, Ripple Effect, Sparkle Trail, Fireworks |
//! | Bloom | Flower Bloom, Pulse Rings, Mandala |
//! | Bolt | Lightning Orbs, Lightning Storm |

extern crate self as glimmer;

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod families;
pub mod input;
pub mod presets;
pub mod raster;
pub mod recording;
pub mod registry;
pub mod scheduler;
pub mod surface;
pub mod time;

pub use color::Color;
pub use config::{EffectiveConfig, Knobs, ParamValue, Params};
pub use driver::{Phase, PlaybackDriver, Session};
pub use error::{DriverError, InitError, RegistryError, SurfaceError};
pub use families::{Family, SimKind, SimState};
pub use glam::Vec2;
pub use glimmer_derive::Params;
pub use input::{InputBus, PointerEvent, PointerKind, SubscriptionId};
pub use presets::{Preset, PRESETS};
pub use raster::PixelSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use registry::{Descriptor, Registry};
pub use scheduler::{FrameScheduler, FrameToken, ManualScheduler};
pub use surface::{Dimensions, Paint, Path, Rect, Stroke, Surface};
pub use time::FrameClock;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{EffectiveConfig, Knobs, ParamValue, Params};
    pub use crate::driver::{Phase, PlaybackDriver};
    pub use crate::error::{DriverError, InitError};
    pub use crate::families::{Family, SimKind};
    pub use crate::input::{PointerEvent, PointerKind};
    pub use crate::raster::PixelSurface;
    pub use crate::recording::RecordingSurface;
    pub use crate::registry::{Descriptor, Registry};
    pub use crate::scheduler::{FrameScheduler, FrameToken, ManualScheduler};
    pub use crate::surface::{Dimensions, Surface};
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
    pub use glimmer_derive::Params;
}
