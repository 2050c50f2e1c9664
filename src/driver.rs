//! The playback driver.
//!
//! Owns the single live session: the selected descriptor's state, its
//! effective config and the token of its pending frame. Selection changes,
//! knob changes and resizes all go through [`PlaybackDriver::activate`],
//! which builds the new session completely before touching the old one:
//!
//! 1. look the index up (an unknown index is a programmer error)
//! 2. merge base config and knobs into a fresh [`EffectiveConfig`]
//! 3. initialize the new state
//! 4. cancel the old frame token and tear the old session down
//! 5. install the new session and request its first frame
//!
//! If step 3 fails nothing else happens: the old session keeps running and
//! the request is remembered so the next usable resize can retry it.
//!
//! ```ignore
//! let mut driver = PlaybackDriver::new(Registry::builtin(), ManualScheduler::new());
//! driver.activate(0, Knobs::default(), Dimensions::new(800.0, 600.0))?;
//! let mut surface = RecordingSurface::new(800.0, 600.0);
//! driver.pump(&mut surface);
//! ```
//!
//! # Phases
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | `Idle` | nothing has been activated yet, or every activation failed |
//! | `Initializing` | a new state is being built |
//! | `Running` | one session live with exactly one frame pending |
//! | `Paused` | session live, no frame pending |
//! | `TearingDown` | the outgoing session is releasing its resources |
//! | `Stopped` | detached for good; every further activation fails |

use crate::config::{EffectiveConfig, Knobs};
use crate::error::DriverError;
use crate::families::SimState;
use crate::input::{InputBus, PointerEvent};
use crate::registry::Registry;
use crate::scheduler::{FrameScheduler, FrameToken, ManualScheduler};
use crate::surface::{Dimensions, Surface};
use crate::time::FrameClock;

/// Lifecycle phase of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Initializing,
    Running,
    Paused,
    TearingDown,
    Stopped,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Initializing => "Initializing",
            Phase::Running => "Running",
            Phase::Paused => "Paused",
            Phase::TearingDown => "Tearing down",
            Phase::Stopped => "Stopped",
        }
    }
}

/// The live pairing of a simulation state with its config and frame token.
#[derive(Debug)]
pub struct Session {
    generation: u64,
    index: usize,
    config: EffectiveConfig,
    state: SimState,
    token: Option<FrameToken>,
}

impl Session {
    /// Monotonic activation counter; every restart gets a new one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Registry index of the running simulation.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Token of the frame this session is waiting for.
    pub fn token(&self) -> Option<FrameToken> {
        self.token
    }
}

/// An activation that failed and will be retried on the next usable resize.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    index: usize,
    knobs: Knobs,
}

/// Runs one simulation at a time against a frame scheduler.
pub struct PlaybackDriver<S: FrameScheduler> {
    registry: Registry,
    scheduler: S,
    input: InputBus,
    dims: Dimensions,
    knobs: Knobs,
    session: Option<Session>,
    pending: Option<Pending>,
    phase: Phase,
    next_generation: u64,
    seed: u64,
    clock: FrameClock,
}

impl<S: FrameScheduler> PlaybackDriver<S> {
    pub fn new(registry: Registry, scheduler: S) -> Self {
        Self {
            registry,
            scheduler,
            input: InputBus::new(),
            dims: Dimensions::ZERO,
            knobs: Knobs::default(),
            session: None,
            pending: None,
            phase: Phase::Idle,
            next_generation: 1,
            seed: 0x5EED,
            clock: FrameClock::new(),
        }
    }

    /// Base seed every session's random stream is derived from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the running session with simulation `index`.
    ///
    /// Returns the new session's generation. On an initialization failure
    /// the previous session is left exactly as it was.
    pub fn activate(&mut self, index: usize, knobs: Knobs, dims: Dimensions) -> Result<u64, DriverError> {
        if self.phase == Phase::Stopped {
            return Err(DriverError::Stopped);
        }
        let descriptor = self.registry.get(index)?;

        self.dims = dims;
        self.knobs = knobs;

        let generation = self.next_generation;
        let config = EffectiveConfig::new(descriptor, knobs, session_seed(self.seed, generation));

        let previous = self.phase;
        self.phase = Phase::Initializing;
        let state = match config.kind().init(dims, &config, &mut self.input) {
            Ok(state) => state,
            Err(source) => {
                self.phase = previous;
                self.pending = Some(Pending { index, knobs });
                tracing::warn!(
                    simulation = config.name(),
                    error = %source,
                    "initialization failed, keeping the current session"
                );
                return Err(DriverError::Initialization { name: config.name(), source });
            }
        };

        self.teardown_session();

        tracing::info!(
            generation,
            simulation = config.name(),
            family = state.family().name(),
            speed = config.speed(),
            size = config.size(),
            hue_shift = config.hue_shift(),
            "session started"
        );

        let token = self.scheduler.request_frame();
        self.session = Some(Session { generation, index, config, state, token: Some(token) });
        self.next_generation += 1;
        self.pending = None;
        self.phase = Phase::Running;
        self.clock.resume();
        Ok(generation)
    }

    /// Switch to simulation `index` with the current knobs and size.
    pub fn select(&mut self, index: usize) -> Result<u64, DriverError> {
        self.activate(index, self.knobs, self.dims)
    }

    /// Store new knobs and restart the selected simulation with them.
    pub fn set_knobs(&mut self, knobs: Knobs) -> Result<(), DriverError> {
        self.knobs = knobs;
        match self.selected() {
            Some(index) => self.activate(index, knobs, self.dims).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Restart the selected simulation from a fresh state.
    pub fn restart(&mut self) -> Result<(), DriverError> {
        match self.selected() {
            Some(index) => self.activate(index, self.knobs, self.dims).map(|_| ()),
            None => Ok(()),
        }
    }

    /// React to a new surface size.
    ///
    /// A degenerate size is remembered but leaves the session alone. A
    /// usable size first retries a failed activation, otherwise restarts the
    /// running session if the size actually changed.
    pub fn resize(&mut self, dims: Dimensions) -> Result<(), DriverError> {
        if self.phase == Phase::Stopped {
            return Err(DriverError::Stopped);
        }
        let changed = dims != self.dims;
        self.dims = dims;
        if dims.is_degenerate() {
            return Ok(());
        }

        if let Some(pending) = self.pending {
            tracing::debug!(index = pending.index, "retrying failed activation after resize");
            return self.activate(pending.index, pending.knobs, dims).map(|_| ());
        }
        match &self.session {
            Some(session) if changed => {
                let index = session.index;
                self.activate(index, self.knobs, dims).map(|_| ())
            }
            _ => Ok(()),
        }
    }

    /// Run one frame if `token` belongs to the live session.
    ///
    /// Returns `false` for stale tokens, which are dropped without touching
    /// any state.
    pub fn tick(&mut self, token: FrameToken, surface: &mut dyn Surface) -> bool {
        if self.phase != Phase::Running {
            tracing::debug!(token = token.id(), phase = self.phase.name(), "frame ignored");
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.token != Some(token) {
            tracing::debug!(token = token.id(), generation = session.generation, "stale frame token");
            return false;
        }

        session.token = None;
        session.state.step(&session.config, surface, &mut self.input);
        self.clock.tick();
        session.token = Some(self.scheduler.request_frame());
        true
    }

    /// Stop requesting frames but keep the session.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(token) = self.session.as_mut().and_then(|s| s.token.take()) {
            self.scheduler.cancel_frame(token);
        }
        self.phase = Phase::Paused;
        self.clock.pause();
        tracing::debug!("playback paused");
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.token = Some(self.scheduler.request_frame());
        }
        self.phase = Phase::Running;
        self.clock.resume();
        tracing::debug!("playback resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Detach for good: cancel the pending frame and tear the session down.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.teardown_session();
        self.pending = None;
        self.phase = Phase::Stopped;
        tracing::info!("playback stopped");
    }

    /// Deliver a pointer event to the live session's subscriptions.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) -> usize {
        if self.phase == Phase::Stopped {
            return 0;
        }
        self.input.dispatch(event)
    }

    fn teardown_session(&mut self) {
        let Some(mut old) = self.session.take() else {
            return;
        };
        self.phase = Phase::TearingDown;
        if let Some(token) = old.token.take() {
            self.scheduler.cancel_frame(token);
        }
        old.state.teardown(&mut self.input);
        tracing::debug!(
            generation = old.generation,
            simulation = old.config.name(),
            frames = old.state.frame(),
            "session torn down"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Index of the running simulation, or of the one waiting for a retry.
    pub fn selected(&self) -> Option<usize> {
        self.pending.map(|p| p.index).or(self.session.as_ref().map(|s| s.index))
    }

    /// Index of a failed activation waiting for a usable surface.
    pub fn pending(&self) -> Option<usize> {
        self.pending.map(|p| p.index)
    }

    /// No simulation is live; the surface shows nothing new.
    pub fn is_degraded(&self) -> bool {
        self.session.is_none()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn knobs(&self) -> Knobs {
        self.knobs
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn input(&self) -> &InputBus {
        &self.input
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

impl PlaybackDriver<ManualScheduler> {
    /// Fire every frame that was pending on entry; returns the steps run.
    ///
    /// Frames requested by those steps stay pending for the next call.
    pub fn pump(&mut self, surface: &mut dyn Surface) -> usize {
        let due = self.scheduler.pending_count();
        let mut ran = 0;
        for _ in 0..due {
            let Some(token) = self.scheduler.fire() else {
                break;
            };
            if self.tick(token, surface) {
                ran += 1;
            }
        }
        ran
    }
}

/// Per-session seed, so restarts do not replay the previous session.
fn session_seed(base: u64, generation: u64) -> u64 {
    base ^ generation.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
