//! Oscillating fields.
//!
//! A fixed arrangement of points whose displacement, color and brightness are
//! pure functions of one global phase accumulator and a per-point offset. No
//! per-point physics state exists; advancing the phase is the whole update.
//!
//! Layouts:
//!
//! - [`FieldLayout::DotGrid`]: a `cols x rows` grid of dots bobbing vertically.
//! - [`FieldLayout::WaveLine`]: squares along the surface width riding the sum of two sine waves.
//! - [`FieldLayout::HexCells`]: a honeycomb whose cells pulse in brightness.

use glam::Vec2;
use rand::Rng;

use super::{require, Frame, Setup};
use crate::error::InitError;
use crate::surface::{Paint, Path, Rect};
use crate::{ParamValue, Params};

/// One sine component of a wave line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    /// Radians per pixel.
    pub frequency: f32,
    /// Peak displacement in pixels, scaled by size.
    pub amplitude: f32,
    /// Multiplier on the phase accumulator.
    pub rate: f32,
}

impl Wave {
    fn at(&self, x: f32, phase: f32, size: f32) -> f32 {
        ((x + phase * self.rate) * self.frequency).sin() * self.amplitude * size
    }
}

/// Geometry of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldLayout {
    DotGrid {
        cols: usize,
        rows: usize,
        amplitude: f32,
        dot_radius: f32,
        /// Phase offset added per grid step in either direction.
        offset_step: f32,
        /// Hue degrees per pixel of displacement.
        hue_per_displacement: f32,
    },
    WaveLine {
        spacing: f32,
        primary: Wave,
        secondary: Wave,
        /// Hue degrees per pixel along x.
        hue_per_px: f32,
    },
    HexCells {
        hex_size: f32,
        hue_variation: f32,
        lightness_min: f32,
        lightness_max: f32,
    },
}

impl Params for FieldLayout {
    fn entries(&self) -> Vec<(&'static str, ParamValue)> {
        match self {
            FieldLayout::DotGrid { cols, rows, amplitude, dot_radius, offset_step, hue_per_displacement } => vec![
                ("layout", "dot grid".into()),
                ("cols", (*cols).into()),
                ("rows", (*rows).into()),
                ("amplitude", (*amplitude).into()),
                ("dot_radius", (*dot_radius).into()),
                ("offset_step", (*offset_step).into()),
                ("hue_per_displacement", (*hue_per_displacement).into()),
            ],
            FieldLayout::WaveLine { spacing, primary, secondary, hue_per_px } => vec![
                ("layout", "wave line".into()),
                ("spacing", (*spacing).into()),
                ("wave1_frequency", primary.frequency.into()),
                ("wave1_amplitude", primary.amplitude.into()),
                ("wave2_frequency", secondary.frequency.into()),
                ("wave2_amplitude", secondary.amplitude.into()),
                ("wave2_rate", secondary.rate.into()),
                ("hue_per_px", (*hue_per_px).into()),
            ],
            FieldLayout::HexCells { hex_size, hue_variation, lightness_min, lightness_max } => vec![
                ("layout", "hex cells".into()),
                ("hex_size", (*hex_size).into()),
                ("hue_variation", (*hue_variation).into()),
                ("lightness_min", (*lightness_min).into()),
                ("lightness_max", (*lightness_max).into()),
            ],
        }
    }
}

/// Base configuration of an oscillating field.
#[derive(Clone, Debug, PartialEq, Params)]
pub struct FieldParams {
    #[param(nested)]
    pub layout: FieldLayout,
    /// Phase advance per frame at speed 1.
    pub base_speed: f32,
    pub base_hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    origin: Vec2,
    offset: f32,
}

/// Phase accumulator plus the fixed cell layout.
#[derive(Debug, Clone)]
pub struct FieldState {
    phase: f32,
    cells: Vec<Cell>,
}

impl FieldState {
    pub fn init(params: &FieldParams, setup: &mut Setup) -> Result<Self, InitError> {
        let dims = setup.dims;
        let size = setup.knobs.size;
        let cells = match &params.layout {
            FieldLayout::DotGrid { cols, rows, offset_step, .. } => {
                require(*cols > 0 && *rows > 0, "cols", "grid needs at least one column and row")?;
                let cell_w = dims.width / *cols as f32;
                let cell_h = dims.height / *rows as f32;
                let mut cells = Vec::with_capacity(cols * rows);
                for i in 0..*cols {
                    for j in 0..*rows {
                        cells.push(Cell {
                            origin: Vec2::new(cell_w * i as f32, cell_h * j as f32),
                            offset: (i + j) as f32 * offset_step,
                        });
                    }
                }
                cells
            }
            FieldLayout::WaveLine { spacing, .. } => {
                require(*spacing >= 1.0, "spacing", "must be at least one pixel")?;
                Vec::new()
            }
            FieldLayout::HexCells { hex_size, .. } => {
                let r = hex_size * size;
                require(r >= 1.0, "hex_size", "cells would be smaller than a pixel")?;
                let col_step = r * 1.5;
                let row_step = r * 3f32.sqrt();
                let cols = (dims.width / col_step).ceil() as usize;
                let rows = (dims.height / row_step).ceil() as usize;
                let mut cells = Vec::with_capacity(cols * rows);
                for row in 0..rows {
                    for col in 0..cols {
                        let stagger = if col % 2 == 1 { row_step / 2.0 } else { 0.0 };
                        cells.push(Cell {
                            origin: Vec2::new(col as f32 * col_step, row as f32 * row_step + stagger),
                            offset: setup.rng.gen::<f32>() * std::f32::consts::TAU,
                        });
                    }
                }
                cells
            }
        };

        Ok(Self { phase: 0.0, cells })
    }

    pub fn step(&mut self, params: &FieldParams, frame: &mut Frame) {
        let knobs = frame.knobs;
        let size = knobs.size;

        match &params.layout {
            FieldLayout::DotGrid { amplitude, dot_radius, hue_per_displacement, .. } => {
                for cell in &self.cells {
                    let wave = (self.phase + cell.offset).sin() * amplitude * size;
                    let color = knobs.tint(
                        params.base_hue + wave * hue_per_displacement,
                        params.saturation,
                        params.lightness,
                    );
                    frame.surface.fill_circle(
                        cell.origin + Vec2::new(0.0, wave),
                        dot_radius * size,
                        &Paint::Solid(color),
                    );
                }
            }
            FieldLayout::WaveLine { spacing, primary, secondary, hue_per_px } => {
                let dims = frame.dims();
                let mid = dims.height / 2.0;
                let mut x = 0.0;
                while x < dims.width {
                    let y = mid + primary.at(x, self.phase, size) + secondary.at(x, self.phase, size);
                    let color = knobs.tint(
                        params.base_hue + x * hue_per_px + self.phase,
                        params.saturation,
                        params.lightness,
                    );
                    frame.surface.fill_rect(Rect::new(x, y, *spacing, *spacing), &Paint::Solid(color));
                    x += spacing;
                }
            }
            FieldLayout::HexCells { hex_size, hue_variation, lightness_min, lightness_max } => {
                let r = hex_size * size;
                for cell in &self.cells {
                    let brightness = ((self.phase + cell.offset).sin() + 1.0) / 2.0;
                    let color = knobs.tint(
                        params.base_hue + brightness * hue_variation,
                        params.saturation,
                        lightness_min + brightness * (lightness_max - lightness_min),
                    );
                    frame.surface.fill_path(&Path::regular(cell.origin, r, 6, 0.0), &Paint::Solid(color));
                }
            }
        }

        self.phase += params.base_speed * knobs.speed;
    }

    /// The global phase accumulator.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
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

    fn grid() -> FieldParams {
        FieldParams {
            layout: FieldLayout::DotGrid {
                cols: 4,
                rows: 3,
                amplitude: 20.0,
                dot_radius: 3.0,
                offset_step: 0.1,
                hue_per_displacement: 2.0,
            },
            base_speed: 0.03,
            base_hue: 200.0,
            saturation: 70.0,
            lightness: 60.0,
        }
    }

    fn build(params: &FieldParams, knobs: Knobs) -> FieldState {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut input = InputBus::new();
        let mut setup = Setup { dims: Dimensions::new(400.0, 300.0), knobs, rng: &mut rng, input: &mut input };
        FieldState::init(params, &mut setup).unwrap()
    }

    fn run(state: &mut FieldState, params: &FieldParams, knobs: Knobs, surface: &mut RecordingSurface) {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut input = InputBus::new();
        let mut frame = Frame { surface, input: &mut input, rng: &mut rng, knobs };
        state.step(params, &mut frame);
    }

    #[test]
    fn test_grid_layout() {
        let state = build(&grid(), Knobs::default());
        assert_eq!(state.cell_count(), 12);
        assert_eq!(state.cells[0].origin, Vec2::ZERO);
        // i = 1, j = 0 sits one column over
        assert_eq!(state.cells[3].origin, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_phase_advances_with_speed() {
        let params = grid();
        let knobs = Knobs::new(2.0, 1.0, 0.0);
        let mut state = build(&params, knobs);
        let mut surface = RecordingSurface::new(400.0, 300.0);
        run(&mut state, &params, knobs, &mut surface);
        assert!((state.phase() - 0.06).abs() < 1e-6);
        assert_eq!(surface.shapes().count(), 12);
    }

    #[test]
    fn test_first_frame_displacement() {
        let params = grid();
        let mut state = build(&params, Knobs::default());
        let mut surface = RecordingSurface::new(400.0, 300.0);
        run(&mut state, &params, Knobs::default(), &mut surface);

        // cell (0, 1): offset 0.1, phase 0
        match &surface.commands()[1] {
            DrawCommand::FillCircle { center, radius, paint } => {
                let wave = 0.1f32.sin() * 20.0;
                assert!((center.y - (100.0 + wave)).abs() < 1e-4);
                assert_eq!(*radius, 3.0);
                let hue = paint.solid().and_then(|c| c.hue()).unwrap();
                assert!((hue - (200.0 + wave * 2.0)).abs() < 1e-3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_columns_rejected() {
        let mut params = grid();
        params.layout = FieldLayout::DotGrid {
            cols: 0,
            rows: 3,
            amplitude: 1.0,
            dot_radius: 1.0,
            offset_step: 0.1,
            hue_per_displacement: 0.0,
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let mut input = InputBus::new();
        let mut setup = Setup { dims: Dimensions::new(10.0, 10.0), knobs: Knobs::default(), rng: &mut rng, input: &mut input };
        assert!(FieldState::init(&params, &mut setup).is_err());
    }

    #[test]
    fn test_wave_line_spans_width() {
        let params = FieldParams {
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
        };
        let mut state = build(&params, Knobs::default());
        let mut surface = RecordingSurface::new(400.0, 300.0);
        run(&mut state, &params, Knobs::default(), &mut surface);
        assert_eq!(surface.shapes().count(), 80);
    }

    #[test]
    fn test_hex_cells_cover_surface() {
        let params = FieldParams {
            layout: FieldLayout::HexCells { hex_size: 30.0, hue_variation: 60.0, lightness_min: 30.0, lightness_max: 70.0 },
            base_speed: 0.05,
            base_hue: 200.0,
            saturation: 70.0,
            lightness: 50.0,
        };
        let state = build(&params, Knobs::default());
        // ceil(400 / 45) * ceil(300 / 51.96)
        assert_eq!(state.cell_count(), 9 * 6);
    }

    #[test]
    fn test_entries_flatten_layout() {
        let names: Vec<_> = grid().entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names[0], "layout");
        assert!(names.contains(&"cols"));
        assert!(names.contains(&"base_speed"));
    }
}
