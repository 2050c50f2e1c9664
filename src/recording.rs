//! A surface that records draw calls instead of drawing them.
//!
//! Used by tests to assert on geometry and color, and by tools that want to
//! inspect what a frame draws without rasterizing it.

use glam::Vec2;

use crate::color::Color;
use crate::surface::{Dimensions, Paint, Path, Rect, Stroke, Surface};

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Scale(Vec2),
    GlobalAlpha(f32),
    Shadow { blur: f32, color: Color },
    FillRect { rect: Rect, paint: Paint },
    FillCircle { center: Vec2, radius: f32, paint: Paint },
    StrokeCircle { center: Vec2, radius: f32, stroke: Stroke },
    FillEllipse { center: Vec2, radii: Vec2, rotation: f32, paint: Paint },
    Line { from: Vec2, to: Vec2, stroke: Stroke },
    FillPath { path: Path, paint: Paint },
    StrokePath { path: Path, stroke: Stroke },
}

impl DrawCommand {
    /// True for commands that put pixels on the surface.
    pub fn is_shape(&self) -> bool {
        !matches!(
            self,
            DrawCommand::Save
                | DrawCommand::Restore
                | DrawCommand::Translate(_)
                | DrawCommand::Rotate(_)
                | DrawCommand::Scale(_)
                | DrawCommand::GlobalAlpha(_)
                | DrawCommand::Shadow { .. }
        )
    }

    /// The paint a shape command uses.
    pub fn paint(&self) -> Option<&Paint> {
        match self {
            DrawCommand::FillRect { paint, .. }
            | DrawCommand::FillCircle { paint, .. }
            | DrawCommand::FillEllipse { paint, .. }
            | DrawCommand::FillPath { paint, .. } => Some(paint),
            DrawCommand::StrokeCircle { stroke, .. }
            | DrawCommand::Line { stroke, .. }
            | DrawCommand::StrokePath { stroke, .. } => Some(&stroke.paint),
            _ => None,
        }
    }

    /// The anchor point of a shape: circle center, rect corner, line start or
    /// first path point.
    pub fn anchor(&self) -> Option<Vec2> {
        match self {
            DrawCommand::FillRect { rect, .. } => Some(Vec2::new(rect.x, rect.y)),
            DrawCommand::FillCircle { center, .. }
            | DrawCommand::StrokeCircle { center, .. }
            | DrawCommand::FillEllipse { center, .. } => Some(*center),
            DrawCommand::Line { from, .. } => Some(*from),
            DrawCommand::FillPath { path, .. } | DrawCommand::StrokePath { path, .. } => {
                path.points.first().copied()
            }
            _ => None,
        }
    }
}

/// Records every call into a command list.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    dims: Dimensions,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            dims: Dimensions::new(width, height),
            commands: Vec::new(),
            depth: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.dims = Dimensions::new(width, height);
    }

    /// Commands that draw something, in order.
    pub fn shapes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_shape())
    }

    /// Current `save` nesting; zero after a well-behaved frame.
    pub fn save_depth(&self) -> usize {
        self.depth
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.dims.width
    }

    fn height(&self) -> f32 {
        self.dims.height
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn scale(&mut self, factor: Vec2) {
        self.commands.push(DrawCommand::Scale(factor));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.commands.push(DrawCommand::Shadow { blur, color });
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect { rect, paint: paint.clone() });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle { center, radius, paint: paint.clone() });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, stroke: stroke.clone() });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillEllipse {
            center,
            radii,
            rotation,
            paint: paint.clone(),
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke: stroke.clone() });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::FillPath { path: path.clone(), paint: paint.clone() });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokePath { path: path.clone(), stroke: stroke.clone() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut s = RecordingSurface::new(200.0, 100.0);
        s.fade(Color::rgba(0, 0, 0, 0.1));
        s.save();
        s.translate(Vec2::new(5.0, 5.0));
        s.fill_circle(Vec2::ZERO, 3.0, &Paint::Solid(Color::WHITE));
        s.restore();

        assert_eq!(s.commands().len(), 5);
        assert_eq!(s.shapes().count(), 2);
        assert_eq!(s.save_depth(), 0);
        match &s.commands()[0] {
            DrawCommand::FillRect { rect, .. } => {
                assert_eq!(*rect, Rect::new(0.0, 0.0, 200.0, 100.0));
            }
            other => panic!("expected fade rect, got {:?}", other),
        }
    }

    #[test]
    fn test_take_empties() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.line(Vec2::ZERO, Vec2::ONE, &Stroke::new(Color::WHITE, 1.0));
        let taken = s.take();
        assert_eq!(taken.len(), 1);
        assert!(s.commands().is_empty());
        assert_eq!(taken[0].anchor(), Some(Vec2::ZERO));
    }
}
