//! The drawing port simulations render through.
//!
//! A [`Surface`] is an immediate-mode 2D canvas: shape fills and strokes,
//! gradients, global alpha, a shadow (glow) setting and a save/restore stack
//! of transforms. Simulations never see pixels; a surface can record
//! ([`RecordingSurface`](crate::recording::RecordingSurface)), rasterize
//! ([`PixelSurface`](crate::raster::PixelSurface)) or forward to a host
//! canvas.
//!
//! # Coordinates
//!
//! Pixel units, origin top-left, `y` grows downward. Rotations are in
//! radians and turn clockwise on screen, as on an HTML canvas.

use glam::Vec2;

use crate::color::Color;

/// Width and height of a drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const ZERO: Dimensions = Dimensions { width: 0.0, height: 0.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not a number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width >= 1.0 && self.height >= 1.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a whole surface.
    pub fn covering(dims: Dimensions) -> Self {
        Self::new(0.0, 0.0, dims.width, dims.height)
    }
}

/// One color stop of a gradient, `offset` in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Gradient between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

/// Gradient between two concentric circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

/// How a shape is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// Radial glow fading from `color` at the center to transparent at `radius`.
    pub fn glow(center: Vec2, radius: f32, color: Color) -> Self {
        Paint::Radial(RadialGradient {
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            stops: vec![
                ColorStop { offset: 0.0, color },
                ColorStop { offset: 1.0, color: color.with_alpha(0.0) },
            ],
        })
    }

    /// The solid color, if this paint is one.
    pub fn solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    /// Every color this paint references.
    pub fn colors(&self) -> Vec<Color> {
        match self {
            Paint::Solid(c) => vec![*c],
            Paint::Linear(g) => g.stops.iter().map(|s| s.color).collect(),
            Paint::Radial(g) => g.stops.iter().map(|s| s.color).collect(),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Line styling for strokes.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f32) -> Self {
        Self { paint: paint.into(), width }
    }
}

/// A single polyline, optionally closed into a polygon.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self { points, closed: true }
    }

    pub fn polyline(points: Vec<Vec2>) -> Self {
        Self { points, closed: false }
    }

    /// Regular polygon with a vertex at `rotation` radians.
    pub fn regular(center: Vec2, radius: f32, sides: usize, rotation: f32) -> Self {
        let points = (0..sides)
            .map(|i| {
                let a = rotation + std::f32::consts::TAU * i as f32 / sides as f32;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        Self::polygon(points)
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Line segments in drawing order, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        let count = match (self.closed, n) {
            (_, 0) | (_, 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Immediate-mode 2D drawing target.
///
/// Implementations keep a state stack of transform, global alpha and shadow
/// that `save`/`restore` push and pop.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: Vec2);

    /// Multiplier applied to the alpha of everything drawn afterwards.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Glow around subsequent shapes. A blur of zero disables it.
    fn set_shadow(&mut self, blur: f32, color: Color);

    fn clear_shadow(&mut self) {
        self.set_shadow(0.0, Color::TRANSPARENT);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint);
    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);

    /// Cover the whole surface with `color`. A translucent color leaves the
    /// previous frame showing through as a fading trail.
    fn fade(&mut self, color: Color) {
        let rect = Rect::covering(self.dimensions());
        self.fill_rect(rect, &Paint::Solid(color));
    }
}
