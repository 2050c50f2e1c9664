//! Software RGBA rasterizer implementing [`Surface`].
//!
//! Good enough for a gallery preview and for PNG snapshots: anti-aliased
//! circles, rings and lines, scanline polygon fill, linear and radial
//! gradients, global alpha, circular glow for the shadow setting and a full
//! transform stack. Pixels are stored as straight-alpha RGBA8 and blended
//! source-over.
//!
//! ```ignore
//! let mut surface = PixelSurface::new(640, 480)?;
//! driver.pump(&mut surface);
//! surface.save_png("frame.png")?;
//! ```

use std::path::Path as FsPath;

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};

use crate::color::Color;
use crate::error::SurfaceError;
use crate::surface::{ColorStop, Paint, Path, Rect, Stroke, Surface};

/// Segments used when an ellipse is turned into a polygon.
const ELLIPSE_SEGMENTS: usize = 48;

/// One straight-alpha pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Clone, Copy, Debug)]
struct RasterState {
    transform: Affine2,
    alpha: f32,
    shadow_blur: f32,
    shadow_color: Color,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
        }
    }
}

/// A paint resolved into device space with stops pre-converted.
enum Shader {
    Solid([f32; 4]),
    Linear { start: Vec2, dir: Vec2, inv_len_sq: f32, stops: Vec<(f32, [f32; 4])> },
    Radial { center: Vec2, inner: f32, span: f32, stops: Vec<(f32, [f32; 4])> },
}

impl Shader {
    fn sample(&self, p: Vec2) -> [f32; 4] {
        match self {
            Shader::Solid(c) => *c,
            Shader::Linear { start, dir, inv_len_sq, stops } => {
                let t = (p - *start).dot(*dir) * inv_len_sq;
                sample_stops(stops, t)
            }
            Shader::Radial { center, inner, span, stops } => {
                let t = ((p - *center).length() - inner) / span;
                sample_stops(stops, t)
            }
        }
    }
}

fn to_f32(color: Color) -> [f32; 4] {
    let [r, g, b, a] = color.to_rgba8();
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0]
}

fn convert_stops(stops: &[ColorStop]) -> Vec<(f32, [f32; 4])> {
    let mut out: Vec<_> = stops.iter().map(|s| (s.offset.clamp(0.0, 1.0), to_f32(s.color))).collect();
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    out
}

fn sample_stops(stops: &[(f32, [f32; 4])], t: f32) -> [f32; 4] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            let f = if o1 > o0 { (t - o0) / (o1 - o0) } else { 1.0 };
            return [
                c0[0] + (c1[0] - c0[0]) * f,
                c0[1] + (c1[1] - c0[1]) * f,
                c0[2] + (c1[2] - c0[2]) * f,
                c0[3] + (c1[3] - c0[3]) * f,
            ];
        }
    }
    stops[stops.len() - 1].1
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// An RGBA8 framebuffer with a canvas-like drawing state.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    state: RasterState,
    stack: Vec<RasterState>,
}

impl PixelSurface {
    /// Create a transparent surface. Zero-sized surfaces are rejected.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized);
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba8::default(); (width * height) as usize],
            state: RasterState::default(),
            stack: Vec::new(),
        })
    }

    /// Resize, discarding contents when the size actually changes.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized);
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![Rgba8::default(); (width * height) as usize];
        }
        Ok(())
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    /// Overwrite every pixel and reset the drawing state.
    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixels.fill(Rgba8 { r, g, b, a });
        self.state = RasterState::default();
        self.stack.clear();
    }

    /// Raw straight-alpha RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Copy into an `image` buffer.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y * self.width + x) as usize];
            image::Rgba([p.r, p.g, p.b, p.a])
        })
    }

    /// Write the current frame as a PNG file.
    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<(), SurfaceError> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    // ========== State helpers ==========

    fn device_scale(&self) -> f32 {
        self.state.transform.matrix2.determinant().abs().sqrt()
    }

    fn to_device(&self, p: Vec2) -> Vec2 {
        self.state.transform.transform_point2(p)
    }

    fn shader(&self, paint: &Paint) -> Shader {
        match paint {
            Paint::Solid(c) => Shader::Solid(to_f32(*c)),
            Paint::Linear(g) => {
                let start = self.to_device(g.start);
                let end = self.to_device(g.end);
                let dir = end - start;
                let len_sq = dir.length_squared().max(f32::EPSILON);
                Shader::Linear { start, dir, inv_len_sq: 1.0 / len_sq, stops: convert_stops(&g.stops) }
            }
            Paint::Radial(g) => {
                let scale = self.device_scale();
                let inner = g.inner_radius * scale;
                let span = ((g.outer_radius - g.inner_radius) * scale).max(f32::EPSILON);
                Shader::Radial {
                    center: self.to_device(g.center),
                    inner,
                    span,
                    stops: convert_stops(&g.stops),
                }
            }
        }
    }

    fn glow_active(&self) -> bool {
        self.state.shadow_blur > 0.0 && self.state.shadow_color.alpha() > 0.0
    }

    // ========== Pixel pipeline ==========

    fn blend(&mut self, x: u32, y: u32, src: [f32; 4], coverage: f32) {
        let sa = src[3] * coverage * self.state.alpha;
        if sa <= 0.0 {
            return;
        }
        let sa = sa.min(1.0);
        let idx = (y * self.width + x) as usize;
        let dst = self.pixels[idx];
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: f32, d: u8| -> u8 {
            let d = d as f32 / 255.0;
            let c = (s * sa + d * da * (1.0 - sa)) / out_a;
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        self.pixels[idx] = Rgba8 {
            r: mix(src[0], dst.r),
            g: mix(src[1], dst.g),
            b: mix(src[2], dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
        };
    }

    /// Visit every pixel center in a device-space box, blending the shader
    /// weighted by `coverage`.
    fn cover<F>(&mut self, min: Vec2, max: Vec2, shader: &Shader, coverage: F)
    where
        F: Fn(Vec2) -> f32,
    {
        if !(min.is_finite() && max.is_finite()) {
            return;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let c = coverage(p);
                if c > 0.0 {
                    let color = shader.sample(p);
                    self.blend(x, y, color, c.min(1.0));
                }
            }
        }
    }

    fn glow_disc(&mut self, center: Vec2, radius: f32) {
        let blur = self.state.shadow_blur * self.device_scale();
        let shader = Shader::Solid(to_f32(self.state.shadow_color));
        let reach = Vec2::splat(radius + blur);
        self.cover(center - reach, center + reach, &shader, |p| {
            let d = (p - center).length() - radius;
            let f = (1.0 - d / blur).clamp(0.0, 1.0);
            f * f
        });
    }

    fn glow_capsule(&mut self, a: Vec2, b: Vec2, half_width: f32) {
        let blur = self.state.shadow_blur * self.device_scale();
        let shader = Shader::Solid(to_f32(self.state.shadow_color));
        let reach = Vec2::splat(half_width + blur);
        self.cover(a.min(b) - reach, a.max(b) + reach, &shader, |p| {
            let d = segment_distance(p, a, b) - half_width;
            let f = (1.0 - d / blur).clamp(0.0, 1.0);
            f * f
        });
    }

    fn capsule(&mut self, a: Vec2, b: Vec2, half_width: f32, shader: &Shader) {
        let reach = Vec2::splat(half_width + 1.0);
        self.cover(a.min(b) - reach, a.max(b) + reach, shader, |p| {
            (half_width - segment_distance(p, a, b) + 0.5).clamp(0.0, 1.0)
        });
    }

    /// Even-odd scanline fill of a device-space polygon.
    fn polygon(&mut self, points: &[Vec2], shader: &Shader) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let (mut min, mut max) = (points[0], points[0]);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        let y0 = min.y.floor().max(0.0) as u32;
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);
        let mut crossings: Vec<f32> = Vec::with_capacity(8);
        for y in y0..y1 {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let xs = (pair[0] - 0.5).ceil().max(0.0) as u32;
                let xe = ((pair[1] - 0.5).floor() + 1.0).max(0.0) as u32;
                for x in xs..xe.min(self.width) {
                    let color = shader.sample(Vec2::new(x as f32 + 0.5, sy));
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn scale(&mut self, factor: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_scale(factor);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.state.shadow_blur = blur.max(0.0);
        self.state.shadow_color = color;
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let corners = [
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.x + rect.w, rect.y),
            Vec2::new(rect.x + rect.w, rect.y + rect.h),
            Vec2::new(rect.x, rect.y + rect.h),
        ];
        let device: Vec<Vec2> = corners.iter().map(|c| self.to_device(*c)).collect();
        let shader = self.shader(paint);
        self.polygon(&device, &shader);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if !(radius > 0.0) {
            return;
        }
        let c = self.to_device(center);
        let r = radius * self.device_scale();
        if self.glow_active() {
            self.glow_disc(c, r);
        }
        let shader = self.shader(paint);
        let reach = Vec2::splat(r + 1.0);
        self.cover(c - reach, c + reach, &shader, |p| (r - (p - c).length() + 0.5).clamp(0.0, 1.0));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: &Stroke) {
        if !(radius > 0.0) {
            return;
        }
        let c = self.to_device(center);
        let scale = self.device_scale();
        let r = radius * scale;
        let half = (stroke.width * scale / 2.0).max(0.5);
        let shader = self.shader(&stroke.paint);
        let reach = Vec2::splat(r + half + 1.0);
        self.cover(c - reach, c + reach, &shader, |p| {
            (half - ((p - c).length() - r).abs() + 0.5).clamp(0.0, 1.0)
        });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint) {
        if !(radii.x > 0.0 && radii.y > 0.0) {
            return;
        }
        let (sin, cos) = rotation.sin_cos();
        let device: Vec<Vec2> = (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let a = std::f32::consts::TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
                let local = Vec2::new(a.cos() * radii.x, a.sin() * radii.y);
                let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
                self.to_device(center + rotated)
            })
            .collect();
        let shader = self.shader(paint);
        self.polygon(&device, &shader);
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let a = self.to_device(from);
        let b = self.to_device(to);
        let half = (stroke.width * self.device_scale() / 2.0).max(0.5);
        if self.glow_active() {
            self.glow_capsule(a, b, half);
        }
        let shader = self.shader(&stroke.paint);
        self.capsule(a, b, half, &shader);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let device: Vec<Vec2> = path.points.iter().map(|p| self.to_device(*p)).collect();
        let shader = self.shader(paint);
        self.polygon(&device, &shader);
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        let half = (stroke.width * self.device_scale() / 2.0).max(0.5);
        let shader = self.shader(&stroke.paint);
        let segments: Vec<(Vec2, Vec2)> = path
            .segments()
            .map(|(a, b)| (self.to_device(a), self.to_device(b)))
            .collect();
        if self.glow_active() {
            for (a, b) in &segments {
                self.glow_capsule(*a, *b, half);
            }
        }
        for (a, b) in segments {
            self.capsule(a, b, half, &shader);
        }
    }
}
