//! The animation canvas.
//!
//! A [`PixelSurface`] that the driver draws into, shown as an egui texture
//! filling the central panel. The canvas reports its size so the driver can
//! restart on resize, and turns egui pointer input into [`PointerEvent`]s in
//! canvas coordinates.

use eframe::egui;
use glam::Vec2;
use glimmer::{Color, Dimensions, PixelSurface, PointerEvent, SurfaceError};

/// What one frame of layout produced.
pub struct CanvasInput {
    /// Current size in canvas pixels.
    pub dims: Dimensions,
    /// Pointer events that happened over the canvas this frame.
    pub events: Vec<PointerEvent>,
    pub rect: egui::Rect,
}

#[derive(Default)]
pub struct Canvas {
    surface: Option<PixelSurface>,
    texture: Option<egui::TextureHandle>,
    /// Pointer position last frame, to report moves only when it changes.
    last_pointer: Option<Vec2>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the remaining panel area and collect pointer input over it.
    pub fn layout(&mut self, ui: &mut egui::Ui) -> CanvasInput {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        let to_canvas = |pos: egui::Pos2| Vec2::new(pos.x - rect.left(), pos.y - rect.top());
        let mut events = Vec::new();

        match response.hover_pos().or(response.interact_pointer_pos()) {
            Some(pos) => {
                let p = to_canvas(pos);
                if self.last_pointer != Some(p) {
                    events.push(PointerEvent::moved(p));
                    self.last_pointer = Some(p);
                }
            }
            None => self.last_pointer = None,
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(PointerEvent::clicked(to_canvas(pos)));
            }
        }

        CanvasInput {
            dims: Dimensions::new(rect.width().floor(), rect.height().floor()),
            events,
            rect,
        }
    }

    /// Match the backing surface to `dims`, creating it on first use.
    pub fn resize(&mut self, dims: Dimensions) -> Result<(), SurfaceError> {
        let (w, h) = (dims.width as u32, dims.height as u32);
        match &mut self.surface {
            Some(surface) => surface.resize(w, h),
            None => {
                self.surface = Some(PixelSurface::new(w, h)?);
                Ok(())
            }
        }
    }

    /// Paint the whole canvas opaque, e.g. when a new session starts.
    pub fn clear(&mut self, color: Color) {
        if let Some(surface) = &mut self.surface {
            surface.clear(color.with_alpha(1.0));
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut PixelSurface> {
        self.surface.as_mut()
    }

    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    /// Copy the surface into the texture.
    pub fn upload(&mut self, ctx: &egui::Context) {
        let Some(surface) = &self.surface else {
            return;
        };
        let [w, h] = surface.size();
        let image = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], surface.as_rgba());
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("glimmer-canvas", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Draw the last uploaded frame into `rect`.
    pub fn paint(&self, ui: &egui::Ui, rect: egui::Rect) {
        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
        }
    }
}
