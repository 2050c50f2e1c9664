//! Glimmer Gallery - pick an animation, tweak the knobs, watch it run.
//!
//! The driver is fed by a manual scheduler whose waker asks egui for a
//! repaint; every egui frame fires the pending token and uploads the result.

use eframe::egui;
use std::path::PathBuf;

// Use web-time on WASM for Instant compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use glimmer::{Dimensions, DriverError, ManualScheduler, Phase, PlaybackDriver, Registry};
use glimmer_gallery::ui::{render_knobs_panel, render_params_panel, render_simulation_list};
use glimmer_gallery::{Canvas, GallerySettings};

// ============================================================================
// Native entry point
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional settings file as the only argument
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = match &settings_path {
        Some(path) => GallerySettings::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "could not load settings, using defaults");
            GallerySettings::default()
        }),
        None => GallerySettings::default(),
    }
    .sanitized(Registry::builtin().len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_title("Glimmer Gallery"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Glimmer Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(cc, settings, settings_path)))),
    )
}

// ============================================================================
// WASM entry point
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast;

    // Redirect panic messages to console.error
    console_error_panic_hook::set_once();

    wasm_bindgen_futures::spawn_local(async {
        let web_options = eframe::WebOptions::default();

        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("glimmer-canvas")
            .expect("No canvas element with id 'glimmer-canvas'")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("Element is not a canvas");

        let settings = GallerySettings::default();
        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GalleryApp::new(cc, settings, None)))),
            )
            .await
            .expect("Failed to start eframe");
    });
}

struct GalleryApp {
    driver: PlaybackDriver<ManualScheduler>,
    canvas: Canvas,
    settings: GallerySettings,
    settings_path: Option<PathBuf>,
    /// Generation the canvas was last cleared for
    shown_generation: Option<u64>,
    status_message: Option<(String, Instant)>,
}

impl GalleryApp {
    fn new(cc: &eframe::CreationContext<'_>, settings: GallerySettings, settings_path: Option<PathBuf>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let scheduler = ManualScheduler::with_waker(move || ctx.request_repaint());
        let driver = PlaybackDriver::new(Registry::builtin(), scheduler).with_seed(settings.seed);

        Self {
            driver,
            canvas: Canvas::new(),
            settings,
            settings_path,
            shown_generation: None,
            status_message: None,
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    fn report(&mut self, result: Result<(), DriverError>) {
        match result {
            Ok(()) => {}
            Err(DriverError::Registry(e)) => {
                tracing::error!(error = %e, "selection outside the registry");
                self.show_status(e.to_string());
            }
            Err(e @ DriverError::Initialization { .. }) => self.show_status(e.to_string()),
            Err(DriverError::Stopped) => {}
        }
    }

    /// Keep the backing surface and the driver in step with the canvas size.
    fn sync_size(&mut self, dims: Dimensions) {
        if dims == self.driver.dims() && self.driver.selected().is_some() {
            return;
        }
        if dims.is_degenerate() {
            let result = self.driver.resize(dims);
            self.report(result);
            return;
        }
        if let Err(e) = self.canvas.resize(dims) {
            self.show_status(format!("Canvas error: {}", e));
            return;
        }

        let result = if self.driver.selected().is_none() {
            self.driver
                .activate(self.settings.selected, self.settings.knobs, dims)
                .map(|_| ())
        } else {
            self.driver.resize(dims)
        };
        self.report(result);
    }

    fn select(&mut self, index: usize) {
        self.settings.selected = index;
        let result = self.driver.select(index).map(|_| ());
        self.report(result);
    }

    fn restart(&mut self) {
        let result = self.driver.restart();
        self.report(result);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn frame_file_name(&self) -> String {
        let name = self.driver.session().map(|s| s.config().name()).unwrap_or("frame");
        let slug: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
            .collect::<String>()
            .trim()
            .replace(' ', "_")
            .to_lowercase();
        format!("{}.png", slug)
    }

    // ========================================================================
    // Native file operations (using rfd)
    // ========================================================================

    #[cfg(not(target_arch = "wasm32"))]
    fn save_settings(&mut self) {
        if let Some(path) = self.settings_path.clone() {
            match self.settings.save(&path) {
                Ok(()) => self.show_status(format!("Saved to {}", path.display())),
                Err(e) => self.show_status(format!("Save failed: {}", e)),
            }
        } else {
            self.save_settings_as();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_settings_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("glimmer.json")
            .save_file()
        {
            match self.settings.save(&path) {
                Ok(()) => {
                    self.show_status(format!("Saved to {}", path.display()));
                    self.settings_path = Some(path);
                }
                Err(e) => self.show_status(format!("Save failed: {}", e)),
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_frame(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(self.frame_file_name())
            .save_file()
        else {
            return;
        };
        let result = match self.canvas.surface() {
            Some(surface) => surface.save_png(&path).map_err(|e| e.to_string()),
            None => Err("nothing drawn yet".to_string()),
        };
        match result {
            Ok(()) => self.show_status(format!("Frame saved to {}", path.display())),
            Err(e) => self.show_status(format!("Save failed: {}", e)),
        }
    }

    // ========================================================================
    // WASM file operations (using browser APIs)
    // ========================================================================

    #[cfg(target_arch = "wasm32")]
    fn save_settings(&mut self) {
        // On web, always download
        self.save_settings_as();
    }

    #[cfg(target_arch = "wasm32")]
    fn save_settings_as(&mut self) {
        use wasm_bindgen::JsCast;

        let json = match serde_json::to_string_pretty(&self.settings) {
            Ok(j) => j,
            Err(e) => {
                self.show_status(format!("Save failed: {}", e));
                return;
            }
        };

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&json.into());

        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");

        if let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) {
            if let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) {
                if let Ok(anchor) = document.create_element("a") {
                    let anchor: web_sys::HtmlAnchorElement = anchor.unchecked_into();
                    anchor.set_href(&url);
                    anchor.set_download("glimmer.json");
                    anchor.click();
                    let _ = web_sys::Url::revoke_object_url(&url);
                    self.show_status("Downloaded settings file");
                }
            }
        }
    }
}

impl eframe::App for GalleryApp {
    /// Window closing: tear the session down so no frame runs after exit.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.driver.stop();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.settings.window_size = ctx.screen_rect().size().into();

        // Menu bar
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save Settings").clicked() {
                        self.save_settings();
                        ui.close_menu();
                    }
                    if ui.button("Save Settings As...").clicked() {
                        self.save_settings_as();
                        ui.close_menu();
                    }
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if ui.button("Save Frame as PNG...").clicked() {
                            self.save_frame();
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Restart").on_hover_text("Start the animation over").clicked() {
                        self.restart();
                    }

                    let btn_text = if self.driver.phase() == Phase::Paused { "▶ Play" } else { "⏸ Pause" };
                    if ui.button(btn_text).clicked() {
                        self.driver.toggle_pause();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some((msg, time)) = &self.status_message {
                    if time.elapsed().as_secs() < 5 {
                        ui.label(msg);
                    } else {
                        self.status_message = None;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.0} FPS", self.driver.clock().fps()));
                    ui.separator();

                    match self.driver.session() {
                        Some(session) => {
                            ui.label(egui::RichText::new(format!("#{}", session.generation())).small().weak());
                            ui.label(session.config().name());
                        }
                        None => {
                            ui.label(egui::RichText::new("No animation running").color(egui::Color32::YELLOW));
                        }
                    }
                });
            });
        });

        // Left panel: knobs, list, parameters
        let mut knobs = self.settings.knobs;
        let mut clicked = None;
        egui::SidePanel::left("gallery")
            .min_width(220.0)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("✨ Glimmer");
                ui.separator();

                if render_knobs_panel(ui, &mut knobs) {
                    self.settings.knobs = knobs;
                }
                ui.separator();

                clicked = render_simulation_list(ui, self.driver.registry(), self.driver.selected());
                ui.separator();

                if let Some(session) = self.driver.session() {
                    if let Ok(descriptor) = self.driver.registry().get(session.index()) {
                        ui.label(egui::RichText::new(descriptor.description).italics());
                    }
                    render_params_panel(ui, session.config());
                }
            });

        if knobs != self.driver.knobs() && self.driver.selected().is_some() {
            let result = self.driver.set_knobs(knobs);
            self.report(result);
        }
        if let Some(index) = clicked {
            self.select(index);
        }

        // Central panel: the canvas
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let input = self.canvas.layout(ui);
                self.sync_size(input.dims);

                for event in input.events {
                    self.driver.dispatch_pointer(event);
                }

                if let Some(session) = self.driver.session() {
                    if self.shown_generation != Some(session.generation()) {
                        let backdrop = session.config().backdrop();
                        self.shown_generation = Some(session.generation());
                        self.canvas.clear(backdrop);
                    }
                }

                let ran = match self.canvas.surface_mut() {
                    Some(surface) => self.driver.pump(surface),
                    None => 0,
                };
                if ran > 0 {
                    self.canvas.upload(ctx);
                }
                self.canvas.paint(ui, input.rect);

                if self.driver.is_degraded() {
                    ui.put(
                        input.rect,
                        egui::Label::new(egui::RichText::new("No animation running").color(egui::Color32::GRAY)),
                    );
                }
            });
    }
}
