//! UI panel for the three global knobs

use eframe::egui;
use glimmer::config::{HUE_RANGE, HUE_STEP, SIZE_RANGE, SPEED_RANGE};
use glimmer::Knobs;

/// Speed, size and hue sliders. Returns `true` if any knob moved.
pub fn render_knobs_panel(ui: &mut egui::Ui, knobs: &mut Knobs) -> bool {
    let mut changed = false;

    ui.heading("Controls");

    changed |= ui
        .add(egui::Slider::new(&mut knobs.speed, SPEED_RANGE).step_by(0.1).text("Speed"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut knobs.size, SIZE_RANGE).step_by(0.1).text("Size"))
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut knobs.hue_shift, HUE_RANGE)
                .step_by(HUE_STEP)
                .suffix("°")
                .text("Hue shift"),
        )
        .changed();

    ui.horizontal(|ui| {
        if ui.small_button("Reset").on_hover_text("Speed 1, size 1, no hue shift").clicked() {
            *knobs = Knobs::default();
            changed = true;
        }
    });

    changed
}
