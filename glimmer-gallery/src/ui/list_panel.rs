//! Scrollable list of registered animations

use eframe::egui;
use glimmer::Registry;

/// One button per descriptor, the active one highlighted.
///
/// Returns the index the user clicked, if any.
pub fn render_simulation_list(ui: &mut egui::Ui, registry: &Registry, active: Option<usize>) -> Option<usize> {
    let mut clicked = None;

    ui.heading("Animations");
    egui::ScrollArea::vertical()
        .id_salt("simulation_list")
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            for (index, descriptor) in registry.iter().enumerate() {
                let selected = active == Some(index);
                let button = egui::Button::new(descriptor.name)
                    .selected(selected)
                    .min_size(egui::vec2(ui.available_width(), 0.0));
                if ui
                    .add(button)
                    .on_hover_text(descriptor.description)
                    .clicked()
                    && !selected
                {
                    clicked = Some(index);
                }
            }
        });

    clicked
}
