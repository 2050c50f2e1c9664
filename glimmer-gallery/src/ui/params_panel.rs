//! Read-only listing of the active animation's base configuration

use glimmer::{EffectiveConfig, ParamValue};

pub fn render_params_panel(ui: &mut egui::Ui, config: &EffectiveConfig) {
    egui::CollapsingHeader::new("Parameters")
        .default_open(false)
        .show(ui, |ui| {
            ui.label(egui::RichText::new(format!("{} · seed {:#x}", config.kind().family().name(), config.seed())).small().weak());

            egui::Grid::new("params_grid").striped(true).num_columns(2).show(ui, |ui| {
                for (name, value) in config.entries() {
                    ui.label(name);
                    let text = match &value {
                        ParamValue::Number(n) => format!("{:.3}", n).trim_end_matches('0').trim_end_matches('.').to_string(),
                        other => other.to_string(),
                    };
                    ui.label(egui::RichText::new(text).monospace());
                    ui.end_row();
                }
            });
        });
}
