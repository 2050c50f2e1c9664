//! UI panels for the gallery

mod knobs_panel;
mod list_panel;
mod params_panel;

pub use knobs_panel::render_knobs_panel;
pub use list_panel::render_simulation_list;
pub use params_panel::render_params_panel;
