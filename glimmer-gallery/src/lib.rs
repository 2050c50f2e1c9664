//! Glimmer Gallery - interactive shell for glimmer animations
//!
//! This crate provides:
//! - A canvas that shows a software-rendered frame as an egui texture
//! - UI panels for the animation list, the knobs and the parameter listing
//! - Serializable gallery settings

pub mod canvas;
pub mod settings;
pub mod ui;

pub use canvas::{Canvas, CanvasInput};
pub use settings::GallerySettings;
