//! Browser rendering
//!
//! The camera looks straight down on the pit, so a 2D canvas is enough.

pub mod canvas;

pub use canvas::CanvasRenderer;
