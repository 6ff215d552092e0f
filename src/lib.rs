//! Pseudo-3D navigation cube: a rotatable, zoomable wireframe cube over a
//! perspective grid, rendered as pure draw commands and painted by a thin
//! surface adapter.

pub mod config;
pub mod error;
pub mod frame;
pub mod graphics;
pub mod math;
pub mod state;
pub mod terminal;
pub mod vertex;
pub mod viewport;
pub mod widget;

pub use error::{Error, Result};
pub use frame::{render_frame, DrawCommand, Frame};
pub use state::{DragState, ViewerState};
pub use viewport::Viewport;
pub use widget::{Interaction, NavigationWidget};
