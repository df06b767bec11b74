//! Collaborator traits consumed by the editor and dispatcher

pub mod display;
pub mod store;

pub use display::{Color, DisplaySurface, SurfaceError};
pub use store::{StoreError, TextStore};
