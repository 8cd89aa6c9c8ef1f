//! UI components of the hero screen.

pub mod overlay;
pub mod singularity;
pub mod starfield;
