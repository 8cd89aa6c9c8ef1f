//! Warp-drive starfield.
//!
//! Renders a field of stars rushing toward the viewer on an HTML canvas:
//! - Perspective projection of a fixed pool of recycled particles
//! - Inertial warp speed driven by a boolean activation input
//! - Dots while cruising, center-pointing streaks while warping
//! - Translucent frame fade for motion trails
//!
//! # Example
//!
//! ```ignore
//! use azathoth::components::starfield::StarfieldCanvas;
//!
//! let (charging, set_charging) = signal(false);
//! view! { <StarfieldCanvas charging=charging /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod particles;
pub mod projection;
pub mod render;
pub mod state;
pub mod theme;

pub use component::StarfieldCanvas;
pub use config::StarfieldConfig;
pub use error::{ConfigError, StarfieldError};
pub use particles::Particle;
pub use projection::Viewport;
pub use state::{Mode, SimulationState, Starfield};
pub use theme::Theme;
