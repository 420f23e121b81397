pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod host;
pub mod layout;
pub mod metrics;
pub mod panel;
pub mod selection;
pub mod stage;
pub mod transition;
pub mod tween;

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use hit::*;
pub use host::*;
pub use layout::*;
pub use metrics::*;
pub use panel::*;
pub use selection::*;
pub use stage::*;
pub use transition::*;
pub use tween::*;
