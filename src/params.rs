//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable number of the simulation lives here with:
//! - Units (seconds, radians, object-space units)
//! - Documented ranges and meanings
//! - A `Default` matching the stock interactive session

mod camera;
mod cloth;
mod render;

// Re-export all types
pub use camera::OrbitCameraParams;
pub use cloth::{CenterAnimation, ClothPhysics};
pub use render::RenderConfig;
