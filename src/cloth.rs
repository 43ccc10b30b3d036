//! Cloth sheet data: grid topology, vertex layout and host-controlled state.

mod mesh;
mod state;

pub use mesh::{ClothVertex, GridMesh};
pub use state::{SimParams, SimulationState};
