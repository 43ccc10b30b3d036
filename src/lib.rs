//! Clothgrid library - GPU cloth sheet simulation with an orbit camera

pub mod camera;
pub mod cli;
pub mod cloth;
pub mod frame;
pub mod params;
pub mod rendering;
