//! Cloth simulation parameters and host input ranges.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Cloth simulation physics and the accepted range of host inputs
#[derive(Debug, Clone)]
pub struct ClothPhysics {
    /// Subdivisions per side at startup (even, within `subdivision_range`)
    pub initial_subdivision: u32,

    /// Accepted subdivision values (values are also forced even)
    pub subdivision_range: RangeInclusive<u32>,

    /// Downward acceleration applied while gravity is on (units/s², negative = down)
    pub gravity_on: f32,

    /// Accepted center offset values (object-space units, the sheet spans [-1, 1])
    pub center_offset_range: RangeInclusive<f32>,

    /// Largest frame delta fed to the compute step (seconds)
    /// 1/30 s keeps the explicit integrator stable when the window stalls
    pub max_frame_delta_s: f32,
}

impl Default for ClothPhysics {
    fn default() -> Self {
        Self {
            initial_subdivision: 10,
            subdivision_range: 2..=120,
            gravity_on: -9.8,
            center_offset_range: -0.5..=0.5,
            max_frame_delta_s: 1.0 / 30.0,
        }
    }
}

impl ClothPhysics {
    /// Largest frame delta as a `Duration`
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_secs_f32(self.max_frame_delta_s)
    }
}

/// Automatic center offset oscillation (the "animate center" toggle)
#[derive(Debug, Clone)]
pub struct CenterAnimation {
    /// Peak offset (object-space units)
    pub amplitude: f32,

    /// Time divisor applied to elapsed milliseconds before `sin`
    /// 200 ms gives a period of roughly 1.26 s
    pub time_scale_ms: f32,
}

impl Default for CenterAnimation {
    fn default() -> Self {
        Self {
            amplitude: 0.25,
            time_scale_ms: 200.0,
        }
    }
}

impl CenterAnimation {
    /// Center offset for the given time since startup
    pub fn offset_at(&self, elapsed: Duration) -> f32 {
        let t_ms = elapsed.as_secs_f64() * 1000.0;
        ((t_ms / self.time_scale_ms as f64).sin() as f32) * self.amplitude
    }
}
