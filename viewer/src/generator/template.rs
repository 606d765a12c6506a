use std::f64::consts::PI;
use tofcore::sensor::{Target, Zone};

/// Offset of a sinusoidal sway at `frame` for a given period in frames.
pub fn sway(frame: usize, period_frames: usize, amplitude: f64) -> f64 {
    let period = period_frames.max(1) as f64;
    amplitude * (frame as f64 / period * 2.0 * PI).sin()
}

/// Single-target zone as the sensor reports it. Status 5 is a valid range.
pub fn wall_zone(distance_mm: i16, status: u8) -> Zone {
    Zone {
        ambient_per_spad: 2,
        target_count: 1,
        spads_enabled: 1024,
        targets: vec![Target::new(1500, 6, distance_mm, 45, status)],
    }
}
