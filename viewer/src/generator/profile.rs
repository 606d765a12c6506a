use crate::generator::template::{sway, wall_zone};
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tofcore::sensor::{Reading, ReadingLog, Resolution};

const ROW_LEN: usize = 8;
/// Status the sensor uses for a range it could not resolve.
const INVALID_STATUS: u8 = 255;
const MAX_DISTANCE_MM: f64 = 4000.0;

/// Configuration for generating a synthetic replay log: a flat wall in front
/// of the sensor, swaying back and forth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub frames: usize,
    pub base_distance_mm: f64,
    pub sway_amplitude_mm: f64,
    pub sway_period_frames: usize,
    /// Extra distance per column, so the wall is seen at an angle.
    pub tilt_mm_per_col: f64,
    pub noise_mm: f64,
    /// Zones per frame reported with an invalid status.
    pub invalid_zones: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 100,
            base_distance_mm: 900.0,
            sway_amplitude_mm: 250.0,
            sway_period_frames: 40,
            tilt_mm_per_col: 15.0,
            noise_mm: 8.0,
            invalid_zones: 3,
            seed: 0,
        }
    }
}

fn build_reading(config: &GeneratorConfig, frame: usize, rng: &mut StdRng) -> anyhow::Result<Reading> {
    let zone_count = ROW_LEN * ROW_LEN;
    let invalid: Vec<usize> = (0..config.invalid_zones)
        .map(|_| rng.gen_range(0..zone_count))
        .collect();
    let offset = sway(frame, config.sway_period_frames, config.sway_amplitude_mm);

    let zones = (0..zone_count)
        .map(|zone| {
            let jitter = if config.noise_mm > 0.0 {
                rng.gen_range(-config.noise_mm..config.noise_mm)
            } else {
                0.0
            };
            let distance = config.base_distance_mm
                + offset
                + (zone % ROW_LEN) as f64 * config.tilt_mm_per_col
                + jitter;
            let status = if invalid.contains(&zone) { INVALID_STATUS } else { 5 };
            wall_zone(distance.clamp(0.0, MAX_DISTANCE_MM).round() as i16, status)
        })
        .collect();

    let temperature = 30 + (frame % 4) as i16;
    Reading::new(Resolution::Grid8x8, 1, temperature, zones)
        .with_context(|| format!("assembling synthetic frame {frame}"))
}

pub fn build_log_from_config(config: &GeneratorConfig) -> anyhow::Result<ReadingLog> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let readings = (0..config.frames)
        .map(|frame| build_reading(config, frame, &mut rng))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(ReadingLog::from(readings))
}

/// Generates a log and writes it to `path`. Returns the number of readings.
pub fn write_log<P: AsRef<Path>>(path: P, config: &GeneratorConfig) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let log = build_log_from_config(config)?;
    log.save_atomic(path)
        .with_context(|| format!("writing synthetic log {}", path.display()))?;
    Ok(log.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tofcore::cloud::SphericalMapper;

    pub(crate) fn build_log(frames: usize, seed: u64) -> anyhow::Result<ReadingLog> {
        let config = GeneratorConfig {
            frames,
            seed,
            ..Default::default()
        };
        build_log_from_config(&config)
    }

    #[test]
    fn generator_builds_requested_frames() {
        let log = build_log(12, 3).unwrap();
        assert_eq!(log.len(), 12);
        assert!(log
            .readings()
            .iter()
            .all(|reading| reading.resolution == Resolution::Grid8x8 && reading.zones.len() == 64));
    }

    #[test]
    fn same_seed_same_log() {
        assert_eq!(build_log(5, 42).unwrap(), build_log(5, 42).unwrap());
        assert_ne!(build_log(5, 42).unwrap(), build_log(5, 43).unwrap());
    }

    #[test]
    fn invalid_zones_are_filtered_out() {
        let config = GeneratorConfig {
            frames: 1,
            invalid_zones: 1,
            noise_mm: 0.0,
            sway_amplitude_mm: 0.0,
            ..Default::default()
        };
        let log = build_log_from_config(&config).unwrap();
        let reading = log.get(0).unwrap();
        let invalid = reading
            .zones
            .iter()
            .filter(|zone| zone.targets[0].status == INVALID_STATUS)
            .count();
        assert_eq!(invalid, 1);

        let cloud = SphericalMapper::default().map(reading).unwrap();
        // 900 to 1005 mm: every valid zone lands in a drawable bucket
        assert_eq!(cloud.drawable_count(), 63);
    }

    #[test]
    fn write_log_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synthetic.json");
        let written = write_log(&path, &GeneratorConfig::default()).unwrap();
        assert_eq!(written, 100);
        assert_eq!(ReadingLog::load(&path).unwrap(), build_log(100, 0).unwrap());
    }
}
