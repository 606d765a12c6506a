use crate::prelude::FrameError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Maximum ranked returns the sensor reports per zone.
pub const MAX_TARGETS_PER_ZONE: u8 = 4;

/// One detected object within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub signal_per_spad: u32,
    pub range_sigma_mm: u16,
    pub distance_mm: i16,
    pub reflectance: u8,
    pub status: u8,
}

impl Target {
    pub fn new(
        signal_per_spad: u32,
        range_sigma_mm: u16,
        distance_mm: i16,
        reflectance: u8,
        status: u8,
    ) -> Self {
        Self {
            signal_per_spad,
            range_sigma_mm,
            distance_mm,
            reflectance,
            status,
        }
    }

    pub fn distance_m(&self) -> f64 {
        f64::from(self.distance_mm) / 1000.0
    }
}

/// One angular cell of the field of view. `targets` is ordered by rank and
/// always holds `targets_per_zone` entries; only the first `target_count` are
/// actual detections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub ambient_per_spad: u32,
    pub target_count: u8,
    pub spads_enabled: u32,
    pub targets: Vec<Target>,
}

/// Zone grid of a frame. Serialized as the plain zone count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub enum Resolution {
    Grid4x4,
    Grid8x8,
}

impl Resolution {
    pub fn zone_count(self) -> usize {
        match self {
            Resolution::Grid4x4 => 16,
            Resolution::Grid8x8 => 64,
        }
    }

    pub fn row_len(self) -> usize {
        match self {
            Resolution::Grid4x4 => 4,
            Resolution::Grid8x8 => 8,
        }
    }
}

impl TryFrom<i64> for Resolution {
    type Error = FrameError;

    fn try_from(zones: i64) -> Result<Self, Self::Error> {
        match zones {
            16 => Ok(Resolution::Grid4x4),
            64 => Ok(Resolution::Grid8x8),
            other => Err(FrameError::InvalidResolution(other)),
        }
    }
}

impl From<Resolution> for u32 {
    fn from(resolution: Resolution) -> u32 {
        resolution.zone_count() as u32
    }
}

/// One full sensor sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReading")]
pub struct Reading {
    pub resolution: Resolution,
    pub targets_per_zone: u8,
    pub silicon_temp_degc: i16,
    pub zones: Vec<Zone>,
}

/// Unchecked wire shape; logs are validated through [`Reading::new`].
#[derive(Deserialize)]
struct RawReading {
    resolution: Resolution,
    targets_per_zone: u8,
    silicon_temp_degc: i16,
    zones: Vec<Zone>,
}

impl TryFrom<RawReading> for Reading {
    type Error = FrameError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        Reading::new(
            raw.resolution,
            raw.targets_per_zone,
            raw.silicon_temp_degc,
            raw.zones,
        )
    }
}

impl Reading {
    /// Builds a reading, checking that zone and target counts agree with the
    /// declared resolution.
    pub fn new(
        resolution: Resolution,
        targets_per_zone: u8,
        silicon_temp_degc: i16,
        zones: Vec<Zone>,
    ) -> Result<Self, FrameError> {
        if targets_per_zone == 0 || targets_per_zone > MAX_TARGETS_PER_ZONE {
            return Err(FrameError::InvalidTargetsPerZone(targets_per_zone.into()));
        }
        if zones.len() != resolution.zone_count() {
            return Err(FrameError::InvalidResolution(zones.len() as i64));
        }
        if let Some(zone) = zones
            .iter()
            .find(|zone| zone.targets.len() != usize::from(targets_per_zone))
        {
            return Err(FrameError::InvalidTargetsPerZone(zone.targets.len() as u32));
        }
        Ok(Self {
            resolution,
            targets_per_zone,
            silicon_temp_degc,
            zones,
        })
    }

    pub fn row_len(&self) -> usize {
        self.resolution.row_len()
    }

    /// Number of point-cloud slots this reading maps to.
    pub fn slot_count(&self) -> usize {
        self.zones.len() * usize::from(self.targets_per_zone)
    }

    /// Rotates the zone grid a quarter turn counter-clockwise.
    pub fn rotate_ccw(&mut self) {
        let row_len = self.row_len();
        if self.zones.len() != row_len * row_len {
            return;
        }
        let mut rotated: Vec<Option<Zone>> = vec![None; self.zones.len()];
        for (index, zone) in self.zones.drain(..).enumerate() {
            let (row, col) = (index / row_len, index % row_len);
            let new_row = (row_len - 1) - col;
            let new_col = row;
            rotated[new_col + new_row * row_len] = Some(zone);
        }
        self.zones = rotated.into_iter().flatten().collect();
    }

    /// Distances (mm) of the given target rank laid out as the zone grid.
    pub fn distance_grid(&self, rank: usize) -> Option<Array2<i16>> {
        if rank >= usize::from(self.targets_per_zone) {
            return None;
        }
        let row_len = self.row_len();
        Some(Array2::from_shape_fn((row_len, row_len), |(row, col)| {
            self.zones[row * row_len + col].targets[rank].distance_mm
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single-target 8x8 reading whose zone `i` reports `distance(i)` with status 5.
    pub(crate) fn uniform_reading(distance: impl Fn(usize) -> i16) -> Reading {
        let zones = (0..64)
            .map(|i| Zone {
                ambient_per_spad: 3,
                target_count: 1,
                spads_enabled: 1024,
                targets: vec![Target::new(120, 4, distance(i), 40, 5)],
            })
            .collect();
        Reading::new(Resolution::Grid8x8, 1, 31, zones).unwrap()
    }

    #[test]
    fn resolution_rejects_unknown_zone_counts() {
        assert_eq!(Resolution::try_from(64i64), Ok(Resolution::Grid8x8));
        assert_eq!(Resolution::try_from(16i64), Ok(Resolution::Grid4x4));
        assert_eq!(
            Resolution::try_from(32i64),
            Err(FrameError::InvalidResolution(32))
        );
    }

    #[test]
    fn reading_new_checks_zone_count() {
        let zones = vec![
            Zone {
                ambient_per_spad: 0,
                target_count: 0,
                spads_enabled: 0,
                targets: vec![Target::new(0, 0, 0, 0, 255)],
            };
            15
        ];
        assert!(Reading::new(Resolution::Grid4x4, 1, 20, zones).is_err());
    }

    #[test]
    fn deserialize_checks_shape() {
        let valid = serde_json::to_string(&uniform_reading(|_| 600)).unwrap();
        assert!(serde_json::from_str::<Reading>(&valid).is_ok());

        let empty = r#"{"resolution":64,"targets_per_zone":1,"silicon_temp_degc":20,"zones":[]}"#;
        assert!(serde_json::from_str::<Reading>(empty).is_err());

        let mut reading = uniform_reading(|_| 600);
        reading.zones[3].targets.push(Target::new(1, 1, 700, 1, 5));
        let extra_target = serde_json::to_string(&reading).unwrap();
        assert!(serde_json::from_str::<Reading>(&extra_target).is_err());
    }

    #[test]
    fn rotate_ccw_moves_top_left_to_bottom_left() {
        let mut reading = uniform_reading(|i| i as i16);
        reading.rotate_ccw();
        // top-right corner (index 7) ends up top-left
        assert_eq!(reading.zones[0].targets[0].distance_mm, 7);
        // top-left corner (index 0) ends up bottom-left
        assert_eq!(reading.zones[56].targets[0].distance_mm, 0);
    }

    #[test]
    fn four_rotations_are_identity() {
        let original = uniform_reading(|i| (i * 3) as i16);
        let mut reading = original.clone();
        for _ in 0..4 {
            reading.rotate_ccw();
        }
        assert_eq!(reading, original);
    }

    #[test]
    fn distance_grid_is_row_major() {
        let reading = uniform_reading(|i| i as i16);
        let grid = reading.distance_grid(0).unwrap();
        assert_eq!(grid[[0, 0]], 0);
        assert_eq!(grid[[1, 0]], 8);
        assert_eq!(grid[[7, 7]], 63);
        assert!(reading.distance_grid(1).is_none());
    }
}
