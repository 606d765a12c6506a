use crate::prelude::Rgb;
use crate::sensor::Target;
use serde::{Deserialize, Serialize};

/// Upper (exclusive) distance bound of a size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBucket {
    pub below_m: f64,
    pub size_px: u32,
}

/// How one point-cloud slot is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointStyle {
    pub drawable: bool,
    pub size_px: u32,
    pub color: Rgb,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            drawable: false,
            size_px: 1,
            color: Rgb::MAGENTA,
        }
    }
}

/// Decides draw eligibility, size and colour per target.
///
/// The valid status codes come from the sensor firmware (5 = range valid,
/// 9 = valid with large pulse, 10 = valid but no target at previous range);
/// they are configuration so newer firmware can be accommodated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilter {
    pub valid_statuses: Vec<u8>,
    /// Evaluated in order, first match wins.
    pub distance_buckets: Vec<DistanceBucket>,
    pub out_of_range_size_px: u32,
    /// Indexed by target rank.
    pub rank_colors: Vec<Rgb>,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self {
            valid_statuses: vec![5, 9, 10],
            distance_buckets: [(0.2, 10), (0.5, 9), (0.7, 8), (1.0, 7), (1.70, 6)]
                .into_iter()
                .map(|(below_m, size_px)| DistanceBucket { below_m, size_px })
                .collect(),
            out_of_range_size_px: 1,
            rank_colors: vec![Rgb::MAGENTA, Rgb::CYAN, Rgb::YELLOW, Rgb::ORANGE],
        }
    }
}

impl TargetFilter {
    pub fn rank_color(&self, rank: usize) -> Rgb {
        self.rank_colors
            .get(rank)
            .or_else(|| self.rank_colors.last())
            .copied()
            .unwrap_or(Rgb::MAGENTA)
    }

    /// Style for the target at `rank` of a zone that reported `target_count`
    /// detections. Ranks beyond the count are absent and never drawn.
    pub fn classify(&self, target: &Target, rank: usize, target_count: u8) -> PointStyle {
        let color = self.rank_color(rank);
        let distance = target.distance_m();
        let bucket = self
            .distance_buckets
            .iter()
            .find(|bucket| distance < bucket.below_m);

        match bucket {
            Some(bucket) => PointStyle {
                drawable: rank < usize::from(target_count)
                    && self.valid_statuses.contains(&target.status),
                size_px: bucket.size_px,
                color,
            },
            None => PointStyle {
                drawable: false,
                size_px: self.out_of_range_size_px,
                color,
            },
        }
    }
}
