use crate::cloud::point_cloud::PointCloud;

/// Bounded pool of point-cloud buffers so the acquisition loop reuses the
/// arenas the render loop has let go of.
pub struct CloudPool {
    clouds: Vec<PointCloud>,
    max_capacity: usize,
}

impl CloudPool {
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            clouds: Vec::with_capacity(max_capacity),
            max_capacity,
        }
    }

    /// Takes a pooled cloud, or allocates one when the pool is empty.
    pub fn checkout(&mut self, slots: usize, targets_per_zone: usize) -> PointCloud {
        match self.clouds.pop() {
            Some(mut cloud) => {
                cloud.reset(slots, targets_per_zone);
                cloud
            }
            None => PointCloud::with_slots(slots, targets_per_zone),
        }
    }

    /// Returns a cloud for reuse; dropped when the pool is full.
    pub fn release(&mut self, cloud: PointCloud) {
        if self.clouds.len() < self.max_capacity {
            self.clouds.push(cloud);
        }
    }

    pub fn available(&self) -> usize {
        self.clouds.len()
    }

    pub fn reset(&mut self) {
        self.clouds.clear();
    }
}
