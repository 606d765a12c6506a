pub mod filter;
pub mod mapper;
pub mod point_cloud;
pub mod pool;

pub use filter::{DistanceBucket, PointStyle, TargetFilter};
pub use mapper::SphericalMapper;
pub use point_cloud::PointCloud;
pub use pool::CloudPool;
