mod concurrent_map;
pub(crate) mod point;
mod sub_hull;

pub use concurrent_map::{ConcurrentMap, ConcurrentPointSet, MapStats};
pub use point::{AsPoint, IndexedPoint, Point, PointId};
pub use sub_hull::{is_strictly_convex, locate, SubHull};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PointLocation {
  Inside,
  OnBoundary,
  Outside,
}
