//! Convex hulls of 2-D point sets, sequential and parallel.
//!
//! The centrepiece is [`algorithms::convex_hull::parallel_chan`], a parallel
//! version of Chan's output-sensitive algorithm. Sub-hulls are built by a
//! bounded pool of Graham scan workers and merged by two gift-wrapping
//! traversals that race around the boundary and meet in a shared
//! [`ConcurrentMap`](data::ConcurrentMap).
//!
//! ```rust
//! # use chanhull::algorithms::convex_hull;
//! # use chanhull::data::Point;
//! let pts = vec![
//!   Point::new([-1.0, -1.0]),
//!   Point::new([0.25, 0.5]),
//!   Point::new([-1.0, 1.0]),
//!   Point::new([1.0, 1.0]),
//!   Point::new([1.0, -1.0]),
//! ];
//! let hull = convex_hull(&pts).unwrap();
//! assert_eq!(hull.len(), 4);
//! ```
#![deny(clippy::cast_lossless)]
#![doc(test(no_crate_inject))]

pub mod algorithms;
pub mod data;
pub mod io;
mod orientation;
mod utils;

pub use orientation::{orientation, Orientation, Rotation};
pub use utils::{distance, highest, leftmost, lowest, rightmost};

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// The group size `2^(2^exponent)` does not fit in a `usize`.
  #[error("group size 2^(2^{exponent}) overflows")]
  ExponentOverflow { exponent: u32 },
  /// The tangent bisection collapsed without the query point being a vertex
  /// of the polygon.
  #[error("tangent search could not locate the query point on the polygon")]
  TangentInconsistency,
  #[error("invalid configuration: {0}")]
  InvalidConfig(&'static str),
}
